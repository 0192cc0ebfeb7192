/// Data models for identity and authentication
pub mod auth;
pub mod user;

pub use auth::{AuthResult, CheckTokenRequest, CheckTokenResponse, LoginRequest, SignupRequest};
pub use user::{User, UserSummary};
