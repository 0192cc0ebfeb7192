//! Cryptographic primitives shared across Nova services
//!
//! - [`jwt`]: HS256 token issuance and verification

pub mod jwt;

pub use jwt::{
    default_token_ttl, issue_token, verify_token, Claims, InvalidReason, JwtError, TokenIssuer,
    TokenVerdict, TokenVerifier, DEFAULT_TOKEN_TTL_DAYS,
};
