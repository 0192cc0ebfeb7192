/// Security module for authentication
///
/// Provides core security primitives for identity-service:
/// - Password hashing and verification (Argon2id)
/// - JWT token issuance and validation (HS256 via crypto-core)
// Re-export JWT functionality from shared crypto-core library
pub use crypto_core::jwt;
pub use crypto_core::jwt::{Claims, InvalidReason, TokenIssuer, TokenVerdict, TokenVerifier};

pub mod password;

pub use password::PasswordHasher;
