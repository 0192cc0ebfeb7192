use super::user::{User, UserSummary};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Signup payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

/// Login payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckTokenRequest {
    pub token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckTokenResponse {
    pub valid: bool,
}

/// Returned after a successful signup or login
///
/// Serializes flat: `{ "id", "name", "email", "token" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResult {
    #[serde(flatten)]
    pub user: UserSummary,
    pub token: String,
}

impl AuthResult {
    pub fn new(user: &User, token: String) -> Self {
        Self {
            user: UserSummary::from(user),
            token,
        }
    }
}
