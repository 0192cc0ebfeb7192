use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use crypto_core::JwtError;
use serde_json::json;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IdentityError>;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Signup hit the unique constraint on email
    #[error("Email already exists")]
    DuplicateIdentity,

    /// Unknown email or wrong password. Both cases must produce this exact
    /// value so callers cannot enumerate accounts.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Password hashing failed: {0}")]
    HashingFailure(String),

    #[error("Token signing failed: {0}")]
    SigningFailure(String),

    #[error("Database error: {0}")]
    PersistenceFailure(String),
}

impl IdentityError {
    /// Infrastructure failures; their detail stays server-side
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            IdentityError::HashingFailure(_)
                | IdentityError::SigningFailure(_)
                | IdentityError::PersistenceFailure(_)
        )
    }

    /// Only storage failures are worth retrying; hashing and signing failures
    /// point at misconfiguration or resource exhaustion.
    pub fn is_retryable(&self) -> bool {
        matches!(self, IdentityError::PersistenceFailure(_))
    }

    /// Text safe to show to the caller
    pub fn public_message(&self) -> String {
        if self.is_internal() {
            // Don't leak internal details in production
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }

    /// Build a `HashingFailure`, logging the cause server-side
    pub(crate) fn hashing_failure(context: &str, err: impl fmt::Display) -> Self {
        tracing::error!("{}: {}", context, err);
        IdentityError::HashingFailure(format!("{}: {}", context, err))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            IdentityError::DuplicateIdentity | IdentityError::InvalidCredentials => {
                StatusCode::FORBIDDEN
            }
            IdentityError::Validation(_) => StatusCode::BAD_REQUEST,
            IdentityError::HashingFailure(_)
            | IdentityError::SigningFailure(_)
            | IdentityError::PersistenceFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.public_message() }));
        (self.status_code(), body).into_response()
    }
}

// Conversions from external error types
impl From<sqlx::Error> for IdentityError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {}", err);
        IdentityError::PersistenceFailure(err.to_string())
    }
}

impl From<JwtError> for IdentityError {
    fn from(err: JwtError) -> Self {
        tracing::error!("JWT error: {}", err);
        IdentityError::SigningFailure(err.to_string())
    }
}

impl From<validator::ValidationErrors> for IdentityError {
    fn from(err: validator::ValidationErrors) -> Self {
        IdentityError::Validation(err.to_string())
    }
}
