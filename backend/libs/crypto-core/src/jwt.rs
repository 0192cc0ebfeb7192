//! Shared JWT issuance and verification for Nova services
//!
//! Tokens are HS256-signed with a shared secret and carry `{sub, email, iat, exp}`.
//!
//! ## Security Design
//!
//! - **HS256 ONLY**: the verifier pins the algorithm, so tokens signed with any
//!   other algorithm (including `none`) are rejected as bad signatures
//! - **No empty secrets**: issuer and verifier refuse to build from an empty
//!   secret, so misconfiguration surfaces at startup
//! - **Invalid is not exceptional**: verification returns a [`TokenVerdict`]
//!   instead of an error; callers that only need a yes/no use
//!   [`TokenVerifier::is_valid`], which hides the reason
//!
//! ## Usage
//!
//! ```rust
//! use crypto_core::jwt::{default_token_ttl, TokenIssuer, TokenVerifier};
//! use uuid::Uuid;
//!
//! let secret = b"an-example-secret-that-is-long-enough";
//! let issuer = TokenIssuer::new(secret).unwrap();
//! let verifier = TokenVerifier::new(secret).unwrap();
//!
//! let token = issuer
//!     .issue(Uuid::new_v4(), "ada@x.io", default_token_ttl())
//!     .unwrap();
//! assert!(verifier.is_valid(&token));
//! ```
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Constants
// ============================================================================

/// Default token lifetime
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 30;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// 30 days, the policy applied to tokens issued after signup and login
pub fn default_token_ttl() -> Duration {
    Duration::days(DEFAULT_TOKEN_TTL_DAYS)
}

// ============================================================================
// Data Structures
// ============================================================================

#[derive(Debug, Error)]
pub enum JwtError {
    /// The signing secret is missing. This is a configuration error and must
    /// be caught during startup validation.
    #[error("signing secret is empty")]
    EmptySecret,

    /// `now + ttl` falls outside the representable date range
    #[error("token expiry is out of range")]
    ExpiryOutOfRange,

    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (identity ID as UUID string)
    pub sub: String,
    /// Email address
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Subject parsed back into an identity ID
    pub fn subject_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

/// Why a token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// Signature does not match the secret, or the algorithm is not HS256
    BadSignature,
    /// Signature is fine but `now > exp`
    Expired,
    /// Not a decodable JWT or required claims are missing
    Malformed,
}

/// Outcome of token verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenVerdict {
    Valid(Claims),
    Invalid(InvalidReason),
}

impl TokenVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenVerdict::Valid(_))
    }

    pub fn claims(&self) -> Option<&Claims> {
        match self {
            TokenVerdict::Valid(claims) => Some(claims),
            TokenVerdict::Invalid(_) => None,
        }
    }

    pub fn reason(&self) -> Option<InvalidReason> {
        match self {
            TokenVerdict::Valid(_) => None,
            TokenVerdict::Invalid(reason) => Some(*reason),
        }
    }
}

// ============================================================================
// Token Issuance
// ============================================================================

/// Builds signed, time-bounded tokens
#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("algorithm", &JWT_ALGORITHM)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// ## Errors
    ///
    /// Returns [`JwtError::EmptySecret`] if `secret` is empty
    pub fn new(secret: &[u8]) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::EmptySecret);
        }

        Ok(Self {
            key: EncodingKey::from_secret(secret),
        })
    }

    /// Issue a token for `subject` expiring `ttl` from now
    pub fn issue(&self, subject: Uuid, email: &str, ttl: Duration) -> Result<String, JwtError> {
        self.issue_at(subject, email, ttl, Utc::now())
    }

    /// Issue a token against an explicit clock reading
    ///
    /// Identical inputs produce identical tokens.
    ///
    /// ## Errors
    ///
    /// Returns [`JwtError::ExpiryOutOfRange`] if `now + ttl` overflows
    pub fn issue_at(
        &self,
        subject: Uuid,
        email: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or(JwtError::ExpiryOutOfRange)?;

        let claims = Claims {
            sub: subject.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        Ok(encode(&Header::new(JWT_ALGORITHM), &claims, &self.key)?)
    }
}

// ============================================================================
// Token Verification
// ============================================================================

/// Checks signature and expiry, recovering the claims
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithm", &JWT_ALGORITHM)
            .finish_non_exhaustive()
    }
}

impl TokenVerifier {
    /// ## Errors
    ///
    /// Returns [`JwtError::EmptySecret`] if `secret` is empty
    pub fn new(secret: &[u8]) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::EmptySecret);
        }

        // Expiry is compared against the caller's clock in `verify_at`, with
        // no leeway: a token is valid while `now <= exp`.
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    pub fn verify(&self, token: &str) -> TokenVerdict {
        self.verify_at(token, Utc::now())
    }

    /// Verify against an explicit clock reading
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> TokenVerdict {
        match decode::<Claims>(token, &self.key, &self.validation) {
            Ok(data) if now.timestamp() <= data.claims.exp => TokenVerdict::Valid(data.claims),
            Ok(_) => TokenVerdict::Invalid(InvalidReason::Expired),
            Err(err) => TokenVerdict::Invalid(classify(err.kind())),
        }
    }

    /// Boolean-only view; every invalid reason collapses to `false`
    pub fn is_valid(&self, token: &str) -> bool {
        self.verify(token).is_valid()
    }
}

fn classify(kind: &ErrorKind) -> InvalidReason {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => InvalidReason::BadSignature,
        ErrorKind::ExpiredSignature => InvalidReason::Expired,
        _ => InvalidReason::Malformed,
    }
}

// ============================================================================
// Per-call secret helpers
// ============================================================================

/// Issue a token with a secret supplied per call
pub fn issue_token(
    subject: Uuid,
    email: &str,
    ttl: Duration,
    secret: &[u8],
) -> Result<String, JwtError> {
    TokenIssuer::new(secret)?.issue(subject, email, ttl)
}

/// Verify a token with a secret supplied per call
///
/// An empty secret cannot have signed anything, so it yields `BadSignature`.
pub fn verify_token(token: &str, secret: &[u8]) -> TokenVerdict {
    match TokenVerifier::new(secret) {
        Ok(verifier) => verifier.verify(token),
        Err(_) => TokenVerdict::Invalid(InvalidReason::BadSignature),
    }
}

// ============================================================================
// Tests
// ============================================================================
