/// Credential lifecycle: signup, login and token checks
///
/// Each call is independent; the service holds only read-only collaborators
/// and can be shared across request handlers behind an `Arc`.
use crate::config::Settings;
use crate::db::UserRepository;
use crate::error::{IdentityError, Result};
use crate::models::{AuthResult, User};
use crate::security::{PasswordHasher, TokenIssuer, TokenVerdict, TokenVerifier};
use chrono::Duration;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Compared against when the email is unknown, so that a miss costs the
/// same Argon2 work as a wrong password.
const TIMING_DUMMY_PASSWORD: &str = "identity-service-timing-equalizer";

pub struct CredentialService {
    repo: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
    token_ttl: Duration,
    dummy_hash: Arc<str>,
}

impl CredentialService {
    /// Wire the service from already-built collaborators
    ///
    /// ## Errors
    ///
    /// `HashingFailure` if the hasher cannot produce a hash at all
    pub fn new(
        repo: Arc<dyn UserRepository>,
        hasher: PasswordHasher,
        issuer: TokenIssuer,
        verifier: TokenVerifier,
        token_ttl: Duration,
    ) -> Result<Self> {
        let dummy_hash = hasher.hash(TIMING_DUMMY_PASSWORD)?.into();

        Ok(Self {
            repo,
            hasher,
            issuer,
            verifier,
            token_ttl,
            dummy_hash,
        })
    }

    /// Build hasher, issuer and verifier from resolved settings
    pub fn from_settings(repo: Arc<dyn UserRepository>, settings: &Settings) -> Result<Self> {
        let secret = settings.jwt.secret.as_bytes();

        Self::new(
            repo,
            PasswordHasher::new(&settings.password)?,
            TokenIssuer::new(secret)?,
            TokenVerifier::new(secret)?,
            settings.jwt.token_ttl().ok_or_else(|| {
                IdentityError::SigningFailure("JWT_EXPIRY_SECONDS is out of range".to_string())
            })?,
        )
    }

    /// Create an identity and return a token for it
    ///
    /// No existence pre-check: the repository write alone decides whether
    /// the email is taken.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<AuthResult> {
        let password_hash = self.hash_blocking(password).await?;

        let user = match self.repo.create(name, email, &password_hash).await {
            Ok(user) => user,
            Err(IdentityError::DuplicateIdentity) => {
                info!("Signup rejected: email already registered");
                return Err(IdentityError::DuplicateIdentity);
            }
            Err(err) => return Err(err),
        };

        let token = self.issue_for(&user)?;

        info!(user_id = %user.id, "User signed up");

        Ok(AuthResult::new(&user, token))
    }

    /// Check a password and return a token for the matching identity
    ///
    /// Unknown email and wrong password return the same `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult> {
        let Some(user) = self.repo.find_by_email(email).await? else {
            // Burn the same hashing cost as a real comparison
            let _ = self
                .verify_blocking(self.dummy_hash.to_string(), password)
                .await;
            warn!("Login rejected: invalid credentials");
            return Err(IdentityError::InvalidCredentials);
        };

        if !self
            .verify_blocking(user.password_hash.clone(), password)
            .await?
        {
            warn!("Login rejected: invalid credentials");
            return Err(IdentityError::InvalidCredentials);
        }

        let token = self.issue_for(&user)?;

        info!(user_id = %user.id, "User logged in");

        Ok(AuthResult::new(&user, token))
    }

    /// `true` only for a token that is correctly signed and unexpired
    pub fn check_token(&self, token: &str) -> bool {
        match self.verifier.verify(token) {
            TokenVerdict::Valid(_) => true,
            TokenVerdict::Invalid(reason) => {
                debug!(?reason, "Token rejected");
                false
            }
        }
    }

    fn issue_for(&self, user: &User) -> Result<String> {
        Ok(self.issuer.issue(user.id, &user.email, self.token_ttl)?)
    }

    async fn hash_blocking(&self, password: &str) -> Result<String> {
        let hasher = self.hasher.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| IdentityError::hashing_failure("Hashing task failed", e))?
    }

    async fn verify_blocking(&self, password_hash: String, password: &str) -> Result<bool> {
        let hasher = self.hasher.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&password_hash, &password))
            .await
            .map_err(|e| IdentityError::hashing_failure("Verification task failed", e))?
    }
}
