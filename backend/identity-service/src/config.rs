//! Configuration management for Identity Service
//!
//! Loads settings from:
//! 1. Environment variables
//! 2. .env file (local development)
//!
//! Settings are resolved and validated once at startup; the rest of the
//! service only ever sees the resolved values.
//!
//! # Example
//!
//! ```no_run
//! use identity_service::config::Settings;
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     settings.validate()?;
//!     println!("Token TTL: {}s", settings.jwt.expiry_seconds);
//!     Ok(())
//! }
//! ```

use anyhow::{bail, Context, Result};
use chrono::Utc;
use crypto_core::DEFAULT_TOKEN_TTL_DAYS;
use jwt_security::ensure_signing_secret;
use serde::Deserialize;
use std::{env, fmt};
use tracing::info;

const DEFAULT_TOKEN_TTL_SECONDS: u64 = DEFAULT_TOKEN_TTL_DAYS as u64 * 24 * 3600;

/// Application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub app_env: String,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub password: PasswordSettings,
    pub server: ServerSettings,
}

impl Settings {
    /// Load settings from environment variables (and `.env` in debug builds)
    pub fn load() -> Result<Self> {
        if cfg!(debug_assertions) && dotenvy::dotenv().is_ok() {
            info!("Loaded .env file for development");
        }

        Ok(Settings {
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            database: DatabaseSettings::from_env()?,
            jwt: JwtSettings::from_env()?,
            password: PasswordSettings::from_env()?,
            server: ServerSettings::from_env()?,
        })
    }

    /// Production and staging refuse weak signing secrets
    pub fn is_production_like(&self) -> bool {
        matches!(
            self.app_env.to_ascii_lowercase().as_str(),
            "production" | "staging"
        )
    }

    /// Startup validation. Anything rejected here would otherwise fail at
    /// the first signup or login.
    pub fn validate(&self) -> Result<()> {
        let strength = ensure_signing_secret(&self.jwt.secret, self.is_production_like())
            .context("Invalid JWT_ACCESS_SECRET")?;
        info!(strength = ?strength, "JWT signing secret accepted");

        if self.jwt.expiry_seconds == 0 {
            bail!("JWT_EXPIRY_SECONDS must be greater than zero");
        }
        let ttl = self
            .jwt
            .token_ttl()
            .context("JWT_EXPIRY_SECONDS is out of range")?;
        if Utc::now().checked_add_signed(ttl).is_none() {
            bail!("JWT_EXPIRY_SECONDS puts token expiry past the supported date range");
        }

        self.password.validate()?;

        Ok(())
    }
}

/// Database connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: u64,
}

impl DatabaseSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Invalid DATABASE_MAX_CONNECTIONS")?,
            acquire_timeout: env::var("DATABASE_ACQUIRE_TIMEOUT")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("Invalid DATABASE_ACQUIRE_TIMEOUT")?,
        })
    }
}

/// JWT signing settings
#[derive(Clone, Deserialize)]
pub struct JwtSettings {
    pub secret: String,
    pub expiry_seconds: u64,
}

impl fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"<redacted>")
            .field("expiry_seconds", &self.expiry_seconds)
            .finish()
    }
}

impl JwtSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            secret: env::var("JWT_ACCESS_SECRET").context("JWT_ACCESS_SECRET must be set")?,
            expiry_seconds: env::var("JWT_EXPIRY_SECONDS")
                .unwrap_or_else(|_| DEFAULT_TOKEN_TTL_SECONDS.to_string())
                .parse()
                .context("Invalid JWT_EXPIRY_SECONDS")?,
        })
    }

    /// Token lifetime as a chrono duration, `None` when `expiry_seconds`
    /// cannot be represented
    pub fn token_ttl(&self) -> Option<chrono::Duration> {
        i64::try_from(self.expiry_seconds)
            .ok()
            .and_then(chrono::Duration::try_seconds)
    }
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PasswordSettings {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordSettings {
    /// OWASP baseline for Argon2id: 19 MiB, 2 iterations, 1 lane
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl PasswordSettings {
    fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            memory_kib: env::var("PASSWORD_MEMORY_KIB")
                .unwrap_or_else(|_| defaults.memory_kib.to_string())
                .parse()
                .context("Invalid PASSWORD_MEMORY_KIB")?,
            iterations: env::var("PASSWORD_ITERATIONS")
                .unwrap_or_else(|_| defaults.iterations.to_string())
                .parse()
                .context("Invalid PASSWORD_ITERATIONS")?,
            parallelism: env::var("PASSWORD_PARALLELISM")
                .unwrap_or_else(|_| defaults.parallelism.to_string())
                .parse()
                .context("Invalid PASSWORD_PARALLELISM")?,
        })
    }

    fn validate(&self) -> Result<()> {
        argon2::Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| anyhow::anyhow!("Invalid Argon2 parameters: {e}"))?;
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid SERVER_PORT")?,
        })
    }
}
