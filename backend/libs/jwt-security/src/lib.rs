//! JWT signing-secret hygiene
//!
//! **Security Features**:
//! - Secret strength classification (length, Shannon entropy, patterns)
//! - Startup gate that refuses empty secrets and, in production, weak ones
//!
//! Services call [`ensure_signing_secret`] while validating configuration,
//! before any token is issued.

pub mod secret_validation;

pub use secret_validation::{
    ensure_signing_secret, validate_secret_strength, SecretError, SecretStrength,
};
