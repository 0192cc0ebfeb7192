/// Identity Service Library
///
/// Issues and validates bearer tokens for user identities.
///
/// ## Modules
///
/// - `config`: Service configuration
/// - `db`: User repository capability and implementations
/// - `error`: Error taxonomy
/// - `http`: HTTP adapter
/// - `models`: Data models and request payloads
/// - `security`: Password hashing, JWT re-exports
/// - `services`: Credential lifecycle
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod security;
pub mod services;

// Re-export commonly used types
pub use error::{IdentityError, Result};
pub use services::CredentialService;
