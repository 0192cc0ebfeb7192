/// Service layer for identity-service
///
/// Provides business logic:
/// - Credential lifecycle (signup, login, token checks)
pub mod credentials;

pub use credentials::CredentialService;
