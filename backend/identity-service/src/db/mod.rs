/// Persistence for identity records
///
/// [`UserRepository`] is the capability the credential flows consume. The
/// store's unique constraint on email is the only arbiter for concurrent
/// signups: `create` must report a collision as `DuplicateIdentity` even if an
/// earlier lookup found nothing.
use crate::error::Result;
use crate::models::User;
use async_trait::async_trait;

pub mod memory;
pub mod users;

pub use memory::InMemoryUserRepository;
pub use users::PgUserRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Atomically create a user if no user with `email` exists.
    ///
    /// ## Errors
    ///
    /// - `DuplicateIdentity` when the email is taken
    /// - `PersistenceFailure` for any other storage error
    async fn create(&self, name: &str, email: &str, password_hash: &str) -> Result<User>;

    /// Exact (case-sensitive) lookup by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
}
