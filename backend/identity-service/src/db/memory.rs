/// In-process user repository keyed by email
///
/// Used by tests and local runs without PostgreSQL. The dashmap entry API
/// gives the same atomic create-if-absent guarantee as the unique index.
use super::UserRepository;
use crate::error::{IdentityError, Result};
use crate::models::User;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<DashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, name: &str, email: &str, password_hash: &str) -> Result<User> {
        match self.users.entry(email.to_string()) {
            Entry::Occupied(_) => Err(IdentityError::DuplicateIdentity),
            Entry::Vacant(slot) => {
                let user = User {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                    email: email.to_string(),
                    password_hash: password_hash.to_string(),
                    created_at: Utc::now(),
                };
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.get(email).map(|entry| entry.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_find() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create("Ada", "ada@x.io", "hash").await.unwrap();

        let found = repo.find_by_email("ada@x.io").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.name, "Ada");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create("Ada", "ada@x.io", "hash").await.unwrap();

        let second = repo.create("Eve", "ada@x.io", "other").await;
        assert_eq!(second.unwrap_err(), IdentityError::DuplicateIdentity);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_sensitive() {
        let repo = InMemoryUserRepository::new();
        repo.create("Ada", "ada@x.io", "hash").await.unwrap();

        assert!(repo.find_by_email("ADA@x.io").await.unwrap().is_none());
        assert!(repo.create("Ada", "ADA@x.io", "hash").await.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_creates_yield_one_record() {
        let repo = InMemoryUserRepository::new();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.create(&format!("user-{i}"), "race@x.io", "hash").await
                })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(err) => assert_eq!(err, IdentityError::DuplicateIdentity),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(repo.len(), 1);
    }
}
