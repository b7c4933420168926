use crate::{error::*, models::*};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

pub mod postgres;

pub use postgres::PostgresAccountRepository;

/// Account persistence
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Fails with `EmailAlreadyInUse` when the email is taken; the existing
    /// account is left untouched
    async fn create_account(&self, account: &Account) -> Result<()>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;
}

/// In-memory account repository for development and testing
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: Arc<DashMap<Uuid, Account>>,
    by_email: Arc<DashMap<String, Uuid>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create_account(&self, account: &Account) -> Result<()> {
        // The email index entry is the uniqueness lock
        match self.by_email.entry(account.email.clone()) {
            Entry::Occupied(_) => Err(IdentityError::EmailAlreadyInUse),
            Entry::Vacant(slot) => {
                self.accounts.insert(account.id, account.clone());
                slot.insert(account.id);
                Ok(())
            }
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        Ok(self.accounts.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let Some(id) = self.by_email.get(email).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn account(email: &str) -> Account {
        Account {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_in_memory_repository() {
        let repo = InMemoryAccountRepository::new();
        let alice = account("alice@example.com");

        repo.create_account(&alice).await.unwrap();

        let found = repo.find_by_email("alice@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, alice.id);
        assert!(repo.find_by_id(alice.id).await.unwrap().is_some());
        assert!(repo.find_by_email("ALICE@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_keeps_first_account() {
        let repo = InMemoryAccountRepository::new();
        let first = account("dup@example.com");
        let second = account("dup@example.com");

        repo.create_account(&first).await.unwrap();
        let err = repo.create_account(&second).await.unwrap_err();

        assert!(matches!(err, IdentityError::EmailAlreadyInUse));
        assert_eq!(repo.len(), 1);
        let stored = repo.find_by_email("dup@example.com").await.unwrap().unwrap();
        assert_eq!(stored.id, first.id);
    }
}
