//! In-process credential store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use wednfest_core::{AccountId, Email};

use super::{CredentialStore, RepositoryError};
use crate::models::{Account, NewAccount};

/// Credential store holding accounts in a process-local map.
///
/// The existence check and insert in [`CredentialStore::create`] run under one
/// write lock, so concurrent signups for the same email cannot both succeed.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    accounts: RwLock<HashMap<Email, Account>>,
    next_id: AtomicI32,
}

impl InMemoryCredentialStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    /// Whether the store holds no accounts.
    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, RepositoryError> {
        Ok(self.accounts.read().await.get(email).cloned())
    }

    async fn create(&self, account: NewAccount) -> Result<Account, RepositoryError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let now = Utc::now();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let created = Account {
            id: AccountId::new(id),
            email: account.email.clone(),
            password_hash: account.password_hash,
            verified: false,
            profile: account.profile,
            created_at: now,
            updated_at: now,
        };
        accounts.insert(account.email, created.clone());
        Ok(created)
    }

    async fn mark_verified(&self, email: &Email) -> Result<(), RepositoryError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(email).ok_or(RepositoryError::NotFound)?;
        account.verified = true;
        account.updated_at = Utc::now();
        Ok(())
    }

    async fn update_password(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(email).ok_or(RepositoryError::NotFound)?;
        account.password_hash = Some(password_hash.to_owned());
        account.updated_at = Utc::now();
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
