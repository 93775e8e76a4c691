//! In-memory account store
//!
//! Single-document mutation batches apply under the write lock, so each
//! batch is atomic and the idempotence contract holds by construction.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{Account, AccountId};
use crate::storage::errors::StorageError;
use crate::storage::models::SetMutation;
use crate::storage::traits::AccountStore;

/// In-process reference backend for [`AccountStore`]
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<HashMap<AccountId, Account>>,
}

impl MemoryAccountStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    /// True when no accounts are stored
    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create_account(&self, account: Account) -> Result<Account, StorageError> {
        let mut accounts = self.accounts.write().await;
        if accounts
            .values()
            .any(|existing| existing.email == account.email)
        {
            return Err(StorageError::AlreadyExists(format!(
                "email '{}'",
                account.email
            )));
        }
        if accounts
            .values()
            .any(|existing| existing.username == account.username)
        {
            return Err(StorageError::AlreadyExists(format!(
                "username '{}'",
                account.username
            )));
        }
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StorageError> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<Account>, StorageError> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|account| account.username == username)
            .cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, StorageError> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|account| account.email == email)
            .cloned())
    }

    async fn update_account(&self, account: Account) -> Result<Account, StorageError> {
        let mut accounts = self.accounts.write().await;
        if !accounts.contains_key(&account.id) {
            return Err(StorageError::NotFound(account.id));
        }
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn apply_mutations(
        &self,
        id: AccountId,
        mutations: Vec<SetMutation>,
    ) -> Result<(), StorageError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(&id).ok_or(StorageError::NotFound(id))?;
        for mutation in &mutations {
            account.relationships.apply(mutation);
        }
        account.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn set_verified(&self, id: AccountId, verified: bool) -> Result<(), StorageError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(&id).ok_or(StorageError::NotFound(id))?;
        account.verified = verified;
        account.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn set_picture(&self, id: AccountId, url: String) -> Result<(), StorageError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(&id).ok_or(StorageError::NotFound(id))?;
        account.picture = Some(url);
        account.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, StorageError> {
        Ok(true)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.accounts.write().await.clear();
        Ok(())
    }
}
