//! Trait definition for account storage backends

use std::fmt::Debug;

use async_trait::async_trait;

use crate::models::{Account, AccountId};
use crate::storage::errors::StorageError;
use crate::storage::models::SetMutation;

/// Contract for the external account store.
///
/// Implementations must make `apply_mutations` atomic per document:
/// either every mutation in the batch is visible or none is, and set
/// adds/removes are idempotent so that a guard gone stale by the time
/// of application degrades to a no-op rather than an error.
#[async_trait]
pub trait AccountStore: Send + Sync + 'static + Debug {
    /// Create a new account. Fails with `AlreadyExists` when the email
    /// or username is taken.
    async fn create_account(&self, account: Account) -> Result<Account, StorageError>;

    /// Get an account by its ID
    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StorageError>;

    /// Look an account up by username
    async fn get_by_username(&self, username: &str) -> Result<Option<Account>, StorageError>;

    /// Look an account up by email
    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, StorageError>;

    /// Replace an account document
    async fn update_account(&self, account: Account) -> Result<Account, StorageError>;

    /// Apply a batch of set mutations to one account document atomically
    async fn apply_mutations(
        &self,
        id: AccountId,
        mutations: Vec<SetMutation>,
    ) -> Result<(), StorageError>;

    /// Mark an account's email as verified
    async fn set_verified(&self, id: AccountId, verified: bool) -> Result<(), StorageError>;

    /// Update an account's profile picture URL
    async fn set_picture(&self, id: AccountId, url: String) -> Result<(), StorageError>;

    /// Check if the store is healthy and available
    async fn health_check(&self) -> Result<bool, StorageError>;

    /// Clear all data in the store
    async fn clear(&self) -> Result<(), StorageError>;
}
