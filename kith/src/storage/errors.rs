//! Error types for storage operations

use crate::models::AccountId;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Account identifier did not resolve
    #[error("Account not found: {0}")]
    NotFound(AccountId),

    /// A uniqueness constraint was violated
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Input rejected by the store
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation error
    #[error("Operation error: {0}")]
    Operation(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;
