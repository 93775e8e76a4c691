//! # Kith
//!
//! Social graph engine for account-based applications: one-directional
//! follows, pending friend requests and mutual friendships, with the
//! invariants between a pair of accounts enforced by a small transition
//! layer.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use kith::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let store = Arc::new(MemoryAccountStore::new());
//!     let engine = RelationshipEngine::new(store.clone(), GraphConfig::default());
//!
//!     let alice = store
//!         .create_account(Account::new("Alice", "Liddell", "alice", "alice@example.com", "hash"))
//!         .await?;
//!     let bob = store
//!         .create_account(Account::new("Bob", "Marley", "bob", "bob@example.com", "hash"))
//!         .await?;
//!
//!     // Alice asks Bob to be friends; Bob accepts.
//!     engine.send_friend_request(alice.id, bob.id).await?;
//!     engine.accept_friend_request(bob.id, alice.id).await?;
//!
//!     let status = engine.friendship_status(alice.id, bob.id).await?;
//!     assert!(status.friends);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Graph**: pure guarded transitions over per-account relationship
//!   sets, plus an engine that serializes mutations per account pair
//!   (always available).
//! - **Storage**: the `AccountStore` trait models an external document
//!   store with atomic per-document set updates; an in-memory backend is
//!   provided for embedding and tests.
//! - **Mail**: verification-mail delivery as a pluggable collaborator.
//!
//! This crate provides the core library functionality that can be used
//! directly in Rust applications or through the separate server crate.

pub mod graph;
pub mod mail;
pub mod models;
pub mod storage;
pub mod validation;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    pub use crate::graph::{
        FriendshipStatus, GraphConfig, Outcome, RelationshipAction, RelationshipEngine,
        RelationshipSets,
    };
    pub use crate::mail::{Mailer, NullMailer};
    pub use crate::models::{Account, AccountId};
    pub use crate::storage::{
        AccountStore, MemoryAccountStore, SetField, SetMutation, StorageError,
    };
    pub use crate::{KithError, Result};
}

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error type for Kith operations
#[derive(Debug, thiserror::Error)]
pub enum KithError {
    /// Error during storage operations
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    /// A relationship action named the acting account as its own target
    #[error("{}", .0.self_reference_message())]
    SelfReference(graph::RelationshipAction),

    /// Account lookup failed
    #[error("Account not found: {0}")]
    AccountNotFound(models::AccountId),

    /// Input failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Mail delivery error
    #[error("Mail error: {0}")]
    Mail(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Result type for Kith operations
pub type Result<T> = std::result::Result<T, KithError>;
