//! Account storage abstractions
//!
//! The engine treats persistence as an external document store with
//! atomic per-document field updates. [`AccountStore`] is the contract;
//! [`MemoryAccountStore`] is the in-process reference backend used for
//! embedding and tests.

mod errors;
mod memory;
mod models;
mod traits;

pub use errors::{StorageError, StorageResult};
pub use memory::MemoryAccountStore;
pub use models::{SetField, SetMutation};
pub use traits::AccountStore;
