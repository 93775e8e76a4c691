//! Social relationship state machine
//!
//! Four directional sets per account (followers, following, requests,
//! friends) evolve under a small set of guarded transitions. The pure
//! layer in [`transitions`] computes minimal mutation plans; the
//! [`engine`] applies them through an [`AccountStore`] with per-account
//! mutation serialization.
//!
//! [`AccountStore`]: crate::storage::AccountStore

mod engine;
mod transitions;

pub use engine::RelationshipEngine;
pub use transitions::{
    FriendshipStatus, GraphConfig, Outcome, RelationshipAction, RelationshipSets, TransitionPlan,
    friendship_status, plan_transition,
};
