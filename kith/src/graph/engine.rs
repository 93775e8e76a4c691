//! Relationship engine: transitions applied through an account store
//!
//! Each operation touches two account documents. The engine serializes
//! mutations per account with an async lock manager, acquiring both
//! locks in identifier order so concurrent operations on the same pair
//! cannot deadlock or lose updates. Guard evaluation and mutation happen
//! under the pair locks; if the second document fails to apply, the
//! first is compensated with inverse mutations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, error};

use crate::graph::transitions::{
    self, FriendshipStatus, GraphConfig, Outcome, RelationshipAction, TransitionPlan,
};
use crate::models::{Account, AccountId};
use crate::storage::AccountStore;
use crate::{KithError, Result};

/// Per-account mutation serialization.
///
/// Lock entries are created on first use and never evicted; the map
/// grows with the number of accounts ever touched, which is acceptable
/// for the store sizes this engine fronts.
#[derive(Debug, Default)]
struct LockManager {
    locks: Mutex<HashMap<AccountId, Arc<AsyncMutex<()>>>>,
}

impl LockManager {
    fn lock_handle(&self, id: AccountId) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().expect("lock manager poisoned");
        locks.entry(id).or_default().clone()
    }

    /// Acquire both accounts' locks in identifier order.
    async fn lock_pair(
        &self,
        a: AccountId,
        b: AccountId,
    ) -> (OwnedMutexGuard<()>, OwnedMutexGuard<()>) {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        let first_guard = self.lock_handle(first).lock_owned().await;
        let second_guard = self.lock_handle(second).lock_owned().await;
        (first_guard, second_guard)
    }
}

/// The relationship engine over an [`AccountStore`]
#[derive(Debug)]
pub struct RelationshipEngine {
    store: Arc<dyn AccountStore>,
    config: GraphConfig,
    locks: LockManager,
}

impl RelationshipEngine {
    /// Create an engine over a store
    pub fn new(store: Arc<dyn AccountStore>, config: GraphConfig) -> Self {
        Self {
            store,
            config,
            locks: LockManager::default(),
        }
    }

    /// The guard configuration in effect
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Bid for mutual friendship: actor → target
    pub async fn send_friend_request(
        &self,
        actor: AccountId,
        target: AccountId,
    ) -> Result<Outcome> {
        self.run(RelationshipAction::SendFriendRequest, actor, target)
            .await
    }

    /// Withdraw a pending request the actor sent to the target
    pub async fn cancel_friend_request(
        &self,
        actor: AccountId,
        target: AccountId,
    ) -> Result<Outcome> {
        self.run(RelationshipAction::CancelFriendRequest, actor, target)
            .await
    }

    /// One-directional follow: actor → target
    pub async fn follow(&self, actor: AccountId, target: AccountId) -> Result<Outcome> {
        self.run(RelationshipAction::Follow, actor, target).await
    }

    /// Remove a follow: actor → target
    pub async fn unfollow(&self, actor: AccountId, target: AccountId) -> Result<Outcome> {
        self.run(RelationshipAction::Unfollow, actor, target).await
    }

    /// The receiver accepts the sender's pending request
    pub async fn accept_friend_request(
        &self,
        receiver: AccountId,
        sender: AccountId,
    ) -> Result<Outcome> {
        self.run(RelationshipAction::AcceptFriendRequest, receiver, sender)
            .await
    }

    /// Sever an established friendship on both sides
    pub async fn unfriend(&self, actor: AccountId, target: AccountId) -> Result<Outcome> {
        self.run(RelationshipAction::Unfriend, actor, target).await
    }

    /// The receiver discards the sender's pending request
    pub async fn delete_incoming_request(
        &self,
        receiver: AccountId,
        sender: AccountId,
    ) -> Result<Outcome> {
        self.run(RelationshipAction::DeleteIncomingRequest, receiver, sender)
            .await
    }

    /// Run one guarded transition end to end.
    pub async fn run(
        &self,
        action: RelationshipAction,
        actor_id: AccountId,
        target_id: AccountId,
    ) -> Result<Outcome> {
        // Rejected uniformly before any state is read.
        if actor_id == target_id {
            return Err(KithError::SelfReference(action));
        }

        let _pair_guards = self.locks.lock_pair(actor_id, target_id).await;

        let actor = self.load(actor_id).await?;
        let target = self.load(target_id).await?;

        let plan = transitions::plan_transition(
            action,
            actor_id,
            target_id,
            &actor.relationships,
            &target.relationships,
            &self.config,
        )?;

        if plan.outcome == Outcome::Applied {
            self.apply_pair(actor_id, target_id, &plan).await?;
        }

        debug!(
            action = ?action,
            actor = %actor_id,
            target = %target_id,
            outcome = ?plan.outcome,
            "relationship transition"
        );

        Ok(plan.outcome)
    }

    /// Read-only friendship projection between a viewer and a subject.
    /// No locks are taken; the view tolerates staleness the same way a
    /// rendered profile does.
    pub async fn friendship_status(
        &self,
        viewer: AccountId,
        subject: AccountId,
    ) -> Result<FriendshipStatus> {
        let viewer_account = self.load(viewer).await?;
        let subject_account = self.load(subject).await?;
        Ok(transitions::friendship_status(
            viewer,
            subject,
            &viewer_account.relationships,
            &subject_account.relationships,
        ))
    }

    async fn load(&self, id: AccountId) -> Result<Account> {
        self.store
            .get_account(id)
            .await?
            .ok_or(KithError::AccountNotFound(id))
    }

    /// Apply the plan to both documents: actor first, then target, with
    /// compensating rollback of the actor's mutations if the target's
    /// batch fails. Each single-document batch is atomic in the store.
    async fn apply_pair(
        &self,
        actor_id: AccountId,
        target_id: AccountId,
        plan: &TransitionPlan,
    ) -> Result<()> {
        self.store
            .apply_mutations(actor_id, plan.actor_mutations.clone())
            .await?;

        if let Err(err) = self
            .store
            .apply_mutations(target_id, plan.target_mutations.clone())
            .await
        {
            let compensation: Vec<_> = plan
                .actor_mutations
                .iter()
                .map(|mutation| mutation.inverse())
                .collect();
            if let Err(rollback_err) =
                self.store.apply_mutations(actor_id, compensation).await
            {
                error!(
                    actor = %actor_id,
                    target = %target_id,
                    error = %rollback_err,
                    "compensating rollback failed; pair state may be inconsistent"
                );
            }
            return Err(err.into());
        }

        Ok(())
    }
}
