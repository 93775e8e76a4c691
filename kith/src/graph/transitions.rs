//! Pure guarded transitions over per-account relationship sets
//!
//! Every operation is a pure function of `(actor sets, target sets,
//! action)` producing a [`TransitionPlan`]: either a minimal list of set
//! mutations for each side, or an idempotent no-op. Guards are evaluated
//! against the state before mutation. The guard table is the contract;
//! some guards are deliberately more permissive than their mirror image
//! (`send_friend_request` checks only the requests set), and
//! [`GraphConfig::strict_guards`] opts into the symmetric variant.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::KithError;
use crate::models::AccountId;
use crate::storage::{SetField, SetMutation};

/// The four directional relationship sets of one account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipSets {
    /// Accounts that follow this account
    pub followers: BTreeSet<AccountId>,

    /// Accounts this account follows
    pub following: BTreeSet<AccountId>,

    /// Accounts that sent this account a pending friend request
    /// (receiver-side only; senders carry no mirrored field)
    pub requests: BTreeSet<AccountId>,

    /// Accounts with mutual friendship
    pub friends: BTreeSet<AccountId>,
}

impl RelationshipSets {
    /// True when all four sets are empty
    pub fn is_empty(&self) -> bool {
        self.followers.is_empty()
            && self.following.is_empty()
            && self.requests.is_empty()
            && self.friends.is_empty()
    }

    /// Borrow the set backing a field
    pub fn field(&self, field: SetField) -> &BTreeSet<AccountId> {
        match field {
            SetField::Followers => &self.followers,
            SetField::Following => &self.following,
            SetField::Requests => &self.requests,
            SetField::Friends => &self.friends,
        }
    }

    fn field_mut(&mut self, field: SetField) -> &mut BTreeSet<AccountId> {
        match field {
            SetField::Followers => &mut self.followers,
            SetField::Following => &mut self.following,
            SetField::Requests => &mut self.requests,
            SetField::Friends => &mut self.friends,
        }
    }

    /// Apply one set mutation. Adds and removes are idempotent.
    pub fn apply(&mut self, mutation: &SetMutation) {
        match mutation {
            SetMutation::Add { field, value } => {
                self.field_mut(*field).insert(*value);
            }
            SetMutation::Remove { field, value } => {
                self.field_mut(*field).remove(value);
            }
        }
    }
}

/// The relationship operations an actor can direct at a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipAction {
    /// Bid for mutual friendship; also establishes a follow
    SendFriendRequest,
    /// Withdraw a pending request the actor sent earlier
    CancelFriendRequest,
    /// One-directional subscription
    Follow,
    /// Remove a one-directional subscription
    Unfollow,
    /// Receiver accepts a pending request from the target
    AcceptFriendRequest,
    /// Full severance of an established friendship
    Unfriend,
    /// Receiver discards a pending request from the target
    DeleteIncomingRequest,
}

impl RelationshipAction {
    /// Message returned when the transition applied
    pub fn applied_message(&self) -> &'static str {
        match self {
            Self::SendFriendRequest => "friend request has been sent",
            Self::CancelFriendRequest => "friend request has been successfully cancelled",
            Self::Follow => "follow success",
            Self::Unfollow => "unfollow success",
            Self::AcceptFriendRequest => "friend request accepted",
            Self::Unfriend => "unfriend done",
            Self::DeleteIncomingRequest => "delete request done",
        }
    }

    /// Message returned when the guard failed and nothing was mutated
    pub fn already_message(&self) -> &'static str {
        match self {
            Self::SendFriendRequest => "Already a friend",
            Self::CancelFriendRequest => "Already cancelled",
            Self::Follow => "Already following",
            Self::Unfollow => "Already not following",
            Self::AcceptFriendRequest => "Already friends",
            Self::Unfriend => "Already not friends",
            Self::DeleteIncomingRequest => "Already deleted",
        }
    }

    /// Message for the uniform self-reference rejection
    pub fn self_reference_message(&self) -> &'static str {
        match self {
            Self::SendFriendRequest => "friend request cannot be sent to yourself",
            Self::CancelFriendRequest => "friend request cannot be sent or cancelled to yourself",
            Self::Follow => "you cannot follow yourself",
            Self::Unfollow => "you cannot unfollow yourself",
            Self::AcceptFriendRequest => "you cannot accept a friend request from yourself",
            Self::Unfriend => "you cannot unfriend yourself",
            Self::DeleteIncomingRequest => "you cannot delete a request from yourself",
        }
    }
}

/// Result of evaluating a transition guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The guard held and mutations were produced
    Applied,
    /// Idempotent no-op: the pair is already in (or already out of) the
    /// requested state. Not an error.
    AlreadyInState,
}

/// Guard configuration for the transition layer
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Make `send_friend_request` also reject when the actor already
    /// follows the target or the pair is already friends. Off by
    /// default: the permissive guard is the documented contract.
    pub strict_guards: bool,
}

/// A computed transition: outcome plus the mutations for each side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    /// The action that was evaluated
    pub action: RelationshipAction,
    /// Whether the guard held
    pub outcome: Outcome,
    /// Mutations to apply to the actor's document
    pub actor_mutations: Vec<SetMutation>,
    /// Mutations to apply to the target's document
    pub target_mutations: Vec<SetMutation>,
}

impl TransitionPlan {
    fn applied(
        action: RelationshipAction,
        actor_mutations: Vec<SetMutation>,
        target_mutations: Vec<SetMutation>,
    ) -> Self {
        Self {
            action,
            outcome: Outcome::Applied,
            actor_mutations,
            target_mutations,
        }
    }

    fn noop(action: RelationshipAction) -> Self {
        Self {
            action,
            outcome: Outcome::AlreadyInState,
            actor_mutations: Vec::new(),
            target_mutations: Vec::new(),
        }
    }

    /// The human-readable message for this plan's outcome
    pub fn message(&self) -> &'static str {
        match self.outcome {
            Outcome::Applied => self.action.applied_message(),
            Outcome::AlreadyInState => self.action.already_message(),
        }
    }

    /// Apply the plan to both sides' sets in place
    pub fn apply_to(&self, actor: &mut RelationshipSets, target: &mut RelationshipSets) {
        for mutation in &self.actor_mutations {
            actor.apply(mutation);
        }
        for mutation in &self.target_mutations {
            target.apply(mutation);
        }
    }
}

fn add(field: SetField, value: AccountId) -> SetMutation {
    SetMutation::Add { field, value }
}

fn remove(field: SetField, value: AccountId) -> SetMutation {
    SetMutation::Remove { field, value }
}

/// Evaluate one guarded transition against the pre-mutation state.
///
/// Self-reference is rejected before any set is read. For
/// `accept_friend_request` and `delete_incoming_request` the actor is
/// the receiver of the pending request and the target its sender.
pub fn plan_transition(
    action: RelationshipAction,
    actor_id: AccountId,
    target_id: AccountId,
    actor: &RelationshipSets,
    target: &RelationshipSets,
    config: &GraphConfig,
) -> Result<TransitionPlan, KithError> {
    if actor_id == target_id {
        return Err(KithError::SelfReference(action));
    }

    use RelationshipAction::*;
    let plan = match action {
        SendFriendRequest => {
            let already = target.requests.contains(&actor_id)
                || (config.strict_guards
                    && (target.followers.contains(&actor_id)
                        || target.friends.contains(&actor_id)));
            if already {
                TransitionPlan::noop(action)
            } else {
                TransitionPlan::applied(
                    action,
                    vec![add(SetField::Following, target_id)],
                    vec![
                        add(SetField::Requests, actor_id),
                        add(SetField::Followers, actor_id),
                    ],
                )
            }
        }
        CancelFriendRequest => {
            if target.requests.contains(&actor_id) {
                TransitionPlan::applied(
                    action,
                    vec![remove(SetField::Following, target_id)],
                    vec![
                        remove(SetField::Requests, actor_id),
                        remove(SetField::Followers, actor_id),
                    ],
                )
            } else {
                TransitionPlan::noop(action)
            }
        }
        Follow => {
            if !target.followers.contains(&actor_id) && !actor.following.contains(&target_id) {
                TransitionPlan::applied(
                    action,
                    vec![add(SetField::Following, target_id)],
                    vec![add(SetField::Followers, actor_id)],
                )
            } else {
                TransitionPlan::noop(action)
            }
        }
        Unfollow => {
            if target.followers.contains(&actor_id) && actor.following.contains(&target_id) {
                TransitionPlan::applied(
                    action,
                    vec![remove(SetField::Following, target_id)],
                    vec![remove(SetField::Followers, actor_id)],
                )
            } else {
                TransitionPlan::noop(action)
            }
        }
        AcceptFriendRequest => {
            // Actor is the receiver. Only the receiver's pending entry
            // for this sender is cleared; a reverse request, if one
            // exists, is left untouched.
            if actor.requests.contains(&target_id) {
                TransitionPlan::applied(
                    action,
                    vec![
                        add(SetField::Friends, target_id),
                        add(SetField::Following, target_id),
                        remove(SetField::Requests, target_id),
                    ],
                    vec![
                        add(SetField::Friends, actor_id),
                        add(SetField::Following, actor_id),
                    ],
                )
            } else {
                TransitionPlan::noop(action)
            }
        }
        Unfriend => {
            if target.friends.contains(&actor_id) && actor.friends.contains(&target_id) {
                TransitionPlan::applied(
                    action,
                    vec![
                        remove(SetField::Friends, target_id),
                        remove(SetField::Following, target_id),
                        remove(SetField::Followers, target_id),
                    ],
                    vec![
                        remove(SetField::Friends, actor_id),
                        remove(SetField::Following, actor_id),
                        remove(SetField::Followers, actor_id),
                    ],
                )
            } else {
                TransitionPlan::noop(action)
            }
        }
        DeleteIncomingRequest => {
            // Actor is the receiver discarding the target's request.
            if actor.requests.contains(&target_id) {
                TransitionPlan::applied(
                    action,
                    vec![
                        remove(SetField::Requests, target_id),
                        remove(SetField::Followers, target_id),
                    ],
                    vec![remove(SetField::Followers, actor_id)],
                )
            } else {
                TransitionPlan::noop(action)
            }
        }
    };

    Ok(plan)
}

/// Friendship status between a viewer and a profile subject
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendshipStatus {
    /// Mutual friendship in both directions
    pub friends: bool,
    /// The viewer follows the subject
    pub following: bool,
    /// The subject has a pending request in the viewer's inbox
    pub request_sent: bool,
    /// The viewer has a pending request in the subject's inbox
    pub request_received: bool,
}

/// Read-only projection used when rendering a profile. Tolerates either
/// side's sets being empty and never mutates.
pub fn friendship_status(
    viewer_id: AccountId,
    subject_id: AccountId,
    viewer: &RelationshipSets,
    subject: &RelationshipSets,
) -> FriendshipStatus {
    FriendshipStatus {
        friends: viewer.friends.contains(&subject_id) && subject.friends.contains(&viewer_id),
        following: viewer.following.contains(&subject_id),
        request_sent: viewer.requests.contains(&subject_id),
        request_received: subject.requests.contains(&viewer_id),
    }
}
