//! Wire shapes for atomic set mutations

use serde::{Deserialize, Serialize};

use crate::models::AccountId;

/// The four relationship set fields of an account document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetField {
    Followers,
    Following,
    Requests,
    Friends,
}

impl SetField {
    /// The document field name as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            SetField::Followers => "followers",
            SetField::Following => "following",
            SetField::Requests => "requests",
            SetField::Friends => "friends",
        }
    }
}

/// One atomic, idempotent set mutation against a single account document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SetMutation {
    /// Add a member to a set field if not already present
    Add { field: SetField, value: AccountId },
    /// Remove a member from a set field if present
    Remove { field: SetField, value: AccountId },
}

impl SetMutation {
    /// The mutation that undoes this one, used for compensating
    /// rollback when the second document of a pair fails to apply
    pub fn inverse(&self) -> SetMutation {
        match *self {
            SetMutation::Add { field, value } => SetMutation::Remove { field, value },
            SetMutation::Remove { field, value } => SetMutation::Add { field, value },
        }
    }
}
