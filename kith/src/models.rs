//! Account model shared by the storage layer and the relationship engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::graph::RelationshipSets;

/// Opaque account identifier
pub type AccountId = Uuid;

/// A registered account and its relationship state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    /// Unique identifier for the account
    pub id: AccountId,

    /// First name (3-30 characters)
    pub first_name: String,

    /// Last name (3-30 characters)
    pub last_name: String,

    /// Unique username, derived from the name at registration
    pub username: String,

    /// Unique email address
    pub email: String,

    /// Bcrypt hash of the password; never serialized outward
    pub password_hash: String,

    /// Profile picture URL, if one has been set
    pub picture: Option<String>,

    /// Whether the email address has been verified
    pub verified: bool,

    /// Birth date components as provided at registration
    pub birth_year: u16,
    pub birth_month: u8,
    pub birth_day: u8,

    /// Self-described gender
    pub gender: String,

    /// Relationship sets; empty at account creation
    #[serde(default)]
    pub relationships: RelationshipSets,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create an account with empty relationship sets.
    ///
    /// The relationship sets always start empty; they are mutated only
    /// through the engine's transitions.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            picture: None,
            verified: false,
            birth_year: 0,
            birth_month: 0,
            birth_day: 0,
            gender: String::new(),
            relationships: RelationshipSets::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the birth date components
    pub fn with_birth_date(mut self, year: u16, month: u8, day: u8) -> Self {
        self.birth_year = year;
        self.birth_month = month;
        self.birth_day = day;
        self
    }

    /// Set the gender field
    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = gender.into();
        self
    }
}
