//! The shelf data model: works, the per-user collection, and filters.
//!
//! Uniqueness rule: two works with a non-empty `external_id` may not share
//! the same `(external_id, kind)` pair. Manually entered works are exempt.

mod collection;
mod types;

pub use collection::Library;
pub use types::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generate a new work identifier.
pub fn new_work_id() -> String {
    format!("work-{}", uuid::Uuid::new_v4())
}

/// Session-visible user. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_image: Option<String>,
    #[serde(default)]
    pub works: Library,
}

impl User {
    /// Up to two upper-case initials from the display name.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}

/// Partial profile update. Email is the credential key and is not editable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_image: Option<String>,
}

impl ProfilePatch {
    pub(crate) fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(bio) = self.bio {
            user.bio = Some(bio).filter(|b| !b.is_empty());
        }
        if let Some(avatar) = self.avatar_image {
            user.avatar_image = Some(avatar).filter(|a| !a.is_empty());
        }
    }
}

/// Timestamp source for new works.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now()
}
