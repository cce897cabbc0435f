use serde::{Deserialize, Serialize};

use super::PasswordHash;
use crate::library::{Library, User};

/// Key of the credential table.
pub const USERS_KEY: &str = "myshelf_users";

/// Key of the session marker. Presence means "authenticated".
pub const SESSION_KEY: &str = "myshelf_session";

/// A row of the credential table: the user plus their password digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: PasswordHash,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_image: Option<String>,
    #[serde(default)]
    pub works: Library,
}

impl CredentialRecord {
    /// Session projection with the password stripped.
    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            bio: self.bio.clone(),
            avatar_image: self.avatar_image.clone(),
            works: self.works.clone(),
        }
    }

    /// Copy profile and works from `user`, keeping the password.
    pub(crate) fn sync_from(&mut self, user: &User) {
        self.name = user.name.clone();
        self.bio = user.bio.clone();
        self.avatar_image = user.avatar_image.clone();
        self.works = user.works.clone();
    }
}

/// Persisted session marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMarker {
    pub email: String,
}
