//! Credential table and session marker persistence.
//!
//! Records are keyed by email. Passwords are only ever held as
//! [`PasswordHash`] and never leave this module; callers see [`User`].

mod password;
mod store;
mod types;

pub use password::PasswordHash;
pub use store::AccountStore;
pub use types::{CredentialRecord, SessionMarker, SESSION_KEY, USERS_KEY};

use thiserror::Error;

use crate::library::{Library, User};
use crate::storage::StorageError;

/// Errors from registration and login.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("an account with this email already exists")]
    EmailTaken,

    /// Same message for unknown email and wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Registration input.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Reject blank required fields.
    pub fn validate(&self) -> Result<(), AccountError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("password", &self.password),
        ] {
            if value.trim().is_empty() {
                return Err(AccountError::Validation(format!("{} is required", field)));
            }
        }
        Ok(())
    }
}

impl AccountStore {
    /// Append a new credential record and persist the table.
    pub fn register(&self, registration: &Registration) -> Result<User, AccountError> {
        registration.validate()?;

        let mut table = self.load_table()?;
        if table.iter().any(|r| r.email == registration.email) {
            return Err(AccountError::EmailTaken);
        }

        let record = CredentialRecord {
            id: format!("user-{}", uuid::Uuid::new_v4()),
            name: registration.name.trim().to_string(),
            email: registration.email.clone(),
            password: PasswordHash::new(&registration.password),
            bio: None,
            avatar_image: None,
            works: Library::new(),
        };
        let user = record.to_user();
        table.push(record);
        self.save_table(&table)?;

        Ok(user)
    }

    /// Look up a record and check the password.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User, AccountError> {
        match self.find_by_email(email)? {
            Some(record) if record.password.verify(password) => Ok(record.to_user()),
            _ => Err(AccountError::InvalidCredentials),
        }
    }

    /// Write `user`'s profile and works back into its credential record.
    ///
    /// Returns `false` if no record with that email exists.
    pub fn save_user(&self, user: &User) -> Result<bool, StorageError> {
        let mut table = self.load_table()?;
        let Some(record) = table.iter_mut().find(|r| r.email == user.email) else {
            return Ok(false);
        };
        record.sync_from(user);
        self.save_table(&table)?;
        Ok(true)
    }

    /// Every registered user except the one with `email`, in table order.
    pub fn other_users(&self, email: &str) -> Result<Vec<User>, StorageError> {
        Ok(self
            .load_table()?
            .iter()
            .filter(|r| r.email != email)
            .map(CredentialRecord::to_user)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{Genre, MediaKind, NewWork};
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    fn store() -> AccountStore {
        AccountStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_register_then_authenticate() {
        let store = store();
        let user = store
            .register(&Registration::new("Ana", "a@b.com", "x"))
            .unwrap();
        assert!(user.id.starts_with("user-"));
        assert!(user.works.is_empty());

        let logged_in = store.authenticate("a@b.com", "x").unwrap();
        assert_eq!(logged_in, user);
    }

    #[test]
    fn test_register_duplicate_email() {
        let store = store();
        store
            .register(&Registration::new("Ana", "a@b.com", "x"))
            .unwrap();
        let err = store
            .register(&Registration::new("Other", "a@b.com", "y"))
            .unwrap_err();
        assert!(matches!(err, AccountError::EmailTaken));
        assert_eq!(store.load_table().unwrap().len(), 1);
    }

    #[test]
    fn test_register_rejects_blank_fields() {
        let store = store();
        let err = store
            .register(&Registration::new("  ", "a@b.com", "x"))
            .unwrap_err();
        assert!(matches!(err, AccountError::Validation(ref m) if m.contains("name")));

        let err = store
            .register(&Registration::new("Ana", "a@b.com", ""))
            .unwrap_err();
        assert!(matches!(err, AccountError::Validation(ref m) if m.contains("password")));

        assert!(store.load_table().unwrap().is_empty());
    }

    #[test]
    fn test_failures_are_uniform() {
        let store = store();
        store
            .register(&Registration::new("Ana", "a@b.com", "x"))
            .unwrap();

        let wrong_password = store.authenticate("a@b.com", "y").unwrap_err();
        let unknown_email = store.authenticate("nobody@b.com", "x").unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_eq!(wrong_password.to_string(), "Invalid email or password");
    }

    #[test]
    fn test_save_user_keeps_password() {
        let store = store();
        let mut user = store
            .register(&Registration::new("Ana", "a@b.com", "x"))
            .unwrap();

        user.name = "Ana Silva".to_string();
        user.works.add(
            NewWork::manual("Dune", MediaKind::Book, Genre::Fiction),
            "work-1".to_string(),
            chrono::Utc::now(),
        );
        assert!(store.save_user(&user).unwrap());

        let reloaded = store.authenticate("a@b.com", "x").unwrap();
        assert_eq!(reloaded.name, "Ana Silva");
        assert_eq!(reloaded.works.len(), 1);
    }

    #[test]
    fn test_save_user_unknown_email() {
        let store = store();
        let user = User {
            id: "user-x".to_string(),
            name: "Ghost".to_string(),
            email: "ghost@b.com".to_string(),
            bio: None,
            avatar_image: None,
            works: Library::new(),
        };
        assert!(!store.save_user(&user).unwrap());
    }

    #[test]
    fn test_other_users_excludes_self() {
        let store = store();
        store
            .register(&Registration::new("Ana", "a@b.com", "x"))
            .unwrap();
        store
            .register(&Registration::new("Bia", "b@b.com", "x"))
            .unwrap();

        let others = store.other_users("a@b.com").unwrap();
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].name, "Bia");
    }
}
