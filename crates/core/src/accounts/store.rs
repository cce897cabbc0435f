use std::sync::Arc;

use tracing::debug;

use super::{CredentialRecord, SessionMarker, SESSION_KEY, USERS_KEY};
use crate::storage::{get_json, set_json, KeyValueStore, StorageError};

/// Typed access to the credential table and the session marker.
///
/// Every write re-serializes the whole table; there are no partial updates.
#[derive(Clone)]
pub struct AccountStore {
    kv: Arc<dyn KeyValueStore>,
}

impl AccountStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Name of the underlying backend, for logging.
    pub fn backend_name(&self) -> &'static str {
        self.kv.backend_name()
    }

    /// Load the full credential table. A missing key is an empty table.
    pub fn load_table(&self) -> Result<Vec<CredentialRecord>, StorageError> {
        let table: Option<Vec<CredentialRecord>> = get_json(self.kv.as_ref(), USERS_KEY)?;
        Ok(table.unwrap_or_default())
    }

    pub fn save_table(&self, table: &[CredentialRecord]) -> Result<(), StorageError> {
        debug!(records = table.len(), "Writing credential table");
        set_json(self.kv.as_ref(), USERS_KEY, &table)
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<CredentialRecord>, StorageError> {
        Ok(self.load_table()?.into_iter().find(|r| r.email == email))
    }

    pub fn read_session(&self) -> Result<Option<SessionMarker>, StorageError> {
        get_json(self.kv.as_ref(), SESSION_KEY)
    }

    pub fn write_session(&self, email: &str) -> Result<(), StorageError> {
        let marker = SessionMarker {
            email: email.to_string(),
        };
        set_json(self.kv.as_ref(), SESSION_KEY, &marker)
    }

    pub fn clear_session(&self) -> Result<(), StorageError> {
        self.kv.remove(SESSION_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::PasswordHash;
    use crate::library::Library;
    use crate::storage::MemoryStore;

    fn record(email: &str) -> CredentialRecord {
        CredentialRecord {
            id: format!("user-{}", email),
            name: "Reader".to_string(),
            email: email.to_string(),
            password: PasswordHash::new("pw"),
            bio: None,
            avatar_image: None,
            works: Library::new(),
        }
    }

    fn store() -> AccountStore {
        AccountStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_missing_table_is_empty() {
        assert!(store().load_table().unwrap().is_empty());
    }

    #[test]
    fn test_table_preserves_order() {
        let store = store();
        store
            .save_table(&[record("b@x.com"), record("a@x.com")])
            .unwrap();

        let emails: Vec<String> = store
            .load_table()
            .unwrap()
            .into_iter()
            .map(|r| r.email)
            .collect();
        assert_eq!(emails, vec!["b@x.com", "a@x.com"]);
    }

    #[test]
    fn test_find_by_email_is_exact() {
        let store = store();
        store.save_table(&[record("a@x.com")]).unwrap();

        assert!(store.find_by_email("a@x.com").unwrap().is_some());
        assert!(store.find_by_email("A@x.com").unwrap().is_none());
    }

    #[test]
    fn test_session_marker_lifecycle() {
        let store = store();
        assert!(store.read_session().unwrap().is_none());

        store.write_session("a@x.com").unwrap();
        assert_eq!(store.read_session().unwrap().unwrap().email, "a@x.com");

        store.clear_session().unwrap();
        assert!(store.read_session().unwrap().is_none());
    }
}
