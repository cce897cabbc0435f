//! Key-value persistence.
//!
//! A synchronous string-keyed store holding serialized JSON values. Every
//! write is atomic from the caller's point of view: either the new value is
//! visible to the next `get` or the call returns an error.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::config::{StorageBackend, StorageConfig};

/// Errors for key-value operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error for key '{key}': {message}")]
    Serialization { key: String, message: String },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Trait for key-value storage backends.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Name of this backend, for logs and the config endpoint.
    fn backend_name(&self) -> &'static str;
}

/// Read and deserialize a JSON value.
///
/// A value that fails to parse is reported as `Serialization`, never
/// silently replaced.
pub fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::Serialization {
                key: key.to_string(),
                message: e.to_string(),
            }),
        None => Ok(None),
    }
}

/// Serialize a value as JSON and store it.
pub fn set_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|e| StorageError::Serialization {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    store.set(key, &raw)
}

/// Factory function to create a store from config.
pub fn create_store(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>, StorageError> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StorageBackend::Sqlite => Ok(Arc::new(SqliteStore::new(&config.path)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Marker {
        email: String,
    }

    #[test]
    fn test_json_helpers_roundtrip() {
        let store = MemoryStore::new();
        let marker = Marker {
            email: "a@b.com".to_string(),
        };

        set_json(&store, "marker", &marker).unwrap();
        let loaded: Option<Marker> = get_json(&store, "marker").unwrap();

        assert_eq!(loaded, Some(marker));
    }

    #[test]
    fn test_get_json_missing_key() {
        let store = MemoryStore::new();
        let loaded: Option<Marker> = get_json(&store, "missing").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_get_json_corrupt_value() {
        let store = MemoryStore::new();
        store.set("marker", "{not json").unwrap();

        let result: Result<Option<Marker>, _> = get_json(&store, "marker");
        assert!(matches!(result, Err(StorageError::Serialization { .. })));
    }

    #[test]
    fn test_create_store_memory() {
        let config = StorageConfig {
            backend: StorageBackend::Memory,
            ..Default::default()
        };
        let store = create_store(&config).unwrap();
        assert_eq!(store.backend_name(), "memory");
    }

    #[test]
    fn test_create_store_sqlite() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            backend: StorageBackend::Sqlite,
            path: temp_dir.path().join("shelf.db"),
        };
        let store = create_store(&config).unwrap();
        assert_eq!(store.backend_name(), "sqlite");
    }
}
