use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use thiserror::Error;

/// Errors produced by key-value store implementations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Requested key does not exist.
    #[error("entry not found for key: {key}")]
    NotFound { key: String },
    /// Underlying storage failure.
    #[error("storage failure: {reason}")]
    Storage { reason: String },
}

/// String key-value store used to mirror in-memory state across sessions.
///
/// Calls are synchronous: every mutation writes through before returning.
pub trait KeyValueStore {
    /// Persist a value under a key, overwriting any existing entry.
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Retrieve the value for a key.
    fn get(&self, key: &str) -> Result<String, StoreError>;

    /// Remove a key and its value (idempotent).
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store for tests and throwaway sessions. Clones share the same map.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryStore {
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut map = self.inner.lock().map_err(|err| StoreError::Storage {
            reason: format!("lock poisoned: {err}"),
        })?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<String, StoreError> {
        let map = self.inner.lock().map_err(|err| StoreError::Storage {
            reason: format!("lock poisoned: {err}"),
        })?;

        map.get(key).cloned().ok_or_else(|| StoreError::NotFound {
            key: key.to_string(),
        })
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut map = self.inner.lock().map_err(|err| StoreError::Storage {
            reason: format!("lock poisoned: {err}"),
        })?;
        map.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let store = InMemoryStore::new();
        let handle = store.clone();

        store.put("todos", "[]").expect("put should succeed");
        assert_eq!(handle.get("todos").expect("get should succeed"), "[]");
    }

    #[test]
    fn delete_is_idempotent_and_removes_data() {
        let store = InMemoryStore::new();
        store.put("k", "v").expect("put should succeed");
        store.delete("k").expect("delete should succeed");
        store.delete("k").expect("delete again should still succeed");

        let err = store.get("k").expect_err("get should fail after delete");
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
