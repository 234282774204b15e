//! Key-value persistence behind the repositories.
//!
//! [`BrowserStore`] is `window.localStorage`; [`MemoryStore`] backs tests.
//! Values are stored as JSON. The free functions [`read_or`],
//! [`read_for_update`] and [`write`] are the accessor boundary: failures are
//! logged there and degrade to a default value, `None` or `false`. They never
//! reach the caller as errors.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gloo_storage::{errors::StorageError as GlooStorageError, LocalStorage, Storage};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub const CUSTOMER_DB_KEY: &str = "customerDatabase";
pub const PRODUCT_DB_KEY: &str = "productDatabase";
pub const CALLSHEETS_KEY: &str = "callsheets";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Backend(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<GlooStorageError> for StorageError {
    fn from(e: GlooStorageError) -> Self {
        match e {
            GlooStorageError::SerdeError(e) => StorageError::Serialization(e),
            other => StorageError::Backend(other.to_string()),
        }
    }
}

pub trait KeyValueStore {
    /// `Ok(None)` when the key is absent.
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError>;
    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError>;
    fn remove(&self, key: &str);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStore;

impl KeyValueStore for BrowserStore {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match LocalStorage::get(key) {
            Ok(value) => Ok(Some(value)),
            Err(GlooStorageError::KeyNotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        LocalStorage::set(key, value).map_err(StorageError::from)
    }

    fn remove(&self, key: &str) {
        LocalStorage::delete(key);
    }
}

/// In-process store with the same JSON round trip as the browser one.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put raw text under a key, bypassing serialization.
    pub fn insert_raw(&self, key: &str, raw: &str) {
        self.values.borrow_mut().insert(key.to_string(), raw.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.values.borrow().get(key) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.values.borrow_mut().insert(key.to_string(), raw);
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.values.borrow_mut().remove(key);
    }
}

/// Read `key`, falling back to `default` when absent or unreadable.
pub fn read_or<S: KeyValueStore, T: DeserializeOwned>(store: &S, key: &str, default: T) -> T {
    match store.load(key) {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(e) => {
            log::error!("Error reading '{}' from storage: {}", key, e);
            default
        }
    }
}

/// Read `key` ahead of a read-modify-write. An absent key yields `default`;
/// an unreadable one yields `None` so the caller leaves the stored text alone.
pub fn read_for_update<S: KeyValueStore, T: DeserializeOwned>(store: &S, key: &str, default: T) -> Option<T> {
    match store.load(key) {
        Ok(Some(value)) => Some(value),
        Ok(None) => Some(default),
        Err(e) => {
            log::error!("Refusing to overwrite unreadable '{}' in storage: {}", key, e);
            None
        }
    }
}

/// Write `value` under `key`. Returns `false` (and logs) on failure.
pub fn write<S: KeyValueStore, T: Serialize>(store: &S, key: &str, value: &T) -> bool {
    match store.save(key, value) {
        Ok(()) => true,
        Err(e) => {
            log::error!("Error writing '{}' to storage: {}", key, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(write(&store, "numbers", &vec![1, 2, 3]));
        assert_eq!(store.raw("numbers").as_deref(), Some("[1,2,3]"));
        assert_eq!(read_or(&store, "numbers", Vec::<i32>::new()), vec![1, 2, 3]);
    }

    #[test]
    fn test_read_or_defaults() {
        let store = MemoryStore::new();
        assert_eq!(read_or(&store, "missing", 7), 7);

        store.insert_raw("broken", "{not json");
        assert_eq!(read_or(&store, "broken", Vec::<i32>::new()), Vec::<i32>::new());
    }

    #[test]
    fn test_read_for_update() {
        let store = MemoryStore::new();
        assert_eq!(read_for_update(&store, "missing", vec![0]), Some(vec![0]));

        store.insert_raw("broken", "{not json");
        assert_eq!(read_for_update(&store, "broken", Vec::<i32>::new()), None);
        assert_eq!(store.raw("broken").as_deref(), Some("{not json"));
    }

    #[test]
    fn test_remove() {
        let store = MemoryStore::new();
        write(&store, "key", &"value");
        store.remove("key");
        assert_eq!(store.raw("key"), None);
    }

    #[test]
    fn test_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();
        write(&store, "key", &1);
        assert_eq!(read_or(&other, "key", 0), 1);
    }
}
