//! Browser `localStorage` backend for the persisted stores.

use dlpanel_common::persist::{StateStorage, StorageError};
use gloo_storage::errors::StorageError as GlooError;
use gloo_storage::{LocalStorage, Storage};
use serde_json::Value;

/// Zero-sized handle to `window.localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl StateStorage for BrowserStorage {
    fn read(&self, key: &str) -> Result<Option<Value>, StorageError> {
        match LocalStorage::get::<Value>(key) {
            Ok(value) => Ok(Some(value)),
            Err(GlooError::KeyNotFound(_)) => Ok(None),
            Err(e) => Err(StorageError::Backend(e.to_string())),
        }
    }

    fn write(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        LocalStorage::set(key, value).map_err(|e| StorageError::Backend(e.to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        LocalStorage::delete(key);
        Ok(())
    }
}
