//! Persisted client-side records.
//!
//! Each record lives under its own key as `{"state": {...}, "version": N}`.
//! The `state` wrapper leaves room for migrations without touching the
//! field set. Backends sit behind [`StateStorage`]: the dashboard plugs in
//! browser `localStorage`, tests and headless callers use [`MemoryStorage`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("record (de)serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

// ── Storage seam ────────────────────────────────────────────────────

/// Durable key/value storage for JSON records.
pub trait StateStorage {
    /// Read the raw record under `key`. `Ok(None)` when nothing is stored.
    fn read(&self, key: &str) -> Result<Option<Value>, StorageError>;
    fn write(&self, key: &str, value: &Value) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage. Clones share the same backing map, so a second store
/// built from a clone sees what the first one wrote (a simulated reload).
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    records: Arc<Mutex<HashMap<String, Value>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Value>>, StorageError> {
        self.records
            .lock()
            .map_err(|_| StorageError::Backend("memory storage lock poisoned".into()))
    }
}

impl StateStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

// ── Records ─────────────────────────────────────────────────────────

/// On-disk wrapper around a record's fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub state: T,
    #[serde(default)]
    pub version: u32,
}

/// A state type that is persisted under a fixed key.
pub trait Record: Serialize + DeserializeOwned + Default {
    const KEY: &'static str;
    const VERSION: u32 = 0;
}

/// Load a record. Missing fields inside `state` take their defaults.
pub fn load<T: Record>(storage: &impl StateStorage) -> Result<Option<T>, StorageError> {
    let Some(raw) = storage.read(T::KEY)? else {
        return Ok(None);
    };
    let envelope: Envelope<T> = serde_json::from_value(raw)?;
    if envelope.version != T::VERSION {
        log::debug!(
            "{}: stored version {} differs from current {}",
            T::KEY,
            envelope.version,
            T::VERSION
        );
    }
    Ok(Some(envelope.state))
}

/// Write a record, replacing whatever was stored under its key.
pub fn save<T: Record>(storage: &impl StateStorage, state: &T) -> Result<(), StorageError> {
    let envelope = Envelope {
        state,
        version: T::VERSION,
    };
    storage.write(T::KEY, &serde_json::to_value(&envelope)?)
}

// ── Store ───────────────────────────────────────────────────────────

/// A record held in memory and written through to storage on every change.
///
/// Mutation goes through the record-specific methods (see `auth` and `ui`);
/// there is no public way to replace the state wholesale.
#[derive(Debug)]
pub struct PersistentStore<T, S> {
    state: T,
    storage: S,
}

impl<T: Record, S: StateStorage> PersistentStore<T, S> {
    /// Build a store seeded from whatever `storage` holds. An unreadable
    /// record is logged and replaced by defaults.
    pub fn init(storage: S) -> Self {
        let state = match load::<T>(&storage) {
            Ok(Some(state)) => state,
            Ok(None) => T::default(),
            Err(e) => {
                log::warn!("{}: ignoring unreadable record: {e}", T::KEY);
                T::default()
            }
        };
        Self { state, storage }
    }

    pub fn state(&self) -> &T {
        &self.state
    }

    /// Write the current snapshot again.
    pub fn flush(&self) -> Result<(), StorageError> {
        save(&self.storage, &self.state)
    }

    /// Flush and hand back the storage backend.
    pub fn dispose(self) -> S {
        if let Err(e) = self.flush() {
            log::warn!("{}: final flush failed: {e}", T::KEY);
        }
        self.storage
    }

    /// Apply `f` and persist the result. A failed write keeps the new
    /// in-memory state; the session carries on without durability.
    pub(crate) fn update(&mut self, f: impl FnOnce(&mut T)) {
        f(&mut self.state);
        if let Err(e) = self.flush() {
            log::warn!("{}: persist failed, keeping in-memory state: {e}", T::KEY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Counter {
        hits: u32,
        label: Option<String>,
    }

    impl Record for Counter {
        const KEY: &'static str = "counter-storage";
    }

    /// Backend whose writes always fail.
    struct ReadOnly;

    impl StateStorage for ReadOnly {
        fn read(&self, _key: &str) -> Result<Option<Value>, StorageError> {
            Ok(None)
        }
        fn write(&self, _key: &str, _value: &Value) -> Result<(), StorageError> {
            Err(StorageError::Backend("quota exceeded".into()))
        }
        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn save_wraps_state_in_envelope() {
        let storage = MemoryStorage::new();
        save(
            &storage,
            &Counter {
                hits: 3,
                label: None,
            },
        )
        .unwrap();

        let raw = storage.read("counter-storage").unwrap().unwrap();
        assert_eq!(raw, json!({ "state": { "hits": 3, "label": null }, "version": 0 }));
    }

    #[test]
    fn load_fills_missing_fields_with_defaults() {
        let storage = MemoryStorage::new();
        storage
            .write("counter-storage", &json!({ "state": { "label": "x" } }))
            .unwrap();

        let loaded: Counter = load(&storage).unwrap().unwrap();
        assert_eq!(loaded.hits, 0);
        assert_eq!(loaded.label.as_deref(), Some("x"));
    }

    #[test]
    fn load_absent_record_is_none() {
        let storage = MemoryStorage::new();
        assert!(load::<Counter>(&storage).unwrap().is_none());
    }

    #[test]
    fn init_replaces_corrupt_record_with_defaults() {
        let storage = MemoryStorage::new();
        storage.write("counter-storage", &json!("garbage")).unwrap();

        let store: PersistentStore<Counter, _> = PersistentStore::init(storage);
        assert_eq!(store.state(), &Counter::default());
    }

    #[test]
    fn update_survives_write_failure() {
        let mut store: PersistentStore<Counter, _> = PersistentStore::init(ReadOnly);
        store.update(|c| c.hits += 1);
        assert_eq!(store.state().hits, 1);
        assert!(store.flush().is_err());
    }

    #[test]
    fn memory_storage_clones_share_records() {
        let a = MemoryStorage::new();
        let b = a.clone();
        a.write("k", &json!(1)).unwrap();
        assert_eq!(b.read("k").unwrap(), Some(json!(1)));
        b.remove("k").unwrap();
        assert_eq!(a.read("k").unwrap(), None);
    }
}
