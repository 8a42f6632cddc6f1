//! Single named slot mirrored between memory and a storage provider.
//!
//! # Responsibility
//! - Load the slot once at open time, falling back to a caller default.
//! - Persist every write synchronously and notify subscribers.
//!
//! # Invariants
//! - `open` and `write` never fail; storage problems are logged and kept as
//!   degraded-mode state.
//! - After `write` returns, the in-memory value is the value just written,
//!   whether or not the provider accepted it.

use super::StorageProvider;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

type Listener<T> = Box<dyn FnMut(&T)>;

/// In-memory value of type `T` kept in sync with one storage key.
pub struct PersistedStore<T, S> {
    storage: S,
    key: String,
    value: T,
    last_error: Option<String>,
    listeners: Vec<Listener<T>>,
}

impl<T, S> PersistedStore<T, S>
where
    T: Serialize + DeserializeOwned,
    S: StorageProvider,
{
    /// Opens the slot `key`, using `default` when it is missing, unreadable
    /// or unparseable.
    pub fn open(storage: S, key: impl Into<String>, default: T) -> Self {
        let key = key.into();
        let (value, last_error) = match storage.get(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => {
                    debug!(
                        "event=store_open module=storage status=ok key={} bytes={}",
                        key,
                        raw.len()
                    );
                    (value, None)
                }
                Err(err) => {
                    warn!(
                        "event=store_open module=storage status=degraded key={} error_code=slot_parse_failed error={}",
                        key, err
                    );
                    (default, Some(format!("slot `{key}` is not valid JSON: {err}")))
                }
            },
            Ok(None) => {
                debug!("event=store_open module=storage status=empty key={key}");
                (default, None)
            }
            Err(err) => {
                warn!(
                    "event=store_open module=storage status=degraded key={} error_code=slot_read_failed error={}",
                    key, err
                );
                (default, Some(format!("slot `{key}` could not be read: {err}")))
            }
        };

        Self {
            storage,
            key,
            value,
            last_error,
            listeners: Vec::new(),
        }
    }

    pub fn read(&self) -> &T {
        &self.value
    }

    /// Replaces the value, persists it, then notifies subscribers.
    pub fn write(&mut self, value: T) {
        match self.persist(&value) {
            Ok(bytes) => {
                debug!(
                    "event=store_write module=storage status=ok key={} bytes={}",
                    self.key, bytes
                );
                self.last_error = None;
            }
            Err(message) => {
                warn!(
                    "event=store_write module=storage status=degraded key={} error={}",
                    self.key, message
                );
                self.last_error = Some(message);
            }
        }

        self.value = value;
        for listener in &mut self.listeners {
            listener(&self.value);
        }
    }

    /// Clones the current value, applies `f`, and writes the result.
    pub fn update(&mut self, f: impl FnOnce(&mut T))
    where
        T: Clone,
    {
        let mut next = self.value.clone();
        f(&mut next);
        self.write(next);
    }

    /// Registers a callback run after every `write`.
    pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Returns whether the last load or write could not reach storage.
    pub fn is_degraded(&self) -> bool {
        self.last_error.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn persist(&self, value: &T) -> Result<usize, String> {
        let raw = serde_json::to_string(value)
            .map_err(|err| format!("slot `{}` could not be serialized: {err}", self.key))?;
        self.storage
            .set(&self.key, &raw)
            .map_err(|err| format!("slot `{}` could not be written: {err}", self.key))?;
        Ok(raw.len())
    }
}

#[cfg(test)]
mod tests {
    use super::PersistedStore;
    use crate::storage::{MemoryStorage, StorageError, StorageProvider, StorageResult};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct BrokenStorage;

    impl StorageProvider for BrokenStorage {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Unavailable("access denied".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }
    }

    #[test]
    fn open_uses_default_for_missing_slot() {
        let store = PersistedStore::open(MemoryStorage::new(), "numbers", vec![1, 2]);
        assert_eq!(store.read(), &vec![1, 2]);
        assert!(!store.is_degraded());
    }

    #[test]
    fn open_uses_default_for_corrupt_slot() {
        let storage = MemoryStorage::with_slot("numbers", "{not json");
        let store = PersistedStore::open(storage, "numbers", Vec::<i32>::new());
        assert!(store.read().is_empty());
        assert!(store.last_error().unwrap().contains("not valid JSON"));
    }

    #[test]
    fn write_persists_and_reopen_restores() {
        let storage = MemoryStorage::new();
        let mut store = PersistedStore::open(&storage, "numbers", Vec::<i32>::new());
        store.write(vec![3, 1, 2]);
        assert_eq!(storage.raw("numbers").as_deref(), Some("[3,1,2]"));

        let reopened = PersistedStore::open(&storage, "numbers", Vec::<i32>::new());
        assert_eq!(reopened.read(), &vec![3, 1, 2]);
    }

    #[test]
    fn broken_storage_degrades_without_losing_writes() {
        let mut store = PersistedStore::open(BrokenStorage, "numbers", vec![0]);
        assert_eq!(store.read(), &vec![0]);
        assert!(store.is_degraded());

        store.update(|numbers| numbers.push(9));
        assert_eq!(store.read(), &vec![0, 9]);
        assert!(store.last_error().unwrap().contains("quota exceeded"));
    }

    #[test]
    fn subscribers_see_each_write() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut store = PersistedStore::open(MemoryStorage::new(), "n", 0_u32);
        store.subscribe(move |value| sink.borrow_mut().push(*value));

        store.write(1);
        store.update(|value| *value += 1);
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }
}
