//! Test state stores — fake `StateStore` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use eventhub_core::error::DomainError;
use eventhub_core::persistence::StateStore;

/// A state store that keeps blobs in memory and records every save, so tests
/// can assert what was flushed and in which order.
#[derive(Debug, Default)]
pub struct RecordingStateStore {
    blobs: Mutex<HashMap<String, serde_json::Value>>,
    saves: Mutex<Vec<(String, serde_json::Value)>>,
}

impl RecordingStateStore {
    /// Create an empty recording store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recording store pre-seeded with `key` → `value`.
    #[must_use]
    pub fn seeded(key: &str, value: serde_json::Value) -> Self {
        let store = Self::default();
        store
            .blobs
            .lock()
            .unwrap()
            .insert(key.to_owned(), value);
        store
    }

    /// Returns a snapshot of all saves in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn saves(&self) -> Vec<(String, serde_json::Value)> {
        self.saves.lock().unwrap().clone()
    }

    /// Returns the latest blob saved under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn blob(&self, key: &str) -> Option<serde_json::Value> {
        self.blobs.lock().unwrap().get(key).cloned()
    }
}

impl StateStore for RecordingStateStore {
    fn load(&self, key: &str) -> Result<Option<serde_json::Value>, DomainError> {
        Ok(self.blobs.lock().unwrap().get(key).cloned())
    }

    fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), DomainError> {
        self.blobs
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.clone());
        self.saves
            .lock()
            .unwrap()
            .push((key.to_owned(), value.clone()));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DomainError> {
        self.blobs.lock().unwrap().remove(key);
        Ok(())
    }
}

/// A state store that never holds anything and silently accepts saves.
/// Useful for stores that should start empty without caring about flushes.
#[derive(Debug)]
pub struct EmptyStateStore;

impl StateStore for EmptyStateStore {
    fn load(&self, _key: &str) -> Result<Option<serde_json::Value>, DomainError> {
        Ok(None)
    }

    fn save(&self, _key: &str, _value: &serde_json::Value) -> Result<(), DomainError> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<(), DomainError> {
        Ok(())
    }
}

/// A state store that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingStateStore;

impl StateStore for FailingStateStore {
    fn load(&self, _key: &str) -> Result<Option<serde_json::Value>, DomainError> {
        Err(DomainError::Infrastructure("disk unavailable".into()))
    }

    fn save(&self, _key: &str, _value: &serde_json::Value) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("disk unavailable".into()))
    }

    fn remove(&self, _key: &str) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("disk unavailable".into()))
    }
}
