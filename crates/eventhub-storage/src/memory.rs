//! Process-lifetime `StateStore`.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use eventhub_core::error::DomainError;
use eventhub_core::persistence::StateStore;

/// Keeps blobs in a map. Used when no data directory is configured.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    blobs: Mutex<HashMap<String, serde_json::Value>>,
}

impl InMemoryStateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if nothing has been saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StateStore for InMemoryStateStore {
    fn load(&self, key: &str) -> Result<Option<serde_json::Value>, DomainError> {
        Ok(self
            .blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), DomainError> {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DomainError> {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}
