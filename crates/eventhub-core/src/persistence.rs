//! State-blob persistence abstraction.
//!
//! Stores treat persistence as an opaque key/value save and load: each store
//! serializes its whole state under one well-known key after every mutation
//! and rehydrates it once at construction.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::DomainError;

/// Storage key for the canonical event collection.
pub const EVENTS_KEY: &str = "event-storage";
/// Storage key for the pending-review queue.
pub const PENDING_EVENTS_KEY: &str = "organizer-storage";
/// Storage key for modification records.
pub const MODIFICATIONS_KEY: &str = "event-modifications";
/// Storage key for the activity log.
pub const EVENT_LOGS_KEY: &str = "event-logs";
/// Storage key for registrations and payment status.
pub const REGISTRATIONS_KEY: &str = "registrations";
/// Storage key for support tickets.
pub const SUPPORT_TICKETS_KEY: &str = "support-tickets";

/// Durable key/value storage for serialized store state.
pub trait StateStore: Send + Sync {
    /// Loads the blob stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the backing storage fails.
    fn load(&self, key: &str) -> Result<Option<serde_json::Value>, DomainError>;

    /// Replaces the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the backing storage fails.
    fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), DomainError>;

    /// Removes the blob stored under `key`. Removing a missing key is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the backing storage fails.
    fn remove(&self, key: &str) -> Result<(), DomainError>;
}

/// A store's binding to one key of a `StateStore`.
#[derive(Clone)]
pub struct Persistence {
    backend: Arc<dyn StateStore>,
    key: &'static str,
}

impl fmt::Debug for Persistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Persistence").field("key", &self.key).finish()
    }
}

impl Persistence {
    /// Binds `key` of `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn StateStore>, key: &'static str) -> Self {
        Self { backend, key }
    }

    /// The key this binding reads and writes.
    #[must_use]
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Loads and deserializes the stored state, if present.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if loading fails or the stored
    /// blob does not match `T`.
    pub fn load<T: DeserializeOwned>(&self) -> Result<Option<T>, DomainError> {
        let Some(value) = self.backend.load(self.key)? else {
            return Ok(None);
        };
        serde_json::from_value(value).map(Some).map_err(|e| {
            DomainError::Infrastructure(format!("state deserialization failed for {}: {e}", self.key))
        })
    }

    /// Serializes and saves `state`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if serialization or saving fails.
    pub fn save<T: Serialize>(&self, state: &T) -> Result<(), DomainError> {
        let value = serde_json::to_value(state).map_err(|e| {
            DomainError::Infrastructure(format!("state serialization failed for {}: {e}", self.key))
        })?;
        self.backend.save(self.key, &value)?;
        tracing::trace!(key = self.key, "state flushed");
        Ok(())
    }
}

/// Flushes `state` through an optional binding. Stores without a binding are
/// purely in-memory and always succeed.
///
/// # Errors
///
/// Propagates the binding's save error.
pub fn flush<T: Serialize>(persistence: Option<&Persistence>, state: &T) -> Result<(), DomainError> {
    match persistence {
        Some(binding) => binding.save(state),
        None => Ok(()),
    }
}
