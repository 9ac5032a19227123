//! The session-scoped catalog service object.

use std::sync::Arc;

use eventhub_core::error::DomainError;
use eventhub_core::persistence::StateStore;
use tracing::info;

use crate::store::{EventLogStore, EventStore, ModificationStore, PendingEventStore};

/// The four catalog stores, constructed together at session start and
/// dropped together at logout.
#[derive(Debug, Default)]
pub struct Catalog {
    /// Canonical events.
    pub events: EventStore,
    /// The review queue.
    pub pending: PendingEventStore,
    /// Modification records.
    pub modifications: ModificationStore,
    /// The activity log.
    pub logs: EventLogStore,
}

impl Catalog {
    /// An empty, purely in-memory catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog whose stores rehydrate from, and flush to, `backend`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if any store's state cannot be
    /// loaded.
    pub fn open(backend: &Arc<dyn StateStore>) -> Result<Self, DomainError> {
        let catalog = Self {
            events: EventStore::open(Arc::clone(backend))?,
            pending: PendingEventStore::open(Arc::clone(backend))?,
            modifications: ModificationStore::open(Arc::clone(backend))?,
            logs: EventLogStore::open(Arc::clone(backend))?,
        };
        info!(
            events = catalog.events.events().len(),
            pending = catalog.pending.len(),
            "catalog opened"
        );
        Ok(catalog)
    }
}
