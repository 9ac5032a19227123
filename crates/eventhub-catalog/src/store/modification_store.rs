//! Modification records for edits to existing events.

use std::sync::Arc;

use eventhub_core::error::DomainError;
use eventhub_core::observer::{Subscribers, Subscription};
use eventhub_core::persistence::{self, MODIFICATIONS_KEY, Persistence, StateStore};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::event::ReviewStatus;
use crate::domain::modification::EventModification;

/// What changed in a `ModificationStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModificationChange {
    /// A record was added.
    Added(String),
    /// A record was resolved.
    StatusChanged(String, ReviewStatus),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ModificationState {
    modifications: Vec<EventModification>,
}

/// Owns every modification record.
#[derive(Debug, Default)]
pub struct ModificationStore {
    state: ModificationState,
    persistence: Option<Persistence>,
    subscribers: Subscribers<ModificationChange>,
}

impl ModificationStore {
    /// An empty, purely in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store rehydrated from, and flushing to, `backend`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the stored state cannot be
    /// loaded.
    pub fn open(backend: Arc<dyn StateStore>) -> Result<Self, DomainError> {
        let persistence = Persistence::new(backend, MODIFICATIONS_KEY);
        let state = persistence.load::<ModificationState>()?.unwrap_or_default();
        Ok(Self {
            state,
            persistence: Some(persistence),
            subscribers: Subscribers::new(),
        })
    }

    /// Records `modification`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if flushing fails.
    pub fn add_modification(&mut self, modification: EventModification) -> Result<(), DomainError> {
        let id = modification.id.clone();
        self.state.modifications.push(modification);
        self.commit(&ModificationChange::Added(id))
    }

    /// Resolves the record with `id`. Returns `Ok(false)` if there is none.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if flushing fails.
    pub fn update_modification_status(
        &mut self,
        id: &str,
        status: ReviewStatus,
        admin_notes: Option<String>,
    ) -> Result<bool, DomainError> {
        let Some(modification) = self
            .state
            .modifications
            .iter_mut()
            .find(|modification| modification.id == id)
        else {
            debug!(modification_id = id, "status update skipped: unknown modification");
            return Ok(false);
        };
        modification.status = status;
        modification.admin_notes = admin_notes;
        self.commit(&ModificationChange::StatusChanged(id.to_owned(), status))?;
        Ok(true)
    }

    /// Every record for `event_id`, oldest first.
    #[must_use]
    pub fn get_modifications_by_event_id(&self, event_id: &str) -> Vec<EventModification> {
        self.state
            .modifications
            .iter()
            .filter(|modification| modification.event_id == event_id)
            .cloned()
            .collect()
    }

    /// Every record still awaiting a decision.
    #[must_use]
    pub fn get_pending_modifications(&self) -> Vec<EventModification> {
        self.state
            .modifications
            .iter()
            .filter(|modification| modification.status == ReviewStatus::Pending)
            .cloned()
            .collect()
    }

    /// Registers a change callback.
    #[must_use = "dropping the Subscription unregisters the callback"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ModificationChange) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    fn commit(&mut self, change: &ModificationChange) -> Result<(), DomainError> {
        let flushed = persistence::flush(self.persistence.as_ref(), &self.state);
        self.subscribers.notify(change);
        flushed
    }
}
