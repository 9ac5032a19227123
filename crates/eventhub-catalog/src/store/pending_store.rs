//! The queue of events awaiting admin review.

use std::collections::BTreeMap;
use std::sync::Arc;

use eventhub_core::error::DomainError;
use eventhub_core::observer::{Subscribers, Subscription};
use eventhub_core::persistence::{self, PENDING_EVENTS_KEY, Persistence, StateStore};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::event::{Event, ReviewStatus};

/// What changed in a `PendingEventStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingChange {
    /// An event was queued.
    Enqueued(String),
    /// A queued entry was replaced.
    Replaced(String),
    /// An entry left the queue.
    Removed(String),
    /// The review status of an event changed.
    StatusChanged(String, ReviewStatus),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PendingState {
    pending_events: Vec<Event>,
    event_status: BTreeMap<String, ReviewStatus>,
}

/// Owns the review queue and the last known review status of every event
/// that ever entered it. Holds at most one queued entry per id.
#[derive(Debug, Default)]
pub struct PendingEventStore {
    state: PendingState,
    persistence: Option<Persistence>,
    subscribers: Subscribers<PendingChange>,
}

impl PendingEventStore {
    /// An empty, purely in-memory queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A queue rehydrated from, and flushing to, `backend`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the stored state cannot be
    /// loaded.
    pub fn open(backend: Arc<dyn StateStore>) -> Result<Self, DomainError> {
        let persistence = Persistence::new(backend, PENDING_EVENTS_KEY);
        let state = persistence.load::<PendingState>()?.unwrap_or_default();
        debug!(
            pending = state.pending_events.len(),
            "pending event store rehydrated"
        );
        Ok(Self {
            state,
            persistence: Some(persistence),
            subscribers: Subscribers::new(),
        })
    }

    /// Queues `event` and marks it pending. An existing entry with the same
    /// id is replaced.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if flushing fails.
    pub fn add_pending_event(&mut self, event: Event) -> Result<(), DomainError> {
        let id = event.id.clone();
        self.state.pending_events.retain(|queued| queued.id != id);
        self.state.pending_events.push(event);
        self.state
            .event_status
            .insert(id.clone(), ReviewStatus::Pending);
        self.commit(&PendingChange::Enqueued(id))
    }

    /// Drops the queued entry for `id`. Returns `Ok(false)` if none was
    /// queued.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if flushing fails.
    pub fn remove_pending_event(&mut self, id: &str) -> Result<bool, DomainError> {
        let before = self.state.pending_events.len();
        self.state.pending_events.retain(|queued| queued.id != id);
        if self.state.pending_events.len() == before {
            debug!(event_id = id, "remove skipped: not queued");
            return Ok(false);
        }
        self.commit(&PendingChange::Removed(id.to_owned()))?;
        Ok(true)
    }

    /// Records the review status of `id` without touching the queue.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if flushing fails.
    pub fn update_event_status(&mut self, id: &str, status: ReviewStatus) -> Result<(), DomainError> {
        self.state.event_status.insert(id.to_owned(), status);
        self.commit(&PendingChange::StatusChanged(id.to_owned(), status))
    }

    /// Replaces the queued entry for `id` with `event`, moving it to the
    /// back of the queue and marking it pending.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if flushing fails.
    pub fn update_pending_event(&mut self, id: &str, event: Event) -> Result<(), DomainError> {
        self.state.pending_events.retain(|queued| queued.id != id);
        self.state.pending_events.push(event);
        self.state
            .event_status
            .insert(id.to_owned(), ReviewStatus::Pending);
        self.commit(&PendingChange::Replaced(id.to_owned()))
    }

    /// The queued entry for `id`, if any.
    #[must_use]
    pub fn get_pending_event_by_id(&self, id: &str) -> Option<&Event> {
        self.state.pending_events.iter().find(|queued| queued.id == id)
    }

    /// The last recorded review status of `id`, if it was ever queued.
    #[must_use]
    pub fn get_event_status(&self, id: &str) -> Option<ReviewStatus> {
        self.state.event_status.get(id).copied()
    }

    /// Every queued event, oldest first.
    #[must_use]
    pub fn pending_events(&self) -> &[Event] {
        &self.state.pending_events
    }

    /// Number of queued events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.pending_events.len()
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.pending_events.is_empty()
    }

    /// Registers a change callback.
    #[must_use = "dropping the Subscription unregisters the callback"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&PendingChange) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    fn commit(&mut self, change: &PendingChange) -> Result<(), DomainError> {
        let flushed = persistence::flush(self.persistence.as_ref(), &self.state);
        self.subscribers.notify(change);
        flushed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::EventStatus;
    use crate::domain::event::fixtures::tech_meet;
    use eventhub_test_support::RecordingStateStore;

    fn queued(id: &str) -> Event {
        let mut event = tech_meet(id);
        event.status = EventStatus::Pending;
        event.version = 0;
        event
    }

    #[test]
    fn test_add_pending_event_marks_status_pending() {
        let mut store = PendingEventStore::new();

        store.add_pending_event(queued("evt-1")).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get_event_status("evt-1"), Some(ReviewStatus::Pending));
    }

    #[test]
    fn test_queue_holds_one_entry_per_id() {
        // Arrange
        let mut store = PendingEventStore::new();
        store.add_pending_event(queued("evt-1")).unwrap();
        store.add_pending_event(queued("evt-2")).unwrap();
        let mut revised = queued("evt-1");
        revised.title = "Tech Meet Revised".to_owned();

        // Act
        store.add_pending_event(revised.clone()).unwrap();
        store.update_pending_event("evt-1", revised.clone()).unwrap();

        // Assert
        assert_eq!(store.len(), 2);
        assert_eq!(store.pending_events()[1], revised);
    }

    #[test]
    fn test_remove_keeps_status_history() {
        // Arrange
        let mut store = PendingEventStore::new();
        store.add_pending_event(queued("evt-1")).unwrap();

        // Act
        let removed = store.remove_pending_event("evt-1").unwrap();
        store
            .update_event_status("evt-1", ReviewStatus::Rejected)
            .unwrap();

        // Assert
        assert!(removed);
        assert!(store.is_empty());
        assert!(store.get_pending_event_by_id("evt-1").is_none());
        assert_eq!(store.get_event_status("evt-1"), Some(ReviewStatus::Rejected));
        assert!(!store.remove_pending_event("evt-1").unwrap());
    }

    #[test]
    fn test_state_survives_reopen() {
        // Arrange
        let backend = Arc::new(RecordingStateStore::new());
        let mut store = PendingEventStore::open(backend.clone()).unwrap();
        store.add_pending_event(queued("evt-1")).unwrap();

        // Act
        let reopened = PendingEventStore::open(backend).unwrap();

        // Assert
        assert_eq!(reopened.pending_events(), store.pending_events());
        assert_eq!(reopened.get_event_status("evt-1"), Some(ReviewStatus::Pending));
    }
}
