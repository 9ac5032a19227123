//! The canonical event collection.

use std::sync::Arc;

use eventhub_core::clock::Clock;
use eventhub_core::error::DomainError;
use eventhub_core::observer::{Subscribers, Subscription};
use eventhub_core::persistence::{self, EVENTS_KEY, Persistence, StateStore};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::event::{Event, EventPatch, EventStatus};

/// What changed in an `EventStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventStoreChange {
    /// The whole collection was replaced.
    Replaced,
    /// An event was appended.
    Added(String),
    /// An event was updated.
    Updated(String),
    /// An event was removed.
    Deleted(String),
    /// An event's ticket availability moved.
    TicketsChanged(String),
    /// The collection was emptied.
    Cleared,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct EventState {
    events: Vec<Event>,
}

/// Owns canonical events and keeps a cached projection of the publicly
/// visible ones.
#[derive(Debug, Default)]
pub struct EventStore {
    state: EventState,
    visible: Vec<Event>,
    persistence: Option<Persistence>,
    subscribers: Subscribers<EventStoreChange>,
}

impl EventStore {
    /// An empty, purely in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An in-memory store seeded with `events`.
    #[must_use]
    pub fn with_events(events: Vec<Event>) -> Self {
        let mut store = Self {
            state: EventState { events },
            ..Self::default()
        };
        store.refresh_visible();
        store
    }

    /// A store rehydrated from, and flushing to, `backend`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the stored state cannot be
    /// loaded.
    pub fn open(backend: Arc<dyn StateStore>) -> Result<Self, DomainError> {
        let persistence = Persistence::new(backend, EVENTS_KEY);
        let state = persistence.load::<EventState>()?.unwrap_or_default();
        debug!(events = state.events.len(), "event store rehydrated");
        let mut store = Self {
            state,
            persistence: Some(persistence),
            ..Self::default()
        };
        store.refresh_visible();
        Ok(store)
    }

    /// Replaces the whole collection.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if flushing fails. The
    /// in-memory change stands regardless.
    pub fn set_events(&mut self, events: Vec<Event>) -> Result<(), DomainError> {
        self.state.events = events;
        self.commit(&EventStoreChange::Replaced)
    }

    /// Appends `event`. It joins the cached projection when
    /// [`Event::is_publicly_visible`] admits it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if flushing fails.
    pub fn add_event(&mut self, event: Event) -> Result<(), DomainError> {
        let id = event.id.clone();
        self.state.events.push(event);
        self.commit(&EventStoreChange::Added(id))
    }

    /// Merges `patch` onto the event with `id`.
    ///
    /// The pre-update snapshot becomes `previous_version`, `version` goes up
    /// by one, `last_modified` is stamped, and `status` becomes the patch's
    /// status or `pending-changes`. Returns `Ok(false)` if no event has
    /// `id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if flushing fails.
    pub fn update_event(
        &mut self,
        id: &str,
        patch: &EventPatch,
        clock: &dyn Clock,
    ) -> Result<bool, DomainError> {
        let Some(event) = self.state.events.iter_mut().find(|event| event.id == id) else {
            debug!(event_id = id, "update skipped: unknown event");
            return Ok(false);
        };

        let snapshot = event.snapshot();
        event.apply_patch(patch);
        event.status = patch.status.unwrap_or(EventStatus::PendingChanges);
        event.version = snapshot.version + 1;
        event.last_modified = clock.now();
        event.previous_version = Some(Box::new(snapshot));

        self.commit(&EventStoreChange::Updated(id.to_owned()))?;
        Ok(true)
    }

    /// Removes the event with `id`. Returns `Ok(false)` if there was none.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if flushing fails.
    pub fn delete_event(&mut self, id: &str) -> Result<bool, DomainError> {
        let before = self.state.events.len();
        self.state.events.retain(|event| event.id != id);
        if self.state.events.len() == before {
            debug!(event_id = id, "delete skipped: unknown event");
            return Ok(false);
        }
        self.commit(&EventStoreChange::Deleted(id.to_owned()))?;
        Ok(true)
    }

    /// Sells `quantity` tickets, or returns them when `is_cancel` is set.
    /// Availability is clamped to `[0, capacity]`. Returns `Ok(false)` if no
    /// event has `id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if flushing fails.
    pub fn update_ticket_availability(
        &mut self,
        id: &str,
        quantity: u32,
        is_cancel: bool,
    ) -> Result<bool, DomainError> {
        let Some(event) = self.state.events.iter_mut().find(|event| event.id == id) else {
            debug!(event_id = id, "ticket update skipped: unknown event");
            return Ok(false);
        };
        event.adjust_tickets(quantity, is_cancel);
        debug!(
            event_id = id,
            quantity,
            is_cancel,
            tickets_available = event.tickets_available,
            "ticket availability updated"
        );
        self.commit(&EventStoreChange::TicketsChanged(id.to_owned()))?;
        Ok(true)
    }

    /// Empties the collection.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if flushing fails.
    pub fn clear_events(&mut self) -> Result<(), DomainError> {
        self.state.events.clear();
        self.commit(&EventStoreChange::Cleared)
    }

    /// The event with `id`, if any.
    #[must_use]
    pub fn get_event_by_id(&self, id: &str) -> Option<&Event> {
        self.state.events.iter().find(|event| event.id == id)
    }

    /// Every canonical event, in insertion order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.state.events
    }

    /// Computes the publicly visible events from the canonical collection.
    #[must_use]
    pub fn get_visible_events(&self) -> Vec<Event> {
        self.state
            .events
            .iter()
            .filter(|event| event.is_publicly_visible())
            .cloned()
            .collect()
    }

    /// The cached visible projection, refreshed after every mutation.
    #[must_use]
    pub fn visible_events(&self) -> &[Event] {
        &self.visible
    }

    /// Registers a change callback.
    #[must_use = "dropping the Subscription unregisters the callback"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&EventStoreChange) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    fn refresh_visible(&mut self) {
        self.visible = self.get_visible_events();
    }

    fn commit(&mut self, change: &EventStoreChange) -> Result<(), DomainError> {
        self.refresh_visible();
        let flushed = persistence::flush(self.persistence.as_ref(), &self.state);
        self.subscribers.notify(change);
        flushed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::domain::event::fixtures::tech_meet;
    use eventhub_core::identity::PLATFORM_ORGANIZER;
    use eventhub_test_support::{FailingStateStore, FixedClock, RecordingStateStore, fixed_now};

    #[test]
    fn test_update_event_bumps_version_and_snapshots_previous() {
        // Arrange
        let original = tech_meet("evt-1");
        let mut store = EventStore::with_events(vec![original.clone()]);
        let patch = EventPatch {
            price: Some(750.0),
            ..EventPatch::default()
        };

        // Act
        let applied = store
            .update_event("evt-1", &patch, &FixedClock::default())
            .unwrap();

        // Assert
        let updated = store.get_event_by_id("evt-1").unwrap();
        assert!(applied);
        assert_eq!(updated.version, original.version + 1);
        assert_eq!(updated.previous_version.as_deref(), Some(&original));
        assert_eq!(updated.status, EventStatus::PendingChanges);
        assert_eq!(updated.last_modified, fixed_now());
        assert!((updated.price - 750.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_update_event_keeps_history_single_level() {
        let mut store = EventStore::with_events(vec![tech_meet("evt-1")]);
        let clock = FixedClock::default();

        store
            .update_event("evt-1", &EventPatch::default(), &clock)
            .unwrap();
        store
            .update_event("evt-1", &EventPatch::default(), &clock)
            .unwrap();

        let event = store.get_event_by_id("evt-1").unwrap();
        let previous = event.previous_version.as_deref().unwrap();
        assert_eq!(event.version, 3);
        assert_eq!(previous.version, 2);
        assert!(previous.previous_version.is_none());
    }

    #[test]
    fn test_update_event_uses_patch_status_when_present() {
        let mut store = EventStore::with_events(vec![tech_meet("evt-1")]);
        let patch = EventPatch {
            status: Some(EventStatus::Approved),
            ..EventPatch::default()
        };

        store
            .update_event("evt-1", &patch, &FixedClock::default())
            .unwrap();

        assert_eq!(
            store.get_event_by_id("evt-1").unwrap().status,
            EventStatus::Approved
        );
    }

    #[test]
    fn test_unknown_id_is_not_applied() {
        let mut store = EventStore::new();

        let updated = store
            .update_event("nope", &EventPatch::default(), &FixedClock::default())
            .unwrap();
        let deleted = store.delete_event("nope").unwrap();
        let tickets = store.update_ticket_availability("nope", 1, false).unwrap();

        assert!(!updated && !deleted && !tickets);
    }

    #[test]
    fn test_sell_then_cancel_restores_availability() {
        // Arrange
        let mut store = EventStore::with_events(vec![tech_meet("evt-1")]);

        // Act
        store.update_ticket_availability("evt-1", 3, false).unwrap();
        let after_sale = store.visible_events()[0].tickets_available;
        store.update_ticket_availability("evt-1", 3, true).unwrap();

        // Assert
        assert_eq!(after_sale, 97);
        assert_eq!(store.get_event_by_id("evt-1").unwrap().tickets_available, 100);
        assert_eq!(store.visible_events()[0].tickets_available, 100);
    }

    #[test]
    fn test_visible_projection_tracks_status_rules() {
        // Arrange
        let mut rejected = tech_meet("evt-2");
        rejected.status = EventStatus::Rejected;
        let mut pending = tech_meet("evt-3");
        pending.status = EventStatus::Pending;
        let mut platform_pending = tech_meet("evt-4");
        platform_pending.organizer = PLATFORM_ORGANIZER.to_owned();
        platform_pending.status = EventStatus::Pending;

        // Act
        let store = EventStore::with_events(vec![
            tech_meet("evt-1"),
            rejected,
            pending,
            platform_pending,
        ]);

        // Assert
        let ids: Vec<&str> = store
            .visible_events()
            .iter()
            .map(|event| event.id.as_str())
            .collect();
        assert_eq!(ids, vec!["evt-1", "evt-4"]);
        assert_eq!(store.get_visible_events(), store.visible_events());
    }

    #[test]
    fn test_set_events_replaces_collection_and_projection() {
        // Arrange
        let mut store = EventStore::with_events(vec![tech_meet("evt-1")]);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let _subscription = {
            let seen = Arc::clone(&seen);
            store.subscribe(move |change| seen.lock().unwrap().push(change.clone()))
        };
        let mut rejected = tech_meet("evt-3");
        rejected.status = EventStatus::Rejected;

        // Act
        store
            .set_events(vec![tech_meet("evt-2"), rejected])
            .unwrap();

        // Assert
        assert!(store.get_event_by_id("evt-1").is_none());
        assert_eq!(store.events().len(), 2);
        let visible: Vec<&str> = store
            .visible_events()
            .iter()
            .map(|event| event.id.as_str())
            .collect();
        assert_eq!(visible, vec!["evt-2"]);
        assert_eq!(*seen.lock().unwrap(), vec![EventStoreChange::Replaced]);
    }

    #[test]
    fn test_added_event_joins_projection_by_visibility_rule() {
        // Arrange
        let mut store = EventStore::new();
        let mut platform_pending = tech_meet("evt-2");
        platform_pending.organizer = PLATFORM_ORGANIZER.to_owned();
        platform_pending.status = EventStatus::Pending;
        let mut organizer_pending = tech_meet("evt-3");
        organizer_pending.status = EventStatus::Pending;

        // Act
        store.add_event(tech_meet("evt-1")).unwrap();
        store.add_event(platform_pending).unwrap();
        store.add_event(organizer_pending).unwrap();

        // Assert
        let visible: Vec<&str> = store
            .visible_events()
            .iter()
            .map(|event| event.id.as_str())
            .collect();
        assert_eq!(visible, vec!["evt-1", "evt-2"]);
        assert_eq!(store.events().len(), 3);
    }

    #[test]
    fn test_update_to_pending_changes_hides_event() {
        let mut store = EventStore::with_events(vec![tech_meet("evt-1")]);

        store
            .update_event("evt-1", &EventPatch::default(), &FixedClock::default())
            .unwrap();

        assert!(store.visible_events().is_empty());
    }

    #[test]
    fn test_delete_removes_from_both_projections() {
        let mut store = EventStore::with_events(vec![tech_meet("evt-1"), tech_meet("evt-2")]);

        assert!(store.delete_event("evt-1").unwrap());

        assert_eq!(store.events().len(), 1);
        assert_eq!(store.visible_events().len(), 1);
        assert!(store.get_event_by_id("evt-1").is_none());
    }

    #[test]
    fn test_subscribers_observe_mutations_in_order() {
        // Arrange
        let mut store = EventStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let _subscription = {
            let seen = Arc::clone(&seen);
            store.subscribe(move |change| seen.lock().unwrap().push(change.clone()))
        };

        // Act
        store.add_event(tech_meet("evt-1")).unwrap();
        store.update_ticket_availability("evt-1", 1, false).unwrap();
        store.clear_events().unwrap();

        // Assert
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                EventStoreChange::Added("evt-1".to_owned()),
                EventStoreChange::TicketsChanged("evt-1".to_owned()),
                EventStoreChange::Cleared,
            ]
        );
    }

    #[test]
    fn test_open_rehydrates_and_flushes_state() {
        // Arrange
        let backend = Arc::new(RecordingStateStore::seeded(
            EVENTS_KEY,
            serde_json::json!({ "events": [tech_meet("evt-1")] }),
        ));
        let mut store = EventStore::open(backend.clone()).unwrap();

        // Act
        store.add_event(tech_meet("evt-2")).unwrap();

        // Assert
        assert_eq!(store.visible_events().len(), 2);
        let blob = backend.blob(EVENTS_KEY).unwrap();
        assert_eq!(blob["events"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_flush_failure_surfaces_after_mutation_and_notification() {
        // Arrange
        let mut store = EventStore {
            persistence: Some(Persistence::new(Arc::new(FailingStateStore), EVENTS_KEY)),
            ..EventStore::default()
        };
        let notified = Arc::new(Mutex::new(false));
        let _subscription = {
            let notified = Arc::clone(&notified);
            store.subscribe(move |_| *notified.lock().unwrap() = true)
        };

        // Act
        let result = store.add_event(tech_meet("evt-1"));

        // Assert
        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
        assert!(store.get_event_by_id("evt-1").is_some());
        assert!(*notified.lock().unwrap());
    }
}
