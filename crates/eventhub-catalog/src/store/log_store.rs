//! Append-only activity log.

use std::sync::Arc;

use eventhub_core::error::DomainError;
use eventhub_core::observer::{Subscribers, Subscription};
use eventhub_core::persistence::{self, EVENT_LOGS_KEY, Persistence, StateStore};
use serde::{Deserialize, Serialize};

use crate::domain::log::EventLog;

#[derive(Debug, Default, Serialize, Deserialize)]
struct LogState {
    logs: Vec<EventLog>,
}

/// Owns the activity log. Entries are never changed once added.
#[derive(Debug, Default)]
pub struct EventLogStore {
    state: LogState,
    persistence: Option<Persistence>,
    subscribers: Subscribers<EventLog>,
}

impl EventLogStore {
    /// An empty, purely in-memory log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A log rehydrated from, and flushing to, `backend`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the stored state cannot be
    /// loaded.
    pub fn open(backend: Arc<dyn StateStore>) -> Result<Self, DomainError> {
        let persistence = Persistence::new(backend, EVENT_LOGS_KEY);
        let state = persistence.load::<LogState>()?.unwrap_or_default();
        Ok(Self {
            state,
            persistence: Some(persistence),
            subscribers: Subscribers::new(),
        })
    }

    /// Appends `entry`. Subscribers receive the entry itself.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if flushing fails.
    pub fn add_log(&mut self, entry: EventLog) -> Result<(), DomainError> {
        self.state.logs.push(entry);
        let flushed = persistence::flush(self.persistence.as_ref(), &self.state);
        if let Some(entry) = self.state.logs.last() {
            self.subscribers.notify(entry);
        }
        flushed
    }

    /// Entries for `event_id`, in insertion order.
    #[must_use]
    pub fn get_logs_by_event_id(&self, event_id: &str) -> Vec<EventLog> {
        self.state
            .logs
            .iter()
            .filter(|entry| entry.event_id == event_id)
            .cloned()
            .collect()
    }

    /// Entries written by `user_id`, in insertion order.
    #[must_use]
    pub fn get_logs_by_user(&self, user_id: &str) -> Vec<EventLog> {
        self.state
            .logs
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Every entry, in insertion order.
    #[must_use]
    pub fn logs(&self) -> &[EventLog] {
        &self.state.logs
    }

    /// Registers a callback receiving each new entry.
    #[must_use = "dropping the Subscription unregisters the callback"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&EventLog) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(callback)
    }
}
