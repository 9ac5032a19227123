//! Support tickets, persisted as one collection.

use std::sync::Arc;

use eventhub_core::clock::Clock;
use eventhub_core::error::DomainError;
use eventhub_core::ids::IdGenerator;
use eventhub_core::observer::{Subscribers, Subscription};
use eventhub_core::persistence::{self, Persistence, SUPPORT_TICKETS_KEY, StateStore};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ticket::{ADMIN_USER_ID, SupportTicket, TicketMessage, TicketStatus};

/// What changed in a `SupportTicketStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketChange {
    Opened(String),
    StatusChanged(String, TicketStatus),
    MessageAdded(String),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TicketState {
    tickets: Vec<SupportTicket>,
}

/// Owns every support ticket.
#[derive(Debug, Default)]
pub struct SupportTicketStore {
    state: TicketState,
    persistence: Option<Persistence>,
    subscribers: Subscribers<TicketChange>,
}

impl SupportTicketStore {
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
        let persistence = Persistence::new(backend, SUPPORT_TICKETS_KEY);
        let state = persistence.load::<TicketState>()?.unwrap_or_default();
        Ok(Self {
            state,
            persistence: Some(persistence),
            subscribers: Subscribers::new(),
        })
    }

    /// Records `ticket`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if flushing fails.
    pub fn add_support_ticket(&mut self, ticket: SupportTicket) -> Result<(), DomainError> {
        let id = ticket.id.clone();
        self.state.tickets.push(ticket);
        self.commit(&TicketChange::Opened(id))
    }

    /// Moves the ticket to `status`, stamping `updated_at`. Returns
    /// `Ok(false)` if there is no such ticket.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if flushing fails.
    pub fn update_ticket_status(
        &mut self,
        id: &str,
        status: TicketStatus,
        clock: &dyn Clock,
    ) -> Result<bool, DomainError> {
        let Some(ticket) = self.find_mut(id) else {
            debug!(ticket_id = id, "status update skipped: unknown ticket");
            return Ok(false);
        };
        ticket.status = status;
        ticket.updated_at = clock.now();
        self.commit(&TicketChange::StatusChanged(id.to_owned(), status))?;
        Ok(true)
    }

    /// Appends `message` to the ticket's thread. Staff messages carry the
    /// user id `"admin"`; other messages carry the ticket owner's id.
    /// Returns the new message, or `None` if there is no such ticket.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if flushing fails.
    pub fn add_ticket_message(
        &mut self,
        id: &str,
        message: &str,
        is_admin: bool,
        clock: &dyn Clock,
        ids: &dyn IdGenerator,
    ) -> Result<Option<TicketMessage>, DomainError> {
        let Some(ticket) = self.find_mut(id) else {
            debug!(ticket_id = id, "message skipped: unknown ticket");
            return Ok(None);
        };
        let now = clock.now();
        let entry = TicketMessage {
            id: ids.next_id(),
            ticket_id: ticket.id.clone(),
            user_id: if is_admin {
                ADMIN_USER_ID.to_owned()
            } else {
                ticket.user_id.clone()
            },
            message: message.to_owned(),
            timestamp: now,
            is_admin,
        };
        ticket.messages.push(entry.clone());
        ticket.updated_at = now;
        self.commit(&TicketChange::MessageAdded(id.to_owned()))?;
        Ok(Some(entry))
    }

    /// Number of tickets in the `open` status.
    #[must_use]
    pub fn get_open_tickets_count(&self) -> usize {
        self.state
            .tickets
            .iter()
            .filter(|ticket| ticket.status == TicketStatus::Open)
            .count()
    }

    /// The ticket with `id`, if any.
    #[must_use]
    pub fn get_ticket_by_id(&self, id: &str) -> Option<&SupportTicket> {
        self.state.tickets.iter().find(|ticket| ticket.id == id)
    }

    /// Tickets opened by `user_id`, oldest first.
    #[must_use]
    pub fn get_tickets_by_user(&self, user_id: &str) -> Vec<SupportTicket> {
        self.state
            .tickets
            .iter()
            .filter(|ticket| ticket.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Unresolved tickets, oldest first.
    #[must_use]
    pub fn open_tickets(&self) -> Vec<SupportTicket> {
        self.state
            .tickets
            .iter()
            .filter(|ticket| ticket.is_open())
            .cloned()
            .collect()
    }

    /// Resolved tickets, oldest first.
    #[must_use]
    pub fn closed_tickets(&self) -> Vec<SupportTicket> {
        self.state
            .tickets
            .iter()
            .filter(|ticket| !ticket.is_open())
            .cloned()
            .collect()
    }

    /// Every ticket, oldest first.
    #[must_use]
    pub fn tickets(&self) -> &[SupportTicket] {
        &self.state.tickets
    }

    /// Registers a change callback.
    #[must_use = "dropping the Subscription unregisters the callback"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&TicketChange) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut SupportTicket> {
        self.state.tickets.iter_mut().find(|ticket| ticket.id == id)
    }

    fn commit(&mut self, change: &TicketChange) -> Result<(), DomainError> {
        let flushed = persistence::flush(self.persistence.as_ref(), &self.state);
        self.subscribers.notify(change);
        flushed
    }
}
