//! Commands for the registration context.

use eventhub_core::command::Command;
use eventhub_core::identity::Actor;
use uuid::Uuid;

use super::registration::{AttendeeInfo, TicketType};

/// Command to buy tickets to a visible event.
#[derive(Debug, Clone)]
pub struct BookTickets {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The purchasing user.
    pub actor: Actor,
    /// The event to attend.
    pub event_id: String,
    /// Ticket tier.
    pub ticket_type: TicketType,
    /// Number of tickets.
    pub quantity: u32,
    /// Who will attend.
    pub attendee: AttendeeInfo,
}

impl Command for BookTickets {
    fn command_type(&self) -> &'static str {
        "registration.book_tickets"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor(&self) -> &Actor {
        &self.actor
    }
}

/// Command to cancel a registration and release its tickets.
#[derive(Debug, Clone)]
pub struct CancelRegistration {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The cancelling user.
    pub actor: Actor,
    /// The registration to cancel.
    pub registration_id: String,
}

impl Command for CancelRegistration {
    fn command_type(&self) -> &'static str {
        "registration.cancel_registration"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor(&self) -> &Actor {
        &self.actor
    }
}

/// Command to hand a registration to another attendee.
#[derive(Debug, Clone)]
pub struct TransferRegistration {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The transferring user.
    pub actor: Actor,
    /// The registration to transfer.
    pub registration_id: String,
    /// The new attendee.
    pub attendee: AttendeeInfo,
}

impl Command for TransferRegistration {
    fn command_type(&self) -> &'static str {
        "registration.transfer_registration"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor(&self) -> &Actor {
        &self.actor
    }
}
