//! Commands for the support desk context.

use eventhub_core::command::Command;
use eventhub_core::identity::Actor;
use uuid::Uuid;

use super::ticket::{TicketPriority, TicketStatus};

/// Command to open a support ticket.
#[derive(Debug, Clone)]
pub struct OpenTicket {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The user asking for help.
    pub actor: Actor,
    pub subject: String,
    pub description: String,
    pub priority: TicketPriority,
}

impl Command for OpenTicket {
    fn command_type(&self) -> &'static str {
        "support.open_ticket"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor(&self) -> &Actor {
        &self.actor
    }
}

/// Command to add a message to a ticket's thread.
#[derive(Debug, Clone)]
pub struct ReplyToTicket {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The ticket owner or an admin.
    pub actor: Actor,
    pub ticket_id: String,
    pub message: String,
}

impl Command for ReplyToTicket {
    fn command_type(&self) -> &'static str {
        "support.reply_to_ticket"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor(&self) -> &Actor {
        &self.actor
    }
}

/// Command to move a ticket to another status.
#[derive(Debug, Clone)]
pub struct ChangeTicketStatus {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The handling admin.
    pub actor: Actor,
    pub ticket_id: String,
    pub status: TicketStatus,
}

impl Command for ChangeTicketStatus {
    fn command_type(&self) -> &'static str {
        "support.change_ticket_status"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor(&self) -> &Actor {
        &self.actor
    }
}
