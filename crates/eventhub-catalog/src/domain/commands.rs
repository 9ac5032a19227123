//! Commands for the event catalog context.

use eventhub_core::command::Command;
use eventhub_core::identity::Actor;
use uuid::Uuid;

use super::event::{EventDraft, EventPatch};

/// Command to submit a new event.
#[derive(Debug, Clone)]
pub struct CreateEvent {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The submitting user.
    pub actor: Actor,
    /// The event content.
    pub draft: EventDraft,
}

impl Command for CreateEvent {
    fn command_type(&self) -> &'static str {
        "catalog.create_event"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor(&self) -> &Actor {
        &self.actor
    }
}

/// Command to edit a published or queued event.
#[derive(Debug, Clone)]
pub struct EditEvent {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The editing user.
    pub actor: Actor,
    /// The event to edit.
    pub event_id: String,
    /// The fields to change.
    pub changes: EventPatch,
}

impl Command for EditEvent {
    fn command_type(&self) -> &'static str {
        "catalog.edit_event"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor(&self) -> &Actor {
        &self.actor
    }
}

/// Command to approve a queued event or edit.
#[derive(Debug, Clone)]
pub struct ApproveEvent {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The reviewing admin.
    pub actor: Actor,
    /// The queued event.
    pub event_id: String,
    /// Notes recorded on the resolved modifications.
    pub admin_notes: Option<String>,
}

impl Command for ApproveEvent {
    fn command_type(&self) -> &'static str {
        "catalog.approve_event"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor(&self) -> &Actor {
        &self.actor
    }
}

/// Command to reject a queued event or edit.
#[derive(Debug, Clone)]
pub struct RejectEvent {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The reviewing admin.
    pub actor: Actor,
    /// The queued event.
    pub event_id: String,
    /// Notes recorded on the resolved modifications.
    pub admin_notes: Option<String>,
}

impl Command for RejectEvent {
    fn command_type(&self) -> &'static str {
        "catalog.reject_event"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor(&self) -> &Actor {
        &self.actor
    }
}

/// Command to delete an event.
#[derive(Debug, Clone)]
pub struct DeleteEvent {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The deleting user.
    pub actor: Actor,
    /// The event to delete.
    pub event_id: String,
}

impl Command for DeleteEvent {
    fn command_type(&self) -> &'static str {
        "catalog.delete_event"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn actor(&self) -> &Actor {
        &self.actor
    }
}
