//! Command handlers for the support desk context.

use eventhub_core::clock::Clock;
use eventhub_core::command::Command;
use eventhub_core::error::DomainError;
use eventhub_core::ids::IdGenerator;
use tracing::info;

use crate::domain::commands::{ChangeTicketStatus, OpenTicket, ReplyToTicket};
use crate::domain::ticket::{SupportTicket, TicketMessage, TicketStatus};
use crate::store::SupportTicketStore;

/// Handles `OpenTicket`: records a new `open` ticket for the actor.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the subject or description is blank,
/// and `DomainError::Infrastructure` if the store fails to flush.
pub fn handle_open_ticket(
    command: &OpenTicket,
    tickets: &mut SupportTicketStore,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
) -> Result<SupportTicket, DomainError> {
    let subject = command.subject.trim();
    let description = command.description.trim();
    if subject.is_empty() || description.is_empty() {
        return Err(DomainError::Validation(
            "subject and description are required".to_owned(),
        ));
    }

    let now = clock.now();
    let ticket = SupportTicket {
        id: ids.next_id(),
        user_id: command.actor().id.clone(),
        subject: subject.to_owned(),
        description: description.to_owned(),
        status: TicketStatus::Open,
        priority: command.priority,
        created_at: now,
        updated_at: now,
        messages: Vec::new(),
    };
    tickets.add_support_ticket(ticket.clone())?;

    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        ticket_id = %ticket.id,
        "support ticket opened"
    );
    Ok(ticket)
}

/// Handles `ReplyToTicket`: appends the actor's message to the thread.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown ticket,
/// `DomainError::Forbidden` if the actor neither owns the ticket nor is an
/// admin, `DomainError::Validation` for a blank message, and
/// `DomainError::Infrastructure` if the store fails to flush.
pub fn handle_reply_to_ticket(
    command: &ReplyToTicket,
    tickets: &mut SupportTicketStore,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
) -> Result<TicketMessage, DomainError> {
    let actor = command.actor();
    let ticket = tickets
        .get_ticket_by_id(&command.ticket_id)
        .ok_or_else(|| DomainError::not_found("ticket", &command.ticket_id))?;
    if ticket.user_id != actor.id && !actor.is_admin() {
        return Err(DomainError::Forbidden(format!(
            "{} may not reply to ticket {}",
            actor.name, command.ticket_id
        )));
    }
    let message = command.message.trim();
    if message.is_empty() {
        return Err(DomainError::Validation("message must not be empty".to_owned()));
    }

    let entry = tickets
        .add_ticket_message(&command.ticket_id, message, actor.is_admin(), clock, ids)?
        .ok_or_else(|| DomainError::not_found("ticket", &command.ticket_id))?;

    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        ticket_id = %command.ticket_id,
        is_admin = entry.is_admin,
        "support ticket reply added"
    );
    Ok(entry)
}

/// Handles `ChangeTicketStatus`: moves a ticket to the requested status.
///
/// # Errors
///
/// Returns `DomainError::Forbidden` for non-admin actors,
/// `DomainError::NotFound` for an unknown ticket, and
/// `DomainError::Infrastructure` if the store fails to flush.
pub fn handle_change_ticket_status(
    command: &ChangeTicketStatus,
    tickets: &mut SupportTicketStore,
    clock: &dyn Clock,
) -> Result<SupportTicket, DomainError> {
    command.actor().require_admin("change ticket status")?;
    if !tickets.update_ticket_status(&command.ticket_id, command.status, clock)? {
        return Err(DomainError::not_found("ticket", &command.ticket_id));
    }

    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        ticket_id = %command.ticket_id,
        status = %command.status,
        "support ticket status changed"
    );
    tickets
        .get_ticket_by_id(&command.ticket_id)
        .cloned()
        .ok_or_else(|| DomainError::not_found("ticket", &command.ticket_id))
}
