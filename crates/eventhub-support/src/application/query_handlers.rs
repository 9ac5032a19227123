//! Query handlers for the support desk context.

use eventhub_core::error::DomainError;
use eventhub_core::identity::Actor;

use crate::domain::ticket::SupportTicket;
use crate::store::SupportTicketStore;

/// Tickets `actor` may read, most recently updated first. Admins see every
/// ticket; everyone else sees their own.
#[must_use]
pub fn tickets_for(tickets: &SupportTicketStore, actor: &Actor) -> Vec<SupportTicket> {
    let mut visible: Vec<SupportTicket> = if actor.is_admin() {
        tickets.tickets().to_vec()
    } else {
        tickets.get_tickets_by_user(&actor.id)
    };
    visible.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    visible
}

/// One ticket with its thread.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown ticket and
/// `DomainError::Forbidden` if `actor` neither owns it nor is an admin.
pub fn ticket_for(
    tickets: &SupportTicketStore,
    actor: &Actor,
    ticket_id: &str,
) -> Result<SupportTicket, DomainError> {
    let ticket = tickets
        .get_ticket_by_id(ticket_id)
        .ok_or_else(|| DomainError::not_found("ticket", ticket_id))?;
    if ticket.user_id != actor.id && !actor.is_admin() {
        return Err(DomainError::Forbidden(format!(
            "{} may not view ticket {ticket_id}",
            actor.name
        )));
    }
    Ok(ticket.clone())
}
