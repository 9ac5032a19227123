//! Command handlers for the event catalog context.
//!
//! Each handler authorizes the actor, then runs a fixed sequence of store
//! calls that ends with exactly one activity-log entry. The sequence is not
//! atomic: a flush failure part-way through is returned as-is and the
//! preceding in-memory steps stand.

use eventhub_core::clock::Clock;
use eventhub_core::command::Command;
use eventhub_core::error::DomainError;
use eventhub_core::identity::Actor;
use eventhub_core::ids::IdGenerator;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::domain::commands::{ApproveEvent, CreateEvent, DeleteEvent, EditEvent, RejectEvent};
use crate::domain::event::{Event, EventPatch, EventStatus, ReviewStatus, shift_availability};
use crate::domain::log::{EventLog, LogAction};
use crate::domain::modification::{create_event_modification, log_event_modification};
use crate::domain::validation::{validate_draft, validate_patch};

const APPROVED_NOTES: &str = "Changes approved by admin";
const REJECTED_NOTES: &str = "Changes rejected by admin";

/// Result of a successfully handled lifecycle command.
#[derive(Debug, Clone)]
pub struct CatalogCommandResult {
    /// The event as it stands after the command: the canonical copy when
    /// there is one, otherwise the queued copy. `None` after a delete.
    pub event: Option<Event>,
    /// The log entry the command wrote.
    pub log: EventLog,
}

/// Handles `CreateEvent`: admins publish directly, everyone else queues the
/// event for review.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the draft breaks a content rule and
/// `DomainError::Infrastructure` if a store fails to flush.
pub fn handle_create_event(
    command: &CreateEvent,
    catalog: &mut Catalog,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
) -> Result<CatalogCommandResult, DomainError> {
    let actor = command.actor();
    validate_draft(&command.draft, clock.today())?;

    let mut event = command
        .draft
        .clone()
        .into_event(ids.next_id(), actor, clock.now());

    let details = if actor.is_admin() {
        event.status = EventStatus::Approved;
        event.version = 1;
        catalog.events.add_event(event.clone())?;
        "Event created by admin"
    } else {
        event.status = EventStatus::Pending;
        catalog.pending.add_pending_event(event.clone())?;
        "Event pending approval"
    };

    let log = EventLog::record(&event.id, LogAction::Created, actor, details, ids, clock);
    catalog.logs.add_log(log.clone())?;

    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        event_id = %event.id,
        status = %event.status,
        "event created"
    );
    Ok(CatalogCommandResult {
        event: Some(event),
        log,
    })
}

/// Handles `EditEvent`.
///
/// Editing a canonical event applies the change with status
/// `pending-changes`, queues the edited copy for review, and records the
/// modification. Editing an event that is only queued replaces the queued
/// copy.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the event exists in neither
/// collection, `DomainError::Forbidden` if the actor neither organizes it
/// nor is an admin, `DomainError::Validation` if the edit breaks a content
/// rule or changes nothing, and `DomainError::Infrastructure` if a store
/// fails to flush.
pub fn handle_edit_event(
    command: &EditEvent,
    catalog: &mut Catalog,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
) -> Result<CatalogCommandResult, DomainError> {
    let actor = command.actor();
    let changes = command.changes.clone().content_only();

    if let Some(current) = catalog.events.get_event_by_id(&command.event_id).cloned() {
        return edit_canonical(command, &current, changes, catalog, clock, ids);
    }

    let queued = catalog
        .pending
        .get_pending_event_by_id(&command.event_id)
        .cloned()
        .ok_or_else(|| DomainError::not_found("event", &command.event_id))?;
    authorize_manage(actor, &queued)?;
    validate_patch(&queued, &changes, clock.today())?;

    let changes = with_capacity_shift(&queued, changes);
    let modification = create_event_modification(&queued, &changes, actor, ids, clock);
    if !modification.is_material() {
        return Err(DomainError::Validation("edit changes nothing".to_owned()));
    }

    let mut revised = queued;
    revised.apply_patch(&changes);
    revised.last_modified = clock.now();
    revised.last_modified_by.clone_from(&actor.name);
    catalog
        .pending
        .update_pending_event(&command.event_id, revised.clone())?;

    let log = EventLog::record(
        &revised.id,
        LogAction::Edited,
        actor,
        "Pending submission updated",
        ids,
        clock,
    );
    catalog.logs.add_log(log.clone())?;

    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        event_id = %revised.id,
        "pending submission updated"
    );
    Ok(CatalogCommandResult {
        event: Some(revised),
        log,
    })
}

fn edit_canonical(
    command: &EditEvent,
    current: &Event,
    changes: EventPatch,
    catalog: &mut Catalog,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
) -> Result<CatalogCommandResult, DomainError> {
    let actor = command.actor();
    authorize_manage(actor, current)?;
    validate_patch(current, &changes, clock.today())?;

    let changes = with_capacity_shift(current, changes);
    let modification = create_event_modification(current, &changes, actor, ids, clock);
    if !modification.is_material() {
        return Err(DomainError::Validation("edit changes nothing".to_owned()));
    }

    // A second edit before review keeps the last approved content as the
    // baseline a rejection restores.
    let baseline = if current.status == EventStatus::PendingChanges {
        current.previous_version.clone()
    } else {
        None
    };

    let mut patch = changes;
    patch.status = Some(EventStatus::PendingChanges);
    patch.last_modified_by = Some(actor.name.clone());
    catalog.events.update_event(&current.id, &patch, clock)?;

    let mut updated = catalog
        .events
        .get_event_by_id(&current.id)
        .cloned()
        .ok_or_else(|| DomainError::not_found("event", &current.id))?;
    if let Some(baseline) = baseline {
        updated.previous_version = Some(baseline);
    }
    catalog
        .pending
        .update_pending_event(&current.id, updated.clone())?;

    catalog.modifications.add_modification(modification.clone())?;
    let log = log_event_modification(&updated, &modification, actor, ids);
    catalog.logs.add_log(log.clone())?;

    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        event_id = %updated.id,
        modified_fields = modification.modified_fields.len(),
        version = updated.version,
        "event edited"
    );
    Ok(CatalogCommandResult {
        event: Some(updated),
        log,
    })
}

/// Handles `ApproveEvent`: publishes a queued submission, or accepts a
/// queued edit of a published event.
///
/// # Errors
///
/// Returns `DomainError::Forbidden` for non-admins, `DomainError::NotFound`
/// if nothing is queued under the id, and `DomainError::Infrastructure` if a
/// store fails to flush.
pub fn handle_approve_event(
    command: &ApproveEvent,
    catalog: &mut Catalog,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
) -> Result<CatalogCommandResult, DomainError> {
    let actor = command.actor();
    actor.require_admin("approve events")?;
    let queued = queued_event(catalog, &command.event_id)?;

    let details = if let Some(current) = catalog.events.get_event_by_id(&queued.id).cloned() {
        let mut patch = EventPatch::from_event(&queued).content_only();
        patch.tickets_available = Some(shift_availability(
            current.tickets_available,
            current.capacity,
            queued.capacity,
        ));
        patch.status = Some(EventStatus::Approved);
        patch.last_modified_by = Some(actor.name.clone());
        catalog.events.update_event(&queued.id, &patch, clock)?;
        "Event changes approved"
    } else {
        let mut event = queued.clone();
        event.status = EventStatus::Approved;
        event.version = 1;
        event.last_modified = clock.now();
        event.last_modified_by.clone_from(&actor.name);
        catalog.events.add_event(event)?;
        "Event approved"
    };

    catalog.pending.remove_pending_event(&queued.id)?;
    catalog
        .pending
        .update_event_status(&queued.id, ReviewStatus::Approved)?;

    let log = EventLog::record(&queued.id, LogAction::Approved, actor, details, ids, clock);
    catalog.logs.add_log(log.clone())?;

    let notes = command
        .admin_notes
        .clone()
        .unwrap_or_else(|| APPROVED_NOTES.to_owned());
    resolve_modifications(catalog, &queued.id, ReviewStatus::Approved, &notes)?;

    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        event_id = %queued.id,
        "event approved"
    );
    Ok(CatalogCommandResult {
        event: catalog.events.get_event_by_id(&queued.id).cloned(),
        log,
    })
}

/// Handles `RejectEvent`: turns down a queued submission, or reverts a
/// published event to its content before the queued edit.
///
/// # Errors
///
/// Returns `DomainError::Forbidden` for non-admins, `DomainError::NotFound`
/// if nothing is queued under the id, and `DomainError::Infrastructure` if a
/// store fails to flush.
pub fn handle_reject_event(
    command: &RejectEvent,
    catalog: &mut Catalog,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
) -> Result<CatalogCommandResult, DomainError> {
    let actor = command.actor();
    actor.require_admin("reject events")?;
    let queued = queued_event(catalog, &command.event_id)?;

    let current = catalog.events.get_event_by_id(&queued.id).cloned();
    let baseline = queued
        .previous_version
        .as_deref()
        .or_else(|| current.as_ref().and_then(|event| event.previous_version.as_deref()))
        .cloned();

    let details = match (current, baseline) {
        (Some(current), Some(baseline)) => {
            let mut patch = EventPatch::from_event(&baseline).content_only();
            patch.tickets_available = Some(shift_availability(
                current.tickets_available,
                current.capacity,
                baseline.capacity,
            ));
            patch.status = Some(EventStatus::Approved);
            patch.last_modified_by = Some(actor.name.clone());
            catalog.events.update_event(&queued.id, &patch, clock)?;
            "Event changes rejected"
        }
        _ => "Event rejected",
    };

    catalog.pending.remove_pending_event(&queued.id)?;
    catalog
        .pending
        .update_event_status(&queued.id, ReviewStatus::Rejected)?;

    let log = EventLog::record(&queued.id, LogAction::Rejected, actor, details, ids, clock);
    catalog.logs.add_log(log.clone())?;

    let notes = command
        .admin_notes
        .clone()
        .unwrap_or_else(|| REJECTED_NOTES.to_owned());
    resolve_modifications(catalog, &queued.id, ReviewStatus::Rejected, &notes)?;

    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        event_id = %queued.id,
        "event rejected"
    );
    Ok(CatalogCommandResult {
        event: catalog
            .events
            .get_event_by_id(&queued.id)
            .cloned()
            .or(Some(queued)),
        log,
    })
}

/// Handles `DeleteEvent`: removes the event from both collections and marks
/// any modification still under review as rejected.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the event exists in neither
/// collection, `DomainError::Forbidden` if the actor neither organizes it
/// nor is an admin, and `DomainError::Infrastructure` if a store fails to
/// flush.
pub fn handle_delete_event(
    command: &DeleteEvent,
    catalog: &mut Catalog,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
) -> Result<CatalogCommandResult, DomainError> {
    let actor = command.actor();
    let existing = catalog
        .events
        .get_event_by_id(&command.event_id)
        .or_else(|| catalog.pending.get_pending_event_by_id(&command.event_id))
        .cloned()
        .ok_or_else(|| DomainError::not_found("event", &command.event_id))?;
    authorize_manage(actor, &existing)?;

    catalog.events.delete_event(&existing.id)?;
    catalog.pending.remove_pending_event(&existing.id)?;
    resolve_modifications(catalog, &existing.id, ReviewStatus::Rejected, "Event deleted")?;

    let log = EventLog::record(
        &existing.id,
        LogAction::Deleted,
        actor,
        "Event deleted",
        ids,
        clock,
    );
    catalog.logs.add_log(log.clone())?;

    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        event_id = %existing.id,
        "event deleted"
    );
    Ok(CatalogCommandResult { event: None, log })
}

fn authorize_manage(actor: &Actor, event: &Event) -> Result<(), DomainError> {
    if actor.can_manage(&event.organizer) {
        Ok(())
    } else {
        warn!(
            user_id = %actor.id,
            event_id = %event.id,
            organizer = %event.organizer,
            "actor may not manage event"
        );
        Err(DomainError::Forbidden(format!(
            "{} may not manage event {}",
            actor.name, event.id
        )))
    }
}

fn queued_event(catalog: &Catalog, event_id: &str) -> Result<Event, DomainError> {
    catalog
        .pending
        .get_pending_event_by_id(event_id)
        .cloned()
        .ok_or_else(|| DomainError::not_found("pending event", event_id))
}

/// Carries sold seats across a capacity change so availability stays
/// consistent with the new capacity.
fn with_capacity_shift(current: &Event, mut changes: EventPatch) -> EventPatch {
    if let Some(capacity) = changes.capacity.filter(|capacity| *capacity != current.capacity) {
        changes.tickets_available = Some(shift_availability(
            current.tickets_available,
            current.capacity,
            capacity,
        ));
    }
    changes
}

fn resolve_modifications(
    catalog: &mut Catalog,
    event_id: &str,
    status: ReviewStatus,
    notes: &str,
) -> Result<(), DomainError> {
    let pending: Vec<String> = catalog
        .modifications
        .get_modifications_by_event_id(event_id)
        .into_iter()
        .filter(|modification| modification.status == ReviewStatus::Pending)
        .map(|modification| modification.id)
        .collect();
    for id in pending {
        catalog
            .modifications
            .update_modification_status(&id, status, Some(notes.to_owned()))?;
    }
    Ok(())
}
