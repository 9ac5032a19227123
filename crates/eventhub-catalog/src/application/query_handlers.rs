//! Query handlers for the event catalog context.
//!
//! Read-only projections over a `Catalog` for listing, review, and
//! dashboards.

use std::collections::BTreeSet;

use eventhub_core::error::DomainError;
use eventhub_core::identity::Actor;
use serde::Serialize;

use crate::catalog::Catalog;
use crate::domain::event::{Event, EventField, EventStatus, ReviewStatus};
use crate::domain::filter::{FilterCriteria, filter_events};
use crate::domain::log::{EventLog, LogAction};
use crate::domain::modification::{EventModification, compare_events};

/// The publicly visible events matching `criteria`.
#[must_use]
pub fn list_visible_events(catalog: &Catalog, criteria: &FilterCriteria) -> Vec<Event> {
    filter_events(catalog.events.visible_events(), criteria)
}

/// A single publicly visible event.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the event does not exist or is not
/// visible.
pub fn get_visible_event(catalog: &Catalog, event_id: &str) -> Result<Event, DomainError> {
    catalog
        .events
        .visible_events()
        .iter()
        .find(|event| event.id == event_id)
        .cloned()
        .ok_or_else(|| DomainError::not_found("event", event_id))
}

/// An event as a particular actor may see it: visible events for everyone,
/// plus the actor's own (or, for admins, any) unpublished or queued events.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the actor may not see any copy of the
/// event.
pub fn get_event_for(catalog: &Catalog, actor: &Actor, event_id: &str) -> Result<Event, DomainError> {
    if let Ok(event) = get_visible_event(catalog, event_id) {
        return Ok(event);
    }
    catalog
        .pending
        .get_pending_event_by_id(event_id)
        .or_else(|| catalog.events.get_event_by_id(event_id))
        .filter(|event| actor.can_manage(&event.organizer))
        .cloned()
        .ok_or_else(|| DomainError::not_found("event", event_id))
}

/// One entry of the admin review queue.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewItem {
    /// The queued copy awaiting a decision.
    pub event: Event,
    /// `true` if this is an edit of a published event.
    pub is_modification: bool,
    /// Descriptive fields that differ from the previous version.
    pub changed_fields: Vec<EventField>,
    /// Modification records still awaiting a decision.
    pub modifications: Vec<EventModification>,
}

/// Every queued event with a "what changed" summary, oldest first.
#[must_use]
pub fn review_queue(catalog: &Catalog) -> Vec<ReviewItem> {
    catalog
        .pending
        .pending_events()
        .iter()
        .map(|event| {
            let changed_fields = event
                .previous_version
                .as_deref()
                .map(|previous| compare_events(previous, event))
                .unwrap_or_default();
            let modifications = catalog
                .modifications
                .get_modifications_by_event_id(&event.id)
                .into_iter()
                .filter(|modification| modification.status == ReviewStatus::Pending)
                .collect();
            ReviewItem {
                event: event.clone(),
                is_modification: event.previous_version.is_some(),
                changed_fields,
                modifications,
            }
        })
        .collect()
}

/// Headline counts on the organizer dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_events: usize,
    pub pending_approval: usize,
    pub approved_events: usize,
    pub rejected_events: usize,
}

/// An organizer's view of their own events and activity.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizerDashboard {
    pub stats: DashboardStats,
    /// The organizer's events from both collections; the queued copy wins
    /// when an event is in both.
    pub events: Vec<Event>,
    /// The organizer's activity, newest first.
    pub recent_activity: Vec<EventLog>,
}

/// Builds the dashboard for `actor`.
#[must_use]
pub fn organizer_dashboard(catalog: &Catalog, actor: &Actor) -> OrganizerDashboard {
    let organizer = actor.organizer_name();
    let owns = |event: &&Event| event.organizer == organizer;

    let queued: Vec<&Event> = catalog.pending.pending_events().iter().filter(owns).collect();
    let canonical: Vec<&Event> = catalog.events.events().iter().filter(owns).collect();
    let queued_ids: BTreeSet<&str> = queued.iter().copied().map(|event| event.id.as_str()).collect();

    let mut recent_activity = catalog.logs.get_logs_by_user(&actor.id);
    recent_activity.reverse();

    let rejected_submissions: BTreeSet<&str> = recent_activity
        .iter()
        .filter(|log| log.action == LogAction::Created)
        .map(|log| log.event_id.as_str())
        .filter(|id| catalog.pending.get_event_status(id) == Some(ReviewStatus::Rejected))
        .filter(|id| catalog.events.get_event_by_id(id).is_none())
        .collect();

    let awaiting_review: BTreeSet<&str> = canonical
        .iter()
        .copied()
        .filter(|event| event.status.is_awaiting_review())
        .map(|event| event.id.as_str())
        .chain(queued_ids.iter().copied())
        .collect();
    let approved_events = canonical
        .iter()
        .filter(|event| event.status == EventStatus::Approved)
        .count();
    let rejected_events = rejected_submissions.len()
        + canonical
            .iter()
            .filter(|event| event.status == EventStatus::Rejected)
            .count();

    let events: Vec<Event> = canonical
        .into_iter()
        .filter(|event| !queued_ids.contains(event.id.as_str()))
        .chain(queued)
        .cloned()
        .collect();

    let stats = DashboardStats {
        total_events: events.len(),
        pending_approval: awaiting_review.len(),
        approved_events,
        rejected_events,
    };

    OrganizerDashboard {
        stats,
        events,
        recent_activity,
    }
}

/// An event's full activity log and modification records, oldest first.
#[derive(Debug, Clone, Serialize)]
pub struct EventHistory {
    pub event_id: String,
    pub logs: Vec<EventLog>,
    pub modifications: Vec<EventModification>,
}

/// The history of `event_id`. Admins see any event; organizers see events
/// they own.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the catalog has no record of the
/// event and `DomainError::Forbidden` if the actor may not manage it.
pub fn event_history(
    catalog: &Catalog,
    actor: &Actor,
    event_id: &str,
) -> Result<EventHistory, DomainError> {
    let logs = catalog.logs.get_logs_by_event_id(event_id);
    let owner = catalog
        .events
        .get_event_by_id(event_id)
        .or_else(|| catalog.pending.get_pending_event_by_id(event_id))
        .map(|event| event.organizer.as_str());

    match owner {
        None if logs.is_empty() => return Err(DomainError::not_found("event", event_id)),
        Some(organizer) if !actor.can_manage(organizer) => {
            return Err(DomainError::Forbidden(format!(
                "{} may not view history of event {event_id}",
                actor.name
            )));
        }
        None => actor.require_admin("view history of deleted events")?,
        Some(_) => {}
    }

    Ok(EventHistory {
        event_id: event_id.to_owned(),
        logs,
        modifications: catalog.modifications.get_modifications_by_event_id(event_id),
    })
}
