//! Field-level diffs between two versions of an event.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use eventhub_core::clock::Clock;
use eventhub_core::identity::Actor;
use eventhub_core::ids::IdGenerator;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::event::{Event, EventField, EventPatch, ReviewStatus};
use super::log::{EventLog, LogAction};

/// A recorded edit to an existing event, awaiting or past review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventModification {
    pub id: String,
    pub event_id: String,
    /// Changed fields, in field declaration order.
    pub modified_fields: Vec<EventField>,
    pub old_values: BTreeMap<EventField, Value>,
    pub new_values: BTreeMap<EventField, Value>,
    pub timestamp: DateTime<Utc>,
    /// Id of the user who made the edit.
    pub modified_by: String,
    pub status: ReviewStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
}

impl EventModification {
    /// Returns `true` if at least one field changed.
    #[must_use]
    pub fn is_material(&self) -> bool {
        !self.modified_fields.is_empty()
    }
}

/// Diffs every field present in `patch` against `old`.
///
/// Fields are compared by strict equality of their JSON values, so a patch
/// that re-sends unchanged values yields an empty `modified_fields`.
#[must_use]
pub fn create_event_modification(
    old: &Event,
    patch: &EventPatch,
    actor: &Actor,
    ids: &dyn IdGenerator,
    clock: &dyn Clock,
) -> EventModification {
    let mut modified_fields = Vec::new();
    let mut old_values = BTreeMap::new();
    let mut new_values = BTreeMap::new();

    for field in EventField::ALL {
        let Some(new_value) = patch.field_value(field) else {
            continue;
        };
        let old_value = old.field_value(field);
        if old_value != new_value {
            modified_fields.push(field);
            old_values.insert(field, old_value);
            new_values.insert(field, new_value);
        }
    }

    EventModification {
        id: ids.next_id(),
        event_id: old.id.clone(),
        modified_fields,
        old_values,
        new_values,
        timestamp: clock.now(),
        modified_by: actor.id.clone(),
        status: ReviewStatus::Pending,
        admin_notes: None,
    }
}

/// The descriptive fields that differ between `old` and `new`.
#[must_use]
pub fn compare_events(old: &Event, new: &Event) -> Vec<EventField> {
    EventField::DISPLAYED
        .into_iter()
        .filter(|field| old.field_value(*field) != new.field_value(*field))
        .collect()
}

/// The `edited` log entry describing `modification`.
#[must_use]
pub fn log_event_modification(
    event: &Event,
    modification: &EventModification,
    actor: &Actor,
    ids: &dyn IdGenerator,
) -> EventLog {
    let fields = modification
        .modified_fields
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    EventLog {
        id: ids.next_id(),
        event_id: event.id.clone(),
        action: LogAction::Edited,
        timestamp: modification.timestamp,
        user_id: actor.id.clone(),
        user_name: actor.name.clone(),
        details: Some(format!("Modified fields: {fields}")),
    }
}
