//! Activity log entries.

use std::fmt;

use chrono::{DateTime, Utc};
use eventhub_core::clock::Clock;
use eventhub_core::identity::Actor;
use eventhub_core::ids::IdGenerator;
use serde::{Deserialize, Serialize};

/// The lifecycle action a log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogAction {
    Created,
    Approved,
    Rejected,
    Edited,
    Deleted,
}

impl LogAction {
    /// Wire name of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Edited => "edited",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for LogAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable audit record of a lifecycle action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    pub id: String,
    pub event_id: String,
    pub action: LogAction,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl EventLog {
    /// A new entry stamped with the acting user and the current time.
    #[must_use]
    pub fn record(
        event_id: &str,
        action: LogAction,
        actor: &Actor,
        details: impl Into<String>,
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
    ) -> Self {
        Self {
            id: ids.next_id(),
            event_id: event_id.to_owned(),
            action,
            timestamp: clock.now(),
            user_id: actor.id.clone(),
            user_name: actor.name.clone(),
            details: Some(details.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventhub_core::identity::Role;
    use eventhub_test_support::{FixedClock, SequenceIds, fixed_now};

    #[test]
    fn test_record_stamps_actor_and_clock() {
        let admin = Actor::new("u-1", "Priya", Role::Admin);

        let log = EventLog::record(
            "evt-1",
            LogAction::Approved,
            &admin,
            "Event approved",
            &SequenceIds::new("log"),
            &FixedClock::default(),
        );

        assert_eq!(log.id, "log-1");
        assert_eq!(log.user_id, "u-1");
        assert_eq!(log.user_name, "Priya");
        assert_eq!(log.timestamp, fixed_now());
        assert_eq!(log.details.as_deref(), Some("Event approved"));
    }

    #[test]
    fn test_action_serializes_lowercase() {
        assert_eq!(serde_json::to_value(LogAction::Deleted).unwrap(), "deleted");
    }
}
