//! Events and their lifecycle vocabulary.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use eventhub_core::error::DomainError;
use eventhub_core::identity::{Actor, PLATFORM_ORGANIZER};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The fixed set of event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    /// Company offsites, launches, and town halls.
    Corporate,
    /// Multi-track industry conferences.
    Conference,
    /// Trade shows and exhibitions.
    Exhibition,
    /// Hands-on workshops.
    Workshop,
    /// Talks and seminars.
    Seminar,
    /// Meetups and networking evenings.
    Networking,
    /// Festivals, theatre, and cultural programmes.
    Cultural,
    /// Live music.
    Concert,
    /// Matches, races, and tournaments.
    Sports,
}

impl EventCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 9] = [
        Self::Corporate,
        Self::Conference,
        Self::Exhibition,
        Self::Workshop,
        Self::Seminar,
        Self::Networking,
        Self::Cultural,
        Self::Concert,
        Self::Sports,
    ];

    /// Wire name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Corporate => "corporate",
            Self::Conference => "conference",
            Self::Exhibition => "exhibition",
            Self::Workshop => "workshop",
            Self::Seminar => "seminar",
            Self::Networking => "networking",
            Self::Cultural => "cultural",
            Self::Concert => "concert",
            Self::Sports => "sports",
        }
    }

    /// Human-readable name for category listings.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Corporate => "Corporate Events",
            Self::Conference => "Conferences",
            Self::Exhibition => "Exhibitions",
            Self::Workshop => "Workshops",
            Self::Seminar => "Seminars",
            Self::Networking => "Networking",
            Self::Cultural => "Cultural Events",
            Self::Concert => "Concerts",
            Self::Sports => "Sports",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::Validation(format!("unknown category: {s}")))
    }
}

/// Lifecycle status of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventStatus {
    /// Not yet submitted.
    Draft,
    /// Submitted and waiting for a first decision.
    Pending,
    /// Published.
    Approved,
    /// Turned down by an admin.
    Rejected,
    /// A published event with an edit awaiting review.
    PendingChanges,
}

impl EventStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::PendingChanges => "pending-changes",
        }
    }

    /// Returns `true` while an admin decision is outstanding.
    #[must_use]
    pub const fn is_awaiting_review(self) -> bool {
        matches!(self, Self::Pending | Self::PendingChanges)
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of an admin review, shared by queued events and modification
/// records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    /// No decision yet.
    Pending,
    /// Accepted.
    Approved,
    /// Turned down.
    Rejected,
}

/// A bookable occasion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Opaque identifier.
    pub id: String,
    /// Headline.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Calendar date the event takes place.
    pub date: NaiveDate,
    /// Start time.
    pub time: NaiveTime,
    /// Venue.
    pub location: String,
    /// Price of a general-admission ticket.
    pub price: f64,
    /// Category.
    pub category: EventCategory,
    /// Cover image.
    pub image_url: String,
    /// Name of the publishing organizer.
    pub organizer: String,
    /// Total seats.
    pub capacity: u32,
    /// Seats not yet sold. Never exceeds `capacity`.
    pub tickets_available: u32,
    /// Lifecycle status.
    pub status: EventStatus,
    /// Incremented on every update; 1 on first approval.
    pub version: u32,
    /// The event as it was before the most recent update. Never itself
    /// carries a previous version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<Box<Event>>,
    /// When the event last changed.
    pub last_modified: DateTime<Utc>,
    /// Name of the actor behind the last change.
    pub last_modified_by: String,
}

impl Event {
    /// A copy of this event without its history, suitable for storing as a
    /// `previous_version`.
    #[must_use]
    pub fn snapshot(&self) -> Self {
        Self {
            previous_version: None,
            ..self.clone()
        }
    }

    /// Returns `true` if ordinary users may see this event.
    ///
    /// Rejected events are never visible. Platform-published events are
    /// visible unless an edit is under review; everyone else's events are
    /// visible only once approved.
    #[must_use]
    pub fn is_publicly_visible(&self) -> bool {
        match self.status {
            EventStatus::Rejected => false,
            status if self.organizer == PLATFORM_ORGANIZER => {
                status != EventStatus::PendingChanges
            }
            status => status == EventStatus::Approved,
        }
    }

    /// Merges every field present in `patch` onto this event.
    pub fn apply_patch(&mut self, patch: &EventPatch) {
        let EventPatch {
            title,
            description,
            date,
            time,
            location,
            price,
            category,
            image_url,
            organizer,
            capacity,
            tickets_available,
            status,
            last_modified_by,
        } = patch;

        if let Some(title) = title {
            self.title.clone_from(title);
        }
        if let Some(description) = description {
            self.description.clone_from(description);
        }
        if let Some(date) = date {
            self.date = *date;
        }
        if let Some(time) = time {
            self.time = *time;
        }
        if let Some(location) = location {
            self.location.clone_from(location);
        }
        if let Some(price) = price {
            self.price = *price;
        }
        if let Some(category) = category {
            self.category = *category;
        }
        if let Some(image_url) = image_url {
            self.image_url.clone_from(image_url);
        }
        if let Some(organizer) = organizer {
            self.organizer.clone_from(organizer);
        }
        if let Some(capacity) = capacity {
            self.capacity = *capacity;
        }
        if let Some(tickets_available) = tickets_available {
            self.tickets_available = *tickets_available;
        }
        if let Some(status) = status {
            self.status = *status;
        }
        if let Some(last_modified_by) = last_modified_by {
            self.last_modified_by.clone_from(last_modified_by);
        }
    }

    /// Sells (`is_cancel == false`) or returns `quantity` tickets, keeping
    /// availability within `[0, capacity]`.
    pub fn adjust_tickets(&mut self, quantity: u32, is_cancel: bool) {
        self.tickets_available = if is_cancel {
            self.tickets_available
                .saturating_add(quantity)
                .min(self.capacity)
        } else {
            self.tickets_available.saturating_sub(quantity)
        };
    }

    /// The JSON value of `field`, as recorded in modification records.
    #[must_use]
    pub fn field_value(&self, field: EventField) -> Value {
        match field {
            EventField::Title => Value::from(self.title.as_str()),
            EventField::Description => Value::from(self.description.as_str()),
            EventField::Date => Value::from(self.date.to_string()),
            EventField::Time => Value::from(self.time.to_string()),
            EventField::Location => Value::from(self.location.as_str()),
            EventField::Price => Value::from(self.price),
            EventField::Category => Value::from(self.category.as_str()),
            EventField::ImageUrl => Value::from(self.image_url.as_str()),
            EventField::Organizer => Value::from(self.organizer.as_str()),
            EventField::Capacity => Value::from(self.capacity),
            EventField::TicketsAvailable => Value::from(self.tickets_available),
            EventField::Status => Value::from(self.status.as_str()),
            EventField::LastModifiedBy => Value::from(self.last_modified_by.as_str()),
        }
    }
}

/// Seats still unsold after a capacity change from `old_capacity` to
/// `new_capacity`, given `available` seats before the change.
#[must_use]
pub fn shift_availability(available: u32, old_capacity: u32, new_capacity: u32) -> u32 {
    let sold = old_capacity.saturating_sub(available);
    new_capacity.saturating_sub(sold)
}

/// Fields an update may touch. Identity, version, history, and the
/// modification timestamp are managed by the store and are not patchable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventField {
    /// `title`
    Title,
    /// `description`
    Description,
    /// `date`
    Date,
    /// `time`
    Time,
    /// `location`
    Location,
    /// `price`
    Price,
    /// `category`
    Category,
    /// `image_url`
    ImageUrl,
    /// `organizer`
    Organizer,
    /// `capacity`
    Capacity,
    /// `tickets_available`
    TicketsAvailable,
    /// `status`
    Status,
    /// `last_modified_by`
    LastModifiedBy,
}

impl EventField {
    /// Every patchable field, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::Title,
        Self::Description,
        Self::Date,
        Self::Time,
        Self::Location,
        Self::Price,
        Self::Category,
        Self::ImageUrl,
        Self::Organizer,
        Self::Capacity,
        Self::TicketsAvailable,
        Self::Status,
        Self::LastModifiedBy,
    ];

    /// The descriptive fields shown in "what changed" summaries.
    pub const DISPLAYED: [Self; 9] = [
        Self::Title,
        Self::Description,
        Self::Date,
        Self::Time,
        Self::Location,
        Self::Price,
        Self::Category,
        Self::Capacity,
        Self::ImageUrl,
    ];

    /// Wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Date => "date",
            Self::Time => "time",
            Self::Location => "location",
            Self::Price => "price",
            Self::Category => "category",
            Self::ImageUrl => "image_url",
            Self::Organizer => "organizer",
            Self::Capacity => "capacity",
            Self::TicketsAvailable => "tickets_available",
            Self::Status => "status",
            Self::LastModifiedBy => "last_modified_by",
        }
    }
}

impl fmt::Display for EventField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<EventCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickets_available: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
}

impl EventPatch {
    /// A patch carrying every patchable field of `event`.
    #[must_use]
    pub fn from_event(event: &Event) -> Self {
        Self {
            title: Some(event.title.clone()),
            description: Some(event.description.clone()),
            date: Some(event.date),
            time: Some(event.time),
            location: Some(event.location.clone()),
            price: Some(event.price),
            category: Some(event.category),
            image_url: Some(event.image_url.clone()),
            organizer: Some(event.organizer.clone()),
            capacity: Some(event.capacity),
            tickets_available: Some(event.tickets_available),
            status: Some(event.status),
            last_modified_by: Some(event.last_modified_by.clone()),
        }
    }

    /// Drops the fields only the workflow itself may set, leaving the
    /// descriptive content an organizer is allowed to edit.
    #[must_use]
    pub fn content_only(mut self) -> Self {
        self.organizer = None;
        self.tickets_available = None;
        self.status = None;
        self.last_modified_by = None;
        self
    }

    /// Returns `true` if no field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        EventField::ALL
            .into_iter()
            .all(|field| self.field_value(field).is_none())
    }

    /// The JSON value of `field` if the patch sets it.
    #[must_use]
    pub fn field_value(&self, field: EventField) -> Option<Value> {
        match field {
            EventField::Title => self.title.as_deref().map(Value::from),
            EventField::Description => self.description.as_deref().map(Value::from),
            EventField::Date => self.date.map(|date| Value::from(date.to_string())),
            EventField::Time => self.time.map(|time| Value::from(time.to_string())),
            EventField::Location => self.location.as_deref().map(Value::from),
            EventField::Price => self.price.map(Value::from),
            EventField::Category => self.category.map(|category| Value::from(category.as_str())),
            EventField::ImageUrl => self.image_url.as_deref().map(Value::from),
            EventField::Organizer => self.organizer.as_deref().map(Value::from),
            EventField::Capacity => self.capacity.map(Value::from),
            EventField::TicketsAvailable => self.tickets_available.map(Value::from),
            EventField::Status => self.status.map(|status| Value::from(status.as_str())),
            EventField::LastModifiedBy => self.last_modified_by.as_deref().map(Value::from),
        }
    }
}

/// The descriptive content an organizer submits when creating an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub price: f64,
    pub category: EventCategory,
    pub image_url: String,
    pub capacity: u32,
}

impl EventDraft {
    /// Builds a draft-status event owned by `actor`, with every seat
    /// available.
    #[must_use]
    pub fn into_event(self, id: String, actor: &Actor, now: DateTime<Utc>) -> Event {
        Event {
            id,
            title: self.title,
            description: self.description,
            date: self.date,
            time: self.time,
            location: self.location,
            price: self.price,
            category: self.category,
            image_url: self.image_url,
            organizer: actor.organizer_name().to_owned(),
            capacity: self.capacity,
            tickets_available: self.capacity,
            status: EventStatus::Draft,
            version: 0,
            previous_version: None,
            last_modified: now,
            last_modified_by: actor.name.clone(),
        }
    }
}

impl From<&Event> for EventDraft {
    fn from(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            date: event.date,
            time: event.time,
            location: event.location.clone(),
            price: event.price,
            category: event.category,
            image_url: event.image_url.clone(),
            capacity: event.capacity,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    /// An approved, organizer-published event used across the crate's tests.
    pub(crate) fn tech_meet(id: &str) -> Event {
        Event {
            id: id.to_owned(),
            title: "Tech Meet".to_owned(),
            description: "An evening of lightning talks on systems programming.".to_owned(),
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            time: NaiveTime::from_hms_opt(18, 30, 0).unwrap(),
            location: "Bengaluru Convention Centre".to_owned(),
            price: 500.0,
            category: EventCategory::Conference,
            image_url: "https://images.example.com/tech-meet.jpg".to_owned(),
            organizer: "Ravi".to_owned(),
            capacity: 100,
            tickets_available: 100,
            status: EventStatus::Approved,
            version: 1,
            previous_version: None,
            last_modified: Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap(),
            last_modified_by: "Ravi".to_owned(),
        }
    }
}
