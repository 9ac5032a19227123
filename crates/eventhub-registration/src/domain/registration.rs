//! Registrations and their payment state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ticket tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketType {
    General,
    Vip,
}

impl TicketType {
    /// Multiplier applied to the event's base price.
    #[must_use]
    pub const fn price_multiplier(self) -> f64 {
        match self {
            Self::General => 1.0,
            Self::Vip => 1.5,
        }
    }
}

/// Total charged for `quantity` tickets of `ticket_type` at `base_price`.
#[must_use]
pub fn ticket_total(base_price: f64, quantity: u32, ticket_type: TicketType) -> f64 {
    base_price * f64::from(quantity) * ticket_type.price_multiplier()
}

/// Lifecycle of a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Confirmed,
    Cancelled,
    Transferred,
}

/// Who will attend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendeeInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// A purchase of one or more tickets to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub ticket_type: TicketType,
    pub quantity: u32,
    pub total_price: f64,
    pub status: RegistrationStatus,
    pub purchase_date: DateTime<Utc>,
    pub attendee_info: AttendeeInfo,
}

impl Registration {
    /// Returns `true` unless the registration was cancelled.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status != RegistrationStatus::Cancelled
    }
}

/// Where a registration's payment stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    Pending,
    Paid,
    Failed,
}

/// Whether a cancelled registration is owed a refund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefundStatus {
    Pending,
    NotApplicable,
}

/// Payment record kept alongside each registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStatus {
    pub state: PaymentState,
    pub last_updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_status: Option<RefundStatus>,
}

impl PaymentStatus {
    /// A fresh record in `state`.
    #[must_use]
    pub fn new(state: PaymentState, at: DateTime<Utc>) -> Self {
        Self {
            state,
            last_updated: at,
            transaction_id: None,
            error: None,
            cancellation_date: None,
            refund_status: None,
        }
    }
}
