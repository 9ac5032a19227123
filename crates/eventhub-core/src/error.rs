//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The referenced record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// What kind of record was looked up (e.g. "event").
        kind: &'static str,
        /// The identifier that was not found.
        id: String,
    },

    /// The acting user may not perform the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// A booking asked for more tickets than remain.
    #[error("insufficient tickets for event {event_id}: requested {requested}, available {available}")]
    InsufficientTickets {
        /// The event being booked.
        event_id: String,
        /// The quantity requested.
        requested: u32,
        /// The quantity still available.
        available: u32,
    },

    /// The payment gateway declined a charge.
    #[error("payment declined: {0}")]
    PaymentDeclined(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Shorthand for a `NotFound` error.
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}
