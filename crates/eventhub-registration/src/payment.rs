//! Payment gateway seam.
//!
//! Bookings charge through `PaymentGateway`. The only implementation here is
//! a simulated gateway; a real provider plugs in behind the same trait.

use uuid::Uuid;

/// A charge to collect.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    /// The registration being paid for.
    pub registration_id: String,
    /// The event the tickets are for.
    pub event_id: String,
    /// Amount in the storefront currency.
    pub amount: f64,
}

/// What the gateway decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// The charge went through.
    Approved {
        /// Gateway reference for the charge.
        transaction_id: String,
    },
    /// The charge was refused.
    Declined {
        /// Gateway-supplied reason.
        reason: String,
    },
}

/// Collects payment for registrations.
pub trait PaymentGateway: Send + Sync {
    /// Attempts to collect `request`.
    fn charge(&self, request: &PaymentRequest) -> PaymentOutcome;
}

/// Gateway that approves every charge, or declines every charge when built
/// with `declining`.
#[derive(Debug, Clone, Default)]
pub struct SimulatedPaymentGateway {
    decline_reason: Option<String>,
}

impl SimulatedPaymentGateway {
    /// A gateway that approves every charge.
    #[must_use]
    pub fn approving() -> Self {
        Self::default()
    }

    /// A gateway that declines every charge with `reason`.
    #[must_use]
    pub fn declining(reason: impl Into<String>) -> Self {
        Self {
            decline_reason: Some(reason.into()),
        }
    }
}

impl PaymentGateway for SimulatedPaymentGateway {
    fn charge(&self, request: &PaymentRequest) -> PaymentOutcome {
        match &self.decline_reason {
            Some(reason) => PaymentOutcome::Declined {
                reason: reason.clone(),
            },
            None => {
                tracing::debug!(
                    registration_id = %request.registration_id,
                    amount = request.amount,
                    "simulated charge approved"
                );
                PaymentOutcome::Approved {
                    transaction_id: format!("txn_{}", Uuid::new_v4().simple()),
                }
            }
        }
    }
}
