//! Registrations and payment status, persisted together.

use std::collections::BTreeMap;
use std::sync::Arc;

use eventhub_core::clock::Clock;
use eventhub_core::error::DomainError;
use eventhub_core::observer::{Subscribers, Subscription};
use eventhub_core::persistence::{self, Persistence, REGISTRATIONS_KEY, StateStore};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::registration::{
    AttendeeInfo, PaymentState, PaymentStatus, RefundStatus, Registration, RegistrationStatus,
};

/// What changed in a `RegistrationStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationChange {
    Added(String),
    Cancelled(String),
    Transferred(String),
    PaymentUpdated(String),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistrationState {
    registrations: Vec<Registration>,
    payment_status: BTreeMap<String, PaymentStatus>,
}

/// Owns every registration and its payment record.
#[derive(Debug, Default)]
pub struct RegistrationStore {
    state: RegistrationState,
    persistence: Option<Persistence>,
    subscribers: Subscribers<RegistrationChange>,
}

impl RegistrationStore {
    /// An empty, purely in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store rehydrated from, and flushing to, `backend`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the stored state cannot be
    /// loaded.
    pub fn open(backend: Arc<dyn StateStore>) -> Result<Self, DomainError> {
        let persistence = Persistence::new(backend, REGISTRATIONS_KEY);
        let state = persistence.load::<RegistrationState>()?.unwrap_or_default();
        debug!(
            registrations = state.registrations.len(),
            "registration store rehydrated"
        );
        Ok(Self {
            state,
            persistence: Some(persistence),
            subscribers: Subscribers::new(),
        })
    }

    /// Records `registration` with a pending payment.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if flushing fails.
    pub fn add_registration(
        &mut self,
        registration: Registration,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let id = registration.id.clone();
        self.state
            .payment_status
            .insert(id.clone(), PaymentStatus::new(PaymentState::Pending, clock.now()));
        self.state.registrations.push(registration);
        self.commit(&RegistrationChange::Added(id))
    }

    /// Marks the registration cancelled and stamps its payment record with
    /// the cancellation date and refund status. Returns `Ok(false)` if there
    /// is no such registration.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if flushing fails.
    pub fn cancel_registration(&mut self, id: &str, clock: &dyn Clock) -> Result<bool, DomainError> {
        let Some(registration) = self
            .state
            .registrations
            .iter_mut()
            .find(|registration| registration.id == id)
        else {
            debug!(registration_id = id, "cancel skipped: unknown registration");
            return Ok(false);
        };
        registration.status = RegistrationStatus::Cancelled;

        let now = clock.now();
        let payment = self
            .state
            .payment_status
            .entry(id.to_owned())
            .or_insert_with(|| PaymentStatus::new(PaymentState::Pending, now));
        payment.cancellation_date = Some(now);
        payment.refund_status = Some(if payment.state == PaymentState::Paid {
            RefundStatus::Pending
        } else {
            RefundStatus::NotApplicable
        });

        self.commit(&RegistrationChange::Cancelled(id.to_owned()))?;
        Ok(true)
    }

    /// Hands the registration to `attendee`. Returns `Ok(false)` if there is
    /// no such registration.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if flushing fails.
    pub fn transfer_registration(
        &mut self,
        id: &str,
        attendee: AttendeeInfo,
    ) -> Result<bool, DomainError> {
        let Some(registration) = self
            .state
            .registrations
            .iter_mut()
            .find(|registration| registration.id == id)
        else {
            return Ok(false);
        };
        registration.status = RegistrationStatus::Transferred;
        registration.attendee_info = attendee;
        self.commit(&RegistrationChange::Transferred(id.to_owned()))?;
        Ok(true)
    }

    /// Replaces the payment record for `id`, stamping `last_updated`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if flushing fails.
    pub fn update_registration_payment_status(
        &mut self,
        id: &str,
        mut status: PaymentStatus,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        status.last_updated = clock.now();
        self.state.payment_status.insert(id.to_owned(), status);
        self.commit(&RegistrationChange::PaymentUpdated(id.to_owned()))
    }

    /// The payment record for `id`, if any.
    #[must_use]
    pub fn get_payment_status(&self, id: &str) -> Option<&PaymentStatus> {
        self.state.payment_status.get(id)
    }

    /// The registration with `id`, if any.
    #[must_use]
    pub fn get_registration_by_id(&self, id: &str) -> Option<&Registration> {
        self.state
            .registrations
            .iter()
            .find(|registration| registration.id == id)
    }

    /// Registrations bought by `user_id`.
    #[must_use]
    pub fn get_registrations_by_user(&self, user_id: &str) -> Vec<Registration> {
        self.state
            .registrations
            .iter()
            .filter(|registration| registration.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Registrations for `event_id`.
    #[must_use]
    pub fn get_registrations_by_event(&self, event_id: &str) -> Vec<Registration> {
        self.state
            .registrations
            .iter()
            .filter(|registration| registration.event_id == event_id)
            .cloned()
            .collect()
    }

    /// Every registration, in purchase order.
    #[must_use]
    pub fn registrations(&self) -> &[Registration] {
        &self.state.registrations
    }

    /// Registers a change callback.
    #[must_use = "dropping the Subscription unregisters the callback"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&RegistrationChange) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    fn commit(&mut self, change: &RegistrationChange) -> Result<(), DomainError> {
        let flushed = persistence::flush(self.persistence.as_ref(), &self.state);
        self.subscribers.notify(change);
        flushed
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::domain::registration::TicketType;
    use eventhub_test_support::fixed_now;

    pub(crate) fn attendee(name: &str) -> AttendeeInfo {
        AttendeeInfo {
            name: name.to_owned(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "+91 98450 00000".to_owned(),
        }
    }

    pub(crate) fn registration(id: &str, user_id: &str) -> Registration {
        Registration {
            id: id.to_owned(),
            event_id: "evt-1".to_owned(),
            user_id: user_id.to_owned(),
            ticket_type: TicketType::General,
            quantity: 2,
            total_price: 1000.0,
            status: RegistrationStatus::Confirmed,
            purchase_date: fixed_now(),
            attendee_info: attendee("Anita"),
        }
    }
}
