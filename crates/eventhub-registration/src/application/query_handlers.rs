//! Query handlers for the registration context.

use eventhub_catalog::Catalog;
use eventhub_catalog::domain::event::Event;
use serde::Serialize;

use crate::domain::registration::{PaymentState, PaymentStatus, Registration};
use crate::store::RegistrationStore;

/// A registration with its payment record and, while it still exists, the
/// event it is for.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationView {
    pub registration: Registration,
    pub payment: Option<PaymentStatus>,
    pub event: Option<Event>,
}

/// The registrations bought by `user_id`, newest first.
#[must_use]
pub fn registrations_for_user(
    registrations: &RegistrationStore,
    catalog: &Catalog,
    user_id: &str,
) -> Vec<RegistrationView> {
    let mut views: Vec<RegistrationView> = registrations
        .get_registrations_by_user(user_id)
        .into_iter()
        .map(|registration| RegistrationView {
            payment: registrations.get_payment_status(&registration.id).cloned(),
            event: catalog.events.get_event_by_id(&registration.event_id).cloned(),
            registration,
        })
        .collect();
    views.sort_by(|a, b| b.registration.purchase_date.cmp(&a.registration.purchase_date));
    views
}

/// Revenue and recent activity across every registration.
#[derive(Debug, Clone, Serialize)]
pub struct SalesSummary {
    /// Sum of paid, non-cancelled registrations.
    pub total_revenue: f64,
    /// Number of non-cancelled registrations.
    pub active_registrations: usize,
    /// The most recent registrations, newest first.
    pub recent_registrations: Vec<Registration>,
}

/// Summarizes sales, keeping the `recent` newest registrations.
#[must_use]
pub fn sales_summary(registrations: &RegistrationStore, recent: usize) -> SalesSummary {
    let paid = |registration: &Registration| {
        registrations
            .get_payment_status(&registration.id)
            .is_some_and(|payment| payment.state == PaymentState::Paid)
    };

    let active: Vec<&Registration> = registrations
        .registrations()
        .iter()
        .filter(|registration| registration.is_active())
        .collect();
    let total_revenue: f64 = active
        .iter()
        .copied()
        .filter(|registration| paid(registration))
        .map(|registration| registration.total_price)
        .sum();

    let mut recent_registrations = registrations.registrations().to_vec();
    recent_registrations.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date));
    recent_registrations.truncate(recent);

    SalesSummary {
        total_revenue,
        active_registrations: active.len(),
        recent_registrations,
    }
}
