//! Shared application state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use eventhub_catalog::Catalog;
use eventhub_core::clock::Clock;
use eventhub_core::error::DomainError;
use eventhub_core::ids::IdGenerator;
use eventhub_core::observer::Subscription;
use eventhub_core::persistence::StateStore;
use eventhub_registration::RegistrationStore;
use eventhub_registration::payment::PaymentGateway;
use eventhub_support::SupportTicketStore;
use tracing::debug;

/// Application state shared across all request handlers.
///
/// Each store sits behind its own mutex. Handlers that need more than one
/// lock them in the order catalog, registrations, tickets, and never hold a
/// guard across an `.await`.
#[derive(Clone)]
pub struct AppState {
    catalog: Arc<Mutex<Catalog>>,
    registrations: Arc<Mutex<RegistrationStore>>,
    tickets: Arc<Mutex<SupportTicketStore>>,
    /// Clock used for timestamps and date validation.
    pub clock: Arc<dyn Clock>,
    /// Generator for new record ids.
    pub ids: Arc<dyn IdGenerator>,
    /// Gateway that charges bookings.
    pub gateway: Arc<dyn PaymentGateway>,
    _activity_feed: Arc<Subscription>,
}

impl AppState {
    /// Wraps already-constructed stores.
    #[must_use]
    pub fn new(
        catalog: Catalog,
        registrations: RegistrationStore,
        tickets: SupportTicketStore,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        let activity_feed = catalog.logs.subscribe(|entry| {
            debug!(
                event_id = %entry.event_id,
                action = ?entry.action,
                user_id = %entry.user_id,
                "activity recorded"
            );
        });
        Self {
            catalog: Arc::new(Mutex::new(catalog)),
            registrations: Arc::new(Mutex::new(registrations)),
            tickets: Arc::new(Mutex::new(tickets)),
            clock,
            ids,
            gateway,
            _activity_feed: Arc::new(activity_feed),
        }
    }

    /// Opens every store against `backend`, rehydrating persisted state.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if any store's state cannot be
    /// loaded.
    pub fn open(
        backend: &Arc<dyn StateStore>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Result<Self, DomainError> {
        Ok(Self::new(
            Catalog::open(backend)?,
            RegistrationStore::open(Arc::clone(backend))?,
            SupportTicketStore::open(Arc::clone(backend))?,
            clock,
            ids,
            gateway,
        ))
    }

    /// Locks the event catalog.
    pub fn catalog(&self) -> MutexGuard<'_, Catalog> {
        self.catalog.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the registration store.
    pub fn registrations(&self) -> MutexGuard<'_, RegistrationStore> {
        self.registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the support ticket store.
    pub fn tickets(&self) -> MutexGuard<'_, SupportTicketStore> {
        self.tickets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
