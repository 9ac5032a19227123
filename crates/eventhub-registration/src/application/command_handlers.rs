//! Command handlers for the registration context.
//!
//! Booking and cancellation drive ticket availability on the catalog's
//! event store; the registration store and the event store are updated in
//! sequence, not atomically.

use eventhub_catalog::Catalog;
use eventhub_catalog::application::query_handlers::get_visible_event;
use eventhub_core::clock::Clock;
use eventhub_core::command::Command;
use eventhub_core::error::DomainError;
use eventhub_core::identity::Actor;
use eventhub_core::ids::IdGenerator;
use tracing::{info, warn};

use crate::domain::commands::{BookTickets, CancelRegistration, TransferRegistration};
use crate::domain::registration::{
    PaymentState, PaymentStatus, Registration, RegistrationStatus, ticket_total,
};
use crate::payment::{PaymentGateway, PaymentOutcome, PaymentRequest};
use crate::store::RegistrationStore;

/// Result of a successfully handled registration command.
#[derive(Debug, Clone)]
pub struct RegistrationCommandResult {
    /// The registration after the command.
    pub registration: Registration,
    /// Its payment record after the command.
    pub payment: Option<PaymentStatus>,
}

/// Handles `BookTickets`: records the registration, charges the gateway,
/// and on success marks it paid and takes the tickets off sale.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the event is not publicly visible,
/// `DomainError::Validation` for a zero quantity,
/// `DomainError::InsufficientTickets` if fewer tickets remain than
/// requested, `DomainError::PaymentDeclined` if the gateway refuses the
/// charge (the registration is kept with a failed payment), and
/// `DomainError::Infrastructure` if a store fails to flush.
pub fn handle_book_tickets(
    command: &BookTickets,
    catalog: &mut Catalog,
    registrations: &mut RegistrationStore,
    gateway: &dyn PaymentGateway,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
) -> Result<RegistrationCommandResult, DomainError> {
    let actor = command.actor();
    let event = get_visible_event(catalog, &command.event_id)?;

    if command.quantity == 0 {
        return Err(DomainError::Validation(
            "quantity must be at least 1".to_owned(),
        ));
    }
    if command.quantity > event.tickets_available {
        warn!(
            event_id = %event.id,
            requested = command.quantity,
            available = event.tickets_available,
            "booking exceeds availability"
        );
        return Err(DomainError::InsufficientTickets {
            event_id: event.id,
            requested: command.quantity,
            available: event.tickets_available,
        });
    }

    let registration = Registration {
        id: ids.next_id(),
        event_id: event.id.clone(),
        user_id: actor.id.clone(),
        ticket_type: command.ticket_type,
        quantity: command.quantity,
        total_price: ticket_total(event.price, command.quantity, command.ticket_type),
        status: RegistrationStatus::Confirmed,
        purchase_date: clock.now(),
        attendee_info: command.attendee.clone(),
    };
    registrations.add_registration(registration.clone(), clock)?;

    let request = PaymentRequest {
        registration_id: registration.id.clone(),
        event_id: event.id.clone(),
        amount: registration.total_price,
    };
    match gateway.charge(&request) {
        PaymentOutcome::Approved { transaction_id } => {
            let mut payment = PaymentStatus::new(PaymentState::Paid, clock.now());
            payment.transaction_id = Some(transaction_id);
            registrations.update_registration_payment_status(
                &registration.id,
                payment.clone(),
                clock,
            )?;
            catalog
                .events
                .update_ticket_availability(&event.id, command.quantity, false)?;

            info!(
                correlation_id = %command.correlation_id(),
                command = command.command_type(),
                registration_id = %registration.id,
                event_id = %event.id,
                quantity = command.quantity,
                "tickets booked"
            );
            Ok(RegistrationCommandResult {
                registration,
                payment: Some(payment),
            })
        }
        PaymentOutcome::Declined { reason } => {
            let mut payment = PaymentStatus::new(PaymentState::Failed, clock.now());
            payment.error = Some(reason.clone());
            registrations.update_registration_payment_status(&registration.id, payment, clock)?;

            warn!(
                correlation_id = %command.correlation_id(),
                command = command.command_type(),
                registration_id = %registration.id,
                %reason,
                "payment declined"
            );
            Err(DomainError::PaymentDeclined(format!(
                "registration {}: {reason}",
                registration.id
            )))
        }
    }
}

/// Handles `CancelRegistration`: cancels the registration and, if its
/// tickets were paid for, puts them back on sale.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown registration,
/// `DomainError::Forbidden` if the actor neither owns it nor is an admin,
/// `DomainError::Validation` if it is already cancelled, and
/// `DomainError::Infrastructure` if a store fails to flush.
pub fn handle_cancel_registration(
    command: &CancelRegistration,
    catalog: &mut Catalog,
    registrations: &mut RegistrationStore,
    clock: &dyn Clock,
) -> Result<RegistrationCommandResult, DomainError> {
    let existing = owned_registration(registrations, command.actor(), &command.registration_id)?;
    if !existing.is_active() {
        return Err(DomainError::Validation(format!(
            "registration {} is already cancelled",
            existing.id
        )));
    }
    let was_paid = registrations
        .get_payment_status(&existing.id)
        .is_some_and(|payment| payment.state == PaymentState::Paid);

    registrations.cancel_registration(&existing.id, clock)?;
    if was_paid {
        catalog
            .events
            .update_ticket_availability(&existing.event_id, existing.quantity, true)?;
    }

    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        registration_id = %existing.id,
        released = was_paid,
        "registration cancelled"
    );
    current(registrations, &existing.id)
}

/// Handles `TransferRegistration`: hands an active registration to a new
/// attendee.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown registration,
/// `DomainError::Forbidden` if the actor neither owns it nor is an admin,
/// `DomainError::Validation` if it is cancelled, and
/// `DomainError::Infrastructure` if the store fails to flush.
pub fn handle_transfer_registration(
    command: &TransferRegistration,
    registrations: &mut RegistrationStore,
) -> Result<RegistrationCommandResult, DomainError> {
    let existing = owned_registration(registrations, command.actor(), &command.registration_id)?;
    if !existing.is_active() {
        return Err(DomainError::Validation(format!(
            "registration {} is cancelled",
            existing.id
        )));
    }

    registrations.transfer_registration(&existing.id, command.attendee.clone())?;

    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        registration_id = %existing.id,
        "registration transferred"
    );
    current(registrations, &existing.id)
}

fn owned_registration(
    registrations: &RegistrationStore,
    actor: &Actor,
    registration_id: &str,
) -> Result<Registration, DomainError> {
    let registration = registrations
        .get_registration_by_id(registration_id)
        .cloned()
        .ok_or_else(|| DomainError::not_found("registration", registration_id))?;
    if registration.user_id != actor.id && !actor.is_admin() {
        return Err(DomainError::Forbidden(format!(
            "{} may not manage registration {registration_id}",
            actor.name
        )));
    }
    Ok(registration)
}

fn current(
    registrations: &RegistrationStore,
    registration_id: &str,
) -> Result<RegistrationCommandResult, DomainError> {
    let registration = registrations
        .get_registration_by_id(registration_id)
        .cloned()
        .ok_or_else(|| DomainError::not_found("registration", registration_id))?;
    Ok(RegistrationCommandResult {
        payment: registrations.get_payment_status(registration_id).cloned(),
        registration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registration::{RefundStatus, TicketType};
    use crate::payment::SimulatedPaymentGateway;
    use crate::store::fixtures::attendee;
    use chrono::{NaiveDate, NaiveTime};
    use eventhub_catalog::domain::event::{Event, EventCategory, EventStatus};
    use eventhub_catalog::store::EventStore;
    use eventhub_core::identity::Role;
    use eventhub_test_support::{FixedClock, SequenceIds, fixed_now};
    use uuid::Uuid;

    fn published(capacity: u32) -> Event {
        Event {
            id: "evt-1".to_owned(),
            title: "Tech Meet".to_owned(),
            description: "An evening of lightning talks on systems programming.".to_owned(),
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            time: NaiveTime::from_hms_opt(18, 30, 0).unwrap(),
            location: "Bengaluru Convention Centre".to_owned(),
            price: 500.0,
            category: EventCategory::Conference,
            image_url: "https://images.example.com/tech-meet.jpg".to_owned(),
            organizer: "Ravi".to_owned(),
            capacity,
            tickets_available: capacity,
            status: EventStatus::Approved,
            version: 1,
            previous_version: None,
            last_modified: fixed_now(),
            last_modified_by: "Ravi".to_owned(),
        }
    }

    fn catalog_with(event: Event) -> Catalog {
        Catalog {
            events: EventStore::with_events(vec![event]),
            ..Catalog::default()
        }
    }

    fn anita() -> Actor {
        Actor::new("u-5", "Anita", Role::Attendee)
    }

    fn book(quantity: u32, ticket_type: TicketType) -> BookTickets {
        BookTickets {
            correlation_id: Uuid::new_v4(),
            actor: anita(),
            event_id: "evt-1".to_owned(),
            ticket_type,
            quantity,
            attendee: attendee("Anita"),
        }
    }

    #[test]
    fn test_booking_charges_and_takes_tickets_off_sale() {
        // Arrange
        let mut catalog = catalog_with(published(100));
        let mut registrations = RegistrationStore::new();

        // Act
        let result = handle_book_tickets(
            &book(3, TicketType::Vip),
            &mut catalog,
            &mut registrations,
            &SimulatedPaymentGateway::approving(),
            &FixedClock::default(),
            &SequenceIds::new("reg"),
        )
        .unwrap();

        // Assert
        assert_eq!(result.registration.id, "reg-1");
        assert!((result.registration.total_price - 2250.0).abs() < f64::EPSILON);
        let payment = result.payment.unwrap();
        assert_eq!(payment.state, PaymentState::Paid);
        assert!(payment.transaction_id.is_some());
        assert_eq!(
            catalog.events.get_event_by_id("evt-1").unwrap().tickets_available,
            97
        );
    }

    #[test]
    fn test_booking_more_than_available_is_refused() {
        // Arrange
        let mut catalog = catalog_with(published(2));
        let mut registrations = RegistrationStore::new();

        // Act
        let result = handle_book_tickets(
            &book(3, TicketType::General),
            &mut catalog,
            &mut registrations,
            &SimulatedPaymentGateway::approving(),
            &FixedClock::default(),
            &SequenceIds::new("reg"),
        );

        // Assert
        match result {
            Err(DomainError::InsufficientTickets {
                requested,
                available,
                ..
            }) => {
                assert_eq!(requested, 3);
                assert_eq!(available, 2);
            }
            other => panic!("expected InsufficientTickets, got {other:?}"),
        }
        assert!(registrations.registrations().is_empty());
    }

    #[test]
    fn test_booking_invisible_event_is_not_found() {
        let mut event = published(100);
        event.status = EventStatus::PendingChanges;
        let mut catalog = catalog_with(event);

        let result = handle_book_tickets(
            &book(1, TicketType::General),
            &mut catalog,
            &mut RegistrationStore::new(),
            &SimulatedPaymentGateway::approving(),
            &FixedClock::default(),
            &SequenceIds::new("reg"),
        );

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[test]
    fn test_declined_payment_keeps_stock() {
        // Arrange
        let mut catalog = catalog_with(published(100));
        let mut registrations = RegistrationStore::new();

        // Act
        let result = handle_book_tickets(
            &book(2, TicketType::General),
            &mut catalog,
            &mut registrations,
            &SimulatedPaymentGateway::declining("card expired"),
            &FixedClock::default(),
            &SequenceIds::new("reg"),
        );

        // Assert
        assert!(matches!(result, Err(DomainError::PaymentDeclined(_))));
        let payment = registrations.get_payment_status("reg-1").unwrap();
        assert_eq!(payment.state, PaymentState::Failed);
        assert_eq!(payment.error.as_deref(), Some("card expired"));
        assert_eq!(
            catalog.events.get_event_by_id("evt-1").unwrap().tickets_available,
            100
        );
    }

    #[test]
    fn test_cancel_releases_paid_tickets_and_owes_refund() {
        // Arrange
        let clock = FixedClock::default();
        let mut catalog = catalog_with(published(100));
        let mut registrations = RegistrationStore::new();
        let booked = handle_book_tickets(
            &book(3, TicketType::General),
            &mut catalog,
            &mut registrations,
            &SimulatedPaymentGateway::approving(),
            &clock,
            &SequenceIds::new("reg"),
        )
        .unwrap();
        let command = CancelRegistration {
            correlation_id: Uuid::new_v4(),
            actor: anita(),
            registration_id: booked.registration.id.clone(),
        };

        // Act
        let result =
            handle_cancel_registration(&command, &mut catalog, &mut registrations, &clock)
                .unwrap();

        // Assert
        assert_eq!(result.registration.status, RegistrationStatus::Cancelled);
        assert_eq!(
            result.payment.unwrap().refund_status,
            Some(RefundStatus::Pending)
        );
        assert_eq!(
            catalog.events.get_event_by_id("evt-1").unwrap().tickets_available,
            100
        );
        let again = handle_cancel_registration(&command, &mut catalog, &mut registrations, &clock);
        assert!(matches!(again, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_only_owner_or_admin_may_cancel() {
        // Arrange
        let clock = FixedClock::default();
        let mut catalog = catalog_with(published(100));
        let mut registrations = RegistrationStore::new();
        let booked = handle_book_tickets(
            &book(1, TicketType::General),
            &mut catalog,
            &mut registrations,
            &SimulatedPaymentGateway::approving(),
            &clock,
            &SequenceIds::new("reg"),
        )
        .unwrap();
        let stranger = CancelRegistration {
            correlation_id: Uuid::new_v4(),
            actor: Actor::new("u-9", "Vikram", Role::Attendee),
            registration_id: booked.registration.id.clone(),
        };
        let admin = CancelRegistration {
            actor: Actor::new("u-1", "Priya", Role::Admin),
            ..stranger.clone()
        };

        // Act
        let denied = handle_cancel_registration(&stranger, &mut catalog, &mut registrations, &clock);
        let allowed = handle_cancel_registration(&admin, &mut catalog, &mut registrations, &clock);

        // Assert
        assert!(matches!(denied, Err(DomainError::Forbidden(_))));
        assert!(allowed.is_ok());
    }

    #[test]
    fn test_transfer_hands_registration_to_new_attendee() {
        // Arrange
        let clock = FixedClock::default();
        let mut catalog = catalog_with(published(100));
        let mut registrations = RegistrationStore::new();
        let booked = handle_book_tickets(
            &book(1, TicketType::General),
            &mut catalog,
            &mut registrations,
            &SimulatedPaymentGateway::approving(),
            &clock,
            &SequenceIds::new("reg"),
        )
        .unwrap();
        let command = TransferRegistration {
            correlation_id: Uuid::new_v4(),
            actor: anita(),
            registration_id: booked.registration.id,
            attendee: attendee("Kiran"),
        };

        // Act
        let result = handle_transfer_registration(&command, &mut registrations).unwrap();

        // Assert
        assert_eq!(result.registration.status, RegistrationStatus::Transferred);
        assert_eq!(result.registration.attendee_info.name, "Kiran");
    }
}
