//! EventHub — ticket registration and payment bounded context.
//!
//! Owns registrations and their payment records, and the booking,
//! cancellation, and transfer handlers that move tickets on and off sale in
//! the catalog.

pub mod application;
pub mod domain;
pub mod payment;
pub mod store;

pub use store::RegistrationStore;
