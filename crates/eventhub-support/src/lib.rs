//! EventHub — support desk bounded context.
//!
//! Users open tickets, both sides add to the thread, and admins move
//! tickets through `open`, `in-progress`, and `resolved`.

pub mod application;
pub mod domain;
pub mod store;

pub use store::SupportTicketStore;
