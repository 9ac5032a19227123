//! EventHub — event catalog and approval workflow bounded context.
//!
//! Owns the canonical event collection, the pending-review queue, the
//! modification audit trail, and the activity log, plus the command handlers
//! that move events through draft → pending → approved/rejected →
//! pending-changes and the queries that project them for display.

pub mod application;
pub mod catalog;
pub mod domain;
pub mod store;

pub use catalog::Catalog;
