//! Stateful service objects owning the catalog's collections.
//!
//! Each store mutates its in-memory state, flushes it to its state-store
//! binding (if any), then notifies subscribers. A flush failure is returned
//! to the caller after the mutation and notification have happened.

pub mod event_store;
pub mod log_store;
pub mod modification_store;
pub mod pending_store;

pub use event_store::{EventStore, EventStoreChange};
pub use log_store::EventLogStore;
pub use modification_store::{ModificationChange, ModificationStore};
pub use pending_store::{PendingChange, PendingEventStore};
