//! Shared test fakes and utilities for the EventHub storefront.

mod clock;
mod ids;
mod state_store;

pub use clock::{FixedClock, fixed_now};
pub use ids::SequenceIds;
pub use state_store::{EmptyStateStore, FailingStateStore, RecordingStateStore};
