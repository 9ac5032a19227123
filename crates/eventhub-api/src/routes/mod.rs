//! Route modules organized by resource.

pub mod admin;
pub mod approvals;
pub mod dashboard;
pub mod events;
pub mod health;
pub mod registrations;
pub mod support;
