//! Domain layer for the event catalog context.

pub mod commands;
pub mod event;
pub mod filter;
pub mod log;
pub mod modification;
pub mod validation;
