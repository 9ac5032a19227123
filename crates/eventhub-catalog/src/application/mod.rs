//! Application layer for the event catalog context.

pub mod command_handlers;
pub mod query_handlers;
