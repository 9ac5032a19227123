//! Application layer for the support desk context.

pub mod command_handlers;
pub mod query_handlers;
