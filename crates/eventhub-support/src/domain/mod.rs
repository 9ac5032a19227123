//! Domain layer for the support desk context.

pub mod commands;
pub mod ticket;
