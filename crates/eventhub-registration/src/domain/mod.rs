//! Domain layer for the registration context.

pub mod commands;
pub mod registration;
