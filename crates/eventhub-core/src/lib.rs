//! EventHub Core — shared domain abstractions.
//!
//! This crate defines the traits and types every EventHub context depends
//! on: time, identifiers, acting identity, change notification, and the
//! opaque state-blob persistence seam. It contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod identity;
pub mod ids;
pub mod observer;
pub mod persistence;
