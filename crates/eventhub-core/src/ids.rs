//! Identifier generation abstraction for determinism.
//!
//! In production, identifiers are random UUIDs. In tests, a sequential
//! implementation is injected so records can be asserted by id.

use uuid::Uuid;

/// Abstraction over opaque identifier generation.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh identifier, unique within this generator.
    fn next_id(&self) -> String;
}

/// Production generator backed by random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_ids_are_distinct_and_unhyphenated() {
        let ids = UuidIdGenerator;

        let first = ids.next_id();
        let second = ids.next_id();

        assert_ne!(first, second);
        assert_eq!(first.len(), 32);
        assert!(!first.contains('-'));
    }
}
