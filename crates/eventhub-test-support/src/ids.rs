//! Test identifiers — deterministic `IdGenerator` implementation for tests.

use std::sync::atomic::{AtomicU64, Ordering};

use eventhub_core::ids::IdGenerator;

/// Generates `"{prefix}-1"`, `"{prefix}-2"`, ... in call order.
#[derive(Debug)]
pub struct SequenceIds {
    prefix: &'static str,
    next: AtomicU64,
}

impl SequenceIds {
    /// Create a generator whose ids start with `prefix`.
    #[must_use]
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            next: AtomicU64::new(1),
        }
    }
}

impl Default for SequenceIds {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdGenerator for SequenceIds {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        format!("{}-{n}", self.prefix)
    }
}
