//! Identifier generation.
//!
//! Stores take the generator as a trait object so tests can substitute a
//! deterministic sequence for the random production ids.

use std::sync::atomic::{AtomicU64, Ordering};

/// Produces fresh unique identifier strings.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random v4 UUIDs. The production generator.
#[derive(Debug, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn generate(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Monotonic counter with a fixed prefix ("t-1", "t-2", ...).
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: &'static str,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }
}
