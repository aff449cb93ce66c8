//! Identifier sources for questions and sessions.

use uuid::Uuid;

/// Source of unique identifiers.
///
/// Production code uses [`RandomIds`]; tests inject [`SequentialIds`] so ids
/// are stable across runs.
pub trait IdSource: Send {
    /// Return a fresh identifier starting with `prefix`.
    fn next_id(&mut self, prefix: &str) -> String;
}

/// Monotonic counter ids: `q-1`, `q-2`, `session-3`, ...
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next += 1;
        format!("{prefix}-{}", self.next)
    }
}

/// Random v4 UUID ids: `q-3f2c...`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self, prefix: &str) -> String {
        format!("{prefix}-{}", Uuid::new_v4().simple())
    }
}
