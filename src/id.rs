//! Monotonic task-id generation.
//!
//! Ids are issued from a watermark seeded with the highest id already
//! in the collection. Within one process the watermark only moves
//! forward, so a deleted task's id is never handed out again even
//! though it no longer appears in the file.

use crate::task::{TaskId, Tasks};

/// Issues unique, strictly increasing task ids.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    current: TaskId,
}

impl IdGenerator {
    /// Create a generator with an empty watermark. The first id issued
    /// is 1; 0 is never a valid task id.
    #[must_use]
    pub fn new() -> Self {
        Self { current: 0 }
    }

    /// Seed the watermark from an existing collection.
    ///
    /// The next id issued is one past the highest id present, so
    /// reopening a file never collides with tasks already in it.
    #[must_use]
    pub fn from_tasks(tasks: &Tasks) -> Self {
        // BTreeMap keys iterate in order, so the highest id is the last key.
        let current = tasks.keys().next_back().copied().unwrap_or(0);
        Self { current }
    }

    /// Issue the next id, advancing the watermark.
    pub fn next_id(&mut self) -> TaskId {
        self.current += 1;
        self.current
    }

    /// Get the highest id issued or observed so far.
    #[must_use]
    pub fn watermark(&self) -> TaskId {
        self.current
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
