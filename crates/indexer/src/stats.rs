use crate::error::ErrorRecord;
use serde::Serialize;

/// Outcome of one indexing pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IndexStats {
    /// Documents successfully pushed to the engine.
    pub indexed_count: u64,
    /// Node ids recorded in the indexed-id set, pushed or not.
    pub visited: u64,
    /// Indexable nodes suppressed by the staleness heuristic.
    pub skipped: u64,
    /// Orphaned index entries deleted by reconciliation.
    pub removed: u64,
    /// Accumulated failures, in encounter order.
    pub errors: Vec<ErrorRecord>,
    /// Wall-clock duration of the pass.
    pub time_ms: u64,
}

impl IndexStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
