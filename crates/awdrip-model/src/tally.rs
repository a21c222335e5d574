use serde::{Deserialize, Serialize};

/// Row counters for one source file.
///
/// `failed` rows are a subset of the ignored rows: every row that did not
/// produce a document counts as ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTally {
    pub total: usize,
    pub processed: usize,
    pub failed: usize,
}

impl FileTally {
    pub fn record_processed(&mut self) {
        self.total += 1;
        self.processed += 1;
    }

    pub fn record_ignored(&mut self) {
        self.total += 1;
    }

    pub fn record_failed(&mut self) {
        self.total += 1;
        self.failed += 1;
    }

    pub fn ignored(&self) -> usize {
        self.total - self.processed
    }
}
