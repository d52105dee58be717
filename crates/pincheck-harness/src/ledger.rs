//! Tri-state result ledger.
//!
//! One slot per registered case, living for the whole process. The latch
//! rule is asymmetric: a FAILED outcome always overwrites,
//! a PASSED outcome only moves a slot out of NOT_RUN. A case that ever
//! failed therefore stays failed until another dispatch fails it again;
//! a later confirmed run does not clear it.

use pincheck_types::{CaseId, CaseStatus, CASE_COUNT};
use serde::{Deserialize, Serialize};

/// What a ledger read returns. Never-dispatched slots carry an empty
/// name and `NotRun`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub name: String,
    pub status: CaseStatus,
}

/// Fixed-capacity verdict ledger, indexed by case id.
#[derive(Debug, Clone)]
pub struct ResultLedger {
    entries: Vec<ResultEntry>,
}

impl Default for ResultLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultLedger {
    pub fn new() -> Self {
        Self {
            entries: vec![ResultEntry::default(); CASE_COUNT],
        }
    }

    /// Apply one dispatch verdict under the latch rule.
    pub fn record(&mut self, id: CaseId, name: &str, status: CaseStatus) {
        let entry = &mut self.entries[id.index()];
        entry.name = name.to_string();
        match status {
            CaseStatus::Failed => entry.status = CaseStatus::Failed,
            CaseStatus::Passed => {
                if entry.status == CaseStatus::NotRun {
                    entry.status = CaseStatus::Passed;
                }
            }
            CaseStatus::NotRun => {}
        }
    }

    /// Idempotent, side-effect-free read of one slot.
    pub fn read(&self, id: CaseId) -> ResultEntry {
        self.entries[id.index()].clone()
    }

    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }
}
