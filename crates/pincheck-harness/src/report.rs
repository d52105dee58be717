//! Run report: a serializable snapshot of the whole ledger.

use crate::ledger::ResultLedger;
use crate::registry::CaseRegistry;
use chrono::{DateTime, Utc};
use pincheck_types::CaseStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// One catalogue row in the report. The name comes from the registry, so
/// never-run cases are still listed by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRow {
    pub id: usize,
    pub name: String,
    pub status: CaseStatus,
}

/// Aggregate counts over the catalogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub not_run: usize,
}

impl RunSummary {
    /// Whether every case has run and passed.
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.not_run == 0
    }
}

/// A complete report over one harness instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub summary: RunSummary,
    pub cases: Vec<CaseRow>,
}

impl RunReport {
    pub fn new(registry: &CaseRegistry, ledger: &ResultLedger) -> Self {
        let cases: Vec<CaseRow> = registry
            .iter()
            .map(|(id, case)| CaseRow {
                id: id.index(),
                name: case.name().to_string(),
                status: ledger.read(id).status,
            })
            .collect();
        let passed = cases.iter().filter(|row| row.status == CaseStatus::Passed).count();
        let failed = cases.iter().filter(|row| row.status == CaseStatus::Failed).count();
        let summary = RunSummary {
            total: cases.len(),
            passed,
            failed,
            not_run: cases.len() - passed - failed,
        };
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            summary,
            cases,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.summary.all_passed()
    }

    /// Only the failed rows.
    pub fn failures(&self) -> Vec<&CaseRow> {
        self.cases
            .iter()
            .filter(|row| row.status == CaseStatus::Failed)
            .collect()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "╔══════════════════════════════════════════════════╗")?;
        writeln!(f, "║        Pinmux/GPIO Conformance Report            ║")?;
        writeln!(f, "╠══════════════════════════════════════════════════╣")?;
        writeln!(
            f,
            "║ Total: {:3}  Passed: {:3}  Failed: {:3}  Not run: {:3} ║",
            self.summary.total, self.summary.passed, self.summary.failed, self.summary.not_run
        )?;
        writeln!(f, "╚══════════════════════════════════════════════════╝")?;
        for row in &self.cases {
            let tag = match row.status {
                CaseStatus::Passed => "PASS",
                CaseStatus::Failed => "FAIL",
                CaseStatus::NotRun => " -- ",
            };
            writeln!(f, "  [{}] {:2}  {}", tag, row.id, row.name)?;
        }
        Ok(())
    }
}
