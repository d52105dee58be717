//! Shared vocabulary for the pincheck conformance harness.
//!
//! These types are the contract between the core engine
//! (`pincheck-harness`), the capability boundary (`pincheck-backend`) and
//! the operator surface (`pincheck-control`): case identity, the tri-state
//! verdict, per-dispatch outcomes and the mutable test parameter record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of registered conformance cases. Case ids are stable small
/// integers in `0..CASE_COUNT` and are never reused for a different check.
pub const CASE_COUNT: usize = 22;

/// Maximum accepted length of the target device name, in bytes.
/// Longer names are rejected outright, never truncated.
pub const DEV_NAME_MAX_LEN: usize = 20;

/// Identifies one of the registered conformance cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseId(usize);

impl CaseId {
    /// Validate a raw id against the registered range.
    pub fn new(raw: usize) -> Option<Self> {
        (raw < CASE_COUNT).then_some(Self(raw))
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Verdict slot for one case in the result ledger.
///
/// Every slot starts as `NotRun` at process start and is only reset by a
/// process restart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseStatus {
    #[default]
    NotRun,
    Passed,
    Failed,
}

impl CaseStatus {
    /// Numeric encoding used by the control-plane `test_result` attribute:
    /// 0 = passed, 1 = failed, 2 = not-run.
    pub fn code(&self) -> u32 {
        match self {
            Self::Passed => 0,
            Self::Failed => 1,
            Self::NotRun => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NotRun => "not-run",
            Self::Passed => "passed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// What a probe routine reports back to the dispatcher.
///
/// `Fault` carries a backend error unrelated to the property under test;
/// the ledger treats it like `Violated` but it stays distinguishable in
/// logs and dispatch return values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseOutcome {
    /// The property under test held.
    Confirmed,
    /// The property under test did not hold, or a precondition failed.
    Violated(String),
    /// The backend misbehaved in a way outside the property under test.
    Fault(String),
}

impl CaseOutcome {
    pub fn violated(reason: impl Into<String>) -> Self {
        Self::Violated(reason.into())
    }

    pub fn fault(reason: impl Into<String>) -> Self {
        Self::Fault(reason.into())
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed)
    }

    /// Ledger classification: confirmed latches PASSED (first run only),
    /// anything else latches FAILED.
    pub fn status(&self) -> CaseStatus {
        if self.is_confirmed() {
            CaseStatus::Passed
        } else {
            CaseStatus::Failed
        }
    }
}

impl fmt::Display for CaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirmed => write!(f, "confirmed"),
            Self::Violated(reason) => write!(f, "violated: {}", reason),
            Self::Fault(reason) => write!(f, "backend fault: {}", reason),
        }
    }
}

/// The process-wide mutable test parameter record.
///
/// Written through the control surface before a dispatch; probe routines
/// receive a read-only snapshot taken at the moment of dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestParameters {
    /// Global line index of the pin under test.
    pub gpio_index: u32,
    /// Function code for the mux round-trip check.
    pub function_code: u32,
    /// Data bit, 0 or 1.
    pub data_bit: u32,
    /// Drive strength level.
    pub drive_level: u32,
    /// Pull mode (none/up/down encoding of the platform).
    pub pull_mode: u32,
    /// Interrupt trigger mode selector.
    pub trigger_mode: u32,
    /// Target device name for handle-level cases.
    pub device_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_id_rejects_out_of_range() {
        assert!(CaseId::new(0).is_some());
        assert!(CaseId::new(CASE_COUNT - 1).is_some());
        assert!(CaseId::new(CASE_COUNT).is_none());
        assert!(CaseId::new(99).is_none());
    }

    #[test]
    fn status_codes_match_control_encoding() {
        assert_eq!(CaseStatus::Passed.code(), 0);
        assert_eq!(CaseStatus::Failed.code(), 1);
        assert_eq!(CaseStatus::NotRun.code(), 2);
    }

    #[test]
    fn default_status_is_not_run() {
        assert_eq!(CaseStatus::default(), CaseStatus::NotRun);
    }

    #[test]
    fn outcome_classification() {
        assert_eq!(CaseOutcome::Confirmed.status(), CaseStatus::Passed);
        assert_eq!(
            CaseOutcome::violated("second claim accepted").status(),
            CaseStatus::Failed
        );
        assert_eq!(CaseOutcome::fault("line gone").status(), CaseStatus::Failed);
    }

    #[test]
    fn outcome_display_keeps_reason() {
        let out = CaseOutcome::violated("readback mismatch");
        assert_eq!(out.to_string(), "violated: readback mismatch");
    }

    #[test]
    fn parameters_serde_round_trip() {
        let params = TestParameters {
            gpio_index: 161,
            function_code: 2,
            data_bit: 1,
            drive_level: 1,
            pull_mode: 1,
            trigger_mode: 0,
            device_name: "mmc0_para".into(),
        };
        let json = serde_json::to_string(&params).unwrap();
        let back: TestParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }
}
