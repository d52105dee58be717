//! Probe routines for the registered conformance cases.
//!
//! Each routine takes the backend and a parameter snapshot and reports a
//! [`CaseOutcome`]. The routines come in three shapes: configuration
//! round-trips, exclusivity (negative) checks, and release-then-reacquire
//! lifecycle checks. Shared step plumbing lives here; the bodies are
//! grouped by the subsystem they exercise.

pub(crate) mod bootcfg;
pub(crate) mod config;
pub(crate) mod handles;
pub(crate) mod interrupts;
pub(crate) mod lines;

use pincheck_backend::{pin_name, BackendResult};
use pincheck_types::CaseOutcome;

/// Probe bodies thread outcomes through `Result<CaseOutcome, CaseOutcome>`
/// so `?` can short-circuit on a failed step; this unwraps either arm.
pub(crate) fn run(body: impl FnOnce() -> Result<CaseOutcome, CaseOutcome>) -> CaseOutcome {
    body().unwrap_or_else(|outcome| outcome)
}

/// A step the case needs to succeed before or while checking its
/// property. Failure is a violation, labelled with the step.
pub(crate) fn require<T>(step: &str, result: BackendResult<T>) -> Result<T, CaseOutcome> {
    result.map_err(|err| CaseOutcome::violated(format!("{}: {}", step, err)))
}

/// A backend call whose failure is outside the property under test.
pub(crate) fn fallible<T>(result: BackendResult<T>) -> Result<T, CaseOutcome> {
    result.map_err(|err| CaseOutcome::fault(err.to_string()))
}

/// Display label for a line index ("PF1", or the raw index when out of
/// the addressable space).
pub(crate) fn label(index: u32) -> String {
    pin_name(index).unwrap_or_else(|| format!("pin{}", index))
}
