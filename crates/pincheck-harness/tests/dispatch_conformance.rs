//! End-to-end dispatch scenarios against the simulated backend.

use pincheck_backend::{ConfigKind, PinctrlBackend, SimBackend};
use pincheck_harness::{DispatchError, Field, Harness};
use pincheck_types::{CaseId, CaseStatus, CASE_COUNT};
use std::sync::Arc;

fn harness_with(sim: Arc<SimBackend>) -> Harness {
    Harness::new(sim)
}

#[test]
fn function_set_round_trip_reaches_the_backend() {
    let sim = Arc::new(SimBackend::new());
    let mut h = harness_with(sim.clone());
    h.set_param(Field::GpioIndex, "70").unwrap();
    h.set_param(Field::FunctionCode, "1").unwrap();

    assert_eq!(sim.get_config(70, ConfigKind::Function).unwrap(), 0);
    let outcome = h.dispatch(2).unwrap();
    assert!(outcome.is_confirmed());
    assert_eq!(h.result(CaseId::new(2).unwrap()).status, CaseStatus::Passed);
    assert_eq!(sim.get_config(70, ConfigKind::Function).unwrap(), 1);
}

#[test]
fn repeat_request_passes_when_the_backend_enforces_exclusivity() {
    let sim = Arc::new(SimBackend::new());
    let mut h = harness_with(sim);
    h.set_param(Field::GpioIndex, "71").unwrap();
    h.dispatch(7).unwrap();
    assert_eq!(h.result(CaseId::new(7).unwrap()).status, CaseStatus::Passed);
}

#[test]
fn repeat_request_fails_when_the_backend_permits_double_claims() {
    let sim = Arc::new(SimBackend::new().permit_double_claim());
    let mut h = harness_with(sim);
    h.set_param(Field::GpioIndex, "71").unwrap();
    let outcome = h.dispatch(7).unwrap();
    assert!(!outcome.is_confirmed());
    assert_eq!(h.result(CaseId::new(7).unwrap()).status, CaseStatus::Failed);
}

#[test]
fn out_of_range_id_makes_no_backend_calls_and_changes_nothing() {
    let sim = Arc::new(SimBackend::new());
    let mut h = harness_with(sim.clone());
    h.set_param(Field::GpioIndex, "72").unwrap();
    h.dispatch(3).unwrap();

    let calls_before = sim.calls();
    let results_before: Vec<_> = (0..CASE_COUNT)
        .map(|raw| h.result(CaseId::new(raw).unwrap()))
        .collect();
    let last_before = h.last_result();

    assert_eq!(h.dispatch(99), Err(DispatchError::UnsupportedCase(99)));

    assert_eq!(sim.calls(), calls_before);
    assert_eq!(h.last_result(), last_before);
    assert_eq!(h.last_dispatched(), Some(CaseId::new(3).unwrap()));
    let results_after: Vec<_> = (0..CASE_COUNT)
        .map(|raw| h.result(CaseId::new(raw).unwrap()))
        .collect();
    assert_eq!(results_before, results_after);
}

#[test]
fn result_reads_are_idempotent() {
    let sim = Arc::new(SimBackend::new());
    let mut h = harness_with(sim);
    h.set_param(Field::GpioIndex, "73").unwrap();
    h.dispatch(6).unwrap();
    let id = CaseId::new(6).unwrap();
    assert_eq!(h.result(id), h.result(id));

    let never_run = h.result(CaseId::new(11).unwrap());
    assert_eq!(never_run.status, CaseStatus::NotRun);
    assert!(never_run.name.is_empty());
}

#[test]
fn precondition_failure_is_failed_not_unsupported() {
    let sim = Arc::new(SimBackend::new());
    let mut h = harness_with(sim);
    h.set_param(Field::DeviceName, "no_such_device").unwrap();
    // The routine runs and reports a violation; the dispatch itself is valid.
    let outcome = h.dispatch(0).unwrap();
    assert!(!outcome.is_confirmed());
    assert_eq!(h.result(CaseId::new(0).unwrap()).status, CaseStatus::Failed);
}

#[test]
fn full_catalogue_passes_against_the_simulator() {
    let sim = Arc::new(SimBackend::new());
    let mut h = harness_with(sim);
    h.set_param(Field::GpioIndex, "74").unwrap();
    h.set_param(Field::FunctionCode, "2").unwrap();
    h.set_param(Field::DataBit, "1").unwrap();
    h.set_param(Field::DriveLevel, "3").unwrap();
    h.set_param(Field::PullMode, "1").unwrap();
    h.set_param(Field::TriggerMode, "0").unwrap();
    h.set_param(Field::DeviceName, "card0_boot_para").unwrap();

    for raw in 0..CASE_COUNT {
        let outcome = h.dispatch(raw).unwrap();
        assert!(
            outcome.is_confirmed(),
            "case {} reported {:?}",
            raw,
            outcome
        );
    }

    let report = h.report();
    assert!(report.all_passed());
    assert_eq!(report.summary.passed, CASE_COUNT);
}

#[test]
fn harness_stays_dispatchable_after_a_failure() {
    let sim = Arc::new(SimBackend::new());
    let mut h = harness_with(sim);
    h.set_param(Field::DeviceName, "no_such_device").unwrap();
    h.set_param(Field::GpioIndex, "75").unwrap();
    assert!(!h.dispatch(0).unwrap().is_confirmed());
    // A later, well-parameterized case still runs and passes.
    assert!(h.dispatch(6).unwrap().is_confirmed());
    assert_eq!(h.result(CaseId::new(6).unwrap()).status, CaseStatus::Passed);
}
