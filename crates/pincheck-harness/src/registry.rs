//! Case registry: the fixed, ordered catalogue of conformance cases.
//!
//! Ids are stable small integers assigned at registration and never
//! reused for a different check. The registry is built once at harness
//! construction; dispatch resolves ids against it instead of branching
//! on the raw integer.

use crate::probes::{bootcfg, config, handles, interrupts, lines};
use pincheck_backend::PinctrlBackend;
use pincheck_types::{CaseId, CaseOutcome, TestParameters, CASE_COUNT};

/// A probe routine bound into the registry.
pub type ProbeFn = fn(&dyn PinctrlBackend, &TestParameters) -> CaseOutcome;

/// One registered case: immutable display name plus its routine.
pub struct TestCase {
    name: &'static str,
    probe: ProbeFn,
}

impl TestCase {
    const fn new(name: &'static str, probe: ProbeFn) -> Self {
        Self { name, probe }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn run(&self, backend: &dyn PinctrlBackend, params: &TestParameters) -> CaseOutcome {
        (self.probe)(backend, params)
    }
}

/// The ordered case table.
pub struct CaseRegistry {
    cases: Vec<TestCase>,
}

impl CaseRegistry {
    /// The standard 22-case catalogue, in id order.
    pub fn standard() -> Self {
        let cases = vec![
            TestCase::new("request_all_device_pins", handles::request_all_device_pins),
            TestCase::new("re_request_device_pins", handles::re_request_device_pins),
            TestCase::new("pin_function_set", config::function_set),
            TestCase::new("pin_data_set", config::data_set),
            TestCase::new("pin_pull_set", config::pull_set),
            TestCase::new("pin_drive_level_set", config::drive_level_set),
            TestCase::new("line_request_free", lines::request_free),
            TestCase::new("line_repeat_request", lines::repeat_request),
            TestCase::new("line_value_suite", lines::value_suite),
            TestCase::new("boot_config_lookup", bootcfg::lookup),
            TestCase::new("interrupt_bind", interrupts::bind),
            TestCase::new("interrupt_repeat_bind", interrupts::repeat_bind),
            TestCase::new("mux_request_line", lines::mux_request),
            TestCase::new("mux_free_line", lines::mux_free),
            TestCase::new("mux_direction_input", lines::mux_direction_input),
            TestCase::new("mux_direction_output", lines::mux_direction_output),
            TestCase::new("handle_acquire", handles::acquire),
            TestCase::new("handle_lookup_state", handles::lookup_state),
            TestCase::new("handle_select_state", handles::select_state),
            TestCase::new("handle_release_reacquire", handles::release_reacquire),
            TestCase::new("scoped_handle_cycle", handles::scoped_cycle),
            TestCase::new("line_set_debounce", lines::set_debounce),
        ];
        debug_assert_eq!(cases.len(), CASE_COUNT);
        Self { cases }
    }

    pub fn get(&self, id: CaseId) -> &TestCase {
        &self.cases[id.index()]
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// All cases with their ids, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (CaseId, &TestCase)> {
        self.cases
            .iter()
            .enumerate()
            .filter_map(|(raw, case)| CaseId::new(raw).map(|id| (id, case)))
    }
}
