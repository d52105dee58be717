//! Configuration round-trip probes (cases 2 through 5).
//!
//! Shape: write one facet of the pin's configuration through the backend,
//! read the same facet back, and demand bit-exact equality.

use super::{fallible, label, require, run};
use pincheck_backend::{ConfigKind, PinctrlBackend};
use pincheck_types::{CaseOutcome, TestParameters};
use tracing::debug;

fn round_trip(backend: &dyn PinctrlBackend, pin: u32, kind: ConfigKind, value: u32) -> CaseOutcome {
    run(|| {
        let before = fallible(backend.get_config(pin, kind))?;
        debug!(pin = %label(pin), kind = %kind, before, value, "config round-trip");
        require(
            &format!("set {} value", kind),
            backend.set_config(pin, kind, value),
        )?;
        let after = fallible(backend.get_config(pin, kind))?;
        if after != value {
            return Ok(CaseOutcome::violated(format!(
                "{} readback {} does not match written {}",
                kind, after, value
            )));
        }
        Ok(CaseOutcome::Confirmed)
    })
}

pub(crate) fn function_set(backend: &dyn PinctrlBackend, params: &TestParameters) -> CaseOutcome {
    round_trip(
        backend,
        params.gpio_index,
        ConfigKind::Function,
        params.function_code,
    )
}

pub(crate) fn data_set(backend: &dyn PinctrlBackend, params: &TestParameters) -> CaseOutcome {
    round_trip(backend, params.gpio_index, ConfigKind::Data, params.data_bit)
}

pub(crate) fn pull_set(backend: &dyn PinctrlBackend, params: &TestParameters) -> CaseOutcome {
    round_trip(backend, params.gpio_index, ConfigKind::Pull, params.pull_mode)
}

pub(crate) fn drive_level_set(
    backend: &dyn PinctrlBackend,
    params: &TestParameters,
) -> CaseOutcome {
    round_trip(
        backend,
        params.gpio_index,
        ConfigKind::DriveLevel,
        params.drive_level,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pincheck_backend::SimBackend;

    fn params(gpio_index: u32) -> TestParameters {
        TestParameters {
            gpio_index,
            function_code: 2,
            data_bit: 1,
            drive_level: 3,
            pull_mode: 1,
            ..TestParameters::default()
        }
    }

    #[test]
    fn round_trips_confirm_on_the_simulator() {
        let sim = SimBackend::new();
        let p = params(42);
        assert!(function_set(&sim, &p).is_confirmed());
        assert!(data_set(&sim, &p).is_confirmed());
        assert!(pull_set(&sim, &p).is_confirmed());
        assert!(drive_level_set(&sim, &p).is_confirmed());
    }

    #[test]
    fn illegal_value_is_a_violation_not_a_fault() {
        let sim = SimBackend::new();
        let p = TestParameters {
            gpio_index: 42,
            function_code: 99,
            ..TestParameters::default()
        };
        match function_set(&sim, &p) {
            CaseOutcome::Violated(reason) => assert!(reason.contains("set function value")),
            other => panic!("expected violation, got {:?}", other),
        }
    }

    #[test]
    fn unknown_pin_is_a_fault() {
        let sim = SimBackend::new();
        let p = params(4096);
        assert!(matches!(function_set(&sim, &p), CaseOutcome::Fault(_)));
    }
}
