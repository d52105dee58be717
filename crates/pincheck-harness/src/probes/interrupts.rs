//! Interrupt-line probes (cases 10 and 11).
//!
//! Both drive the line low as an output first so a level trigger has a
//! defined idle state, then bind the mapped interrupt with the trigger
//! selected by the test parameters.

use super::{fallible, label, require, run};
use pincheck_backend::{Direction, PinctrlBackend, TriggerMode};
use pincheck_types::{CaseOutcome, TestParameters};
use tracing::debug;

fn prepare_line(
    backend: &dyn PinctrlBackend,
    params: &TestParameters,
) -> Result<(u32, TriggerMode), CaseOutcome> {
    let pin = params.gpio_index;
    let trigger = TriggerMode::try_from(params.trigger_mode)
        .map_err(|err| CaseOutcome::violated(format!("trigger selector: {}", err)))?;

    let _ = backend.free_line(pin);
    require("claim line", backend.request_line(pin))?;
    let direction = backend.set_direction(pin, Direction::Output(0));
    let _ = backend.free_line(pin);
    require("set direction output", direction)?;

    let irq = require("map line to interrupt", backend.map_to_interrupt(pin))?;
    debug!(pin = %label(pin), irq, ?trigger, "interrupt line prepared");
    Ok((irq, trigger))
}

/// Case 10: an interrupt can be bound to the mapped line and released.
pub(crate) fn bind(backend: &dyn PinctrlBackend, params: &TestParameters) -> CaseOutcome {
    run(|| {
        let (irq, trigger) = prepare_line(backend, params)?;
        require(
            "bind interrupt",
            backend.request_interrupt(irq, trigger, "pincheck-eint"),
        )?;
        fallible(backend.free_interrupt(irq))?;
        Ok(CaseOutcome::Confirmed)
    })
}

/// Case 11: binding the same interrupt line twice must be rejected.
pub(crate) fn repeat_bind(backend: &dyn PinctrlBackend, params: &TestParameters) -> CaseOutcome {
    run(|| {
        let (irq, trigger) = prepare_line(backend, params)?;
        require(
            "first interrupt bind",
            backend.request_interrupt(irq, trigger, "pincheck-eint"),
        )?;
        let second = backend.request_interrupt(irq, trigger, "pincheck-eint-repeat");
        let _ = backend.free_interrupt(irq);
        match second {
            Err(err) => {
                debug!(irq, %err, "repeat bind rejected");
                Ok(CaseOutcome::Confirmed)
            }
            Ok(()) => Ok(CaseOutcome::violated(
                "repeat bind of a held interrupt line was accepted",
            )),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pincheck_backend::SimBackend;

    fn params(trigger_mode: u32) -> TestParameters {
        TestParameters {
            gpio_index: 40,
            trigger_mode,
            ..TestParameters::default()
        }
    }

    #[test]
    fn bind_and_repeat_bind_confirm_on_the_simulator() {
        let sim = SimBackend::new();
        assert!(bind(&sim, &params(0)).is_confirmed());
        assert!(repeat_bind(&sim, &params(0)).is_confirmed());
    }

    #[test]
    fn every_trigger_selector_is_usable() {
        let sim = SimBackend::new();
        for trigger in 0..=4 {
            assert!(bind(&sim, &params(trigger)).is_confirmed());
        }
    }

    #[test]
    fn out_of_range_trigger_is_a_violation() {
        let sim = SimBackend::new();
        match bind(&sim, &params(9)) {
            CaseOutcome::Violated(reason) => assert!(reason.contains("trigger selector")),
            other => panic!("expected violation, got {:?}", other),
        }
    }

    #[test]
    fn repeat_bind_fails_against_a_permissive_backend() {
        let sim = SimBackend::new().permit_double_claim();
        match repeat_bind(&sim, &params(0)) {
            CaseOutcome::Violated(reason) => assert!(reason.contains("accepted")),
            other => panic!("expected violation, got {:?}", other),
        }
    }
}
