//! GPIO line probes: allocator-path cases (6, 7, 8, 21) and
//! pinmux-path cases (12 through 15).

use super::{fallible, label, require, run};
use pincheck_backend::{ConfigKind, Direction, PinctrlBackend};
use pincheck_types::{CaseOutcome, TestParameters};
use tracing::debug;

const DEBOUNCE_TEST_US: u32 = 0x11;

/// Case 6: a free line can be claimed, and released again.
pub(crate) fn request_free(backend: &dyn PinctrlBackend, params: &TestParameters) -> CaseOutcome {
    run(|| {
        let pin = params.gpio_index;
        debug!(pin = %label(pin), "line request/free");
        let _ = backend.free_line(pin);
        require("claim line", backend.request_line(pin))?;
        fallible(backend.free_line(pin))?;
        Ok(CaseOutcome::Confirmed)
    })
}

/// Case 7: claiming an already-claimed line must be rejected. The
/// harness only detects whether the backend enforces single-owner
/// semantics; it never enforces them itself.
pub(crate) fn repeat_request(backend: &dyn PinctrlBackend, params: &TestParameters) -> CaseOutcome {
    run(|| {
        let pin = params.gpio_index;
        let _ = backend.free_line(pin);
        require("first claim", backend.request_line(pin))?;
        let second = backend.request_line(pin);
        let _ = backend.free_line(pin);
        match second {
            Err(err) => {
                debug!(pin = %label(pin), %err, "repeat claim rejected");
                Ok(CaseOutcome::Confirmed)
            }
            Ok(()) => Ok(CaseOutcome::violated(
                "repeat claim of a held line was accepted",
            )),
        }
    })
}

/// Case 8: direction and value changes propagate to the observable
/// configuration: input reads back function 0, output reads back
/// function 1 with the data register tracking the written bit.
pub(crate) fn value_suite(backend: &dyn PinctrlBackend, params: &TestParameters) -> CaseOutcome {
    run(|| {
        let pin = params.gpio_index;
        let _ = backend.free_line(pin);
        require("claim line", backend.request_line(pin))?;
        let outcome = run(|| value_suite_checks(backend, pin));
        let _ = backend.free_line(pin);
        Ok(outcome)
    })
}

fn value_suite_checks(backend: &dyn PinctrlBackend, pin: u32) -> Result<CaseOutcome, CaseOutcome> {
    debug!(pin = %label(pin), "direction input");
    require("set direction input", backend.set_direction(pin, Direction::Input))?;
    let func = fallible(backend.get_config(pin, ConfigKind::Function))?;
    if func != 0 {
        return Ok(CaseOutcome::violated(format!(
            "function reads {} after direction-input, expected 0",
            func
        )));
    }

    debug!(pin = %label(pin), "direction output, level 1");
    require(
        "set direction output",
        backend.set_direction(pin, Direction::Output(1)),
    )?;
    let func = fallible(backend.get_config(pin, ConfigKind::Function))?;
    if func != 1 {
        return Ok(CaseOutcome::violated(format!(
            "function reads {} after direction-output, expected 1",
            func
        )));
    }
    let data = fallible(backend.get_config(pin, ConfigKind::Data))?;
    if data != 1 {
        return Ok(CaseOutcome::violated(format!(
            "data reads {} after output(1), expected 1",
            data
        )));
    }

    require(
        "set direction output low",
        backend.set_direction(pin, Direction::Output(0)),
    )?;
    let data = fallible(backend.get_config(pin, ConfigKind::Data))?;
    if data != 0 {
        return Ok(CaseOutcome::violated(format!(
            "data reads {} after output(0), expected 0",
            data
        )));
    }

    debug!(pin = %label(pin), "level write/read");
    for level in [1, 0] {
        require("write level", backend.write_level(pin, level))?;
        let read = fallible(backend.read_level(pin))?;
        if read != level {
            return Ok(CaseOutcome::violated(format!(
                "level reads {} after write of {}",
                read, level
            )));
        }
    }
    Ok(CaseOutcome::Confirmed)
}

/// Case 12: the pinmux path can claim a free line.
pub(crate) fn mux_request(backend: &dyn PinctrlBackend, params: &TestParameters) -> CaseOutcome {
    run(|| {
        let pin = params.gpio_index;
        let _ = backend.mux_free_line(pin);
        require("mux claim line", backend.mux_request_line(pin))?;
        fallible(backend.mux_free_line(pin))?;
        Ok(CaseOutcome::Confirmed)
    })
}

/// Case 13: releasing a mux claim actually returns ownership, so the
/// same line can be claimed again afterwards.
pub(crate) fn mux_free(backend: &dyn PinctrlBackend, params: &TestParameters) -> CaseOutcome {
    run(|| {
        let pin = params.gpio_index;
        let _ = backend.mux_free_line(pin);
        require("first mux claim", backend.mux_request_line(pin))?;
        fallible(backend.mux_free_line(pin))?;
        let second = backend.mux_request_line(pin);
        let _ = backend.mux_free_line(pin);
        match second {
            Ok(()) => Ok(CaseOutcome::Confirmed),
            Err(err) => Ok(CaseOutcome::violated(format!(
                "line not claimable after release: {}",
                err
            ))),
        }
    })
}

/// Case 14: mux-path direction input parks the line at function 0.
pub(crate) fn mux_direction_input(
    backend: &dyn PinctrlBackend,
    params: &TestParameters,
) -> CaseOutcome {
    run(|| {
        let pin = params.gpio_index;
        let _ = backend.mux_free_line(pin);
        require("mux claim line", backend.mux_request_line(pin))?;
        let outcome = run(|| {
            require("set direction input", backend.mux_direction_input(pin))?;
            let func = fallible(backend.get_config(pin, ConfigKind::Function))?;
            if func != 0 {
                return Ok(CaseOutcome::violated(format!(
                    "function reads {} after direction-input, expected 0",
                    func
                )));
            }
            Ok(CaseOutcome::Confirmed)
        });
        let _ = backend.mux_free_line(pin);
        Ok(outcome)
    })
}

/// Case 15: mux-path direction output parks the line at function 1.
pub(crate) fn mux_direction_output(
    backend: &dyn PinctrlBackend,
    params: &TestParameters,
) -> CaseOutcome {
    run(|| {
        let pin = params.gpio_index;
        let _ = backend.mux_free_line(pin);
        require("mux claim line", backend.mux_request_line(pin))?;
        let outcome = run(|| {
            require("set direction output", backend.mux_direction_output(pin))?;
            let func = fallible(backend.get_config(pin, ConfigKind::Function))?;
            if func != 1 {
                return Ok(CaseOutcome::violated(format!(
                    "function reads {} after direction-output, expected 1",
                    func
                )));
            }
            Ok(CaseOutcome::Confirmed)
        });
        let _ = backend.mux_free_line(pin);
        Ok(outcome)
    })
}

/// Case 21: a claimed line accepts a debounce interval.
pub(crate) fn set_debounce(backend: &dyn PinctrlBackend, params: &TestParameters) -> CaseOutcome {
    run(|| {
        let pin = params.gpio_index;
        let _ = backend.free_line(pin);
        require("claim line", backend.request_line(pin))?;
        let result = backend.set_debounce(pin, DEBOUNCE_TEST_US);
        let _ = backend.free_line(pin);
        require("set debounce", result)?;
        Ok(CaseOutcome::Confirmed)
    })
}
