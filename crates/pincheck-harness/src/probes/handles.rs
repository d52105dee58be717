//! Device pin-group handle probes (cases 0, 1, 16 through 20).
//!
//! These exercise the whole-device acquisition path: claiming every pin a
//! device owns in the boot configuration, exclusivity of that claim, named
//! state lookup/selection, and release returning the group to the pool.
//! Handles are released best-effort on every exit path so the harness
//! stays dispatchable after a failure.

use super::{fallible, require, run};
use pincheck_backend::{ConfigKind, HandleId, PinctrlBackend};
use pincheck_types::{CaseOutcome, TestParameters};
use tracing::{debug, warn};

/// Case 0: acquiring a device's pin group applies its firmware
/// configuration; every assignment must be observable through the
/// configuration registers afterwards.
pub(crate) fn request_all_device_pins(
    backend: &dyn PinctrlBackend,
    params: &TestParameters,
) -> CaseOutcome {
    run(|| {
        let device = params.device_name.as_str();
        debug!(device, "acquiring device pin group");
        let handle = require("acquire device pin group", backend.acquire_device_pins(device))?;
        let outcome = run(|| verify_group_config(backend, device));
        let _ = backend.release_handle(handle);
        Ok(outcome)
    })
}

fn verify_group_config(
    backend: &dyn PinctrlBackend,
    device: &str,
) -> Result<CaseOutcome, CaseOutcome> {
    let assignments = fallible(backend.device_pin_list(device))?;
    if assignments.is_empty() {
        return Ok(CaseOutcome::violated("device owns no pin resources"));
    }
    for assignment in &assignments {
        let pin = assignment.index;
        let function = fallible(backend.get_config(pin, ConfigKind::Function))?;
        if function != assignment.function {
            return Ok(CaseOutcome::violated(format!(
                "pin {} function {} does not match firmware value {}",
                pin, function, assignment.function
            )));
        }
        let expectations = [
            (ConfigKind::Pull, assignment.pull),
            (ConfigKind::DriveLevel, assignment.drive),
            (ConfigKind::Data, assignment.data),
        ];
        for (kind, expected) in expectations {
            let Some(expected) = expected else { continue };
            let observed = fallible(backend.get_config(pin, kind))?;
            if observed != expected {
                return Ok(CaseOutcome::violated(format!(
                    "pin {} {} {} does not match firmware value {}",
                    pin, kind, observed, expected
                )));
            }
        }
    }
    Ok(CaseOutcome::Confirmed)
}

/// Case 1: a second acquisition of a held device pin group must be
/// rejected.
pub(crate) fn re_request_device_pins(
    backend: &dyn PinctrlBackend,
    params: &TestParameters,
) -> CaseOutcome {
    run(|| {
        let device = params.device_name.as_str();
        let first = require("first acquisition", backend.acquire_device_pins(device))?;
        let second = backend.acquire_device_pins(device);
        let outcome = match second {
            Err(err) => {
                debug!(device, %err, "second acquisition rejected");
                CaseOutcome::Confirmed
            }
            Ok(extra) => {
                warn!(device, "second acquisition of a held pin group succeeded");
                let _ = backend.release_handle(extra);
                CaseOutcome::violated("second acquisition of a held device pin group was accepted")
            }
        };
        let _ = backend.release_handle(first);
        Ok(outcome)
    })
}

/// Case 16: an acquired handle identifies the device it was acquired for.
pub(crate) fn acquire(backend: &dyn PinctrlBackend, params: &TestParameters) -> CaseOutcome {
    run(|| {
        let device = params.device_name.as_str();
        let handle = require("acquire device pin group", backend.acquire_device_pins(device))?;
        let reported = backend.handle_device_name(handle);
        let _ = backend.release_handle(handle);
        let reported = fallible(reported)?;
        if reported != device {
            return Ok(CaseOutcome::violated(format!(
                "handle reports device `{}`, expected `{}`",
                reported, device
            )));
        }
        Ok(CaseOutcome::Confirmed)
    })
}

/// Case 17: the default named state resolves on a fresh handle.
pub(crate) fn lookup_state(backend: &dyn PinctrlBackend, params: &TestParameters) -> CaseOutcome {
    run(|| {
        let device = params.device_name.as_str();
        let handle = require("acquire device pin group", backend.acquire_device_pins(device))?;
        let state = backend.lookup_named_state(handle, "default");
        let _ = backend.release_handle(handle);
        require("lookup state `default`", state)?;
        Ok(CaseOutcome::Confirmed)
    })
}

/// Case 18: the default state can be looked up and selected.
pub(crate) fn select_state(backend: &dyn PinctrlBackend, params: &TestParameters) -> CaseOutcome {
    run(|| {
        let device = params.device_name.as_str();
        let handle = require("acquire device pin group", backend.acquire_device_pins(device))?;
        let outcome = run(|| {
            let state = require(
                "lookup state `default`",
                backend.lookup_named_state(handle, "default"),
            )?;
            require("select state `default`", backend.select_state(handle, state))?;
            Ok(CaseOutcome::Confirmed)
        });
        let _ = backend.release_handle(handle);
        Ok(outcome)
    })
}

/// Case 19: releasing a handle returns ownership, so the same device
/// can be acquired again afterwards.
pub(crate) fn release_reacquire(
    backend: &dyn PinctrlBackend,
    params: &TestParameters,
) -> CaseOutcome {
    run(|| {
        let device = params.device_name.as_str();
        let first = require("first acquisition", backend.acquire_device_pins(device))?;
        require("release", backend.release_handle(first))?;
        match backend.acquire_device_pins(device) {
            Ok(again) => {
                let _ = backend.release_handle(again);
                Ok(CaseOutcome::Confirmed)
            }
            Err(err) => Ok(CaseOutcome::violated(format!(
                "device not acquirable after release: {}",
                err
            ))),
        }
    })
}

/// Owned wrapper that releases its pin group when dropped.
struct ScopedGroup<'a> {
    backend: &'a dyn PinctrlBackend,
    handle: HandleId,
}

impl Drop for ScopedGroup<'_> {
    fn drop(&mut self) {
        let _ = self.backend.release_handle(self.handle);
    }
}

/// Case 20: the scoped acquisition path. Release happens when the owner
/// goes out of scope, and the group is acquirable again afterwards.
pub(crate) fn scoped_cycle(backend: &dyn PinctrlBackend, params: &TestParameters) -> CaseOutcome {
    run(|| {
        let device = params.device_name.as_str();
        {
            let handle = require("scoped acquisition", backend.acquire_device_pins(device))?;
            let _scoped = ScopedGroup { backend, handle };
        }
        match backend.acquire_device_pins(device) {
            Ok(again) => {
                let _ = backend.release_handle(again);
                Ok(CaseOutcome::Confirmed)
            }
            Err(err) => Ok(CaseOutcome::violated(format!(
                "device not acquirable after scoped release: {}",
                err
            ))),
        }
    })
}
