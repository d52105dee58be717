//! Boot-configuration store probe (case 9).
//!
//! Checks the firmware key/value store against the canonical platform
//! fixture: typed integer keys, pin-typed keys, pin-list extraction and
//! string keys must all resolve to the values the firmware ships with.

use super::{fallible, require, run};
use pincheck_backend::{BootValue, PinctrlBackend};
use pincheck_types::{CaseOutcome, TestParameters};
use tracing::debug;

const CARD_SECTION: &str = "card0_boot_para";
const CARD_PIN_COUNT: usize = 6;
const PRODUCT_SECTION: &str = "product";
const MACHINE_NAME: &str = "evb";

pub(crate) fn lookup(backend: &dyn PinctrlBackend, _params: &TestParameters) -> CaseOutcome {
    run(|| {
        debug!(section = CARD_SECTION, "boot-config lookup");

        let card_ctrl = require(
            "lookup card_ctrl",
            backend.boot_value(CARD_SECTION, "card_ctrl"),
        )?;
        match card_ctrl {
            BootValue::Int(0) => {}
            BootValue::Int(other) => {
                return Ok(CaseOutcome::violated(format!(
                    "card_ctrl reads {}, expected 0",
                    other
                )));
            }
            _ => return Ok(CaseOutcome::violated("card_ctrl is not integer-typed")),
        }

        let sdc_d3 = require("lookup sdc_d3", backend.boot_value(CARD_SECTION, "sdc_d3"))?;
        if !matches!(sdc_d3, BootValue::Pin(_)) {
            return Ok(CaseOutcome::violated("sdc_d3 is not pin-typed"));
        }

        let pins = fallible(backend.device_pin_list(CARD_SECTION))?;
        if pins.len() != CARD_PIN_COUNT {
            return Ok(CaseOutcome::violated(format!(
                "{} lists {} pins, expected {}",
                CARD_SECTION,
                pins.len(),
                CARD_PIN_COUNT
            )));
        }

        let machine = require(
            "lookup machine",
            backend.boot_value(PRODUCT_SECTION, "machine"),
        )?;
        match machine {
            BootValue::Str(name) if name == MACHINE_NAME => Ok(CaseOutcome::Confirmed),
            BootValue::Str(name) => Ok(CaseOutcome::violated(format!(
                "machine reads `{}`, expected `{}`",
                name, MACHINE_NAME
            ))),
            _ => Ok(CaseOutcome::violated("machine is not string-typed")),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pincheck_backend::{BootConfig, SimBackend};

    #[test]
    fn fixture_store_confirms() {
        let sim = SimBackend::new();
        assert!(lookup(&sim, &TestParameters::default()).is_confirmed());
    }

    #[test]
    fn missing_keys_are_violations() {
        let sim = SimBackend::with_boot_config(BootConfig::new());
        match lookup(&sim, &TestParameters::default()) {
            CaseOutcome::Violated(reason) => assert!(reason.starts_with("lookup card_ctrl")),
            other => panic!("expected violation, got {:?}", other),
        }
    }

    #[test]
    fn wrong_machine_name_is_a_violation() {
        let boot = BootConfig::fixture();
        // Shadow the fixture value; lookups return the first match.
        let mut altered = BootConfig::new();
        altered.insert(CARD_SECTION, "card_ctrl", BootValue::Int(0));
        for entry in ["sdc_d1", "sdc_d0", "sdc_clk", "sdc_cmd", "sdc_d3", "sdc_d2"] {
            if let Some(BootValue::Pin(pin)) = boot.value(CARD_SECTION, entry).cloned() {
                altered.insert(CARD_SECTION, entry, BootValue::Pin(pin));
            }
        }
        altered.insert(PRODUCT_SECTION, "machine", BootValue::Str("perf".into()));
        let sim = SimBackend::with_boot_config(altered);
        match lookup(&sim, &TestParameters::default()) {
            CaseOutcome::Violated(reason) => assert!(reason.contains("machine")),
            other => panic!("expected violation, got {:?}", other),
        }
    }
}
