//! Boot-configuration key/value store.
//!
//! Mirrors the platform's firmware-provided configuration: named device
//! sections holding integer keys, string keys and pin assignments. The
//! harness only reads this store; the simulator seeds it with a canonical
//! fixture that the boot-config probe checks against.

use serde::{Deserialize, Serialize};

/// A pin entry inside a device section: which line, which mux function,
/// and optional pull/drive/data overrides. `None` means the firmware left
/// the field at its hardware default, and acquisition does not touch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinAssignment {
    pub index: u32,
    pub function: u32,
    pub pull: Option<u32>,
    pub drive: Option<u32>,
    pub data: Option<u32>,
}

impl PinAssignment {
    pub fn new(index: u32, function: u32) -> Self {
        Self {
            index,
            function,
            pull: None,
            drive: None,
            data: None,
        }
    }

    pub fn with_pull(mut self, pull: u32) -> Self {
        self.pull = Some(pull);
        self
    }

    pub fn with_drive(mut self, drive: u32) -> Self {
        self.drive = Some(drive);
        self
    }

    pub fn with_data(mut self, data: u32) -> Self {
        self.data = Some(data);
        self
    }
}

/// A typed value under a `main_key.sub_key` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BootValue {
    Int(u32),
    Str(String),
    Pin(PinAssignment),
}

/// The full boot-configuration table. Sections and keys keep their
/// insertion order so pin lists come back in firmware order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootConfig {
    sections: Vec<(String, Vec<(String, BootValue)>)>,
}

impl BootConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, creating the section on first use.
    pub fn insert(&mut self, main_key: &str, sub_key: &str, value: BootValue) {
        match self.sections.iter_mut().find(|(name, _)| name == main_key) {
            Some((_, entries)) => entries.push((sub_key.to_string(), value)),
            None => self
                .sections
                .push((main_key.to_string(), vec![(sub_key.to_string(), value)])),
        }
    }

    pub fn has_section(&self, main_key: &str) -> bool {
        self.sections.iter().any(|(name, _)| name == main_key)
    }

    pub fn value(&self, main_key: &str, sub_key: &str) -> Option<&BootValue> {
        self.sections
            .iter()
            .find(|(name, _)| name == main_key)?
            .1
            .iter()
            .find(|(key, _)| key == sub_key)
            .map(|(_, value)| value)
    }

    /// All pin assignments of a section, in firmware order.
    /// `None` when the section itself is absent.
    pub fn pin_list(&self, main_key: &str) -> Option<Vec<PinAssignment>> {
        let (_, entries) = self.sections.iter().find(|(name, _)| name == main_key)?;
        Some(
            entries
                .iter()
                .filter_map(|(_, value)| match value {
                    BootValue::Pin(assignment) => Some(assignment.clone()),
                    _ => None,
                })
                .collect(),
        )
    }

    /// The canonical fixture the simulator boots with. Bank F starts at
    /// line 160, so sdc_d1..sdc_d2 sit on PF0..PF5; mmc0_para adds a
    /// card-detect pin on PA8.
    pub fn fixture() -> Self {
        let mut cfg = Self::new();

        cfg.insert("card0_boot_para", "card_ctrl", BootValue::Int(0));
        cfg.insert("card0_boot_para", "card_high_speed", BootValue::Int(1));
        cfg.insert("card0_boot_para", "card_line", BootValue::Int(4));
        for (sub, line) in [
            ("sdc_d1", 160),
            ("sdc_d0", 161),
            ("sdc_clk", 162),
            ("sdc_cmd", 163),
            ("sdc_d3", 164),
            ("sdc_d2", 165),
        ] {
            cfg.insert(
                "card0_boot_para",
                sub,
                BootValue::Pin(PinAssignment::new(line, 2).with_pull(1)),
            );
        }

        cfg.insert("product", "version", BootValue::Str("100".into()));
        cfg.insert("product", "machine", BootValue::Str("evb".into()));

        cfg.insert("mmc0_para", "sdc_used", BootValue::Int(1));
        cfg.insert("mmc0_para", "sdc_detmode", BootValue::Int(2));
        cfg.insert("mmc0_para", "sdc_buswidth", BootValue::Int(4));
        for (sub, line) in [
            ("sdc_clk", 162),
            ("sdc_cmd", 163),
            ("sdc_d0", 161),
            ("sdc_d1", 160),
            ("sdc_d2", 165),
            ("sdc_d3", 164),
        ] {
            cfg.insert(
                "mmc0_para",
                sub,
                BootValue::Pin(PinAssignment::new(line, 2).with_pull(1)),
            );
        }
        cfg.insert(
            "mmc0_para",
            "sdc_det",
            BootValue::Pin(PinAssignment::new(8, 6).with_pull(1)),
        );

        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_has_expected_card0_shape() {
        let cfg = BootConfig::fixture();
        assert_eq!(
            cfg.value("card0_boot_para", "card_ctrl"),
            Some(&BootValue::Int(0))
        );
        assert!(matches!(
            cfg.value("card0_boot_para", "sdc_d3"),
            Some(BootValue::Pin(_))
        ));
        assert_eq!(cfg.pin_list("card0_boot_para").unwrap().len(), 6);
    }

    #[test]
    fn fixture_machine_string() {
        let cfg = BootConfig::fixture();
        assert_eq!(
            cfg.value("product", "machine"),
            Some(&BootValue::Str("evb".into()))
        );
    }

    #[test]
    fn mmc0_pin_list_keeps_firmware_order() {
        let cfg = BootConfig::fixture();
        let pins = cfg.pin_list("mmc0_para").unwrap();
        assert_eq!(pins.len(), 7);
        assert_eq!(pins[0].index, 162);
        assert_eq!(pins[6].index, 8);
        assert_eq!(pins[6].function, 6);
    }

    #[test]
    fn missing_section_is_none() {
        let cfg = BootConfig::fixture();
        assert!(cfg.pin_list("lcd0_para").is_none());
        assert!(cfg.value("lcd0_para", "lcd_power").is_none());
    }
}
