//! Test parameter store.
//!
//! Holds the process-wide [`TestParameters`] record. Writes arrive as text
//! from the control surface and are validated before anything is
//! committed; a rejected write leaves the store exactly as it was.

use pincheck_types::{TestParameters, DEV_NAME_MAX_LEN};
use thiserror::Error;

/// One settable field of the parameter record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    GpioIndex,
    FunctionCode,
    DataBit,
    DriveLevel,
    PullMode,
    TriggerMode,
    DeviceName,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GpioIndex => "gpio_index",
            Self::FunctionCode => "function_code",
            Self::DataBit => "data_bit",
            Self::DriveLevel => "drive_level",
            Self::PullMode => "pull_mode",
            Self::TriggerMode => "trigger_mode",
            Self::DeviceName => "device_name",
        }
    }
}

/// Rejected parameter writes. The store is unchanged whenever one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("`{value}` is not a well-formed non-negative integer for {field}")]
    Encoding { field: &'static str, value: String },

    #[error("{field} value {value} is outside its domain")]
    OutOfRange { field: &'static str, value: u32 },

    #[error("device name is {len} bytes, limit is {limit}")]
    NameTooLong { len: usize, limit: usize },
}

/// The mutable parameter record with validating setters.
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    params: TestParameters,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> &TestParameters {
        &self.params
    }

    /// Snapshot for a dispatch. Routines read the snapshot, never the
    /// live store.
    pub fn snapshot(&self) -> TestParameters {
        self.params.clone()
    }

    /// Parse and commit one field from its textual encoding.
    pub fn set_field(&mut self, field: Field, text: &str) -> Result<(), ParamError> {
        let text = text.trim();
        if field == Field::DeviceName {
            if text.len() > DEV_NAME_MAX_LEN {
                return Err(ParamError::NameTooLong {
                    len: text.len(),
                    limit: DEV_NAME_MAX_LEN,
                });
            }
            self.params.device_name = text.to_string();
            return Ok(());
        }

        let value: u32 = text.parse().map_err(|_| ParamError::Encoding {
            field: field.name(),
            value: text.to_string(),
        })?;
        match field {
            Field::GpioIndex => self.params.gpio_index = value,
            Field::FunctionCode => self.params.function_code = value,
            Field::DataBit => {
                if value > 1 {
                    return Err(ParamError::OutOfRange {
                        field: field.name(),
                        value,
                    });
                }
                self.params.data_bit = value;
            }
            Field::DriveLevel => self.params.drive_level = value,
            Field::PullMode => self.params.pull_mode = value,
            Field::TriggerMode => self.params.trigger_mode = value,
            Field::DeviceName => unreachable!("handled above"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_fields_parse_decimal_text() {
        let mut store = ParameterStore::new();
        store.set_field(Field::GpioIndex, "161").unwrap();
        store.set_field(Field::FunctionCode, " 2\n").unwrap();
        assert_eq!(store.get().gpio_index, 161);
        assert_eq!(store.get().function_code, 2);
    }

    #[test]
    fn malformed_text_leaves_store_unchanged() {
        let mut store = ParameterStore::new();
        store.set_field(Field::PullMode, "1").unwrap();
        let err = store.set_field(Field::PullMode, "up").unwrap_err();
        assert!(matches!(err, ParamError::Encoding { .. }));
        assert_eq!(store.get().pull_mode, 1);

        let err = store.set_field(Field::PullMode, "-1").unwrap_err();
        assert!(matches!(err, ParamError::Encoding { .. }));
        assert_eq!(store.get().pull_mode, 1);
    }

    #[test]
    fn data_bit_domain_is_zero_or_one() {
        let mut store = ParameterStore::new();
        store.set_field(Field::DataBit, "1").unwrap();
        let err = store.set_field(Field::DataBit, "2").unwrap_err();
        assert!(matches!(err, ParamError::OutOfRange { .. }));
        assert_eq!(store.get().data_bit, 1);
    }

    #[test]
    fn device_name_over_limit_is_rejected_not_truncated() {
        let mut store = ParameterStore::new();
        store.set_field(Field::DeviceName, "mmc0_para").unwrap();
        let long = "a".repeat(DEV_NAME_MAX_LEN + 1);
        let err = store.set_field(Field::DeviceName, &long).unwrap_err();
        assert!(matches!(err, ParamError::NameTooLong { .. }));
        assert_eq!(store.get().device_name, "mmc0_para");
    }

    #[test]
    fn device_name_at_limit_is_accepted() {
        let mut store = ParameterStore::new();
        let exact = "b".repeat(DEV_NAME_MAX_LEN);
        store.set_field(Field::DeviceName, &exact).unwrap();
        assert_eq!(store.get().device_name, exact);
    }

    #[test]
    fn snapshot_is_detached_from_later_writes() {
        let mut store = ParameterStore::new();
        store.set_field(Field::GpioIndex, "7").unwrap();
        let snap = store.snapshot();
        store.set_field(Field::GpioIndex, "9").unwrap();
        assert_eq!(snap.gpio_index, 7);
        assert_eq!(store.get().gpio_index, 9);
    }
}
