//! Operator-facing attribute surface.
//!
//! The harness is driven through a small set of named read/write
//! attributes: the parameter fields, `exec` (write a case id to dispatch
//! it), and `test_result` (read the verdict of the most recently
//! dispatched case, numerically encoded). One static descriptor table
//! drives a single generic read/write dispatcher instead of one handler
//! pair per attribute.
//!
//! A [`Control`] wraps one [`Harness`] and takes `&mut self` on writes:
//! external callers serialize, keeping one in-flight test at a time.

#![deny(unsafe_code)]

use pincheck_backend::pin_name;
use pincheck_harness::{DispatchError, Field, Harness, ParamError};
use thiserror::Error;

/// Errors surfaced to the external operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("unknown attribute `{0}`")]
    UnknownAttribute(String),

    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("`{0}` is not a well-formed case id")]
    CaseIdEncoding(String),
}

/// One named attribute: how to render it and how to apply a write.
struct AttrDescriptor {
    name: &'static str,
    read: fn(&Harness) -> String,
    write: fn(&mut Harness, &str) -> Result<(), ControlError>,
}

// Descriptor bodies are plain fns so the table stays `static`.
fn write_gpio_index(h: &mut Harness, text: &str) -> Result<(), ControlError> {
    Ok(h.set_param(Field::GpioIndex, text)?)
}
fn write_funcs(h: &mut Harness, text: &str) -> Result<(), ControlError> {
    Ok(h.set_param(Field::FunctionCode, text)?)
}
fn write_dat(h: &mut Harness, text: &str) -> Result<(), ControlError> {
    Ok(h.set_param(Field::DataBit, text)?)
}
fn write_dlevel(h: &mut Harness, text: &str) -> Result<(), ControlError> {
    Ok(h.set_param(Field::DriveLevel, text)?)
}
fn write_pul(h: &mut Harness, text: &str) -> Result<(), ControlError> {
    Ok(h.set_param(Field::PullMode, text)?)
}
fn write_trigger(h: &mut Harness, text: &str) -> Result<(), ControlError> {
    Ok(h.set_param(Field::TriggerMode, text)?)
}
fn write_dev_name(h: &mut Harness, text: &str) -> Result<(), ControlError> {
    Ok(h.set_param(Field::DeviceName, text)?)
}

fn write_exec(h: &mut Harness, text: &str) -> Result<(), ControlError> {
    let raw: usize = text
        .trim()
        .parse()
        .map_err(|_| ControlError::CaseIdEncoding(text.trim().to_string()))?;
    h.dispatch(raw)?;
    Ok(())
}

/// Writes to `test_result` are accepted and discarded.
fn write_test_result(_h: &mut Harness, _text: &str) -> Result<(), ControlError> {
    Ok(())
}

fn read_gpio_index(h: &Harness) -> String {
    let index = h.params().gpio_index;
    pin_name(index).unwrap_or_else(|| index.to_string())
}
fn read_funcs(h: &Harness) -> String {
    h.params().function_code.to_string()
}
fn read_dat(h: &Harness) -> String {
    h.params().data_bit.to_string()
}
fn read_dlevel(h: &Harness) -> String {
    h.params().drive_level.to_string()
}
fn read_pul(h: &Harness) -> String {
    h.params().pull_mode.to_string()
}
fn read_trigger(h: &Harness) -> String {
    h.params().trigger_mode.to_string()
}
fn read_dev_name(h: &Harness) -> String {
    h.params().device_name.clone()
}
fn read_exec(h: &Harness) -> String {
    match h.last_dispatched() {
        Some(id) => id.to_string(),
        None => "none".to_string(),
    }
}
fn read_test_result(h: &Harness) -> String {
    h.last_result().code().to_string()
}

static ATTRIBUTES: &[AttrDescriptor] = &[
    AttrDescriptor { name: "exec", read: read_exec, write: write_exec },
    AttrDescriptor { name: "gpio_index", read: read_gpio_index, write: write_gpio_index },
    AttrDescriptor { name: "funcs", read: read_funcs, write: write_funcs },
    AttrDescriptor { name: "dat", read: read_dat, write: write_dat },
    AttrDescriptor { name: "dlevel", read: read_dlevel, write: write_dlevel },
    AttrDescriptor { name: "pul", read: read_pul, write: write_pul },
    AttrDescriptor { name: "trigger", read: read_trigger, write: write_trigger },
    AttrDescriptor { name: "test_result", read: read_test_result, write: write_test_result },
    AttrDescriptor { name: "dev_name", read: read_dev_name, write: write_dev_name },
];

/// The control surface over one harness instance.
pub struct Control {
    harness: Harness,
}

impl Control {
    pub fn new(harness: Harness) -> Self {
        Self { harness }
    }

    /// Attribute names, in surface order.
    pub fn attribute_names() -> Vec<&'static str> {
        ATTRIBUTES.iter().map(|attr| attr.name).collect()
    }

    fn descriptor(name: &str) -> Result<&'static AttrDescriptor, ControlError> {
        ATTRIBUTES
            .iter()
            .find(|attr| attr.name == name)
            .ok_or_else(|| ControlError::UnknownAttribute(name.to_string()))
    }

    pub fn read(&self, name: &str) -> Result<String, ControlError> {
        Ok((Self::descriptor(name)?.read)(&self.harness))
    }

    pub fn write(&mut self, name: &str, value: &str) -> Result<(), ControlError> {
        (Self::descriptor(name)?.write)(&mut self.harness, value)
    }

    pub fn harness(&self) -> &Harness {
        &self.harness
    }

    pub fn harness_mut(&mut self) -> &mut Harness {
        &mut self.harness
    }
}
