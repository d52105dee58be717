//! Backend vocabulary: configuration kinds, directions, triggers and
//! pin naming.

use crate::error::BackendError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of pin banks the platform exposes (banks A through H).
pub const BANK_COUNT: u32 = 8;

/// Lines per bank.
pub const PINS_PER_BANK: u32 = 32;

/// Total addressable pin space.
pub const PIN_SPACE: u32 = BANK_COUNT * PINS_PER_BANK;

/// First interrupt number handed out by `map_to_interrupt`.
pub const IRQ_BASE: u32 = 32;

/// One facet of a pin's packed configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigKind {
    Function,
    Data,
    Pull,
    DriveLevel,
}

impl ConfigKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Data => "data",
            Self::Pull => "pull",
            Self::DriveLevel => "drive-level",
        }
    }
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Requested line direction. Output carries the initial data bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output(u32),
}

/// Interrupt trigger selector, keyed by the `trigger` test parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerMode {
    LowLevel,
    HighLevel,
    RisingEdge,
    FallingEdge,
    BothEdges,
}

impl TryFrom<u32> for TriggerMode {
    type Error = BackendError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::LowLevel),
            1 => Ok(Self::HighLevel),
            2 => Ok(Self::RisingEdge),
            3 => Ok(Self::FallingEdge),
            4 => Ok(Self::BothEdges),
            other => Err(BackendError::InvalidValue {
                kind: "trigger",
                value: other,
            }),
        }
    }
}

/// Opaque token for an acquired device pin group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandleId(pub u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque token for a named configuration state of a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateId(pub usize);

/// Format a global line index as a bank-relative pin name ("PF1").
/// Returns `None` outside the addressable pin space.
pub fn pin_name(index: u32) -> Option<String> {
    if index >= PIN_SPACE {
        return None;
    }
    let bank = (b'A' + (index / PINS_PER_BANK) as u8) as char;
    Some(format!("P{}{}", bank, index % PINS_PER_BANK))
}
