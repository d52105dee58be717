//! Capability backend boundary for the pincheck harness.
//!
//! The harness never talks to pin hardware directly; it goes through the
//! [`PinctrlBackend`] trait, which models the platform driver surface:
//! per-pin configuration registers, the GPIO line allocator, the pinmux
//! ownership path, interrupt binding, device-level pin-group handles with
//! named states, and the firmware boot-configuration store.
//!
//! [`SimBackend`] is the in-memory implementation used by the CLI and the
//! test suite. Real-hardware backends implement the same trait.

#![deny(unsafe_code)]

pub mod boot;
pub mod error;
pub mod sim;
mod types;

pub use boot::{BootConfig, BootValue, PinAssignment};
pub use error::{BackendError, BackendResult};
pub use sim::SimBackend;
pub use types::{
    pin_name, ConfigKind, Direction, HandleId, StateId, TriggerMode, BANK_COUNT, IRQ_BASE,
    PINS_PER_BANK, PIN_SPACE,
};

/// The capability surface the harness exercises.
///
/// Every call is fallible and synchronous; implementations are expected to
/// be bounded-latency. Methods take `&self`: implementations guard their
/// own state, the harness serializes dispatches externally.
pub trait PinctrlBackend: Send + Sync {
    // Pin configuration registers.
    fn get_config(&self, pin: u32, kind: ConfigKind) -> BackendResult<u32>;
    fn set_config(&self, pin: u32, kind: ConfigKind, value: u32) -> BackendResult<()>;

    // GPIO line allocator path.
    fn request_line(&self, index: u32) -> BackendResult<()>;
    /// Release a line. Releasing an unclaimed line is a no-op, so probes
    /// can reset state before acquiring.
    fn free_line(&self, index: u32) -> BackendResult<()>;
    fn set_direction(&self, index: u32, direction: Direction) -> BackendResult<()>;
    fn read_level(&self, index: u32) -> BackendResult<u32>;
    fn write_level(&self, index: u32, level: u32) -> BackendResult<()>;
    fn set_debounce(&self, index: u32, micros: u32) -> BackendResult<()>;

    // Pinmux ownership path. Same single-owner table as the allocator
    // path, but direction changes carry no data bit here.
    fn mux_request_line(&self, index: u32) -> BackendResult<()>;
    fn mux_free_line(&self, index: u32) -> BackendResult<()>;
    fn mux_direction_input(&self, index: u32) -> BackendResult<()>;
    fn mux_direction_output(&self, index: u32) -> BackendResult<()>;

    // Interrupt lines.
    fn map_to_interrupt(&self, index: u32) -> BackendResult<u32>;
    fn request_interrupt(&self, irq: u32, trigger: TriggerMode, label: &str) -> BackendResult<()>;
    fn free_interrupt(&self, irq: u32) -> BackendResult<()>;

    // Device pin-group handles.
    fn acquire_device_pins(&self, device: &str) -> BackendResult<HandleId>;
    fn release_handle(&self, handle: HandleId) -> BackendResult<()>;
    fn handle_device_name(&self, handle: HandleId) -> BackendResult<String>;
    fn lookup_named_state(&self, handle: HandleId, name: &str) -> BackendResult<StateId>;
    fn select_state(&self, handle: HandleId, state: StateId) -> BackendResult<()>;

    // Firmware boot-configuration store.
    fn boot_value(&self, main_key: &str, sub_key: &str) -> BackendResult<BootValue>;
    fn device_pin_list(&self, main_key: &str) -> BackendResult<Vec<PinAssignment>>;
}
