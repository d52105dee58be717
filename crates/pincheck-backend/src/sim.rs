//! In-memory backend simulator.
//!
//! Models the observable behavior the harness probes for: per-pin
//! configuration registers, a single-owner claim table shared by the line
//! allocator and pinmux paths, exclusive interrupt binding, and device
//! handles that claim a firmware pin group and apply its default state.
//!
//! The simulator enforces single-owner semantics by default;
//! [`SimBackend::permit_double_claim`] disables that enforcement so the
//! harness's negative cases can be observed failing against a backend
//! that does not uphold exclusivity.

use crate::boot::{BootConfig, BootValue, PinAssignment};
use crate::error::{BackendError, BackendResult};
use crate::types::{ConfigKind, Direction, HandleId, StateId, TriggerMode, IRQ_BASE, PIN_SPACE};
use crate::PinctrlBackend;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

const FUNCTION_MAX: u32 = 7;
const DATA_MAX: u32 = 1;
const PULL_MAX: u32 = 3;
const DRIVE_MAX: u32 = 3;

/// Mux function code a line reports after direction-input.
const FUNC_INPUT: u32 = 0;
/// Mux function code a line reports after direction-output.
const FUNC_OUTPUT: u32 = 1;
/// Function code the "sleep" state parks pins at.
const FUNC_DISABLED: u32 = 7;

#[derive(Debug, Clone, Copy, Default)]
struct PinRegisters {
    function: u32,
    data: u32,
    pull: u32,
    drive: u32,
    debounce_us: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    Line,
    Mux,
    Handle(u64),
}

#[derive(Debug, Clone)]
struct DeviceHandle {
    device: String,
    assignments: Vec<PinAssignment>,
}

#[derive(Debug, Default)]
struct SimState {
    pins: Vec<PinRegisters>,
    owners: HashMap<u32, Owner>,
    irqs: HashMap<u32, String>,
    handles: HashMap<u64, DeviceHandle>,
    next_handle: u64,
    calls: u64,
}

/// In-memory [`PinctrlBackend`].
pub struct SimBackend {
    state: Mutex<SimState>,
    boot: BootConfig,
    permissive: bool,
}

impl Default for SimBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBackend {
    /// Simulator seeded with the canonical boot fixture.
    pub fn new() -> Self {
        Self::with_boot_config(BootConfig::fixture())
    }

    pub fn with_boot_config(boot: BootConfig) -> Self {
        Self {
            state: Mutex::new(SimState {
                pins: vec![PinRegisters::default(); PIN_SPACE as usize],
                ..SimState::default()
            }),
            boot,
            permissive: false,
        }
    }

    /// Stop enforcing single-owner semantics on lines, interrupts and
    /// device groups. The harness's exclusivity cases must FAIL against
    /// a backend configured this way.
    pub fn permit_double_claim(mut self) -> Self {
        self.permissive = true;
        self
    }

    /// Total backend calls observed since construction.
    pub fn calls(&self) -> u64 {
        self.lock().calls
    }

    /// Whether a line currently has an owner (any path).
    pub fn is_claimed(&self, index: u32) -> bool {
        self.lock().owners.contains_key(&index)
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        // A poisoned lock means a panic mid-call; state is plain data,
        // so continuing with it is sound.
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }

    fn check_pin(index: u32) -> BackendResult<()> {
        if index < PIN_SPACE {
            Ok(())
        } else {
            Err(BackendError::UnknownPin(index))
        }
    }

    fn ensure_claimed(state: &SimState, index: u32) -> BackendResult<()> {
        if state.owners.contains_key(&index) {
            Ok(())
        } else {
            Err(BackendError::LineNotClaimed(index))
        }
    }

    fn claim(&self, state: &mut SimState, index: u32, owner: Owner) -> BackendResult<()> {
        Self::check_pin(index)?;
        if state.owners.contains_key(&index) && !self.permissive {
            return Err(BackendError::LineClaimed(index));
        }
        state.owners.entry(index).or_insert(owner);
        Ok(())
    }

    fn apply_assignments(state: &mut SimState, assignments: &[PinAssignment]) {
        for assignment in assignments {
            let reg = &mut state.pins[assignment.index as usize];
            reg.function = assignment.function;
            if let Some(pull) = assignment.pull {
                reg.pull = pull;
            }
            if let Some(drive) = assignment.drive {
                reg.drive = drive;
            }
            if let Some(data) = assignment.data {
                reg.data = data;
            }
        }
    }
}

impl PinctrlBackend for SimBackend {
    fn get_config(&self, pin: u32, kind: ConfigKind) -> BackendResult<u32> {
        let mut state = self.lock();
        state.calls += 1;
        Self::check_pin(pin)?;
        let reg = &state.pins[pin as usize];
        Ok(match kind {
            ConfigKind::Function => reg.function,
            ConfigKind::Data => reg.data,
            ConfigKind::Pull => reg.pull,
            ConfigKind::DriveLevel => reg.drive,
        })
    }

    fn set_config(&self, pin: u32, kind: ConfigKind, value: u32) -> BackendResult<()> {
        let mut state = self.lock();
        state.calls += 1;
        Self::check_pin(pin)?;
        let max = match kind {
            ConfigKind::Function => FUNCTION_MAX,
            ConfigKind::Data => DATA_MAX,
            ConfigKind::Pull => PULL_MAX,
            ConfigKind::DriveLevel => DRIVE_MAX,
        };
        if value > max {
            return Err(BackendError::InvalidValue {
                kind: kind.label(),
                value,
            });
        }
        let reg = &mut state.pins[pin as usize];
        match kind {
            ConfigKind::Function => reg.function = value,
            ConfigKind::Data => reg.data = value,
            ConfigKind::Pull => reg.pull = value,
            ConfigKind::DriveLevel => reg.drive = value,
        }
        Ok(())
    }

    fn request_line(&self, index: u32) -> BackendResult<()> {
        let mut state = self.lock();
        state.calls += 1;
        self.claim(&mut state, index, Owner::Line)?;
        debug!(line = index, "line claimed");
        Ok(())
    }

    fn free_line(&self, index: u32) -> BackendResult<()> {
        let mut state = self.lock();
        state.calls += 1;
        Self::check_pin(index)?;
        state.owners.remove(&index);
        Ok(())
    }

    fn set_direction(&self, index: u32, direction: Direction) -> BackendResult<()> {
        let mut state = self.lock();
        state.calls += 1;
        Self::check_pin(index)?;
        Self::ensure_claimed(&state, index)?;
        match direction {
            Direction::Input => state.pins[index as usize].function = FUNC_INPUT,
            Direction::Output(level) => {
                if level > DATA_MAX {
                    return Err(BackendError::InvalidValue {
                        kind: "data",
                        value: level,
                    });
                }
                let reg = &mut state.pins[index as usize];
                reg.function = FUNC_OUTPUT;
                reg.data = level;
            }
        }
        Ok(())
    }

    fn read_level(&self, index: u32) -> BackendResult<u32> {
        let mut state = self.lock();
        state.calls += 1;
        Self::check_pin(index)?;
        Self::ensure_claimed(&state, index)?;
        Ok(state.pins[index as usize].data)
    }

    fn write_level(&self, index: u32, level: u32) -> BackendResult<()> {
        let mut state = self.lock();
        state.calls += 1;
        Self::check_pin(index)?;
        Self::ensure_claimed(&state, index)?;
        if level > DATA_MAX {
            return Err(BackendError::InvalidValue {
                kind: "data",
                value: level,
            });
        }
        state.pins[index as usize].data = level;
        Ok(())
    }

    fn set_debounce(&self, index: u32, micros: u32) -> BackendResult<()> {
        let mut state = self.lock();
        state.calls += 1;
        Self::check_pin(index)?;
        Self::ensure_claimed(&state, index)?;
        state.pins[index as usize].debounce_us = micros;
        Ok(())
    }

    fn mux_request_line(&self, index: u32) -> BackendResult<()> {
        let mut state = self.lock();
        state.calls += 1;
        self.claim(&mut state, index, Owner::Mux)?;
        debug!(line = index, "mux line claimed");
        Ok(())
    }

    fn mux_free_line(&self, index: u32) -> BackendResult<()> {
        let mut state = self.lock();
        state.calls += 1;
        Self::check_pin(index)?;
        state.owners.remove(&index);
        Ok(())
    }

    fn mux_direction_input(&self, index: u32) -> BackendResult<()> {
        let mut state = self.lock();
        state.calls += 1;
        Self::check_pin(index)?;
        Self::ensure_claimed(&state, index)?;
        state.pins[index as usize].function = FUNC_INPUT;
        Ok(())
    }

    fn mux_direction_output(&self, index: u32) -> BackendResult<()> {
        let mut state = self.lock();
        state.calls += 1;
        Self::check_pin(index)?;
        Self::ensure_claimed(&state, index)?;
        state.pins[index as usize].function = FUNC_OUTPUT;
        Ok(())
    }

    fn map_to_interrupt(&self, index: u32) -> BackendResult<u32> {
        let mut state = self.lock();
        state.calls += 1;
        Self::check_pin(index)?;
        Ok(IRQ_BASE + index)
    }

    fn request_interrupt(&self, irq: u32, trigger: TriggerMode, label: &str) -> BackendResult<()> {
        let mut state = self.lock();
        state.calls += 1;
        if !(IRQ_BASE..IRQ_BASE + PIN_SPACE).contains(&irq) {
            return Err(BackendError::UnknownInterrupt(irq));
        }
        if state.irqs.contains_key(&irq) && !self.permissive {
            return Err(BackendError::InterruptClaimed(irq));
        }
        debug!(irq, ?trigger, label, "interrupt bound");
        state.irqs.entry(irq).or_insert_with(|| label.to_string());
        Ok(())
    }

    fn free_interrupt(&self, irq: u32) -> BackendResult<()> {
        let mut state = self.lock();
        state.calls += 1;
        state.irqs.remove(&irq);
        Ok(())
    }

    fn acquire_device_pins(&self, device: &str) -> BackendResult<HandleId> {
        let mut state = self.lock();
        state.calls += 1;
        let assignments = self
            .boot
            .pin_list(device)
            .filter(|pins| !pins.is_empty())
            .ok_or_else(|| BackendError::UnknownDevice(device.to_string()))?;

        for assignment in &assignments {
            Self::check_pin(assignment.index)?;
            if !self.permissive && state.owners.contains_key(&assignment.index) {
                return Err(BackendError::LineClaimed(assignment.index));
            }
        }

        let id = state.next_handle;
        state.next_handle += 1;
        for assignment in &assignments {
            state.owners.entry(assignment.index).or_insert(Owner::Handle(id));
        }
        Self::apply_assignments(&mut state, &assignments);
        state.handles.insert(
            id,
            DeviceHandle {
                device: device.to_string(),
                assignments,
            },
        );
        debug!(device, handle = id, "device pin group acquired");
        Ok(HandleId(id))
    }

    fn release_handle(&self, handle: HandleId) -> BackendResult<()> {
        let mut state = self.lock();
        state.calls += 1;
        if state.handles.remove(&handle.0).is_none() {
            return Err(BackendError::StaleHandle(handle.0));
        }
        state
            .owners
            .retain(|_, owner| *owner != Owner::Handle(handle.0));
        Ok(())
    }

    fn handle_device_name(&self, handle: HandleId) -> BackendResult<String> {
        let mut state = self.lock();
        state.calls += 1;
        state
            .handles
            .get(&handle.0)
            .map(|h| h.device.clone())
            .ok_or(BackendError::StaleHandle(handle.0))
    }

    fn lookup_named_state(&self, handle: HandleId, name: &str) -> BackendResult<StateId> {
        let mut state = self.lock();
        state.calls += 1;
        if !state.handles.contains_key(&handle.0) {
            return Err(BackendError::StaleHandle(handle.0));
        }
        match name {
            "default" => Ok(StateId(0)),
            "sleep" => Ok(StateId(1)),
            other => Err(BackendError::UnknownState(other.to_string())),
        }
    }

    fn select_state(&self, handle: HandleId, state_id: StateId) -> BackendResult<()> {
        let mut state = self.lock();
        state.calls += 1;
        let assignments = state
            .handles
            .get(&handle.0)
            .map(|h| h.assignments.clone())
            .ok_or(BackendError::StaleHandle(handle.0))?;
        match state_id {
            StateId(0) => Self::apply_assignments(&mut state, &assignments),
            StateId(1) => {
                for assignment in &assignments {
                    state.pins[assignment.index as usize].function = FUNC_DISABLED;
                }
            }
            StateId(other) => {
                return Err(BackendError::UnknownState(format!("#{}", other)));
            }
        }
        Ok(())
    }

    fn boot_value(&self, main_key: &str, sub_key: &str) -> BackendResult<BootValue> {
        let mut state = self.lock();
        state.calls += 1;
        self.boot
            .value(main_key, sub_key)
            .cloned()
            .ok_or_else(|| BackendError::UnknownKey {
                main: main_key.to_string(),
                sub: sub_key.to_string(),
            })
    }

    fn device_pin_list(&self, main_key: &str) -> BackendResult<Vec<PinAssignment>> {
        let mut state = self.lock();
        state.calls += 1;
        self.boot
            .pin_list(main_key)
            .ok_or_else(|| BackendError::UnknownDevice(main_key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trips_bit_exact() {
        let sim = SimBackend::new();
        for (kind, value) in [
            (ConfigKind::Function, 5),
            (ConfigKind::Data, 1),
            (ConfigKind::Pull, 2),
            (ConfigKind::DriveLevel, 3),
        ] {
            sim.set_config(42, kind, value).unwrap();
            assert_eq!(sim.get_config(42, kind).unwrap(), value);
        }
    }

    #[test]
    fn config_rejects_out_of_range_values() {
        let sim = SimBackend::new();
        assert!(matches!(
            sim.set_config(42, ConfigKind::Data, 2),
            Err(BackendError::InvalidValue { .. })
        ));
        assert!(matches!(
            sim.set_config(PIN_SPACE, ConfigKind::Function, 0),
            Err(BackendError::UnknownPin(_))
        ));
    }

    #[test]
    fn line_claims_are_exclusive() {
        let sim = SimBackend::new();
        sim.request_line(7).unwrap();
        assert_eq!(sim.request_line(7), Err(BackendError::LineClaimed(7)));
        // The mux path shares the owner table.
        assert_eq!(sim.mux_request_line(7), Err(BackendError::LineClaimed(7)));
        sim.free_line(7).unwrap();
        sim.request_line(7).unwrap();
    }

    #[test]
    fn free_is_tolerant_of_unclaimed_lines() {
        let sim = SimBackend::new();
        sim.free_line(7).unwrap();
        sim.mux_free_line(7).unwrap();
    }

    #[test]
    fn permissive_mode_accepts_double_claims() {
        let sim = SimBackend::new().permit_double_claim();
        sim.request_line(7).unwrap();
        sim.request_line(7).unwrap();
    }

    #[test]
    fn direction_updates_function_and_data() {
        let sim = SimBackend::new();
        sim.request_line(9).unwrap();
        sim.set_direction(9, Direction::Input).unwrap();
        assert_eq!(sim.get_config(9, ConfigKind::Function).unwrap(), 0);
        sim.set_direction(9, Direction::Output(1)).unwrap();
        assert_eq!(sim.get_config(9, ConfigKind::Function).unwrap(), 1);
        assert_eq!(sim.get_config(9, ConfigKind::Data).unwrap(), 1);
        assert_eq!(sim.read_level(9).unwrap(), 1);
        sim.write_level(9, 0).unwrap();
        assert_eq!(sim.read_level(9).unwrap(), 0);
    }

    #[test]
    fn direction_requires_a_claim() {
        let sim = SimBackend::new();
        assert_eq!(
            sim.set_direction(9, Direction::Input),
            Err(BackendError::LineNotClaimed(9))
        );
    }

    #[test]
    fn interrupt_binding_is_exclusive() {
        let sim = SimBackend::new();
        let irq = sim.map_to_interrupt(11).unwrap();
        sim.request_interrupt(irq, TriggerMode::LowLevel, "probe")
            .unwrap();
        assert_eq!(
            sim.request_interrupt(irq, TriggerMode::LowLevel, "other"),
            Err(BackendError::InterruptClaimed(irq))
        );
        sim.free_interrupt(irq).unwrap();
        sim.request_interrupt(irq, TriggerMode::RisingEdge, "probe")
            .unwrap();
    }

    #[test]
    fn device_handle_claims_group_and_applies_default_state() {
        let sim = SimBackend::new();
        let handle = sim.acquire_device_pins("card0_boot_para").unwrap();
        // Fixture puts card0 pins at function 2, pull 1.
        assert_eq!(sim.get_config(160, ConfigKind::Function).unwrap(), 2);
        assert_eq!(sim.get_config(160, ConfigKind::Pull).unwrap(), 1);
        assert!(sim.is_claimed(160));
        // Second acquisition of the same group must be rejected.
        assert!(sim.acquire_device_pins("card0_boot_para").is_err());
        sim.release_handle(handle).unwrap();
        assert!(!sim.is_claimed(160));
        let again = sim.acquire_device_pins("card0_boot_para").unwrap();
        sim.release_handle(again).unwrap();
    }

    #[test]
    fn stale_handles_are_rejected() {
        let sim = SimBackend::new();
        let handle = sim.acquire_device_pins("card0_boot_para").unwrap();
        sim.release_handle(handle).unwrap();
        assert_eq!(
            sim.release_handle(handle),
            Err(BackendError::StaleHandle(handle.0))
        );
        assert!(sim.handle_device_name(handle).is_err());
    }

    #[test]
    fn named_states_resolve_and_apply() {
        let sim = SimBackend::new();
        let handle = sim.acquire_device_pins("card0_boot_para").unwrap();
        let default = sim.lookup_named_state(handle, "default").unwrap();
        let sleep = sim.lookup_named_state(handle, "sleep").unwrap();
        assert!(sim.lookup_named_state(handle, "idle").is_err());
        sim.select_state(handle, sleep).unwrap();
        assert_eq!(sim.get_config(160, ConfigKind::Function).unwrap(), 7);
        sim.select_state(handle, default).unwrap();
        assert_eq!(sim.get_config(160, ConfigKind::Function).unwrap(), 2);
        sim.release_handle(handle).unwrap();
    }

    #[test]
    fn unknown_device_is_reported() {
        let sim = SimBackend::new();
        assert!(matches!(
            sim.acquire_device_pins("lcd0_para"),
            Err(BackendError::UnknownDevice(_))
        ));
    }

    #[test]
    fn call_counter_tracks_every_entry_point() {
        let sim = SimBackend::new();
        assert_eq!(sim.calls(), 0);
        sim.request_line(3).unwrap();
        let _ = sim.request_line(3);
        sim.free_line(3).unwrap();
        assert_eq!(sim.calls(), 3);
    }
}
