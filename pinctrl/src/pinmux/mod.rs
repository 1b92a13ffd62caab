//! Pin group/function model and mux controller.
//!
//! Board and firmware description data declares named *groups* of pins
//! (each pin carrying its required mux alternative and electrical
//! attributes) and named *functions* (peripheral capabilities) that
//! claim those groups. [`PinController::probe`] validates the whole
//! description against the chip's capability mask table up front;
//! [`MuxController`] then materializes "function F on group G" into the
//! per-pin register writes.
//!
//! Resolution is pure: no hardware is touched until every pin of a
//! group has passed validation.

pub mod mask;

pub use mask::MuxMask;

use alloc::string::String;
use alloc::vec::Vec;

use crate::hal::pinmux::{Peripheral, PinId, PinmuxHardware, Pull, PINS_PER_BANK};

/// Errors from description validation and function resolution.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PinmuxError {
    /// Raw mask array length does not match `banks * alternatives`.
    MaskLength { expected: usize, found: usize },
    /// Pin references a bank beyond the loaded mask table.
    BadBank { bank: u32 },
    /// Mux alternative index not supported by this chip generation.
    BadMux { mux: u32 },
    /// Pin number outside the chip's bank range.
    BadPin { pin: u32 },
    /// The capability mask forbids this alternative on this pin.
    MuxNotAllowed { pin: u32, mux: u32 },
    /// Pull value outside {none, up, down}.
    BadPull { pin: u32, pull: u32 },
    /// Pin already belongs to a different group.
    PinAlreadyGrouped { pin: u32 },
    /// Function name not registered.
    UnknownFunction,
    /// Group name not registered.
    UnknownGroup,
    /// Function does not claim the named group.
    FunctionLacksGroup,
    /// Group was declared with no child pins.
    EmptyGroup,
}

/// One pin declaration from description data (already-parsed numbers).
#[derive(Debug, Copy, Clone)]
pub struct PinDesc {
    /// Flat pin number (`bank * 32 + offset`).
    pub pin: u32,
    /// Requested mux alternative index.
    pub mux: u32,
    /// Requested pull resistor (0 = none, 1 = up, 2 = down).
    pub pull: u32,
    /// Whether the pad drives open-drain.
    pub multidrive: bool,
}

/// A named group of pin declarations configured as a unit.
#[derive(Debug, Clone)]
pub struct GroupDesc {
    pub name: String,
    pub pins: Vec<PinDesc>,
}

/// A named peripheral capability claiming one or more groups.
#[derive(Debug, Clone)]
pub struct FunctionDesc {
    pub name: String,
    pub groups: Vec<String>,
}

/// Fully validated configuration of a single pin.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PinConfig {
    pub pin: PinId,
    pub mux: Peripheral,
    pub pull: Pull,
    pub multidrive: bool,
}

#[derive(Debug, Clone)]
struct Group {
    name: String,
    pins: Vec<PinConfig>,
}

#[derive(Debug, Clone)]
struct Function {
    name: String,
    groups: Vec<String>,
}

/// The pin multiplexing model: banks, groups, functions and the
/// capability mask table they were validated against.
///
/// Built once from description data; immutable afterward.
#[derive(Debug, Clone)]
pub struct PinController {
    mask: MuxMask,
    nb_bank: u32,
    groups: Vec<Group>,
    functions: Vec<Function>,
}

impl PinController {
    /// Build the model from a resolved bank count, the raw capability
    /// mask array and the parsed group/function descriptions.
    ///
    /// Every pin is validated here, at definition time: its bank must
    /// exist, its mux alternative must be permitted by the mask table
    /// and selectable by the pad logic, and its pull value must be in
    /// range. Re-declaring a group name overwrites the earlier
    /// definition; declaring a pin in two different groups is an error.
    pub fn probe(
        nb_bank: u32,
        mux_mask: &[u32],
        groups: &[GroupDesc],
        functions: &[FunctionDesc],
    ) -> Result<Self, PinmuxError> {
        let mask = MuxMask::load(nb_bank, mux_mask)?;

        let mut ctrl = Self {
            mask,
            nb_bank,
            groups: Vec::new(),
            functions: Vec::new(),
        };

        for group in groups {
            ctrl.define_group(group)?;
        }

        for func in functions {
            ctrl.register_function(func)?;
        }

        log::info!(
            "pin controller: {} banks ({} pins), {} groups, {} functions",
            ctrl.nb_bank,
            ctrl.pin_count(),
            ctrl.groups.len(),
            ctrl.functions.len()
        );

        Ok(ctrl)
    }

    /// Total number of pins (`banks * 32`).
    pub fn pin_count(&self) -> u32 {
        self.nb_bank * PINS_PER_BANK
    }

    /// The capability mask table the model was validated against.
    pub fn mux_mask(&self) -> &MuxMask {
        &self.mask
    }

    /// Names of the registered groups.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.name.as_str())
    }

    /// Names of the registered functions.
    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(|f| f.name.as_str())
    }

    fn validate_pin(&self, desc: &PinDesc) -> Result<PinConfig, PinmuxError> {
        if desc.pin >= self.pin_count() {
            log::error!("pin {} beyond last bank", desc.pin);
            return Err(PinmuxError::BadPin { pin: desc.pin });
        }
        let pin = PinId::new(desc.pin);

        if !self.mask.is_allowed(pin, desc.mux)? {
            log::error!("mux {} not supported for pin {}", desc.mux, pin);
            return Err(PinmuxError::MuxNotAllowed {
                pin: desc.pin,
                mux: desc.mux,
            });
        }

        // The mask table may be wider than the pad logic on future
        // generations; only alternatives A and B are selectable.
        let mux = Peripheral::from_index(desc.mux).ok_or(PinmuxError::BadMux { mux: desc.mux })?;

        let pull = Pull::from_raw(desc.pull).ok_or_else(|| {
            log::error!("pull {} not supported for pin {}", desc.pull, pin);
            PinmuxError::BadPull {
                pin: desc.pin,
                pull: desc.pull,
            }
        })?;

        Ok(PinConfig {
            pin,
            mux,
            pull,
            multidrive: desc.multidrive,
        })
    }

    fn define_group(&mut self, desc: &GroupDesc) -> Result<(), PinmuxError> {
        let mut pins = Vec::with_capacity(desc.pins.len());
        for pin in &desc.pins {
            let cfg = self.validate_pin(pin)?;

            // A pin may be re-declared by overwriting its own group,
            // but not claimed by a second one.
            if let Some(other) = self
                .groups
                .iter()
                .find(|g| g.name != desc.name && g.pins.iter().any(|p| p.pin == cfg.pin))
            {
                log::error!("pin {} already in group '{}'", cfg.pin, other.name);
                return Err(PinmuxError::PinAlreadyGrouped { pin: pin.pin });
            }

            log::debug!("group '{}': pin {} mux {:?}", desc.name, cfg.pin, cfg.mux);
            pins.push(cfg);
        }

        if let Some(existing) = self.groups.iter_mut().find(|g| g.name == desc.name) {
            log::debug!("group '{}' re-declared, overwriting", desc.name);
            existing.pins = pins;
        } else {
            self.groups.push(Group {
                name: desc.name.clone(),
                pins,
            });
        }

        Ok(())
    }

    fn register_function(&mut self, desc: &FunctionDesc) -> Result<(), PinmuxError> {
        for group in &desc.groups {
            if !self.groups.iter().any(|g| &g.name == group) {
                log::error!("function '{}' claims unknown group '{}'", desc.name, group);
                return Err(PinmuxError::UnknownGroup);
            }
        }

        if let Some(existing) = self.functions.iter_mut().find(|f| f.name == desc.name) {
            existing.groups = desc.groups.clone();
        } else {
            self.functions.push(Function {
                name: desc.name.clone(),
                groups: desc.groups.clone(),
            });
        }

        Ok(())
    }

    /// Resolve "function on group" to the concrete per-pin
    /// configuration.
    ///
    /// Pure: performs no hardware access. The returned slice covers
    /// every pin of the group in declaration order.
    pub fn resolve(&self, function: &str, group: &str) -> Result<&[PinConfig], PinmuxError> {
        let func = self
            .functions
            .iter()
            .find(|f| f.name == function)
            .ok_or(PinmuxError::UnknownFunction)?;

        if !func.groups.iter().any(|g| g == group) {
            return Err(PinmuxError::FunctionLacksGroup);
        }

        let group = self
            .groups
            .iter()
            .find(|g| g.name == group)
            .ok_or(PinmuxError::UnknownGroup)?;

        if group.pins.is_empty() {
            return Err(PinmuxError::EmptyGroup);
        }

        Ok(&group.pins)
    }
}

/// Applies resolved pin configurations to hardware.
///
/// Per pin the state machine is {GPIO} ⇄ {PeripheralA, PeripheralB};
/// transitions happen only through [`enable`](Self::enable) and
/// [`disable`](Self::disable). Writes are only issued once the whole
/// group has resolved, so a validation failure leaves the hardware
/// untouched.
#[derive(Debug)]
pub struct MuxController<H: PinmuxHardware> {
    ctrl: PinController,
    hw: H,
}

impl<H: PinmuxHardware> MuxController<H> {
    pub fn new(ctrl: PinController, hw: H) -> Self {
        Self { ctrl, hw }
    }

    /// The underlying model.
    pub fn controller(&self) -> &PinController {
        &self.ctrl
    }

    /// Route every pin of `group` to the alternative `function`
    /// requires, with the declared pull and multi-drive attributes.
    ///
    /// Re-enabling an identical configuration re-issues the register
    /// writes, which is harmless: the writes are idempotent at the
    /// hardware level.
    pub fn enable(&mut self, function: &str, group: &str) -> Result<(), PinmuxError> {
        let pins = self.ctrl.resolve(function, group)?;

        log::debug!("enable '{}' on '{}'", function, group);
        for cfg in pins {
            self.hw.select_peripheral(cfg.pin, cfg.mux, cfg.pull);
            self.hw.set_multidrive(cfg.pin, cfg.multidrive);
        }

        Ok(())
    }

    /// Return every pin of `group` to GPIO with pull and multi-drive
    /// cleared.
    ///
    /// Idempotent: disabling a group that is already in GPIO state
    /// re-issues the same harmless writes. Fails only when the
    /// function/group names do not resolve.
    pub fn disable(&mut self, function: &str, group: &str) -> Result<(), PinmuxError> {
        let pins = self.ctrl.resolve(function, group)?;

        log::debug!("disable '{}' on '{}'", function, group);
        for cfg in pins {
            self.hw.select_gpio(cfg.pin, Pull::None);
            self.hw.set_multidrive(cfg.pin, false);
        }

        Ok(())
    }
}
