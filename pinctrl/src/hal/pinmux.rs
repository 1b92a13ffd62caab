//! Pin identity and multiplexing types.
//!
//! This module defines platform-independent types for pin control. Pins
//! are numbered `bank * 32 + offset` across the whole chip; each bank is
//! a block of 32 physically adjacent pins sharing one set of control
//! registers.

use core::fmt;

/// Number of pins per bank.
pub const PINS_PER_BANK: u32 = 32;

/// A pin, identified by `bank * 32 + offset`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PinId(u32);

impl PinId {
    /// Create a pin id from a flat pin number.
    pub const fn new(pin: u32) -> Self {
        Self(pin)
    }

    /// Create a pin id from a bank ordinal and an offset within it.
    pub const fn from_bank(bank: u32, offset: u32) -> Self {
        Self(bank * PINS_PER_BANK + offset)
    }

    /// Flat pin number.
    pub const fn number(&self) -> u32 {
        self.0
    }

    /// Bank ordinal (`pin / 32`).
    pub const fn bank(&self) -> u32 {
        self.0 / PINS_PER_BANK
    }

    /// Offset within the bank (`pin % 32`).
    pub const fn offset(&self) -> u32 {
        self.0 % PINS_PER_BANK
    }

    /// Single-bit mask of this pin within its bank's registers.
    pub const fn bank_mask(&self) -> u32 {
        1 << self.offset()
    }
}

impl fmt::Display for PinId {
    /// Pins print as `PA0`..`PA31`, `PB0`.. and so on, bank `A` first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bank = (b'A' + (self.bank() as u8 % 26)) as char;
        write!(f, "P{}{}", bank, self.offset())
    }
}

/// On-chip peripheral signal source routable onto a pin.
///
/// The pad logic selects between two peripheral alternatives; a pin not
/// handed to either is general-purpose I/O.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Peripheral {
    /// Peripheral alternative A (mux index 0).
    A,
    /// Peripheral alternative B (mux index 1).
    B,
}

impl Peripheral {
    /// Map a raw mux index from description data.
    ///
    /// Returns `None` for indices the pad logic cannot select.
    pub const fn from_index(mux: u32) -> Option<Self> {
        match mux {
            0 => Some(Peripheral::A),
            1 => Some(Peripheral::B),
            _ => None,
        }
    }

    /// Mux index of this alternative.
    pub const fn index(&self) -> u32 {
        match self {
            Peripheral::A => 0,
            Peripheral::B => 1,
        }
    }
}

/// Internal pull resistor configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Pull {
    /// No pull resistor (high impedance).
    None,
    /// Enable internal pull-up resistor.
    Up,
    /// Enable internal pull-down resistor.
    Down,
}

impl Pull {
    /// Map a raw pull value from description data (0 = none, 1 = up,
    /// 2 = down). Values above 2 are rejected.
    pub const fn from_raw(pull: u32) -> Option<Self> {
        match pull {
            0 => Some(Pull::None),
            1 => Some(Pull::Up),
            2 => Some(Pull::Down),
            _ => None,
        }
    }
}

/// Per-pin operations the mux controller issues.
///
/// Implementations perform the raw register writes selecting a pin's
/// signal source and electrical attributes. The methods are infallible:
/// callers hand over pins already validated against the chip description,
/// and the underlying writes cannot fault.
pub trait PinmuxHardware {
    /// Route `pin` to a peripheral alternative with the given pull.
    fn select_peripheral(&mut self, pin: PinId, periph: Peripheral, pull: Pull);

    /// Return `pin` to general-purpose I/O with the given pull.
    fn select_gpio(&mut self, pin: PinId, pull: Pull);

    /// Enable or disable the multi-drive (open-drain) driver for `pin`.
    fn set_multidrive(&mut self, pin: PinId, enabled: bool);
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn pin_bank_arithmetic() {
        let pin = PinId::new(46);
        assert_eq!(pin.bank(), 1);
        assert_eq!(pin.offset(), 14);
        assert_eq!(pin.bank_mask(), 1 << 14);
        assert_eq!(PinId::from_bank(1, 14), pin);
    }

    #[test]
    fn pin_names_follow_bank_letter() {
        assert_eq!(format!("{}", PinId::new(0)), "PA0");
        assert_eq!(format!("{}", PinId::from_bank(1, 14)), "PB14");
        assert_eq!(format!("{}", PinId::from_bank(4, 31)), "PE31");
    }

    #[test]
    fn peripheral_from_index() {
        assert_eq!(Peripheral::from_index(0), Some(Peripheral::A));
        assert_eq!(Peripheral::from_index(1), Some(Peripheral::B));
        assert_eq!(Peripheral::from_index(2), None);
    }

    #[test]
    fn pull_rejects_values_above_two() {
        assert_eq!(Pull::from_raw(0), Some(Pull::None));
        assert_eq!(Pull::from_raw(1), Some(Pull::Up));
        assert_eq!(Pull::from_raw(2), Some(Pull::Down));
        assert_eq!(Pull::from_raw(3), None);
    }
}
