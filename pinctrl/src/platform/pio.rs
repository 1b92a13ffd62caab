//! Parallel I/O bank driver.
//!
//! Each bank of 32 pins has its own 0x200-byte register block; the
//! blocks for banks 0..N sit back to back. All control registers used
//! here are write-only set/clear pairs taking a single-bit pin mask, so
//! every operation is a short sequence of masked writes with no
//! read-modify-write.

use crate::hal::bus::BusAccess;
use crate::hal::pinmux::{Peripheral, PinId, PinmuxHardware, Pull};

/// Byte distance between consecutive bank register blocks.
pub const BANK_STRIDE: usize = 0x200;

/// PIO enable register: hand the pin back to general-purpose I/O.
const PIO_PER: usize = 0x00;
/// PIO disable register: hand the pin to the selected peripheral.
const PIO_PDR: usize = 0x04;
/// Interrupt disable register.
const PIO_IDR: usize = 0x44;
/// Multi-driver enable register.
const PIO_MDER: usize = 0x50;
/// Multi-driver disable register.
const PIO_MDDR: usize = 0x54;
/// Pull-up disable register.
const PIO_PUDR: usize = 0x60;
/// Pull-up enable register.
const PIO_PUER: usize = 0x64;
/// Peripheral A select register.
const PIO_ASR: usize = 0x70;
/// Peripheral B select register.
const PIO_BSR: usize = 0x74;

/// PIO controller covering all banks of the chip.
#[derive(Debug)]
pub struct Pio<B: BusAccess> {
    bus: B,
    nb_bank: u32,
}

impl<B: BusAccess> Pio<B> {
    /// Create a PIO driver over `nb_bank` banks.
    ///
    /// `bus` must span `nb_bank * 0x200` bytes starting at bank 0's
    /// block.
    pub fn new(bus: B, nb_bank: u32) -> Self {
        Self { bus, nb_bank }
    }

    /// Number of banks this driver covers.
    pub fn bank_count(&self) -> u32 {
        self.nb_bank
    }

    fn write(&mut self, pin: PinId, reg: usize, mask: u32) {
        debug_assert!(pin.bank() < self.nb_bank);
        self.bus
            .write32(pin.bank() as usize * BANK_STRIDE + reg, mask);
    }

    fn write_pull(&mut self, pin: PinId, pull: Pull) {
        // The pad has no pull-down network; down behaves as none.
        let reg = match pull {
            Pull::Up => PIO_PUER,
            Pull::None | Pull::Down => PIO_PUDR,
        };
        self.write(pin, reg, pin.bank_mask());
    }
}

impl<B: BusAccess> PinmuxHardware for Pio<B> {
    /// Route the pad to a peripheral: mask the pin's interrupt, program
    /// the pull-up, select A or B, then disable PIO control of the pad.
    fn select_peripheral(&mut self, pin: PinId, periph: Peripheral, pull: Pull) {
        let mask = pin.bank_mask();
        self.write(pin, PIO_IDR, mask);
        self.write_pull(pin, pull);
        let select = match periph {
            Peripheral::A => PIO_ASR,
            Peripheral::B => PIO_BSR,
        };
        self.write(pin, select, mask);
        self.write(pin, PIO_PDR, mask);
    }

    /// Return the pad to general-purpose I/O.
    fn select_gpio(&mut self, pin: PinId, pull: Pull) {
        let mask = pin.bank_mask();
        self.write(pin, PIO_IDR, mask);
        self.write_pull(pin, pull);
        self.write(pin, PIO_PER, mask);
    }

    fn set_multidrive(&mut self, pin: PinId, enabled: bool) {
        let reg = if enabled { PIO_MDER } else { PIO_MDDR };
        self.write(pin, reg, pin.bank_mask());
    }
}
