//! Capability mask table.
//!
//! For each `(bank, mux alternative)` pair the chip description supplies
//! a 32-bit mask of which pin offsets within that bank may be routed to
//! that alternative. The table is loaded once at probe time and consulted
//! for every pin declaration before any register is touched.

use alloc::vec::Vec;

use super::PinmuxError;
use crate::hal::pinmux::PinId;

/// Per-bank, per-alternative pin membership masks.
///
/// The raw array is bank-major: entry `bank * alternatives + mux` holds
/// the mask for alternative `mux` of `bank`.
#[derive(Debug, Clone)]
pub struct MuxMask {
    masks: Vec<u32>,
    nb_bank: u32,
    nb_mux: u32,
}

impl MuxMask {
    /// Mux alternatives on current chip generations (A and B).
    pub const DEFAULT_ALTERNATIVES: u32 = 2;

    /// Load a mask table for `nb_bank` banks with the default two
    /// alternatives per pin.
    pub fn load(nb_bank: u32, raw: &[u32]) -> Result<Self, PinmuxError> {
        Self::load_with_alternatives(nb_bank, Self::DEFAULT_ALTERNATIVES, raw)
    }

    /// Load a mask table for a chip generation with `nb_mux`
    /// alternatives per pin.
    ///
    /// Fails when `raw` does not hold exactly `nb_bank * nb_mux` words.
    pub fn load_with_alternatives(
        nb_bank: u32,
        nb_mux: u32,
        raw: &[u32],
    ) -> Result<Self, PinmuxError> {
        if nb_mux == 0 {
            return Err(PinmuxError::BadMux { mux: 0 });
        }

        let expected = (nb_bank * nb_mux) as usize;
        if raw.len() != expected {
            log::error!(
                "mux mask: expected {} words for {} banks, got {}",
                expected,
                nb_bank,
                raw.len()
            );
            return Err(PinmuxError::MaskLength {
                expected,
                found: raw.len(),
            });
        }

        Ok(Self {
            masks: raw.to_vec(),
            nb_bank,
            nb_mux,
        })
    }

    /// Number of banks covered by the table.
    pub fn bank_count(&self) -> u32 {
        self.nb_bank
    }

    /// Number of mux alternatives per pin.
    pub fn alternatives(&self) -> u32 {
        self.nb_mux
    }

    /// Whether `pin` may be routed to alternative `mux`.
    ///
    /// Tests bit `pin % 32` of the mask for `(pin / 32, mux)`. Fails
    /// when `mux` is not an alternative of this chip or the pin's bank
    /// is beyond the loaded table.
    pub fn is_allowed(&self, pin: PinId, mux: u32) -> Result<bool, PinmuxError> {
        if mux >= self.nb_mux {
            return Err(PinmuxError::BadMux { mux });
        }
        if pin.bank() >= self.nb_bank {
            return Err(PinmuxError::BadBank { bank: pin.bank() });
        }

        let entry = (pin.bank() * self.nb_mux + mux) as usize;
        Ok(self.masks[entry] & pin.bank_mask() != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_mask_array() {
        let err = MuxMask::load(2, &[0xFFFF_FFFF; 3]).unwrap_err();
        assert_eq!(
            err,
            PinmuxError::MaskLength {
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn membership_matches_mask_bits_exhaustively() {
        // One synthetic bank: alternative A on the low half, B on the
        // even offsets.
        let masks = [0x0000_FFFF, 0x5555_5555];
        let table = MuxMask::load(1, &masks).unwrap();

        for offset in 0..32 {
            let pin = PinId::from_bank(0, offset);
            for mux in 0..2 {
                let expected = masks[mux as usize] & (1 << offset) != 0;
                assert_eq!(table.is_allowed(pin, mux).unwrap(), expected);
            }
        }
    }

    #[test]
    fn rejects_alternative_beyond_table_width() {
        let table = MuxMask::load(1, &[0xFFFF_FFFF, 0]).unwrap();
        let pin = PinId::new(0);
        assert_eq!(
            table.is_allowed(pin, 2),
            Err(PinmuxError::BadMux { mux: 2 })
        );
    }

    #[test]
    fn rejects_bank_beyond_table() {
        let table = MuxMask::load(1, &[0xFFFF_FFFF, 0]).unwrap();
        let pin = PinId::from_bank(1, 0);
        assert_eq!(
            table.is_allowed(pin, 0),
            Err(PinmuxError::BadBank { bank: 1 })
        );
    }

    #[test]
    fn wider_tables_accept_more_alternatives() {
        let table = MuxMask::load_with_alternatives(1, 4, &[0xF, 0xF0, 0xF00, 0xF000]).unwrap();
        assert_eq!(table.alternatives(), 4);
        assert!(table.is_allowed(PinId::new(13), 3).unwrap());
        assert!(!table.is_allowed(PinId::new(13), 2).unwrap());
    }
}
