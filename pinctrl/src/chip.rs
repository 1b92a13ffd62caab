//! Known chip generations.
//!
//! Firmware descriptions identify the chip with a compatible string.
//! Rather than dispatching through per-generation init callbacks, the
//! differences that matter to this crate are plain data: how many mux
//! alternatives the pad logic offers, which interrupt lines are wired
//! to external pads, and how many memory-controller instances exist.
//! Board code resolves its compatible string once at startup.

/// Capabilities of one chip generation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChipDesc {
    /// Compatible identifier from the firmware description.
    pub compatible: &'static str,
    /// Mux alternatives selectable per pin.
    pub mux_alternatives: u32,
    /// Interrupt lines wired to external pads.
    pub external_irqs: u32,
    /// Independent bus-timing controller instances.
    pub smc_instances: usize,
}

/// The generations this crate knows how to program.
static CHIPS: &[ChipDesc] = &[
    ChipDesc {
        compatible: "soc9200-pinctrl",
        mux_alternatives: 2,
        // Seven external lines on the top of the range.
        external_irqs: 0xFE00_0000,
        smc_instances: 1,
    },
    ChipDesc {
        compatible: "soc9260-pinctrl",
        mux_alternatives: 2,
        external_irqs: 0xE000_0000,
        smc_instances: 1,
    },
    ChipDesc {
        compatible: "soc9g45-pinctrl",
        mux_alternatives: 2,
        external_irqs: 0x8000_0000,
        smc_instances: 2,
    },
];

impl ChipDesc {
    /// Look up a generation by its compatible identifier.
    pub fn find(compatible: &str) -> Option<&'static ChipDesc> {
        CHIPS.iter().find(|c| c.compatible == compatible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_compatible_resolves() {
        let chip = ChipDesc::find("soc9g45-pinctrl").unwrap();
        assert_eq!(chip.smc_instances, 2);
        assert_eq!(chip.mux_alternatives, 2);
    }

    #[test]
    fn unknown_compatible_is_none() {
        assert!(ChipDesc::find("soc9999-pinctrl").is_none());
    }
}
