//! Static memory controller bus-timing codec.
//!
//! The chip has up to two independent controller instances; each drives
//! eight chip-select banks. A chip select is configured through four
//! 32-bit registers at `cs * 0x10`: setup, pulse, cycle and mode. The
//! packing functions here are exact inverses of each other so a
//! configuration can be read back for diagnostics.

use bitflags::bitflags;

use crate::hal::bus::BusAccess;

/// Controller instances on the chip.
pub const SMC_INSTANCES: usize = 2;
/// Chip-select banks per instance (512-byte register region).
pub const SMC_CHIP_SELECTS: usize = 8;

/// Register block size of one chip select.
const CS_STRIDE: usize = 0x10;
/// Setup register offset within a chip-select block.
const REG_SETUP: usize = 0x0;
/// Pulse register offset.
const REG_PULSE: usize = 0x4;
/// Cycle register offset.
const REG_CYCLE: usize = 0x8;
/// Mode register offset.
const REG_MODE: usize = 0xC;

/// Data-float field within the mode register, bits 19:16.
const TDF_SHIFT: u32 = 16;
const TDF_WIDTH: u32 = 4;
const TDF_MASK: u32 = 0xF << TDF_SHIFT;

bitflags! {
    /// Mode-register flags (everything in the mode word except the
    /// data-float count, which is carried separately in
    /// [`SmcConfig::tdf_cycles`]).
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
    pub struct SmcMode: u32 {
        /// Read operations controlled by NRD (set) or NCS (clear).
        const READ_MODE = 1 << 0;
        /// Write operations controlled by NWE (set) or NCS (clear).
        const WRITE_MODE = 1 << 1;
        /// External wait: frozen mode.
        const EXNW_FROZEN = 0x2 << 4;
        /// External wait: ready mode.
        const EXNW_READY = 0x3 << 4;
        /// Byte-access type: byte-write (set) or byte-select (clear).
        const BAT_WRITE = 1 << 8;
        /// Data bus width: 16 bits.
        const DBW_16 = 0x1 << 12;
        /// Data bus width: 32 bits.
        const DBW_32 = 0x2 << 12;
        /// Optimize data-float time.
        const TDF_MODE = 1 << 20;
        /// Page mode enabled.
        const PMEN = 1 << 24;
        /// Page size: 8 bytes.
        const PS_8 = 0x1 << 28;
        /// Page size: 16 bytes.
        const PS_16 = 0x2 << 28;
        /// Page size: 32 bytes.
        const PS_32 = 0x3 << 28;
    }
}

/// Bus-timing configuration of one chip select.
///
/// Counts are in master-clock cycles; each field is truncated to its
/// register width when packed (setup 6 bits, pulse 7, cycle 9, data
/// float 4).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct SmcConfig {
    // Setup register
    pub nwe_setup: u32,
    pub ncs_write_setup: u32,
    pub nrd_setup: u32,
    pub ncs_read_setup: u32,

    // Pulse register
    pub nwe_pulse: u32,
    pub ncs_write_pulse: u32,
    pub nrd_pulse: u32,
    pub ncs_read_pulse: u32,

    // Cycle register
    pub write_cycle: u32,
    pub read_cycle: u32,

    // Mode register
    pub mode: SmcMode,
    pub tdf_cycles: u32,
}

const fn field(value: u32, shift: u32, width: u32) -> u32 {
    (value & ((1 << width) - 1)) << shift
}

const fn unfield(raw: u32, shift: u32, width: u32) -> u32 {
    (raw >> shift) & ((1 << width) - 1)
}

/// Pack the setup register: NWE bits 5:0, NCS(write) 13:8, NRD 21:16,
/// NCS(read) 29:24.
fn pack_setup(cfg: &SmcConfig) -> u32 {
    field(cfg.nwe_setup, 0, 6)
        | field(cfg.ncs_write_setup, 8, 6)
        | field(cfg.nrd_setup, 16, 6)
        | field(cfg.ncs_read_setup, 24, 6)
}

/// Pack the pulse register: NWE bits 6:0, NCS(write) 14:8, NRD 22:16,
/// NCS(read) 30:24.
fn pack_pulse(cfg: &SmcConfig) -> u32 {
    field(cfg.nwe_pulse, 0, 7)
        | field(cfg.ncs_write_pulse, 8, 7)
        | field(cfg.nrd_pulse, 16, 7)
        | field(cfg.ncs_read_pulse, 24, 7)
}

/// Pack the cycle register: write cycle bits 8:0, read cycle 24:16.
fn pack_cycle(cfg: &SmcConfig) -> u32 {
    field(cfg.write_cycle, 0, 9) | field(cfg.read_cycle, 16, 9)
}

/// Pack the mode register: mode flags plus data-float count in bits
/// 19:16.
fn pack_mode(cfg: &SmcConfig) -> u32 {
    (cfg.mode.bits() & !TDF_MASK) | field(cfg.tdf_cycles, TDF_SHIFT, TDF_WIDTH)
}

fn unpack(setup: u32, pulse: u32, cycle: u32, mode: u32) -> SmcConfig {
    SmcConfig {
        nwe_setup: unfield(setup, 0, 6),
        ncs_write_setup: unfield(setup, 8, 6),
        nrd_setup: unfield(setup, 16, 6),
        ncs_read_setup: unfield(setup, 24, 6),

        nwe_pulse: unfield(pulse, 0, 7),
        ncs_write_pulse: unfield(pulse, 8, 7),
        nrd_pulse: unfield(pulse, 16, 7),
        ncs_read_pulse: unfield(pulse, 24, 7),

        write_cycle: unfield(cycle, 0, 9),
        read_cycle: unfield(cycle, 16, 9),

        mode: SmcMode::from_bits_retain(mode & !TDF_MASK),
        tdf_cycles: unfield(mode, TDF_SHIFT, TDF_WIDTH),
    }
}

/// Errors from bus-timing configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SmcError {
    /// Controller instance index out of range.
    BadInstance { instance: usize },
    /// Chip-select index out of range.
    BadChipSelect { cs: usize },
    /// Instance was never initialized with a register base.
    NotMapped { instance: usize },
}

/// The static memory controller: up to two register regions, mapped
/// once at boot.
#[derive(Debug)]
pub struct Smc<B: BusAccess> {
    regions: [Option<B>; SMC_INSTANCES],
}

impl<B: BusAccess> Smc<B> {
    /// Create a controller with no instance mapped yet.
    pub const fn new() -> Self {
        Self {
            regions: [None, None],
        }
    }

    /// Map an instance's register region. First caller wins: static
    /// board setup and description-driven setup may both try to
    /// configure the same region, so re-initialization is a no-op.
    pub fn init(&mut self, instance: usize, bus: B) -> Result<(), SmcError> {
        let slot = self
            .regions
            .get_mut(instance)
            .ok_or(SmcError::BadInstance { instance })?;

        if slot.is_some() {
            log::debug!("smc{}: already mapped, keeping first mapping", instance);
            return Ok(());
        }

        *slot = Some(bus);
        log::info!("smc{}: mapped", instance);
        Ok(())
    }

    /// Whether an instance has been mapped.
    pub fn is_mapped(&self, instance: usize) -> bool {
        matches!(self.regions.get(instance), Some(Some(_)))
    }

    fn region(&self, instance: usize, cs: usize) -> Result<&B, SmcError> {
        if cs >= SMC_CHIP_SELECTS {
            return Err(SmcError::BadChipSelect { cs });
        }
        self.regions
            .get(instance)
            .ok_or(SmcError::BadInstance { instance })?
            .as_ref()
            .ok_or(SmcError::NotMapped { instance })
    }

    /// Write a chip select's four timing registers, in setup, pulse,
    /// cycle, mode order.
    pub fn configure(
        &mut self,
        instance: usize,
        cs: usize,
        config: &SmcConfig,
    ) -> Result<(), SmcError> {
        if cs >= SMC_CHIP_SELECTS {
            return Err(SmcError::BadChipSelect { cs });
        }
        let bus = self
            .regions
            .get_mut(instance)
            .ok_or(SmcError::BadInstance { instance })?
            .as_mut()
            .ok_or(SmcError::NotMapped { instance })?;
        let base = cs * CS_STRIDE;

        bus.write32(base + REG_SETUP, pack_setup(config));
        bus.write32(base + REG_PULSE, pack_pulse(config));
        bus.write32(base + REG_CYCLE, pack_cycle(config));
        bus.write32(base + REG_MODE, pack_mode(config));

        log::debug!("smc{} cs{}: configured", instance, cs);
        Ok(())
    }

    /// Decode a chip select's timing registers; exact inverse of
    /// [`configure`](Self::configure) for every field.
    pub fn read_back(&self, instance: usize, cs: usize) -> Result<SmcConfig, SmcError> {
        let bus = self.region(instance, cs)?;
        let base = cs * CS_STRIDE;

        Ok(unpack(
            bus.read32(base + REG_SETUP),
            bus.read32(base + REG_PULSE),
            bus.read32(base + REG_CYCLE),
            bus.read32(base + REG_MODE),
        ))
    }
}

impl<B: BusAccess> Default for Smc<B> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::bus::testing::MemBus;

    fn sample() -> SmcConfig {
        SmcConfig {
            nwe_setup: 3,
            ncs_write_setup: 1,
            nrd_setup: 9,
            ncs_read_setup: 2,
            nwe_pulse: 10,
            ncs_write_pulse: 14,
            nrd_pulse: 11,
            ncs_read_pulse: 13,
            write_cycle: 300,
            read_cycle: 287,
            mode: SmcMode::READ_MODE | SmcMode::WRITE_MODE | SmcMode::DBW_16,
            tdf_cycles: 6,
        }
    }

    fn mapped() -> Smc<MemBus> {
        let mut smc = Smc::new();
        smc.init(0, MemBus::new()).unwrap();
        smc
    }

    #[test]
    fn configure_read_back_round_trips_every_field() {
        let mut smc = mapped();
        let cfg = sample();
        smc.configure(0, 1, &cfg).unwrap();
        assert_eq!(smc.read_back(0, 1).unwrap(), cfg);
    }

    #[test]
    fn mode_and_tdf_share_one_register() {
        let mut smc = mapped();
        let cfg = sample();
        smc.configure(0, 1, &cfg).unwrap();

        let bus = smc.regions[0].as_ref().unwrap();
        let mode_raw = bus.read32(0x10 + REG_MODE);
        assert_eq!(mode_raw & TDF_MASK, 6 << 16);
        assert_eq!(mode_raw & !TDF_MASK, cfg.mode.bits());

        let back = smc.read_back(0, 1).unwrap();
        assert_eq!(back.mode, cfg.mode);
        assert_eq!(back.tdf_cycles, cfg.tdf_cycles);
    }

    #[test]
    fn registers_written_at_cs_stride_in_order() {
        let mut smc = mapped();
        smc.configure(0, 2, &sample()).unwrap();

        let offsets: alloc::vec::Vec<usize> = smc.regions[0]
            .as_ref()
            .unwrap()
            .writes
            .iter()
            .map(|(o, _)| *o)
            .collect();
        assert_eq!(offsets, alloc::vec![0x20, 0x24, 0x28, 0x2C]);
    }

    #[test]
    fn unmapped_instance_is_reported() {
        let mut smc: Smc<MemBus> = Smc::new();
        assert_eq!(
            smc.configure(1, 0, &sample()),
            Err(SmcError::NotMapped { instance: 1 })
        );
        assert_eq!(
            smc.read_back(1, 0).unwrap_err(),
            SmcError::NotMapped { instance: 1 }
        );
    }

    #[test]
    fn out_of_range_indices_are_reported() {
        let mut smc = mapped();
        assert_eq!(
            smc.configure(2, 0, &sample()),
            Err(SmcError::BadInstance { instance: 2 })
        );
        assert_eq!(
            smc.configure(0, 8, &sample()),
            Err(SmcError::BadChipSelect { cs: 8 })
        );
    }

    #[test]
    fn second_init_is_a_no_op() {
        let mut smc = mapped();
        smc.configure(0, 0, &sample()).unwrap();
        let writes_before = smc.regions[0].as_ref().unwrap().write_count();

        // Re-initializing must keep the first mapping and its state.
        smc.init(0, MemBus::new()).unwrap();
        assert_eq!(
            smc.regions[0].as_ref().unwrap().write_count(),
            writes_before
        );
        assert_eq!(smc.read_back(0, 0).unwrap(), sample());
    }
}
