//! Priority interrupt controller driver.
//!
//! The controller serves 32 interrupt lines. Line 0 is the fast
//! interrupt, the single highest-priority line with relaxed
//! sensitivity-type restrictions; a caller-supplied bitmask marks which
//! of the remaining lines are wired to external pads. Each line's
//! source-mode register carries its priority (bits 2:0) and trigger
//! sensitivity (bits 6:5); its source-vector register is programmed
//! with the line's own number so the dispatch stub can recover the line
//! from a vector read.

use crate::hal::bus::BusAccess;
use crate::hal::interrupt::{
    ConfigurableInterruptController, InterruptController, IrqLine, Priority, TriggerMode,
    WakeupInterruptController,
};

/// Number of interrupt lines.
pub const NR_AIC_IRQS: u32 = 32;
/// The fast interrupt line.
pub const FAST_IRQ: IrqLine = 0;

/// Source mode register of line `n`.
const fn aic_smr(line: IrqLine) -> usize {
    (line as usize) * 4
}

/// Source vector register of line `n`.
const fn aic_svr(line: IrqLine) -> usize {
    0x80 + (line as usize) * 4
}

/// Interrupt vector register (reading it enters interrupt handling).
const AIC_IVR: usize = 0x100;
/// Interrupt status register (current line number).
const AIC_ISR: usize = 0x108;
/// Interrupt pending register.
const AIC_IPR: usize = 0x10C;
/// Interrupt mask register.
const AIC_IMR: usize = 0x110;
/// Interrupt enable command register.
const AIC_IECR: usize = 0x120;
/// Interrupt disable command register.
const AIC_IDCR: usize = 0x124;
/// Interrupt clear command register.
const AIC_ICCR: usize = 0x128;
/// End-of-interrupt command register.
const AIC_EOICR: usize = 0x130;
/// Spurious vector register.
const AIC_SPU: usize = 0x134;
/// Debug (protect) control register.
const AIC_DCR: usize = 0x138;

/// Priority field of a source mode register, bits 2:0.
const SMR_PRIOR: u32 = 0x7;
/// Source-type field of a source mode register, bits 6:5.
const SMR_SRCTYPE: u32 = 0x3 << 5;

const SRCTYPE_LOW: u32 = 0x0 << 5;
const SRCTYPE_FALLING: u32 = 0x1 << 5;
const SRCTYPE_HIGH: u32 = 0x2 << 5;
const SRCTYPE_RISING: u32 = 0x3 << 5;

/// End-of-interrupt pulses issued during init. The controller can
/// latch a line active across a reset; eight acknowledgments flush the
/// deepest hardware queue without overrunning it.
const INIT_EOI_PULSES: u32 = 8;

/// Errors from interrupt controller operations.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AicError {
    /// Line number out of range.
    BadLine { line: IrqLine },
    /// Requested sensitivity is not supported on this line.
    UnsupportedTrigger { line: IrqLine },
    /// `suspend` called while already suspended.
    AlreadySuspended,
    /// `resume` called without a matching `suspend`.
    NotSuspended,
}

/// The interrupt controller.
///
/// Owns its register block after construction. The wake and backup
/// masks are instance state with a strict init-then-use lifecycle and
/// must not be touched concurrently with `suspend`/`resume`.
#[derive(Debug)]
pub struct Aic<B: BusAccess> {
    bus: B,
    external: u32,
    wakeups: u32,
    backups: u32,
    suspended: bool,
}

impl<B: BusAccess> Aic<B> {
    /// Initialize the controller.
    ///
    /// Programs every line's vector with its own number and its source
    /// mode to level-low sensitivity at the supplied priority (0-7,
    /// higher wins), flushes any latched interrupt from a prior boot
    /// stage, sets the spurious vector, disables register protection,
    /// then masks and clears every line. `external` marks the lines
    /// wired to external pads.
    pub fn new(bus: B, priorities: &[Priority; NR_AIC_IRQS as usize], external: u32) -> Self {
        let mut aic = Self {
            bus,
            external,
            wakeups: 0,
            backups: 0,
            suspended: false,
        };

        for line in 0..NR_AIC_IRQS {
            aic.bus.write32(aic_svr(line), line);
            aic.bus.write32(
                aic_smr(line),
                SRCTYPE_LOW | (priorities[line as usize] as u32 & SMR_PRIOR),
            );

            if line < INIT_EOI_PULSES {
                aic.bus.write32(AIC_EOICR, 0);
            }
        }

        // A spurious interrupt reads the line count from the vector.
        aic.bus.write32(AIC_SPU, NR_AIC_IRQS);
        aic.bus.write32(AIC_DCR, 0);

        aic.bus.write32(AIC_IDCR, 0xFFFF_FFFF);
        aic.bus.write32(AIC_ICCR, 0xFFFF_FFFF);

        log::info!("aic: {} lines initialized, all masked", NR_AIC_IRQS);
        aic
    }

    fn check_line(line: IrqLine) -> Result<(), AicError> {
        if line < NR_AIC_IRQS {
            Ok(())
        } else {
            Err(AicError::BadLine { line })
        }
    }

    /// Whether `line` may use the low/falling sensitivities.
    fn is_external(&self, line: IrqLine) -> bool {
        line == FAST_IRQ || self.external & (1 << line) != 0
    }

    /// Set a line's trigger sensitivity, preserving its priority.
    ///
    /// Level-low and falling-edge are only supported on the fast
    /// interrupt and on external lines.
    pub fn set_type(&mut self, line: IrqLine, mode: TriggerMode) -> Result<(), AicError> {
        Self::check_line(line)?;

        let srctype = match mode {
            TriggerMode::LevelHigh => SRCTYPE_HIGH,
            TriggerMode::RisingEdge => SRCTYPE_RISING,
            TriggerMode::LevelLow if self.is_external(line) => SRCTYPE_LOW,
            TriggerMode::FallingEdge if self.is_external(line) => SRCTYPE_FALLING,
            TriggerMode::LevelLow | TriggerMode::FallingEdge => {
                log::error!("aic: line {} does not support {:?}", line, mode);
                return Err(AicError::UnsupportedTrigger { line });
            }
        };

        let smr = self.bus.read32(aic_smr(line)) & !SMR_SRCTYPE;
        self.bus.write32(aic_smr(line), smr | srctype);
        Ok(())
    }

    /// Disable (mask) a line.
    pub fn mask(&mut self, line: IrqLine) -> Result<(), AicError> {
        Self::check_line(line)?;
        self.bus.write32(AIC_IDCR, 1 << line);
        Ok(())
    }

    /// Enable (unmask) a line.
    pub fn unmask(&mut self, line: IrqLine) -> Result<(), AicError> {
        Self::check_line(line)?;
        self.bus.write32(AIC_IECR, 1 << line);
        Ok(())
    }

    /// Signal end of interrupt after a line has been handled.
    pub fn acknowledge(&mut self, line: IrqLine) -> Result<(), AicError> {
        Self::check_line(line)?;
        self.bus.write32(AIC_EOICR, 0);
        Ok(())
    }

    /// Mark or unmark a line as a wake source across suspend.
    ///
    /// The wake bitmap is 32 bits wide, so lines beyond it are
    /// rejected.
    pub fn set_wake(&mut self, line: IrqLine, enabled: bool) -> Result<(), AicError> {
        Self::check_line(line)?;

        if enabled {
            self.wakeups |= 1 << line;
        } else {
            self.wakeups &= !(1 << line);
        }
        Ok(())
    }

    /// Enter suspend: snapshot the mask state, disable every enabled
    /// line, then enable exactly the wake sources.
    ///
    /// Must be paired with [`resume`](Self::resume); nesting is an
    /// error.
    pub fn suspend(&mut self) -> Result<(), AicError> {
        if self.suspended {
            return Err(AicError::AlreadySuspended);
        }

        self.backups = self.bus.read32(AIC_IMR);
        self.bus.write32(AIC_IDCR, self.backups);
        self.bus.write32(AIC_IECR, self.wakeups);
        self.suspended = true;
        Ok(())
    }

    /// Leave suspend: disable the wake sources, then restore the mask
    /// state captured by the matching [`suspend`](Self::suspend).
    pub fn resume(&mut self) -> Result<(), AicError> {
        if !self.suspended {
            return Err(AicError::NotSuspended);
        }

        self.bus.write32(AIC_IDCR, self.wakeups);
        self.bus.write32(AIC_IECR, self.backups);
        self.suspended = false;
        Ok(())
    }

    /// Read the interrupt vector and return the active line, if any.
    ///
    /// The vector mirrors the line number; the spurious vector reads as
    /// the line count. Reading the vector tells the controller the
    /// interrupt is being handled, so every `Some` must be matched by
    /// an [`acknowledge`](Self::acknowledge).
    pub fn current_interrupt(&mut self) -> Option<IrqLine> {
        let vector = self.bus.read32(AIC_IVR);
        if vector < NR_AIC_IRQS {
            Some(vector)
        } else {
            None
        }
    }

    /// Bitmask of pending lines.
    pub fn pending_mask(&self) -> u32 {
        self.bus.read32(AIC_IPR)
    }

    /// Bitmask of enabled (unmasked) lines.
    pub fn enabled_mask(&self) -> u32 {
        self.bus.read32(AIC_IMR)
    }
}

impl<B: BusAccess> InterruptController for Aic<B> {
    type Error = AicError;

    fn enable(&mut self, line: IrqLine) -> Result<(), Self::Error> {
        self.unmask(line)
    }

    fn disable(&mut self, line: IrqLine) -> Result<(), Self::Error> {
        self.mask(line)
    }

    fn is_pending(&self, line: IrqLine) -> Result<bool, Self::Error> {
        Self::check_line(line)?;
        Ok(self.pending_mask() & (1 << line) != 0)
    }

    fn next_pending(&mut self) -> Option<IrqLine> {
        self.current_interrupt()
    }

    fn clear(&mut self, line: IrqLine) -> Result<(), Self::Error> {
        self.acknowledge(line)
    }
}

impl<B: BusAccess> ConfigurableInterruptController for Aic<B> {
    fn configure_trigger(&mut self, line: IrqLine, mode: TriggerMode) -> Result<(), Self::Error> {
        self.set_type(line, mode)
    }
}

impl<B: BusAccess> WakeupInterruptController for Aic<B> {
    fn set_wake(&mut self, line: IrqLine, enabled: bool) -> Result<(), Self::Error> {
        Aic::set_wake(self, line, enabled)
    }

    fn suspend(&mut self) -> Result<(), Self::Error> {
        Aic::suspend(self)
    }

    fn resume(&mut self) -> Result<(), Self::Error> {
        Aic::resume(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::bus::testing::MemBus;

    /// MemBus wrapper that models the enable/disable command pair: the
    /// mask register reflects accumulated IECR/IDCR writes, the way the
    /// hardware behaves.
    #[derive(Debug, Default)]
    struct AicBus {
        inner: MemBus,
        imr: u32,
    }

    impl BusAccess for AicBus {
        fn read32(&self, offset: usize) -> u32 {
            if offset == AIC_IMR {
                self.imr
            } else {
                self.inner.read32(offset)
            }
        }

        fn write32(&mut self, offset: usize, value: u32) {
            match offset {
                AIC_IECR => self.imr |= value,
                AIC_IDCR => self.imr &= !value,
                _ => {}
            }
            self.inner.write32(offset, value);
        }
    }

    const PRIORITIES: [Priority; 32] = [
        7, 7, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, //
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3,
    ];

    // Lines 29..31 are wired to external pads.
    const EXTERNAL: u32 = 0xE000_0000;

    fn aic() -> Aic<AicBus> {
        Aic::new(AicBus::default(), &PRIORITIES, EXTERNAL)
    }

    #[test]
    fn init_programs_vectors_and_source_modes() {
        let aic = aic();

        for line in 0..NR_AIC_IRQS {
            assert_eq!(aic.bus.read32(aic_svr(line)), line);
            assert_eq!(
                aic.bus.read32(aic_smr(line)),
                SRCTYPE_LOW | PRIORITIES[line as usize] as u32
            );
        }
        assert_eq!(aic.bus.read32(AIC_SPU), NR_AIC_IRQS);
        assert_eq!(aic.bus.read32(AIC_DCR), 0);
        assert_eq!(aic.enabled_mask(), 0);
        assert_eq!(aic.bus.inner.writes_to(AIC_ICCR), alloc::vec![0xFFFF_FFFF]);
    }

    #[test]
    fn init_flushes_latched_interrupts() {
        let aic = aic();
        assert_eq!(
            aic.bus.inner.writes_to(AIC_EOICR).len(),
            INIT_EOI_PULSES as usize
        );
    }

    #[test]
    fn mask_unmask_acknowledge_are_single_writes() {
        let mut aic = aic();
        let before = aic.bus.inner.write_count();

        aic.unmask(5).unwrap();
        aic.mask(5).unwrap();
        aic.acknowledge(5).unwrap();

        assert_eq!(aic.bus.inner.write_count(), before + 3);
        assert_eq!(aic.bus.inner.writes.last(), Some(&(AIC_EOICR, 0)));
        assert_eq!(aic.mask(32), Err(AicError::BadLine { line: 32 }));
    }

    #[test]
    fn edge_falling_restricted_to_fast_and_external_lines() {
        let mut aic = aic();

        assert_eq!(
            aic.set_type(5, TriggerMode::FallingEdge),
            Err(AicError::UnsupportedTrigger { line: 5 })
        );
        assert_eq!(
            aic.set_type(5, TriggerMode::LevelLow),
            Err(AicError::UnsupportedTrigger { line: 5 })
        );

        aic.set_type(FAST_IRQ, TriggerMode::FallingEdge).unwrap();
        aic.set_type(31, TriggerMode::LevelLow).unwrap();
        aic.set_type(5, TriggerMode::RisingEdge).unwrap();
        aic.set_type(5, TriggerMode::LevelHigh).unwrap();
    }

    #[test]
    fn set_type_preserves_priority() {
        let mut aic = aic();
        aic.set_type(FAST_IRQ, TriggerMode::FallingEdge).unwrap();
        assert_eq!(
            aic.bus.read32(aic_smr(FAST_IRQ)),
            SRCTYPE_FALLING | PRIORITIES[0] as u32
        );
    }

    #[test]
    fn wake_bitmap_bounds() {
        let mut aic = aic();
        aic.set_wake(3, true).unwrap();
        aic.set_wake(3, false).unwrap();
        assert_eq!(aic.set_wake(32, true), Err(AicError::BadLine { line: 32 }));
        assert_eq!(aic.wakeups, 0);
    }

    #[test]
    fn suspend_resume_restores_exact_mask_state() {
        let mut aic = aic();
        for line in [1, 4, 9] {
            aic.unmask(line).unwrap();
        }
        aic.set_wake(4, true).unwrap();
        aic.set_wake(30, true).unwrap();
        let active = aic.enabled_mask();

        aic.suspend().unwrap();
        // Only the wake sources stay enabled while suspended.
        assert_eq!(aic.enabled_mask(), (1 << 4) | (1 << 30));

        aic.resume().unwrap();
        assert_eq!(aic.enabled_mask(), active);
    }

    #[test]
    fn suspend_resume_must_alternate() {
        let mut aic = aic();
        assert_eq!(aic.resume(), Err(AicError::NotSuspended));

        aic.suspend().unwrap();
        assert_eq!(aic.suspend(), Err(AicError::AlreadySuspended));
        aic.resume().unwrap();

        // A fresh pair works again.
        aic.suspend().unwrap();
        aic.resume().unwrap();
    }

    #[test]
    fn vector_read_recovers_line_number() {
        let mut aic = aic();
        aic.bus.inner.mem.insert(AIC_IVR, 17);
        assert_eq!(aic.current_interrupt(), Some(17));

        aic.bus.inner.mem.insert(AIC_IVR, NR_AIC_IRQS);
        assert_eq!(aic.current_interrupt(), None);
    }

    #[test]
    fn hal_trait_maps_onto_raw_operations() {
        let mut aic = aic();
        InterruptController::enable(&mut aic, 2).unwrap();
        assert_eq!(aic.enabled_mask(), 1 << 2);
        InterruptController::disable(&mut aic, 2).unwrap();
        assert_eq!(aic.enabled_mask(), 0);

        aic.bus.inner.mem.insert(AIC_IPR, 1 << 7);
        assert!(aic.is_pending(7).unwrap());
        assert!(!aic.is_pending(6).unwrap());
    }
}
