//! Interrupt Controller Hardware Abstraction Layer.
//!
//! This module defines platform-independent traits for interrupt
//! management.

/// Interrupt line number type.
pub type IrqLine = u32;

/// Interrupt priority level.
///
/// Higher values indicate higher priority.
pub type Priority = u8;

/// Interrupt trigger sensitivity.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TriggerMode {
    /// Interrupt is active while the signal is high.
    LevelHigh,
    /// Interrupt triggers on a rising edge.
    RisingEdge,
    /// Interrupt is active while the signal is low.
    LevelLow,
    /// Interrupt triggers on a falling edge.
    FallingEdge,
}

/// Interrupt controller trait.
///
/// This trait represents the system's interrupt controller.
pub trait InterruptController {
    /// Error type for interrupt controller operations.
    type Error: core::fmt::Debug;

    /// Enable (unmask) an interrupt line.
    fn enable(&mut self, line: IrqLine) -> Result<(), Self::Error>;

    /// Disable (mask) an interrupt line.
    fn disable(&mut self, line: IrqLine) -> Result<(), Self::Error>;

    /// Check if an interrupt is currently pending.
    fn is_pending(&self, line: IrqLine) -> Result<bool, Self::Error>;

    /// Get the next pending interrupt.
    ///
    /// Returns the highest-priority pending interrupt, or `None` if no
    /// interrupt is pending.
    fn next_pending(&mut self) -> Option<IrqLine>;

    /// Acknowledge an interrupt after it has been handled.
    ///
    /// Some controllers require an explicit end-of-interrupt.
    fn clear(&mut self, line: IrqLine) -> Result<(), Self::Error> {
        let _ = line;
        Ok(())
    }
}

/// Extension trait for interrupt controllers with trigger configuration.
pub trait ConfigurableInterruptController: InterruptController {
    /// Configure an interrupt line's trigger sensitivity.
    ///
    /// Controllers may restrict which modes a given line supports.
    fn configure_trigger(&mut self, line: IrqLine, mode: TriggerMode) -> Result<(), Self::Error>;
}

/// Extension trait for interrupt controllers that act as wake sources
/// across a suspend/resume cycle.
///
/// `suspend` and `resume` must alternate strictly: a `suspend` must
/// fully complete before the matching `resume`, and nesting is not
/// supported.
pub trait WakeupInterruptController: InterruptController {
    /// Mark an interrupt line as a wake source (or clear the mark).
    fn set_wake(&mut self, line: IrqLine, enabled: bool) -> Result<(), Self::Error>;

    /// Snapshot the current mask state, then leave only wake sources
    /// enabled.
    fn suspend(&mut self) -> Result<(), Self::Error>;

    /// Restore the mask state captured by the matching `suspend`.
    fn resume(&mut self) -> Result<(), Self::Error>;
}
