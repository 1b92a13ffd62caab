//! Hardware Abstraction Layer (HAL) - Platform-Independent Traits
//!
//! This module defines generic traits for the hardware this crate
//! programs. The traits are implemented by the drivers in
//! [`crate::platform`] and, in tests, by recording fakes, so the
//! validation and state-machine code never depends on a live chip.
//!
//! # Available Interfaces
//!
//! - [`bus`]: 32-bit register-block access
//! - [`pinmux`]: pin identity and per-pin mux/electrical operations
//! - [`interrupt`]: interrupt controller management

pub mod bus;
pub mod interrupt;
pub mod pinmux;
