//! SoC register-block drivers.
//!
//! Each driver owns one memory-mapped block after construction and is
//! generic over [`crate::hal::bus::BusAccess`] so its register traffic
//! can be observed in tests.
//!
//! - [`pio`]: parallel I/O banks (peripheral select, pull-up,
//!   multi-drive)
//! - [`smc`]: static memory controller bus-timing codec
//! - [`aic`]: priority interrupt controller

pub mod aic;
pub mod pio;
pub mod smc;
