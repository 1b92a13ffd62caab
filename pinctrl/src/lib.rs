//! Pin-Multiplexing and Electrical-Configuration Control Plane
//!
//! This crate models the pin controller of a family of microcontroller
//! SoCs and the two register blocks that are programmed from the same
//! description data: the external-bus timing controller and the priority
//! interrupt controller.
//!
//! # Module Organization
//!
//! - [`hal`]: Platform-independent trait definitions and shared types
//! - [`platform`]: Memory-mapped SoC drivers (PIO banks, SMC, AIC)
//! - [`pinmux`]: Pin group/function model and mux-capability validation
//! - [`chip`]: Known chip generations, matched by compatible identifier
//! - [`devices`]: Registry for controllers probed at boot
//!
//! # Design Principles
//!
//! 1. **Validate, then write**: description data is checked against the
//!    chip's mux capabilities before the first register access
//! 2. **Traits at the hardware seam**: register blocks sit behind
//!    [`hal::bus::BusAccess`] so state machines stay testable
//! 3. **No hidden state**: wake masks, backup masks and base addresses
//!    live in controller instances with an explicit init lifecycle
//!
//! # Usage Example
//!
//! ```no_run
//! use pinctrl::hal::bus::Mmio;
//! use pinctrl::pinmux::{
//!     FunctionDesc, GroupDesc, MuxController, PinController, PinDesc, PinmuxError,
//! };
//! use pinctrl::platform::pio::Pio;
//!
//! fn bring_up() -> Result<(), PinmuxError> {
//!     let masks = [0xFFFF_FFFF, 0x0000_0000];
//!     let groups = [GroupDesc {
//!         name: "dbgu".to_string(),
//!         pins: vec![PinDesc { pin: 14, mux: 0, pull: 0, multidrive: false }],
//!     }];
//!     let functions = [FunctionDesc {
//!         name: "dbgu_rxd".to_string(),
//!         groups: vec!["dbgu".to_string()],
//!     }];
//!
//!     let ctrl = PinController::probe(1, &masks, &groups, &functions)?;
//!     let pio = Pio::new(unsafe { Mmio::new(0xFFFF_F400) }, 1);
//!     let mut mux = MuxController::new(ctrl, pio);
//!     mux.enable("dbgu_rxd", "dbgu")
//! }
//! ```

#![no_std]
#![allow(dead_code)]

extern crate alloc;

pub mod chip;
pub mod devices;
pub mod hal;
pub mod pinmux;
pub mod platform;

// Re-export commonly used types
pub use hal::interrupt::{InterruptController, TriggerMode};
pub use hal::pinmux::{Peripheral, PinId, Pull};
pub use pinmux::{MuxController, PinController, PinmuxError};
pub use platform::aic::Aic;
pub use platform::smc::{Smc, SmcConfig};
