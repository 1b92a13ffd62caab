//! Registry for controllers probed at boot.
//!
//! Single-chip boards probe their controllers once during early boot
//! and then need to reach them from later code (driver setup, the
//! interrupt dispatch path). The registry is the one process-wide
//! handle to those instances; the controllers themselves stay ordinary
//! owned values, so code that prefers explicit plumbing can bypass
//! this entirely.
//!
//! Configuration calls are expected to be serialized by the caller;
//! the lock only makes the hand-over between boot stages sound.

use spin::Mutex;

use crate::hal::bus::Mmio;
use crate::pinmux::MuxController;
use crate::platform::aic::Aic;
use crate::platform::pio::Pio;
use crate::platform::smc::Smc;

/// The probed controllers of the chip.
pub struct SocDevices {
    pinmux: Option<MuxController<Pio<Mmio>>>,
    smc: Option<Smc<Mmio>>,
    aic: Option<Aic<Mmio>>,
}

impl SocDevices {
    pub const fn new() -> Self {
        Self {
            pinmux: None,
            smc: None,
            aic: None,
        }
    }

    pub fn register_pinmux(&mut self, mux: MuxController<Pio<Mmio>>) {
        if self.pinmux.is_some() {
            log::warn!("pinmux controller replaced in registry");
        }
        self.pinmux = Some(mux);
    }

    pub fn register_smc(&mut self, smc: Smc<Mmio>) {
        if self.smc.is_some() {
            log::warn!("smc replaced in registry");
        }
        self.smc = Some(smc);
    }

    pub fn register_aic(&mut self, aic: Aic<Mmio>) {
        if self.aic.is_some() {
            log::warn!("aic replaced in registry");
        }
        self.aic = Some(aic);
    }

    pub fn pinmux(&mut self) -> Option<&mut MuxController<Pio<Mmio>>> {
        self.pinmux.as_mut()
    }

    pub fn smc(&mut self) -> Option<&mut Smc<Mmio>> {
        self.smc.as_mut()
    }

    pub fn aic(&mut self) -> Option<&mut Aic<Mmio>> {
        self.aic.as_mut()
    }
}

impl Default for SocDevices {
    fn default() -> Self {
        Self::new()
    }
}

static DEVICES: Mutex<SocDevices> = Mutex::new(SocDevices::new());

/// The process-wide device registry.
pub fn devices() -> &'static Mutex<SocDevices> {
    &DEVICES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_starts_empty() {
        let mut devs = SocDevices::new();
        assert!(devs.pinmux().is_none());
        assert!(devs.smc().is_none());
        assert!(devs.aic().is_none());
    }

    #[test]
    fn registered_smc_is_retrievable() {
        let mut devs = SocDevices::new();
        devs.register_smc(Smc::new());
        assert!(devs.smc().is_some());
        assert!(!devs.smc().unwrap().is_mapped(0));
    }
}
