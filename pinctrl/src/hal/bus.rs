//! Register-block access.
//!
//! Every memory-mapped controller in this crate is a block of 32-bit
//! registers at fixed offsets from some base address. [`BusAccess`] is
//! the seam between the register codecs/state machines and the actual
//! hardware: production code uses [`Mmio`], tests use a RAM-backed fake
//! that records every write.

use core::ptr::{read_volatile, write_volatile};

/// Access to a block of 32-bit hardware registers.
///
/// `offset` is a byte offset from the start of the block and must be
/// 4-byte aligned.
pub trait BusAccess {
    /// Read the register at `offset`.
    fn read32(&self, offset: usize) -> u32;

    /// Write `value` to the register at `offset`.
    fn write32(&mut self, offset: usize, value: u32);
}

/// Memory-mapped register block.
///
/// Holds the base address as a plain integer; the pointer is formed per
/// access so the type stays `Send`/`Sync` and can live in a static
/// registry.
#[derive(Debug, Copy, Clone)]
pub struct Mmio {
    base: usize,
}

impl Mmio {
    /// Create a register block at `base`.
    ///
    /// # Safety
    ///
    /// The caller must ensure that `base` is the correct, mapped address
    /// of the register block and remains valid for the lifetime of this
    /// object, and that no other code accesses the block concurrently.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// Base address of the block.
    pub const fn base(&self) -> usize {
        self.base
    }
}

impl BusAccess for Mmio {
    fn read32(&self, offset: usize) -> u32 {
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    fn write32(&mut self, offset: usize, value: u32) {
        unsafe { write_volatile((self.base + offset) as *mut u32, value) }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::BusAccess;
    use alloc::collections::BTreeMap;
    use alloc::vec::Vec;

    /// RAM-backed register block that records every write in order.
    ///
    /// Unwritten registers read as zero, which matches the reset state
    /// the drivers assume.
    #[derive(Debug, Default)]
    pub struct MemBus {
        pub mem: BTreeMap<usize, u32>,
        pub writes: Vec<(usize, u32)>,
    }

    impl MemBus {
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of writes issued so far.
        pub fn write_count(&self) -> usize {
            self.writes.len()
        }

        /// Writes issued to a single register, in order.
        pub fn writes_to(&self, offset: usize) -> Vec<u32> {
            self.writes
                .iter()
                .filter(|(o, _)| *o == offset)
                .map(|(_, v)| *v)
                .collect()
        }
    }

    impl BusAccess for MemBus {
        fn read32(&self, offset: usize) -> u32 {
            self.mem.get(&offset).copied().unwrap_or(0)
        }

        fn write32(&mut self, offset: usize, value: u32) {
            self.writes.push((offset, value));
            self.mem.insert(offset, value);
        }
    }
}
