use ::riscv::{Mstatus, MstatusFlags};

use crate::irq::StatusRegister;

/// The machine-mode status register of the current hart.
#[derive(Debug)]
pub struct Machine {
    _private: (),
}

impl Machine {
    /// Returns a handle to `mstatus`.
    ///
    /// # Safety
    ///
    /// The handle toggles `mstatus.mie`, so the caller must own interrupt management on this hart.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl StatusRegister for Machine {
    #[inline]
    fn read(&self) -> MstatusFlags {
        Mstatus::read()
    }

    #[inline]
    fn set(&self, flags: MstatusFlags) {
        // SAFETY: whoever built this handle owns interrupt management
        unsafe { Mstatus::set(flags) }
    }

    #[inline]
    fn clear(&self, flags: MstatusFlags) {
        // SAFETY: clearing status flags only ever masks traps
        unsafe { Mstatus::clear(flags) }
    }

    #[inline]
    fn clear_and_read(&self, flags: MstatusFlags) -> MstatusFlags {
        // SAFETY: clearing status flags only ever masks traps
        unsafe { Mstatus::clear_and_read(flags) }
    }
}
