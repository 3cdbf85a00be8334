//! Access to the machine-mode status register.

use bitflags::bitflags;

bitflags! {
    /// Flags for the `mstatus` register.
    pub struct MstatusFlags: usize {
        /// M-Mode interrupt enable.
        const MIE = 1 << 3;
        /// M-Mode previous interrupt enable.
        const MPIE = 1 << 7;
        /// M-Mode previous privilege level.
        const MPP = 3 << 11;
    }
}

/// The `mstatus` register keeps track of the hart's current operating state.
#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
#[derive(Debug)]
pub struct Mstatus;

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
impl Mstatus {
    /// Reads the content of `mstatus`.
    #[inline]
    pub fn read() -> MstatusFlags {
        MstatusFlags::from_bits_truncate(Self::read_raw())
    }

    /// Reads the raw content of `mstatus`.
    #[inline]
    pub fn read_raw() -> usize {
        let value: usize;
        // SAFETY: reading `mstatus` has no side effects
        unsafe {
            core::arch::asm!("csrr {}, mstatus", out(reg) value, options(nomem, nostack));
        }
        value
    }

    /// Atomically sets the specified flags in `mstatus` with a single `csrrs`.
    ///
    /// ## Safety
    ///
    /// Setting `MIE` lets pending interrupts trap immediately, which may break invariants
    /// held by the interrupted code.
    #[inline]
    pub unsafe fn set(flags: MstatusFlags) {
        unsafe {
            core::arch::asm!("csrrs zero, mstatus, {}", in(reg) flags.bits(), options(nostack))
        };
    }

    /// Atomically clears the specified flags from `mstatus` with a single `csrrc`.
    ///
    /// ## Safety
    ///
    /// This function is unsafe because it's possible to violate memory safety through it.
    #[inline]
    pub unsafe fn clear(flags: MstatusFlags) {
        unsafe {
            core::arch::asm!("csrrc zero, mstatus, {}", in(reg) flags.bits(), options(nostack))
        };
    }

    /// Atomically clears the specified flags with a single `csrrc` and returns the previous
    /// content of `mstatus`.
    ///
    /// ## Safety
    ///
    /// This function is unsafe because it's possible to violate memory safety through it.
    #[inline]
    pub unsafe fn clear_and_read(flags: MstatusFlags) -> MstatusFlags {
        let prev: usize;
        unsafe {
            core::arch::asm!(
                "csrrc {}, mstatus, {}",
                out(reg) prev,
                in(reg) flags.bits(),
                options(nostack),
            )
        };
        MstatusFlags::from_bits_truncate(prev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mie_is_bit_three() {
        assert_eq!(MstatusFlags::MIE.bits(), 0b1000);
        assert_eq!(MstatusFlags::MPP.bits(), 0x1800);
    }

    #[test]
    fn unknown_bits_are_dropped() {
        let flags = MstatusFlags::from_bits_truncate(usize::MAX);
        assert_eq!(flags, MstatusFlags::all());
    }
}
