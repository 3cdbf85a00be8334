//! CPU interrupt control: global enable flag, per-source mask and pending flags.

use bitflags::bitflags;
use log::trace;
use riscv::MstatusFlags;

use crate::{config::IrqRegisters, csr::CsrBus};

/// A CPU status register holding the global interrupt-enable flag.
///
/// Each method must behave as a single indivisible operation with respect to interrupts.
pub trait StatusRegister {
    /// Reads the register.
    fn read(&self) -> MstatusFlags;

    /// Sets the specified flags.
    fn set(&self, flags: MstatusFlags);

    /// Clears the specified flags.
    fn clear(&self, flags: MstatusFlags);

    /// Clears the specified flags and returns the register content from before the clear.
    fn clear_and_read(&self, flags: MstatusFlags) -> MstatusFlags;
}

impl<S> StatusRegister for &S
where
    S: StatusRegister + ?Sized,
{
    #[inline]
    fn read(&self) -> MstatusFlags {
        (**self).read()
    }

    #[inline]
    fn set(&self, flags: MstatusFlags) {
        (**self).set(flags)
    }

    #[inline]
    fn clear(&self, flags: MstatusFlags) {
        (**self).clear(flags)
    }

    #[inline]
    fn clear_and_read(&self, flags: MstatusFlags) -> MstatusFlags {
        (**self).clear_and_read(flags)
    }
}

bitflags! {
    /// Interrupt sources wired to the CPU.
    pub struct IrqSources: u32 {
        /// Serial port.
        const UART = 1 << 0;
        /// Timer 0.
        const TIMER0 = 1 << 1;
        /// Ethernet MAC.
        const ETHMAC = 1 << 2;
    }
}

/// CPU interrupt controller.
#[derive(Debug)]
pub struct InterruptControl<B, S> {
    bus: B,
    status: S,
    regs: IrqRegisters,
}

impl<B, S> InterruptControl<B, S>
where
    B: CsrBus,
    S: StatusRegister,
{
    /// Creates a new interrupt controller accessing `regs` through `bus`.
    pub fn new(bus: B, status: S, regs: IrqRegisters) -> Self {
        Self { bus, status, regs }
    }

    /// Returns whether interrupts are globally enabled (`mstatus.mie`).
    #[inline]
    pub fn get_interrupt_enable(&self) -> bool {
        self.status.read().contains(MstatusFlags::MIE)
    }

    /// Globally enables or disables interrupts.
    #[inline]
    pub fn set_interrupt_enable(&self, enable: bool) {
        trace!("irq: global enable <- {}", enable);

        if enable {
            self.status.set(MstatusFlags::MIE);
        } else {
            self.status.clear(MstatusFlags::MIE);
        }
    }

    /// Returns the per-source interrupt enable mask.
    pub fn get_interrupt_mask(&self) -> u32 {
        self.regs.enable.read(&self.bus)
    }

    /// Replaces the per-source interrupt enable mask.
    ///
    /// Bits beyond the implemented sources are ignored by the hardware.
    pub fn set_interrupt_mask(&self, mask: u32) {
        trace!("irq: mask <- {:#010x}", mask);
        self.regs.enable.write(&self.bus, mask);
    }

    /// Returns the latched pending flags. Reading does not acknowledge anything.
    pub fn get_pending_interrupts(&self) -> u32 {
        self.regs.pending.read(&self.bus)
    }

    /// Unmasks `sources`, leaving the other sources untouched.
    pub fn enable_source(&self, sources: IrqSources) {
        self.free(|| {
            let mask = self.get_interrupt_mask();
            self.set_interrupt_mask(mask | sources.bits());
        })
    }

    /// Masks `sources`, leaving the other sources untouched.
    pub fn disable_source(&self, sources: IrqSources) {
        self.free(|| {
            let mask = self.get_interrupt_mask();
            self.set_interrupt_mask(mask & !sources.bits());
        })
    }

    /// Returns whether every source in `sources` is pending.
    pub fn is_pending(&self, sources: IrqSources) -> bool {
        let pending = self.get_pending_interrupts();
        pending & sources.bits() == sources.bits()
    }

    /// Runs `f` with interrupts globally disabled, then restores the previous state.
    ///
    /// The previous state is read and cleared in a single operation. It is restored even if
    /// `f` unwinds.
    pub fn free<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let prev = self.status.clear_and_read(MstatusFlags::MIE);
        let _restore = RestoreIe {
            status: &self.status,
            enabled: prev.contains(MstatusFlags::MIE),
        };

        f()
    }

    /// Returns the underlying bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }
}

/// Re-enables interrupts on drop if they were enabled when it was created.
struct RestoreIe<'a, S: StatusRegister> {
    status: &'a S,
    enabled: bool,
}

impl<S: StatusRegister> Drop for RestoreIe<'_, S> {
    fn drop(&mut self) {
        if self.enabled {
            trace!("irq: global enable restored");
            self.status.set(MstatusFlags::MIE);
        }
    }
}
