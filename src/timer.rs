//! System clock frequency and countdown timer.

use log::{debug, trace};

use crate::{
    config::{IdRegisters, TimerRegisters},
    csr::CsrBus,
};

/// Countdown timer 0, plus the identification block it needs to convert time into ticks.
#[derive(Debug)]
pub struct Timer<B> {
    bus: B,
    regs: TimerRegisters,
    id: IdRegisters,
}

impl<B> Timer<B>
where
    B: CsrBus,
{
    /// Creates a new timer driver accessing `regs` and `id` through `bus`.
    pub fn new(bus: B, regs: TimerRegisters, id: IdRegisters) -> Self {
        Self { bus, regs, id }
    }

    /// Returns the system clock frequency, in Hz.
    ///
    /// The value is constant for a given SoC, so callers are free to cache it.
    pub fn get_system_frequency(&self) -> u32 {
        self.id.frequency.read(&self.bus)
    }

    /// Starts or stops the countdown. Stopping the timer leaves the counter untouched.
    pub fn set_timer_enabled(&self, enabled: bool) {
        trace!("timer0: enable <- {}", enabled);
        self.regs.en.write(&self.bus, u32::from(enabled));
    }

    /// Returns whether the countdown is running.
    pub fn is_enabled(&self) -> bool {
        self.regs.en.read(&self.bus) != 0
    }

    /// Returns the current count.
    #[inline]
    pub fn get_timer_counter(&self) -> u32 {
        self.regs.count.read(&self.bus)
    }

    /// Loads `value` into the counter.
    pub fn set_timer_counter(&self, value: u32) {
        trace!("timer0: counter <- {:#x}", value);
        self.regs.count.write(&self.bus, value);
    }

    /// Returns the reload value.
    pub fn get_timer_reload(&self) -> u32 {
        self.regs.reload.read(&self.bus)
    }

    /// Sets the reload value. Whether and when it is used is up to the hardware.
    pub fn set_timer_reload(&self, value: u32) {
        trace!("timer0: reload <- {:#x}", value);
        self.regs.reload.write(&self.bus, value);
    }

    /// Blocks the caller for `deciseconds` tenths of a second by spinning on the counter.
    ///
    /// The tick count is `frequency / 10 * deciseconds`, truncated before the multiplication.
    /// The counter must count down to zero; a timer that never reaches zero hangs the caller.
    pub fn busy_wait(&self, deciseconds: u32) {
        self.set_timer_enabled(false);
        self.set_timer_reload(0);

        let ticks = (self.get_system_frequency() / 10).wrapping_mul(deciseconds);
        debug!("timer0: busy wait {} ds ({} ticks)", deciseconds, ticks);

        self.set_timer_counter(ticks);
        self.set_timer_enabled(true);

        while self.get_timer_counter() != 0 {
            core::hint::spin_loop();
        }

        debug!("timer0: busy wait done");
    }

    /// Returns the underlying bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }
}
