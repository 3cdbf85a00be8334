//! Simulated SoC registers, for exercising drivers off-target.
//!
//! [`SimBus`] serves a window of four CSR banks and models the behaviour the drivers rely on:
//! read-only identification and pending registers, an interrupt mask limited to the
//! implemented sources and a countdown timer. [`SimStatus`] stands in for `mstatus`.

use core::{
    cell::Cell,
    sync::atomic::{AtomicUsize, Ordering},
};

use log::warn;
use riscv::MstatusFlags;
use spin::Mutex;

use crate::{
    config::{RegisterMap, CSR_BANK_SIZE, IRQ_SOURCES},
    csr::{CsrBus, CsrRegister, CSR_STRIDE},
    error::MapError,
    irq::StatusRegister,
};

/// Number of CSR banks served by a [`SimBus`].
pub const SIM_BANKS: usize = 4;

const WINDOW_BYTES: usize = SIM_BANKS * CSR_BANK_SIZE;
const SLOTS: usize = WINDOW_BYTES / CSR_STRIDE;

/// Raw subregister storage.
struct Window {
    base: usize,
    slots: [Cell<u8>; SLOTS],
}

impl Window {
    fn slot(&self, addr: usize) -> Option<&Cell<u8>> {
        let offset = addr.checked_sub(self.base)?;
        if offset % CSR_STRIDE != 0 {
            return None;
        }
        self.slots.get(offset / CSR_STRIDE)
    }
}

impl CsrBus for Window {
    fn read_u8(&self, addr: usize) -> u8 {
        match self.slot(addr) {
            Some(slot) => slot.get(),
            None => {
                warn!("sim: read from unmapped subregister {:#x}", addr);
                0
            }
        }
    }

    fn write_u8(&self, addr: usize, val: u8) {
        match self.slot(addr) {
            Some(slot) => slot.set(val),
            None => warn!("sim: dropped write {:#04x} to unmapped {:#x}", val, addr),
        }
    }
}

struct State {
    window: Window,
    irq_sources: usize,
    tick_step: u32,
    ticks_loaded: Option<u32>,
}

/// A simulated CSR bus.
pub struct SimBus {
    map: RegisterMap,
    state: Mutex<State>,
}

impl core::fmt::Debug for SimBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SimBus").field("map", &self.map).finish()
    }
}

impl SimBus {
    /// Creates a simulated SoC laid out according to `map`, clocked at `frequency` Hz.
    ///
    /// Every register of `map` must fit in [`SIM_BANKS`] consecutive CSR banks.
    pub fn new(map: RegisterMap, frequency: u32) -> Result<Self, MapError> {
        map.validate()?;

        let lowest = map
            .registers()
            .iter()
            .map(CsrRegister::addr)
            .min()
            .unwrap_or(0);
        let base = lowest - lowest % CSR_BANK_SIZE;

        for reg in map.registers().iter() {
            if let Some(addr) = reg.addresses().find(|a| *a - base >= WINDOW_BYTES) {
                return Err(MapError::OutOfWindow(addr));
            }
        }

        let window = Window {
            base,
            slots: core::array::from_fn(|_| Cell::new(0)),
        };
        map.identifier.frequency.write(&window, frequency);

        Ok(Self {
            map,
            state: Mutex::new(State {
                window,
                irq_sources: IRQ_SOURCES,
                tick_step: 1,
                ticks_loaded: None,
            }),
        })
    }

    /// Returns the register map this bus was built from.
    pub fn map(&self) -> &RegisterMap {
        &self.map
    }

    /// Changes the value reported by the identification registers.
    pub fn set_frequency(&self, frequency: u32) {
        let st = self.state.lock();
        self.map.identifier.frequency.write(&st.window, frequency);
    }

    /// Limits the interrupt mask to the `n` lowest sources.
    pub fn set_irq_sources(&self, n: usize) {
        self.state.lock().irq_sources = n;
    }

    /// Sets how many ticks elapse between two reads of the running counter.
    pub fn set_tick_step(&self, step: u32) {
        self.state.lock().tick_step = step;
    }

    /// Latches `sources` as pending.
    pub fn raise(&self, sources: u32) {
        let st = self.state.lock();
        let pending = self.map.irq.pending;
        let v = pending.read(&st.window);
        pending.write(&st.window, v | sources);
    }

    /// Clears the pending flags of `sources`.
    pub fn acknowledge(&self, sources: u32) {
        let st = self.state.lock();
        let pending = self.map.irq.pending;
        let v = pending.read(&st.window);
        pending.write(&st.window, v & !sources);
    }

    /// Returns the counter value at the last time the timer was started.
    pub fn ticks_loaded(&self) -> Option<u32> {
        self.state.lock().ticks_loaded
    }

    /// Reads a subregister without triggering any side effect.
    pub fn peek(&self, addr: usize) -> u8 {
        self.state.lock().window.read_u8(addr)
    }

    fn implemented_mask(irq_sources: usize) -> u32 {
        if irq_sources >= 32 {
            u32::MAX
        } else {
            (1 << irq_sources) - 1
        }
    }

    fn tick(&self, st: &State) {
        let timer = &self.map.timer;
        if timer.en.read(&st.window) == 0 {
            return;
        }

        let mut count = timer.count.read(&st.window).saturating_sub(st.tick_step);
        if count == 0 {
            let reload = timer.reload.read(&st.window);
            if reload != 0 {
                count = reload;
            }
        }
        timer.count.write(&st.window, count);
    }
}

fn position(reg: &CsrRegister, addr: usize) -> Option<usize> {
    reg.addresses().position(|a| a == addr)
}

impl CsrBus for SimBus {
    fn read_u8(&self, addr: usize) -> u8 {
        let st = self.state.lock();

        if addr == self.map.timer.count.addr() {
            self.tick(&st);
        }
        st.window.read_u8(addr)
    }

    fn write_u8(&self, addr: usize, mut val: u8) {
        let mut st = self.state.lock();
        let map = &self.map;

        if position(&map.identifier.frequency, addr).is_some()
            || position(&map.irq.pending, addr).is_some()
        {
            warn!("sim: dropped write to read-only subregister {:#x}", addr);
            return;
        }

        let enable = &map.irq.enable;
        if let Some(i) = position(enable, addr) {
            let shift = 8 * (enable.size() - 1 - i);
            val &= (Self::implemented_mask(st.irq_sources) >> shift) as u8;
        }

        if addr == map.timer.en.addr() && val != 0 && map.timer.en.read(&st.window) == 0 {
            st.ticks_loaded = Some(map.timer.count.read(&st.window));
        }

        st.window.write_u8(addr, val);
    }
}

/// A simulated `mstatus` register.
#[derive(Debug, Default)]
pub struct SimStatus(AtomicUsize);

impl SimStatus {
    /// Creates a status register with every flag cleared.
    pub const fn new() -> Self {
        Self(AtomicUsize::new(0))
    }
}

impl StatusRegister for SimStatus {
    fn read(&self) -> MstatusFlags {
        MstatusFlags::from_bits_truncate(self.0.load(Ordering::SeqCst))
    }

    fn set(&self, flags: MstatusFlags) {
        self.0.fetch_or(flags.bits(), Ordering::SeqCst);
    }

    fn clear(&self, flags: MstatusFlags) {
        self.0.fetch_and(!flags.bits(), Ordering::SeqCst);
    }

    fn clear_and_read(&self, flags: MstatusFlags) -> MstatusFlags {
        MstatusFlags::from_bits_truncate(self.0.fetch_and(!flags.bits(), Ordering::SeqCst))
    }
}
