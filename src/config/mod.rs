//! Platform register maps.
//!
//! The active platform is picked at compile time through the `config-*` features.
//! `config-misoc` wins over the default `config-neorv32` when both are enabled.

#![allow(dead_code)]

mod misoc;
mod neorv32;

#[cfg(feature = "config-misoc")]
pub use misoc::PLATFORM;

#[cfg(not(feature = "config-misoc"))]
pub use neorv32::PLATFORM;

use crate::{
    csr::{CsrRegister, CSR_STRIDE, MAX_CSR_WIDTH},
    error::MapError,
};

/// Number of interrupt sources wired to the CPU.
pub const IRQ_SOURCES: usize = 32;

/// Address space reserved for each CSR bank.
pub const CSR_BANK_SIZE: usize = 0x800;

/// CSR bank holding the SoC identification registers.
pub const IDENTIFIER_BANK: usize = 1;

/// CSR bank holding the CPU interrupt controller registers.
pub const CPU_BANK: usize = 2;

/// CSR bank holding the `timer0` registers.
pub const TIMER0_BANK: usize = 3;

/// CPU interrupt controller registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrqRegisters {
    /// Per-source interrupt enable mask.
    pub enable: CsrRegister,
    /// Latched per-source pending flags.
    pub pending: CsrRegister,
}

/// Countdown timer registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerRegisters {
    /// Current count.
    pub count: CsrRegister,
    /// Value reloaded into the counter by the hardware.
    pub reload: CsrRegister,
    /// Enable flag.
    pub en: CsrRegister,
}

/// SoC identification registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdRegisters {
    /// System clock frequency, in Hz.
    pub frequency: CsrRegister,
}

/// Location of every register used by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterMap {
    /// Interrupt controller.
    pub irq: IrqRegisters,
    /// Timer 0.
    pub timer: TimerRegisters,
    /// Identification block.
    pub identifier: IdRegisters,
}

const fn bank(csr_base: usize, bank: usize) -> usize {
    csr_base + bank * CSR_BANK_SIZE
}

const fn csr(bank_base: usize, index: usize, size: usize) -> CsrRegister {
    CsrRegister::new(bank_base + index * CSR_STRIDE, size)
}

impl RegisterMap {
    /// Builds the standard LiteX layout for a CSR region starting at `csr_base`.
    pub const fn litex(csr_base: usize) -> Self {
        let id = bank(csr_base, IDENTIFIER_BANK);
        let cpu = bank(csr_base, CPU_BANK);
        let timer = bank(csr_base, TIMER0_BANK);

        Self {
            irq: IrqRegisters {
                enable: csr(cpu, 0, 4),
                pending: csr(cpu, 4, 4),
            },
            timer: TimerRegisters {
                count: csr(timer, 0, 4),
                reload: csr(timer, 4, 4),
                en: csr(timer, 8, 1),
            },
            identifier: IdRegisters {
                frequency: csr(id, 0, 4),
            },
        }
    }

    /// Returns every register in the map.
    pub const fn registers(&self) -> [CsrRegister; 6] {
        [
            self.irq.enable,
            self.irq.pending,
            self.timer.count,
            self.timer.reload,
            self.timer.en,
            self.identifier.frequency,
        ]
    }

    /// Checks that every register is well-formed and that no two registers overlap.
    pub fn validate(&self) -> Result<(), MapError> {
        let regs = self.registers();

        for reg in &regs {
            if reg.size() == 0 || reg.size() > MAX_CSR_WIDTH {
                return Err(MapError::InvalidWidth(reg.size()));
            }
            if let Some(addr) = reg.addresses().find(|a| a % CSR_STRIDE != 0) {
                return Err(MapError::Unaligned(addr));
            }
        }

        for (i, a) in regs.iter().enumerate() {
            for b in &regs[i + 1..] {
                if let Some(addr) = a.addresses().find(|x| b.addresses().any(|y| y == *x)) {
                    return Err(MapError::Overlap(addr));
                }
            }
        }

        Ok(())
    }
}
