//! Interrupt and timer support for LiteX SoCs built around a RISC-V CPU.
//!
//! Every operation maps directly onto control/status registers. Drivers never touch memory
//! themselves: they go through a [`CsrBus`](csr::CsrBus), which is [`MmioBus`](mmio::MmioBus)
//! on real hardware and [`SimBus`](sim::SimBus) when running on the host.
//!
//! # Features
//!
//!  - `config-neorv32` (default): NEORV32 register map
//!  - `config-misoc`: classic MiSoC register map, takes precedence over `config-neorv32`

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

/// Architecture-specific functions.
pub mod arch;

pub mod config;

pub mod csr;

/// Error types.
pub mod error;

pub mod irq;

/// Memory-mapped register access.
pub mod mmio;

pub mod sim;

pub mod timer;

pub use error::MapError;
pub use irq::{InterruptControl, IrqSources, StatusRegister};
pub use timer::Timer;

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
pub use soc::Soc;

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
mod soc {
    use core::sync::atomic::{AtomicBool, Ordering};

    use crate::{
        arch::Machine, config::PLATFORM, irq::InterruptControl, mmio::MmioBus, timer::Timer,
    };

    static TAKEN: AtomicBool = AtomicBool::new(false);

    /// Drivers for the platform selected at build time.
    #[derive(Debug)]
    pub struct Soc {
        /// CPU interrupt controller.
        pub irq: InterruptControl<MmioBus, Machine>,
        /// Timer 0.
        pub timer: Timer<MmioBus>,
    }

    impl Soc {
        /// Returns the platform drivers the first time it is called, `None` afterwards.
        pub fn take() -> Option<Self> {
            if TAKEN.swap(true, Ordering::AcqRel) {
                return None;
            }
            // SAFETY: first and only handout of the platform registers
            Some(unsafe { Self::steal() })
        }

        /// Returns the platform drivers unconditionally.
        ///
        /// # Safety
        ///
        /// Drivers obtained this way alias any other instance; the caller must serialize accesses.
        pub unsafe fn steal() -> Self {
            TAKEN.store(true, Ordering::Release);

            // SAFETY: `PLATFORM` describes the CSRs of the SoC this crate was configured for
            unsafe {
                Self {
                    irq: InterruptControl::new(MmioBus::new(), Machine::new(), PLATFORM.irq),
                    timer: Timer::new(MmioBus::new(), PLATFORM.timer, PLATFORM.identifier),
                }
            }
        }
    }
}
