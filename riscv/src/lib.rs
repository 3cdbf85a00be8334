//! This crate provides RISC-V specific data structures and access to the machine-mode
//! status register.
//!
//! Register accessors are only available when building for a RISC-V target; the flag
//! types are always available so that host-side code can reason about register contents.

#![no_std]
#![warn(missing_docs)]
#![deny(missing_debug_implementations)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod registers;

pub use registers::MstatusFlags;

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
pub use registers::Mstatus;
