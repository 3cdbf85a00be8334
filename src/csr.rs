//! Byte-wide control/status register bus and multi-byte register marshaling.
//!
//! LiteX SoCs built with an 8-bit CSR data width expose every register wider than a byte
//! as a group of byte-wide subregisters, laid out [`CSR_STRIDE`] bytes apart with the most
//! significant byte first. [`CsrRegister`] is the only place where values are split into
//! and joined from such groups.

/// Distance in bytes between two consecutive subregisters.
pub const CSR_STRIDE: usize = 4;

/// Maximum number of subregisters a [`CsrRegister`] can span.
pub const MAX_CSR_WIDTH: usize = 4;

/// A bus giving byte-wide access to control/status registers.
///
/// Accesses are side-effectful even when reading, so implementors must not cache or merge them.
pub trait CsrBus {
    /// Reads the subregister at `addr`.
    fn read_u8(&self, addr: usize) -> u8;

    /// Writes `val` into the subregister at `addr`.
    fn write_u8(&self, addr: usize, val: u8);
}

impl<B> CsrBus for &B
where
    B: CsrBus + ?Sized,
{
    #[inline]
    fn read_u8(&self, addr: usize) -> u8 {
        (**self).read_u8(addr)
    }

    #[inline]
    fn write_u8(&self, addr: usize, val: u8) {
        (**self).write_u8(addr, val)
    }
}

/// A register made of `size` byte-wide subregisters, most significant byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsrRegister {
    addr: usize,
    size: usize,
}

impl CsrRegister {
    /// Creates a register whose most significant subregister lives at `addr`.
    pub const fn new(addr: usize, size: usize) -> Self {
        Self { addr, size }
    }

    /// Address of the most significant subregister.
    pub const fn addr(&self) -> usize {
        self.addr
    }

    /// Number of subregisters.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Address of the `i`-th subregister, counting from the most significant one.
    pub const fn subregister(&self, i: usize) -> usize {
        self.addr + i * CSR_STRIDE
    }

    /// Iterates over the subregister addresses in MSB to LSB order.
    pub fn addresses(&self) -> impl Iterator<Item = usize> {
        let reg = *self;
        (0..reg.size).map(move |i| reg.subregister(i))
    }

    /// Mask of the value bits this register can hold.
    pub const fn mask(&self) -> u32 {
        if self.size >= MAX_CSR_WIDTH {
            u32::MAX
        } else {
            (1 << (8 * self.size)) - 1
        }
    }

    /// Reads the subregisters in MSB to LSB order and joins them into a single value.
    pub fn read<B: CsrBus + ?Sized>(&self, bus: &B) -> u32 {
        self.addresses()
            .fold(0, |acc, addr| (acc << 8) | u32::from(bus.read_u8(addr)))
    }

    /// Splits `val` into bytes and writes them in MSB to LSB order.
    ///
    /// Bits that do not fit in the register are discarded. Subregisters above the 32-bit range
    /// of an oversized register are written with zero. The writes are not atomic with respect
    /// to other accesses to the same register.
    pub fn write<B: CsrBus + ?Sized>(&self, bus: &B, val: u32) {
        for (i, addr) in self.addresses().enumerate() {
            let shift = 8 * (self.size - 1 - i) as u32;
            bus.write_u8(addr, val.checked_shr(shift).unwrap_or(0) as u8);
        }
    }
}
