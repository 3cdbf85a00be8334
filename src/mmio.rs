use core::cell::UnsafeCell;

use crate::csr::CsrBus;

/// A memory-mapped CSR subregister: one 32-bit word carrying a single meaningful byte.
#[repr(transparent)]
pub struct CsrCell {
    word: UnsafeCell<u32>,
}

impl CsrCell {
    /// Creates a cell holding `byte` in its low lane.
    pub const fn new(byte: u8) -> Self {
        Self {
            word: UnsafeCell::new(byte as u32),
        }
    }

    /// Loads the word and keeps its low byte.
    #[inline(always)]
    pub fn load(&self) -> u8 {
        // SAFETY: same considerations as [`ptr::read_volatile`].
        unsafe { self.word.get().read_volatile() as u8 }
    }

    /// Stores `byte` zero-extended to a full word, as the CSR bus expects.
    #[inline(always)]
    pub fn store(&self, byte: u8) {
        // SAFETY: same considerations as [`ptr::write_volatile`].
        unsafe { self.word.get().write_volatile(u32::from(byte)) }
    }
}

/// CSR bus backed by memory-mapped I/O.
#[derive(Debug)]
pub struct MmioBus {
    _private: (),
}

impl MmioBus {
    /// Creates a new MMIO bus.
    ///
    /// # Safety
    ///
    /// Every address later passed to [`CsrBus`] methods must be a mapped, word-aligned CSR.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }

    #[inline(always)]
    fn cell(&self, addr: usize) -> &CsrCell {
        // SAFETY: the caller of `new` vouched for every address handed to this bus
        unsafe { &*(addr as *const CsrCell) }
    }
}

impl CsrBus for MmioBus {
    #[inline]
    fn read_u8(&self, addr: usize) -> u8 {
        self.cell(addr).load()
    }

    #[inline]
    fn write_u8(&self, addr: usize, val: u8) {
        self.cell(addr).store(val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csr::CsrRegister;

    #[test]
    fn cell_keeps_low_byte() {
        let cell = CsrCell::new(5);
        assert_eq!(cell.load(), 5);

        cell.store(0xa5);
        assert_eq!(cell.load(), 0xa5);
        // SAFETY: no other reference to the word is live
        assert_eq!(unsafe { *cell.word.get() }, 0xa5);
    }

    #[test]
    fn bus_over_plain_memory() {
        let words = [CsrCell::new(0), CsrCell::new(0), CsrCell::new(0), CsrCell::new(0)];
        let base = words.as_ptr() as usize;
        // SAFETY: `words` outlives the bus and every access stays inside it
        let bus = unsafe { MmioBus::new() };

        CsrRegister::new(base, 4).write(&bus, 0xcafe_f00d);

        let raw = words.iter().map(CsrCell::load).collect::<std::vec::Vec<_>>();
        assert_eq!(raw, [0xca, 0xfe, 0xf0, 0x0d]);
        assert_eq!(CsrRegister::new(base, 4).read(&bus), 0xcafe_f00d);
    }
}
