use core::fmt;

/// Error raised while validating a register map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum MapError {
    /// A subregister is not aligned to the CSR stride.
    Unaligned(usize),
    /// A register spans zero or more than four subregisters.
    InvalidWidth(usize),
    /// Two registers share a subregister.
    Overlap(usize),
    /// A subregister falls outside the window served by a bus.
    OutOfWindow(usize),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Unaligned(addr) => write!(f, "unaligned subregister at {:#x}", addr),
            MapError::InvalidWidth(size) => write!(f, "invalid register width: {}", size),
            MapError::Overlap(addr) => write!(f, "overlapping subregister at {:#x}", addr),
            MapError::OutOfWindow(addr) => write!(f, "subregister at {:#x} outside window", addr),
        }
    }
}
