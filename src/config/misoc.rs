//! Classic MiSoC-style layout with CSRs at `0xe000_0000`.

use super::RegisterMap;

/// Register map of this platform.
pub const PLATFORM: RegisterMap = RegisterMap::litex(0xe000_0000);
