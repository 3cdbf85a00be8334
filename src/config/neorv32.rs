//! NEORV32 core integrated in a LiteX SoC. CSRs live in the I/O region at `0xf000_0000`.

use super::RegisterMap;

/// Register map of this platform.
pub const PLATFORM: RegisterMap = RegisterMap::litex(0xf000_0000);
