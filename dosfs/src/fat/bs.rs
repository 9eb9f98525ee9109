use crate::SECTOR_SIZE;
use crate::fat::{FatError, FatResult};

/// The 512-byte boot sector of a FAT12 medium.
///
/// Only the trailing signature bytes are validated. The geometry fields are
/// fixed configuration for this design (see the constants in [`crate::fat`]),
/// not derived from the boot sector.
#[derive(Debug, Clone, Copy)]
pub struct BootSector {
    raw: [u8; SECTOR_SIZE],
}

impl BootSector {
    /// Expected trailing bytes at offsets 510 and 511.
    pub const SIGNATURE: [u8; 2] = [0x55, 0xAA];

    /// Validates the trailing signature and wraps the raw sector.
    ///
    /// With `ignore_signature` set the check is skipped; the caller has
    /// explicitly opted in to continue on a bad signature, never silently.
    ///
    /// ## Errors
    ///
    /// Returns [`FatError::BadBootSignature`] carrying the bytes found.
    pub fn parse(raw: [u8; SECTOR_SIZE], ignore_signature: bool) -> FatResult<Self> {
        let found = [raw[510], raw[511]];
        if found != Self::SIGNATURE && !ignore_signature {
            return Err(FatError::BadBootSignature { found });
        }
        Ok(Self { raw })
    }

    #[must_use]
    #[inline]
    /// Returns the OEM name field.
    pub fn oem_name(&self) -> &[u8] {
        &self.raw[3..11]
    }

    #[must_use]
    #[inline]
    /// Returns the trailing signature bytes as found on the medium.
    pub const fn signature(&self) -> [u8; 2] {
        [self.raw[510], self.raw[511]]
    }
}
