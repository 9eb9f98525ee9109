//! Read-only navigation of FAT12 disk images.
//!
//! The crate decodes the on-disk format (boot sector, nibble-packed FAT,
//! 8.3 directory records and their VFAT long-name extension) and resolves
//! slash-separated paths against it. Raw block I/O is abstracted behind
//! [`BlockDevice`]; the medium is treated as static for the whole session.
#![warn(clippy::pedantic, clippy::nursery)]

use thiserror::Error;

pub mod fat;

/// Size of one sector in bytes.
pub const SECTOR_SIZE: usize = 512;

#[derive(Debug, Error, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum DeviceError {
    #[error("I/O error")]
    Io,
    #[error("Out of bounds")]
    OutOfBounds,
}

/// A read-only sector-addressed device backing a FAT12 volume.
pub trait BlockDevice {
    /// Read the sector at `index` (absolute, zero-based) into `dst`.
    ///
    /// ## Errors
    ///
    /// Returns an error on a short or failed read. A failed read must never
    /// be reinterpreted as end-of-data by callers.
    fn read_sector(&mut self, index: u32, dst: &mut [u8; SECTOR_SIZE]) -> Result<(), DeviceError>;

    /// Read consecutive sectors starting at `first` into `dst`.
    ///
    /// `dst.len()` must be a multiple of [`SECTOR_SIZE`]. Used for the bulk
    /// session-start reads (FAT region, root directory region).
    ///
    /// ## Errors
    ///
    /// Returns an error if any underlying sector read fails.
    fn read_sectors(&mut self, first: u32, dst: &mut [u8]) -> Result<(), DeviceError> {
        for (i, chunk) in dst.chunks_exact_mut(SECTOR_SIZE).enumerate() {
            let mut sector = [0u8; SECTOR_SIZE];
            self.read_sector(first + u32::try_from(i).map_err(|_| DeviceError::OutOfBounds)?, &mut sector)?;
            chunk.copy_from_slice(&sector);
        }
        Ok(())
    }
}
