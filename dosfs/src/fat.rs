//! FAT12 on-disk format decoding and path navigation.
use thiserror::Error;

use crate::DeviceError;

pub mod bs;
pub mod chain;
pub mod date;
pub mod dir;
pub mod dirent;
pub mod path;
pub mod table;

pub use bs::BootSector;
pub use chain::ClusterChainReader;
pub use dir::DirectoryView;
pub use dirent::{Attributes, DirEntry, DirRecord, LongNameFragment};
pub use path::{Resolved, Session};
pub use table::FatTable;

/// Sectors per FAT copy.
pub const FAT_SECTORS: usize = 9;
/// FAT copies on the medium. Only the first copy is trusted.
pub const FAT_COPIES: usize = 2;
/// Sectors of the fixed root directory region.
pub const ROOT_SECTORS: usize = 14;
/// Maximum clusters a subdirectory may occupy.
pub const DIR_CLUSTERS: usize = 4;
/// Maximum subdirectory size in bytes.
pub const DIR_BYTES: usize = DIR_CLUSTERS * crate::SECTOR_SIZE;
/// Cluster `N` lives at absolute sector `N + CLUSTER_OFFSET`.
pub const CLUSTER_OFFSET: u32 = 31;
/// First sector of the fixed root directory region, right after the FAT
/// copies.
pub const ROOT_FIRST_SECTOR: u32 = 1 + (FAT_COPIES * FAT_SECTORS) as u32;

#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum FatError {
    /// Device read failure. Aborts the in-progress operation only,
    /// never the session.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
    /// The boot sector does not end in `0x55 0xAA`.
    #[error("wrong boot sector flag {found:#04x?}")]
    BadBootSignature { found: [u8; 2] },
    /// No directory entry matches a path segment.
    #[error("file not found")]
    NotFound,
    /// A non-terminal path segment names a file.
    #[error("non-dir in path")]
    NonDirectoryInPath,
}

pub type FatResult<T> = Result<T, FatError>;
