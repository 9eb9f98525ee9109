use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use dosfs::{BlockDevice, DeviceError, SECTOR_SIZE};

/// A disk image file (or raw floppy device node) opened read-only.
pub struct FileDisk {
    file: File,
}

impl FileDisk {
    pub fn open(path: &Path) -> io::Result<Self> {
        Ok(Self {
            file: File::open(path)?,
        })
    }
}

impl BlockDevice for FileDisk {
    fn read_sector(&mut self, index: u32, dst: &mut [u8; SECTOR_SIZE]) -> Result<(), DeviceError> {
        let offset = u64::from(index) * SECTOR_SIZE as u64;
        self.file
            .seek(SeekFrom::Start(offset))
            .map_err(|_| DeviceError::Io)?;
        // read_exact turns a short read at end of image into an error.
        self.file.read_exact(dst).map_err(|_| DeviceError::Io)
    }
}
