//! Slash-separated path resolution and session state.
//!
//! A [`Session`] owns the open device, the decoded boot sector and FAT,
//! the materialized current directory and its display path. Resolution
//! matches typed segments against 11-byte short-name keys only; long
//! names are never consulted for lookup.

use crate::fat::bs::BootSector;
use crate::fat::chain::ClusterChainReader;
use crate::fat::dir::DirectoryView;
use crate::fat::dirent::{DirEntry, encode_short_name};
use crate::fat::table::FatTable;
use crate::fat::{FAT_COPIES, FAT_SECTORS, FatError, FatResult, ROOT_FIRST_SECTOR, ROOT_SECTORS};
use crate::{BlockDevice, SECTOR_SIZE};

/// Outcome of a successful path resolution.
///
/// The final segment's directory is never descended here; committing the
/// move is [`Session::enter`]'s job.
#[derive(Debug, Clone)]
pub enum Resolved {
    /// The path had no segments and names the starting directory itself
    /// (the root when the path began with `/`).
    Directory {
        view: DirectoryView,
        display: String,
    },
    /// The path landed on a directory or file entry.
    Entry { entry: DirEntry, display: String },
}

/// One open navigation session over a FAT12 medium.
pub struct Session<D: BlockDevice> {
    device: D,
    boot: BootSector,
    table: FatTable,
    root: DirectoryView,
    cwd: DirectoryView,
    display: String,
}

impl<D: BlockDevice> Session<D> {
    /// Opens a session: reads the boot sector, the full FAT region and the
    /// root directory region, in that order, before any other access.
    ///
    /// ## Errors
    ///
    /// Returns [`FatError::BadBootSignature`] unless `ignore_signature` is
    /// set, or a device error from the three bulk reads.
    pub fn open(mut device: D, ignore_signature: bool) -> FatResult<Self> {
        let mut first = [0u8; SECTOR_SIZE];
        device.read_sector(0, &mut first)?;
        let boot = BootSector::parse(first, ignore_signature)?;

        let mut fat = vec![0u8; FAT_COPIES * FAT_SECTORS * SECTOR_SIZE];
        device.read_sectors(1, &mut fat)?;
        let table = FatTable::from_region(fat);

        let mut region = vec![0u8; ROOT_SECTORS * SECTOR_SIZE];
        device.read_sectors(ROOT_FIRST_SECTOR, &mut region)?;
        let root = DirectoryView::from_root_region(region);

        Ok(Self {
            device,
            boot,
            table,
            cwd: root.clone(),
            root,
            display: String::from("/"),
        })
    }

    #[must_use]
    #[inline]
    pub const fn boot(&self) -> &BootSector {
        &self.boot
    }

    #[must_use]
    #[inline]
    /// Returns the materialized current directory.
    pub const fn cwd(&self) -> &DirectoryView {
        &self.cwd
    }

    #[must_use]
    #[inline]
    /// Returns the display path of the current directory, `/`-terminated.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Resolves `path` against the current directory, or against the root
    /// when it begins with `/`.
    ///
    /// Each segment is encoded to its short-name key and matched against
    /// the entries of the current view. Intermediate directory matches are
    /// descended through their cluster chains; a cluster of `0` (the `..`
    /// of a first-level subdirectory) descends to the root. The display
    /// path grows by `name/` per directory match, with `.` a no-op and
    /// `..` popping one component.
    ///
    /// ## Errors
    ///
    /// [`FatError::NotFound`] when a segment matches nothing,
    /// [`FatError::NonDirectoryInPath`] when a non-terminal segment names
    /// a file, or a device error from descending.
    pub fn resolve(&mut self, path: &str) -> FatResult<Resolved> {
        let (rest, mut view, mut display) = match path.strip_prefix('/') {
            Some(rest) => (rest, self.root.clone(), String::from("/")),
            None => (path, self.cwd.clone(), self.display.clone()),
        };

        if rest.is_empty() {
            return Ok(Resolved::Directory { view, display });
        }

        let mut parts = rest.split('/');
        let mut segment = parts.next().unwrap_or(rest);
        loop {
            let key = encode_short_name(segment);
            let Some((_, entry)) = view.find(&key) else {
                return Err(FatError::NotFound);
            };

            if entry.attributes().is_directory() {
                if entry.name()[0] == b'.' {
                    if entry.name()[1] == b'.' {
                        pop_component(&mut display);
                    }
                } else {
                    display.push_str(&entry.unix_name());
                }
            }

            let Some(next) = parts.next() else {
                return Ok(Resolved::Entry { entry, display });
            };
            if !entry.attributes().is_directory() {
                return Err(FatError::NonDirectoryInPath);
            }
            view = self.descend(entry.first_cluster())?;
            segment = next;
        }
    }

    /// Commits a resolved destination as the new current directory.
    ///
    /// ## Errors
    ///
    /// [`FatError::NonDirectoryInPath`] when the destination is a file, or
    /// a device error from materializing the directory.
    pub fn enter(&mut self, target: Resolved) -> FatResult<()> {
        match target {
            Resolved::Directory { view, display } => {
                self.cwd = view;
                self.display = display;
            }
            Resolved::Entry { entry, display } => {
                if !entry.attributes().is_directory() {
                    return Err(FatError::NonDirectoryInPath);
                }
                if entry.first_cluster() == 0 {
                    self.enter_root();
                } else {
                    self.cwd = self.descend(entry.first_cluster())?;
                    self.display = display;
                }
            }
        }
        Ok(())
    }

    /// Returns to the root directory without touching the device.
    pub fn enter_root(&mut self) {
        self.cwd = self.root.clone();
        self.display = String::from("/");
    }

    /// Enumerates the current directory in physical order: each real entry
    /// paired with its assembled long name, if one precedes it.
    #[must_use]
    pub fn list(&self) -> Vec<(DirEntry, Option<String>)> {
        self.cwd
            .entries()
            .map(|(index, entry)| (entry, self.cwd.long_name(index)))
            .collect()
    }

    /// Reads a file entry's contents, truncated to its declared size.
    ///
    /// The chain end is authoritative: a chain shorter than the declared
    /// size yields only the sectors the chain covers.
    ///
    /// ## Errors
    ///
    /// Propagates device read failures.
    pub fn read_file(&mut self, entry: &DirEntry) -> FatResult<Vec<u8>> {
        let size = entry.size() as usize;
        let mut out = Vec::new();
        for sector in
            ClusterChainReader::new(&self.table, &mut self.device, entry.first_cluster(), entry.size())
        {
            out.extend_from_slice(&sector?);
        }
        out.truncate(size);
        Ok(out)
    }

    /// Traces an entry's cluster chain through the FAT without reading
    /// data sectors. The final element is the terminator as found in the
    /// table: an end-of-chain marker, or `0` on a broken chain.
    #[must_use]
    pub fn chain_of(&self, entry: &DirEntry) -> Vec<u16> {
        let mut chain = vec![entry.first_cluster()];
        let mut cluster = entry.first_cluster();
        while cluster > 0 && !FatTable::is_end_of_chain(cluster) {
            cluster = self.table.successor(cluster);
            chain.push(cluster);
        }
        chain
    }

    fn descend(&mut self, cluster: u16) -> FatResult<DirectoryView> {
        if cluster == 0 {
            return Ok(self.root.clone());
        }
        DirectoryView::from_chain(&self.table, &mut self.device, cluster)
    }
}

/// Drops the last component of a `/`-terminated display path, never
/// popping past the root.
fn pop_component(display: &mut String) {
    if display.len() > 1 {
        display.pop();
        while display.len() > 1 && !display.ends_with('/') {
            display.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::pop_component;

    #[test]
    fn pop_drops_one_component() {
        let mut display = String::from("/docs/sub/");
        pop_component(&mut display);
        assert_eq!(display, "/docs/");
        pop_component(&mut display);
        assert_eq!(display, "/");
    }

    #[test]
    fn pop_is_bounded_at_root() {
        let mut display = String::from("/");
        pop_component(&mut display);
        assert_eq!(display, "/");
    }
}
