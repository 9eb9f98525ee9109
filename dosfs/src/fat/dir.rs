use crate::BlockDevice;
use crate::fat::chain::ClusterChainReader;
use crate::fat::dirent::{DIR_ENTRY_SIZE, DirEntry, DirRecord};
use crate::fat::table::FatTable;
use crate::fat::{DIR_BYTES, FatResult};

/// A materialized directory: the fixed root region or a cluster-chain copy
/// of a subdirectory.
///
/// Views are rebuilt on every navigation step; they are not a cache.
#[derive(Debug, Clone)]
pub struct DirectoryView {
    bytes: Vec<u8>,
}

impl DirectoryView {
    /// Wraps the contiguous root directory region directly. The root is not
    /// cluster-chained.
    #[must_use]
    pub const fn from_root_region(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Reads a subdirectory's cluster chain into a view.
    ///
    /// The chain walk is capped at [`DIR_BYTES`]; the entry's size field is
    /// ignored because subdirectories do not carry a meaningful size.
    ///
    /// ## Errors
    ///
    /// Propagates device read failures.
    pub fn from_chain<D: BlockDevice>(
        table: &FatTable,
        device: &mut D,
        start_cluster: u16,
    ) -> FatResult<Self> {
        let mut bytes = Vec::with_capacity(DIR_BYTES);
        for sector in ClusterChainReader::new(table, device, start_cluster, DIR_BYTES as u32) {
            bytes.extend_from_slice(&sector?);
        }
        Ok(Self { bytes })
    }

    /// Iterates over the real entries of the directory, skipping deleted
    /// slots and long-name continuations, stopping at the first zero name
    /// byte. Yields each entry with its record index.
    #[must_use]
    pub const fn entries(&self) -> Entries<'_> {
        Entries {
            view: self,
            index: 0,
        }
    }

    /// Linear scan for the entry whose 11-byte short name equals `key`.
    #[must_use]
    pub fn find(&self, key: &[u8; 11]) -> Option<(usize, DirEntry)> {
        self.entries().find(|(_, entry)| entry.short_key() == *key)
    }

    /// Assembles the VFAT long name of the entry at record index `index`,
    /// walking backward over the continuation records that precede it.
    ///
    /// Returns `None` if the record is not a real entry or no continuation
    /// precedes it. Assembly is best-effort; checksums are not verified.
    #[must_use]
    pub fn long_name(&self, index: usize) -> Option<String> {
        let DirRecord::Entry(entry) = DirRecord::decode(&self.record(index)?) else {
            return None;
        };

        let mut bytes = Vec::new();
        let mut i = index;
        while i > 0 {
            i -= 1;
            match DirRecord::decode(&self.record(i)?) {
                DirRecord::Continuation(fragment) => {
                    bytes.extend_from_slice(fragment.chars());
                    if fragment.is_last() {
                        break;
                    }
                }
                _ => break,
            }
        }
        if bytes.is_empty() {
            return None;
        }

        // Fragments carry only the low byte of each UCS-2 pair; anything
        // outside printable ASCII ends the name, like NUL padding does.
        let end = bytes
            .iter()
            .position(|&b| b == 0 || b >= 0x80)
            .unwrap_or(bytes.len());
        let mut name: String = bytes[..end].iter().map(|&b| char::from(b)).collect();
        if entry.attributes().is_directory() {
            name.push('/');
        }
        Some(name)
    }

    fn record(&self, index: usize) -> Option<[u8; DIR_ENTRY_SIZE]> {
        let start = index.checked_mul(DIR_ENTRY_SIZE)?;
        let slice = self.bytes.get(start..start + DIR_ENTRY_SIZE)?;
        let mut raw = [0u8; DIR_ENTRY_SIZE];
        raw.copy_from_slice(slice);
        Some(raw)
    }
}

/// Iterator over the real entries of a [`DirectoryView`].
pub struct Entries<'a> {
    view: &'a DirectoryView,
    index: usize,
}

impl Iterator for Entries<'_> {
    type Item = (usize, DirEntry);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let raw = self.view.record(self.index)?;
            let index = self.index;
            self.index += 1;
            match DirRecord::decode(&raw) {
                DirRecord::EndOfEntries => return None,
                DirRecord::Deleted | DirRecord::Continuation(_) => {}
                DirRecord::Entry(entry) => return Some((index, entry)),
            }
        }
    }
}
