/// The decoded File Allocation Table region.
///
/// Holds the bytes of every on-disk FAT copy; only the first copy is
/// consulted. Entries are 12-bit values packed two per three bytes.
#[derive(Debug, Clone)]
pub struct FatTable {
    bytes: Vec<u8>,
}

impl FatTable {
    /// Highest cluster index the table answers for.
    pub const MAX_CLUSTER: u16 = 2847;
    /// Smallest value of the end-of-chain marker family.
    pub const END_OF_CHAIN: u16 = 0xFF8;

    /// Wraps the raw FAT region bytes.
    ///
    /// `bytes` must cover at least one full FAT copy
    /// ([`crate::fat::FAT_SECTORS`] sectors).
    #[must_use]
    pub fn from_region(bytes: Vec<u8>) -> Self {
        debug_assert!(bytes.len() >= crate::fat::FAT_SECTORS * crate::SECTOR_SIZE);
        Self { bytes }
    }

    /// Returns the next cluster in the chain.
    ///
    /// `0` means free, any value `>= 0xFF8` means end of chain. Clusters
    /// beyond [`Self::MAX_CLUSTER`] answer `0`; callers rely on this to
    /// terminate traversal safely.
    #[must_use]
    pub fn successor(&self, cluster: u16) -> u16 {
        if cluster > Self::MAX_CLUSTER {
            return 0;
        }
        let index = usize::from(cluster) + usize::from(cluster) / 2;
        let pair = u16::from_le_bytes([self.bytes[index], self.bytes[index + 1]]);
        if cluster % 2 == 1 { pair >> 4 } else { pair & 0xFFF }
    }

    #[must_use]
    #[inline]
    /// Returns true if `cluster` is in the end-of-chain marker family.
    pub const fn is_end_of_chain(cluster: u16) -> bool {
        cluster >= Self::END_OF_CHAIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_region() -> Vec<u8> {
        vec![0u8; crate::fat::FAT_SECTORS * crate::SECTOR_SIZE]
    }

    /// Packs `value` into the 12-bit slot for `cluster`, the inverse of
    /// `successor`.
    fn pack(bytes: &mut [u8], cluster: u16, value: u16) {
        let index = usize::from(cluster) + usize::from(cluster) / 2;
        if cluster % 2 == 1 {
            bytes[index] = (bytes[index] & 0x0F) | (((value & 0x0F) as u8) << 4);
            bytes[index + 1] = (value >> 4) as u8;
        } else {
            bytes[index] = (value & 0xFF) as u8;
            bytes[index + 1] = (bytes[index + 1] & 0xF0) | ((value >> 8) as u8 & 0x0F);
        }
    }

    #[test]
    fn even_cluster_takes_low_twelve_bits() {
        let mut region = empty_region();
        pack(&mut region, 4, 0xABC);
        let table = FatTable::from_region(region);
        assert_eq!(table.successor(4), 0xABC);
    }

    #[test]
    fn odd_cluster_takes_high_twelve_bits() {
        let mut region = empty_region();
        pack(&mut region, 5, 0xDEF);
        let table = FatTable::from_region(region);
        assert_eq!(table.successor(5), 0xDEF);
    }

    #[test]
    fn adjacent_clusters_share_bytes() {
        let mut region = empty_region();
        pack(&mut region, 2, 0x123);
        pack(&mut region, 3, 0x456);
        let table = FatTable::from_region(region);
        assert_eq!(table.successor(2), 0x123);
        assert_eq!(table.successor(3), 0x456);
    }

    #[test]
    fn out_of_range_cluster_answers_free() {
        let table = FatTable::from_region(empty_region());
        assert_eq!(table.successor(2848), 0);
        assert_eq!(table.successor(u16::MAX), 0);
    }

    #[test]
    fn table_bound_is_inclusive() {
        let mut region = empty_region();
        pack(&mut region, FatTable::MAX_CLUSTER, 0xFFF);
        let table = FatTable::from_region(region);
        assert_eq!(table.successor(FatTable::MAX_CLUSTER), 0xFFF);
    }

    #[test]
    fn end_of_chain_family() {
        assert!(!FatTable::is_end_of_chain(0xFF7));
        assert!(FatTable::is_end_of_chain(0xFF8));
        assert!(FatTable::is_end_of_chain(0xFFF));
    }
}
