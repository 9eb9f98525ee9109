use crate::fat::{CLUSTER_OFFSET, FatError, FatTable};
use crate::{BlockDevice, SECTOR_SIZE};

/// Lazy walk of a cluster chain, yielding one sector per step.
///
/// Each step maps the current cluster to its absolute sector
/// (`cluster + CLUSTER_OFFSET`), reads it, then advances through the FAT.
/// Iteration ends when the cluster is free (`0`), in the end-of-chain
/// family, or the byte budget is exhausted. The FAT itself is not checked
/// for cycles; the budget is the only other bound.
pub struct ClusterChainReader<'a, D: BlockDevice> {
    table: &'a FatTable,
    device: &'a mut D,
    cluster: u16,
    remaining: u32,
}

impl<'a, D: BlockDevice> ClusterChainReader<'a, D> {
    #[must_use]
    pub fn new(table: &'a FatTable, device: &'a mut D, start_cluster: u16, byte_budget: u32) -> Self {
        Self {
            table,
            device,
            cluster: start_cluster,
            remaining: byte_budget,
        }
    }
}

impl<D: BlockDevice> Iterator for ClusterChainReader<'_, D> {
    type Item = Result<[u8; SECTOR_SIZE], FatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cluster == 0 || FatTable::is_end_of_chain(self.cluster) || self.remaining == 0 {
            return None;
        }

        let sector_index = u32::from(self.cluster) + CLUSTER_OFFSET;
        let mut sector = [0u8; SECTOR_SIZE];
        if let Err(e) = self.device.read_sector(sector_index, &mut sector) {
            // A failed read aborts the walk; it is never end-of-chain.
            self.remaining = 0;
            return Some(Err(FatError::Device(e)));
        }

        self.remaining = self.remaining.saturating_sub(SECTOR_SIZE as u32);
        self.cluster = self.table.successor(self.cluster);
        Some(Ok(sector))
    }
}
