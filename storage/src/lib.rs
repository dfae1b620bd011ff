//! Region persistence keyed by the packed 128-bit region id.
//!
//! Stores must preserve packed-integer ordering: `(begin, core, mask)`
//! lexicographic order, which makes a single ordered index serve both
//! point lookups and "all regions starting at or after T" range scans.

use rct_common::Timeslice;
use rct_types::{Region, RegionId, RegionRecord};
use std::collections::BTreeMap;

/// The storage collaborator seam. Absence is expressed as `None`, never
/// as a void-mask region.
pub trait RegionStore {
    /// Inserts a region, returning the previous record under the same id.
    fn insert(&mut self, region: Region) -> Option<RegionRecord>;

    fn get(&self, region_id: &RegionId) -> Option<&RegionRecord>;

    fn remove(&mut self, region_id: &RegionId) -> Option<RegionRecord>;

    /// All regions whose window starts at or after `begin`, in packed
    /// order.
    fn regions_from(&self, begin: Timeslice) -> Vec<Region>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory store over a `BTreeMap`; iteration order is packed order.
#[derive(Debug, Default, Clone)]
pub struct MemoryRegionStore {
    regions: BTreeMap<u128, RegionRecord>,
}

impl MemoryRegionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored regions in packed order.
    pub fn iter(&self) -> impl Iterator<Item = Region> + '_ {
        self.regions.iter().map(|(packed, record)| Region {
            region_id: RegionId::from_u128(*packed),
            record: record.clone(),
        })
    }
}

impl RegionStore for MemoryRegionStore {
    fn insert(&mut self, region: Region) -> Option<RegionRecord> {
        self.regions
            .insert(region.region_id.to_u128(), region.record)
    }

    fn get(&self, region_id: &RegionId) -> Option<&RegionRecord> {
        self.regions.get(&region_id.to_u128())
    }

    fn remove(&mut self, region_id: &RegionId) -> Option<RegionRecord> {
        self.regions.remove(&region_id.to_u128())
    }

    fn regions_from(&self, begin: Timeslice) -> Vec<Region> {
        // Every id with `begin` in its top 32 bits sorts at or after this.
        let from = (begin as u128) << 96;
        self.regions
            .range(from..)
            .map(|(packed, record)| Region {
                region_id: RegionId::from_u128(*packed),
                record: record.clone(),
            })
            .collect()
    }

    fn len(&self) -> usize {
        self.regions.len()
    }
}
