use crate::CoreMask;
use rct_codec::{
    put_field, read_field, RegionCodecError, RegionDecode, RegionEncode, RegionInput, RegionOutput,
};
use rct_common::{
    AccountId, Balance, CoreIndex, Timeslice, ACCOUNT_ID_SIZE, REGION_BEGIN_BITS, REGION_CORE_BITS,
    REGION_ID_BYTES,
};
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    fmt::{Display, Formatter},
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegionError {
    #[error("Region end {end} must be strictly greater than its begin {begin}")]
    InvalidWindow { begin: Timeslice, end: Timeslice },
    #[error("Partition pivot {pivot} must fall strictly inside the region window")]
    PivotOutOfRange { pivot: Timeslice },
    #[error("Interlace mask must be a non-void proper subset of the region mask")]
    InvalidInterlaceMask,
    #[error("Region price has already been settled")]
    AlreadyPaid,
}

/// The composite key naming a slice of one core's future capacity.
///
/// Identity is structural over all three fields; ordering is the ordering
/// of the packed 128-bit encoding, i.e. lexicographic on
/// `(begin, core, mask)` with `begin` most significant.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionId {
    /// The first timeslice of the region window.
    pub begin: Timeslice,
    /// The core whose capacity the region covers.
    pub core: CoreIndex,
    /// Which timeslice-offsets within the window are owned.
    pub mask: CoreMask,
}

impl RegionId {
    pub fn new(begin: Timeslice, core: CoreIndex, mask: CoreMask) -> Self {
        Self { begin, core, mask }
    }

    /// Checked construction from wider integers, e.g. values arriving from
    /// an external system. Rejects fields that exceed their wire widths
    /// instead of silently truncating.
    pub fn from_parts(begin: u64, core: u32, mask: CoreMask) -> Result<Self, RegionCodecError> {
        if begin >> REGION_BEGIN_BITS != 0 {
            return Err(RegionCodecError::FieldOverflow {
                field: "begin",
                max_bits: REGION_BEGIN_BITS,
            });
        }
        if core >> REGION_CORE_BITS != 0 {
            return Err(RegionCodecError::FieldOverflow {
                field: "core",
                max_bits: REGION_CORE_BITS,
            });
        }
        Ok(Self::new(begin as Timeslice, core as CoreIndex, mask))
    }

    /// Packs the id into a single orderable 128-bit integer, most
    /// significant first: 32 bits `begin`, 16 bits `core`, 80 bits `mask`.
    pub fn to_u128(self) -> u128 {
        (self.begin as u128) << 96 | (self.core as u128) << 80 | self.mask.to_bits()
    }

    /// Inverse of [`Self::to_u128`].
    pub fn from_u128(packed: u128) -> Self {
        Self {
            begin: (packed >> 96) as Timeslice,
            core: (packed >> 80) as CoreIndex,
            mask: CoreMask::from_bits(packed & ((1u128 << 80) - 1)),
        }
    }
}

impl PartialOrd for RegionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RegionId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_u128().cmp(&other.to_u128())
    }
}

impl Display for RegionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(begin: {}, core: {}, mask: {})",
            self.begin, self.core, self.mask
        )
    }
}

impl RegionEncode for RegionId {
    fn size_hint(&self) -> usize {
        REGION_ID_BYTES
    }

    fn encode_to<T: RegionOutput>(&self, dest: &mut T) -> Result<(), RegionCodecError> {
        put_field(dest, self.begin as u128, "begin", REGION_BEGIN_BITS)?;
        put_field(dest, self.core as u128, "core", REGION_CORE_BITS)?;
        self.mask.encode_to(dest)
    }
}

impl RegionDecode for RegionId {
    fn decode<I: RegionInput>(input: &mut I) -> Result<Self, RegionCodecError> {
        Ok(Self {
            begin: read_field(input, REGION_BEGIN_BITS)? as Timeslice,
            core: read_field(input, REGION_CORE_BITS)? as CoreIndex,
            mask: CoreMask::decode(input)?,
        })
    }
}

/// The record stored against a [`RegionId`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RegionRecord {
    /// One past the last timeslice of the region window.
    pub end: Timeslice,
    /// The current owner; changes on transfer, nothing else does.
    pub owner: AccountId,
    /// The settled purchase price. `None` until the purchase finalizes;
    /// set exactly once and never mutated thereafter.
    pub paid: Option<Balance>,
}

impl RegionEncode for RegionRecord {
    fn size_hint(&self) -> usize {
        4 + ACCOUNT_ID_SIZE + self.paid.size_hint()
    }

    fn encode_to<T: RegionOutput>(&self, dest: &mut T) -> Result<(), RegionCodecError> {
        self.end.encode_to(dest)?;
        self.owner.0.encode_to(dest)?;
        self.paid.encode_to(dest)
    }
}

impl RegionDecode for RegionRecord {
    fn decode<I: RegionInput>(input: &mut I) -> Result<Self, RegionCodecError> {
        Ok(Self {
            end: Timeslice::decode(input)?,
            owner: AccountId::new(<[u8; ACCOUNT_ID_SIZE]>::decode(input)?),
            paid: Option::<Balance>::decode(input)?,
        })
    }
}

/// An owned slice of a core's capacity: id plus record. Immutable once
/// finalized, except for ownership transfer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub region_id: RegionId,
    pub record: RegionRecord,
}

impl Region {
    /// Builds an unsettled region; `end` must lie strictly after `begin`.
    pub fn new(region_id: RegionId, end: Timeslice, owner: AccountId) -> Result<Self, RegionError> {
        if end <= region_id.begin {
            return Err(RegionError::InvalidWindow {
                begin: region_id.begin,
                end,
            });
        }
        Ok(Self {
            region_id,
            record: RegionRecord {
                end,
                owner,
                paid: None,
            },
        })
    }

    /// Records the settled purchase price. Callable once.
    pub fn settle(&mut self, price: Balance) -> Result<(), RegionError> {
        if self.record.paid.is_some() {
            return Err(RegionError::AlreadyPaid);
        }
        self.record.paid = Some(price);
        Ok(())
    }

    pub fn transfer(&mut self, new_owner: AccountId) {
        self.record.owner = new_owner;
    }

    /// Splits the region at `pivot` into two regions covering
    /// `[begin, pivot)` and `[pivot, end)` with the same core and mask.
    /// The settled price does not survive a split.
    pub fn partition(self, pivot: Timeslice) -> Result<(Region, Region), RegionError> {
        if pivot <= self.region_id.begin || pivot >= self.record.end {
            return Err(RegionError::PivotOutOfRange { pivot });
        }
        let first = Region::new(self.region_id, pivot, self.record.owner)?;
        let second = Region::new(
            RegionId::new(pivot, self.region_id.core, self.region_id.mask),
            self.record.end,
            self.record.owner,
        )?;
        Ok((first, second))
    }

    /// Splits the region into two with complementary masks over the same
    /// window. `mask` must be a non-void proper subset of the region mask.
    /// The settled price does not survive a split.
    pub fn interlace(self, mask: CoreMask) -> Result<(Region, Region), RegionError> {
        let own = self.region_id.mask;
        if mask.is_void() || mask == own || mask & own != mask {
            return Err(RegionError::InvalidInterlaceMask);
        }
        let first = Region::new(
            RegionId::new(self.region_id.begin, self.region_id.core, mask),
            self.record.end,
            self.record.owner,
        )?;
        let second = Region::new(
            RegionId::new(self.region_id.begin, self.region_id.core, own ^ mask),
            self.record.end,
            self.record.owner,
        )?;
        Ok((first, second))
    }
}

impl RegionEncode for Region {
    fn size_hint(&self) -> usize {
        self.region_id.size_hint() + self.record.size_hint()
    }

    fn encode_to<T: RegionOutput>(&self, dest: &mut T) -> Result<(), RegionCodecError> {
        self.region_id.encode_to(dest)?;
        self.record.encode_to(dest)
    }
}

impl RegionDecode for Region {
    fn decode<I: RegionInput>(input: &mut I) -> Result<Self, RegionCodecError> {
        Ok(Self {
            region_id: RegionId::decode(input)?,
            record: RegionRecord::decode(input)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(byte: u8) -> AccountId {
        AccountId::new([byte; ACCOUNT_ID_SIZE])
    }

    fn region_id(begin: Timeslice, core: CoreIndex) -> RegionId {
        RegionId::new(begin, core, CoreMask::complete())
    }

    #[test]
    fn test_packed_round_trip() {
        let id = RegionId::new(1234, 7, CoreMask::from_chunk(5, 75).unwrap());
        assert_eq!(RegionId::from_u128(id.to_u128()), id);
    }

    #[test]
    fn test_packed_layout() {
        let id = RegionId::new(0x0102_0304, 0x0506, CoreMask::complete());
        let packed = id.to_u128();
        assert_eq!((packed >> 96) as u32, 0x0102_0304);
        assert_eq!((packed >> 80) as u16, 0x0506);
        assert_eq!(packed & ((1u128 << 80) - 1), (1u128 << 80) - 1);
    }

    #[test]
    fn test_packed_order_follows_begin_first() {
        let a = RegionId::new(1, u16::MAX, CoreMask::complete());
        let b = RegionId::new(2, 0, CoreMask::from_chunk(79, 80).unwrap());
        assert!(a.to_u128() < b.to_u128());
        assert!(a < b);

        // Same begin: core decides.
        let c = RegionId::new(2, 1, CoreMask::from_chunk(0, 1).unwrap());
        assert!(b < c);
    }

    #[test]
    fn test_codec_matches_packed_integer() {
        let id = RegionId::new(1234, 7, CoreMask::from_chunk(0, 40).unwrap());
        let encoded = id.encode().unwrap();
        assert_eq!(encoded.len(), REGION_ID_BYTES);
        assert_eq!(encoded, id.to_u128().to_be_bytes().to_vec());
        assert_eq!(RegionId::decode(&mut encoded.as_slice()).unwrap(), id);
    }

    #[test]
    fn test_from_parts_rejects_oversized_fields() {
        let mask = CoreMask::complete();
        assert_eq!(
            RegionId::from_parts(1 << 32, 0, mask),
            Err(RegionCodecError::FieldOverflow {
                field: "begin",
                max_bits: 32
            })
        );
        assert_eq!(
            RegionId::from_parts(0, 1 << 16, mask),
            Err(RegionCodecError::FieldOverflow {
                field: "core",
                max_bits: 16
            })
        );
        assert!(RegionId::from_parts(u32::MAX as u64, u16::MAX as u32, mask).is_ok());
    }

    #[test]
    fn test_region_window_validation() {
        assert_eq!(
            Region::new(region_id(10, 0), 10, owner(1)),
            Err(RegionError::InvalidWindow { begin: 10, end: 10 })
        );
        assert!(Region::new(region_id(10, 0), 11, owner(1)).is_ok());
    }

    #[test]
    fn test_settle_is_once_only() {
        let mut region = Region::new(region_id(0, 0), 30, owner(1)).unwrap();
        region.settle(100).unwrap();
        assert_eq!(region.record.paid, Some(100));
        assert_eq!(region.settle(200), Err(RegionError::AlreadyPaid));
        assert_eq!(region.record.paid, Some(100));
    }

    #[test]
    fn test_transfer_changes_owner_only() {
        let mut region = Region::new(region_id(0, 3), 30, owner(1)).unwrap();
        region.settle(100).unwrap();
        let id = region.region_id;
        region.transfer(owner(2));
        assert_eq!(region.record.owner, owner(2));
        assert_eq!(region.region_id, id);
        assert_eq!(region.record.paid, Some(100));
    }

    #[test]
    fn test_partition() {
        let mut region = Region::new(region_id(10, 0), 40, owner(1)).unwrap();
        region.settle(100).unwrap();
        let (first, second) = region.partition(20).unwrap();

        assert_eq!(first.region_id.begin, 10);
        assert_eq!(first.record.end, 20);
        assert_eq!(second.region_id.begin, 20);
        assert_eq!(second.record.end, 40);
        assert_eq!(first.region_id.core, second.region_id.core);
        assert_eq!(first.region_id.mask, second.region_id.mask);
        // Splitting forfeits the renewal entitlement.
        assert_eq!(first.record.paid, None);
        assert_eq!(second.record.paid, None);
    }

    #[test]
    fn test_partition_rejects_outside_pivot() {
        let region = Region::new(region_id(10, 0), 40, owner(1)).unwrap();
        assert_eq!(
            region.clone().partition(10),
            Err(RegionError::PivotOutOfRange { pivot: 10 })
        );
        assert_eq!(
            region.partition(40),
            Err(RegionError::PivotOutOfRange { pivot: 40 })
        );
    }

    #[test]
    fn test_interlace() {
        let region = Region::new(region_id(10, 0), 40, owner(1)).unwrap();
        let half = CoreMask::from_chunk(0, 40).unwrap();
        let (first, second) = region.interlace(half).unwrap();

        assert_eq!(first.region_id.mask, half);
        assert_eq!(second.region_id.mask, CoreMask::from_chunk(40, 80).unwrap());
        assert_eq!(
            first.region_id.mask | second.region_id.mask,
            CoreMask::complete()
        );
        assert_eq!(first.region_id.begin, second.region_id.begin);
        assert_eq!(first.record.end, second.record.end);
    }

    #[test]
    fn test_interlace_rejects_bad_masks() {
        let half = CoreMask::from_chunk(0, 40).unwrap();
        let region = Region::new(RegionId::new(10, 0, half), 40, owner(1)).unwrap();

        // Void, equal, and non-subset masks are all rejected.
        assert_eq!(
            region.clone().interlace(CoreMask::void()),
            Err(RegionError::InvalidInterlaceMask)
        );
        assert_eq!(
            region.clone().interlace(half),
            Err(RegionError::InvalidInterlaceMask)
        );
        assert_eq!(
            region.interlace(CoreMask::from_chunk(30, 50).unwrap()),
            Err(RegionError::InvalidInterlaceMask)
        );
    }

    #[test]
    fn test_region_codec_round_trip() {
        let mut region = Region::new(
            RegionId::new(7, 2, CoreMask::from_chunk(0, 8).unwrap()),
            37,
            owner(9),
        )
        .unwrap();
        region.settle(12_345).unwrap();

        let encoded = region.encode().unwrap();
        assert_eq!(encoded.len(), region.size_hint());
        assert_eq!(Region::decode(&mut encoded.as_slice()).unwrap(), region);
    }
}
