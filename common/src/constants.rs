use crate::BlockNumber;

/// The number of relay-chain blocks in one timeslice.
pub const TIMESLICE_PERIOD: BlockNumber = 80;

/// The width of a core ownership bitmap, in bits.
pub const CORE_MASK_BITS: usize = 80;

/// The width of a core ownership bitmap, in octets.
pub const CORE_MASK_BYTES: usize = CORE_MASK_BITS / 8;

/// The width of the `begin` field of a packed region id, in bits.
pub const REGION_BEGIN_BITS: u32 = 32;

/// The width of the `core` field of a packed region id, in bits.
pub const REGION_CORE_BITS: u32 = 16;

/// The size of a packed region id, in octets.
pub const REGION_ID_BYTES: usize = 16;

/// The size of an account identifier, in octets.
pub const ACCOUNT_ID_SIZE: usize = 32;

/// The denominator of core occupancy proportions; one full core is
/// 57 600 parts, which is divisible by 80, 3 and 5.
pub const CORE_PARTS: u32 = 57_600;

/// Default number of schedulable cores offered per sale cycle.
pub const DEFAULT_CORE_COUNT: u16 = 10;
