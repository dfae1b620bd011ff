use rct_codec::{RegionCodecError, RegionDecode, RegionEncode, RegionInput, RegionOutput};
use rct_common::{
    utils::serde::{deserialize_hex_array, serialize_hex_array},
    CORE_MASK_BITS, CORE_MASK_BYTES,
};
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    ops::{BitAnd, BitOr, BitXor, Not},
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaskError {
    #[error("Mask chunk {from}..{to} is not a valid range within 0..80")]
    InvalidChunk { from: u32, to: u32 },
    #[error("Bit index {0} is outside the 80-bit mask")]
    BitOutOfBounds(u32),
}

/// An 80-bit bitmap over the timeslice-offsets of a region; bit `i` set
/// means offset `i` of every timeslice in the region window is owned.
///
/// Bit 0 is the most significant bit of byte 0, so the derived byte-array
/// ordering equals the ordering of the bitmap read as an 80-bit integer.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoreMask(
    #[serde(
        serialize_with = "serialize_hex_array",
        deserialize_with = "deserialize_hex_array"
    )]
    [u8; CORE_MASK_BYTES],
);

impl CoreMask {
    /// The mask with every bit set; full-core ownership.
    pub fn complete() -> Self {
        Self([0xFF; CORE_MASK_BYTES])
    }

    /// The mask with no bit set. This is the "no matching region found"
    /// sentinel; a real region never carries it.
    pub fn void() -> Self {
        Self([0x00; CORE_MASK_BYTES])
    }

    /// Builds the mask with exactly the bits `[from, to)` set.
    pub fn from_chunk(from: u32, to: u32) -> Result<Self, MaskError> {
        if from >= to || to > CORE_MASK_BITS as u32 {
            return Err(MaskError::InvalidChunk { from, to });
        }
        let mut mask = Self::void();
        for i in from..to {
            mask.0[(i / 8) as usize] |= 0x80 >> (i % 8);
        }
        Ok(mask)
    }

    pub fn from_bytes(bytes: [u8; CORE_MASK_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(self) -> [u8; CORE_MASK_BYTES] {
        self.0
    }

    /// Whether bit `index` is set.
    pub fn bit(&self, index: u32) -> Result<bool, MaskError> {
        if index >= CORE_MASK_BITS as u32 {
            return Err(MaskError::BitOutOfBounds(index));
        }
        Ok(self.0[(index / 8) as usize] & (0x80 >> (index % 8)) != 0)
    }

    /// The number of set bits, in `[0, 80]`.
    pub fn count_ones(&self) -> u32 {
        self.0.iter().map(|byte| byte.count_ones()).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.0 == [0xFF; CORE_MASK_BYTES]
    }

    pub fn is_void(&self) -> bool {
        self.0 == [0x00; CORE_MASK_BYTES]
    }

    /// The bitmap read as an 80-bit integer, for packing.
    pub fn to_bits(self) -> u128 {
        self.0
            .iter()
            .fold(0u128, |acc, byte| (acc << 8) | *byte as u128)
    }

    /// Inverse of [`Self::to_bits`]; bits above the 80th are discarded.
    pub fn from_bits(bits: u128) -> Self {
        let mut bytes = [0u8; CORE_MASK_BYTES];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = (bits >> (8 * (CORE_MASK_BYTES - 1 - i))) as u8;
        }
        Self(bytes)
    }
}

impl BitAnd for CoreMask {
    type Output = Self;

    fn bitand(mut self, rhs: Self) -> Self {
        for (byte, other) in self.0.iter_mut().zip(rhs.0) {
            *byte &= other;
        }
        self
    }
}

impl BitOr for CoreMask {
    type Output = Self;

    fn bitor(mut self, rhs: Self) -> Self {
        for (byte, other) in self.0.iter_mut().zip(rhs.0) {
            *byte |= other;
        }
        self
    }
}

impl BitXor for CoreMask {
    type Output = Self;

    fn bitxor(mut self, rhs: Self) -> Self {
        for (byte, other) in self.0.iter_mut().zip(rhs.0) {
            *byte ^= other;
        }
        self
    }
}

impl Not for CoreMask {
    type Output = Self;

    fn not(mut self) -> Self {
        for byte in self.0.iter_mut() {
            *byte = !*byte;
        }
        self
    }
}

impl Display for CoreMask {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl RegionEncode for CoreMask {
    fn size_hint(&self) -> usize {
        CORE_MASK_BYTES
    }

    fn encode_to<T: RegionOutput>(&self, dest: &mut T) -> Result<(), RegionCodecError> {
        dest.write(&self.0);
        Ok(())
    }
}

impl RegionDecode for CoreMask {
    fn decode<I: RegionInput>(input: &mut I) -> Result<Self, RegionCodecError> {
        let mut bytes = [0u8; CORE_MASK_BYTES];
        input.read(&mut bytes)?;
        Ok(Self(bytes))
    }
}
