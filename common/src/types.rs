use crate::{
    utils::serde::{deserialize_hex_array, serialize_hex_array},
    ACCOUNT_ID_SIZE,
};
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    ops::{Deref, DerefMut},
};
use thiserror::Error;

/// A counter of fixed-length periods of relay-chain blocks; the atomic
/// unit of sale duration.
pub type Timeslice = u32;

/// Index of one of the parallel execution cores.
pub type CoreIndex = u16;

/// Relay-chain block height.
pub type BlockNumber = u32;

/// Token balance type.
pub type Balance = u64;

/// 32-byte account identifier.
pub type AccountId = ByteArray<ACCOUNT_ID_SIZE>;

#[derive(Debug, Error)]
pub enum CommonTypeError {
    #[error("Failed to convert hexstring into ByteArray<{0}> type")]
    HexToByteArrayConversionError(usize),
    #[error("Failed to convert slice into ByteArray<{0}> type")]
    SliceToByteArrayConversionError(usize),
}

/// A bytes array type of size `N`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteArray<const N: usize>(
    #[serde(
        serialize_with = "serialize_hex_array",
        deserialize_with = "deserialize_hex_array"
    )]
    pub [u8; N],
);

impl<const N: usize> Deref for ByteArray<N> {
    type Target = [u8; N];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<const N: usize> DerefMut for ByteArray<N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<const N: usize> Display for ByteArray<N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl<const N: usize> Default for ByteArray<N> {
    fn default() -> Self {
        Self([0u8; N])
    }
}

impl<const N: usize> From<[u8; N]> for ByteArray<N> {
    fn from(array: [u8; N]) -> Self {
        Self(array)
    }
}

impl<const N: usize> ByteArray<N> {
    pub fn new(data: [u8; N]) -> Self {
        Self(data)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_slice(slice: &[u8]) -> Result<Self, CommonTypeError> {
        let arr = slice
            .try_into()
            .map_err(|_| CommonTypeError::SliceToByteArrayConversionError(N))?;
        Ok(Self(arr))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, CommonTypeError> {
        let hex_stripped = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        if hex_stripped.len() > N * 2 {
            return Err(CommonTypeError::HexToByteArrayConversionError(N));
        }

        // Left-pad short inputs so `0x1` means the same as `0x01`.
        let padded_hex = format!("{:0>width$}", hex_stripped, width = N * 2);
        let octets = hex::decode(padded_hex)
            .map_err(|_| CommonTypeError::HexToByteArrayConversionError(N))?;
        Self::from_slice(&octets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_with_prefix() {
        let array = ByteArray::<4>::from_hex("0xdeadbeef").unwrap();
        assert_eq!(array.0, [0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(array.to_string(), "0xdeadbeef");
    }

    #[test]
    fn test_from_hex_short_input_is_left_padded() {
        let array = ByteArray::<4>::from_hex("ff").unwrap();
        assert_eq!(array.0, [0, 0, 0, 0xff]);
    }

    #[test]
    fn test_from_hex_too_long() {
        assert!(ByteArray::<2>::from_hex("0xaabbcc").is_err());
    }

    #[test]
    fn test_serde_hex_round_trip() {
        let array = ByteArray::<4>::new([1, 2, 3, 4]);
        let json = serde_json::to_string(&array).unwrap();
        assert_eq!(json, "\"0x01020304\"");
        let back: ByteArray<4> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, array);
    }
}
