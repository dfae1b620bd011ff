//! Fixed-width big-endian codec for region wire types.
//!
//! Every field has a fixed wire width and is written most-significant
//! byte first, so the byte-wise ordering of an encoding equals the
//! lexicographic ordering of its fields. That property is what lets a
//! packed region id double as an ordered storage key.

use std::mem::size_of;
use thiserror::Error;

/// Region codec error types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegionCodecError {
    #[error("Input error: {0}")]
    Input(String),
    #[error("Field `{field}` exceeds its {max_bits}-bit wire width")]
    FieldOverflow { field: &'static str, max_bits: u32 },
}

/// Trait that allows reading of data into a slice.
pub trait RegionInput {
    /// Read the exact number of bytes required to fill the given buffer.
    fn read(&mut self, into: &mut [u8]) -> Result<(), RegionCodecError>;

    /// Read a single byte from the input.
    fn read_byte(&mut self) -> Result<u8, RegionCodecError> {
        let mut buf = [0u8];
        self.read(&mut buf[..])?;
        Ok(buf[0])
    }

    /// Returns the remaining length of bytes in the input.
    fn remaining_len(&self) -> usize;
}

impl RegionInput for &[u8] {
    fn read(&mut self, into: &mut [u8]) -> Result<(), RegionCodecError> {
        if into.len() > self.len() {
            return Err(RegionCodecError::Input(
                "Not enough data to fill buffer".into(),
            ));
        }
        let len = into.len();
        into.copy_from_slice(&self[..len]);
        *self = &self[len..];
        Ok(())
    }

    fn remaining_len(&self) -> usize {
        self.len()
    }
}

/// Trait that allows writing of data.
pub trait RegionOutput {
    /// Writes to the output.
    fn write(&mut self, bytes: &[u8]);

    /// Writes a single byte to the output.
    fn push_byte(&mut self, byte: u8) {
        self.write(&[byte]);
    }
}

impl RegionOutput for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes)
    }
}

pub trait RegionEncode {
    fn size_hint(&self) -> usize;

    fn encode_to<T: RegionOutput>(&self, dest: &mut T) -> Result<(), RegionCodecError>;

    fn encode(&self) -> Result<Vec<u8>, RegionCodecError> {
        let mut r = Vec::with_capacity(self.size_hint());
        self.encode_to(&mut r)?;
        Ok(r)
    }
}

pub trait RegionDecode {
    fn decode<I: RegionInput>(input: &mut I) -> Result<Self, RegionCodecError>
    where
        Self: Sized;
}

/// Writes `value` as a big-endian field of `bits` width, rejecting values
/// that do not fit. `bits` must be a multiple of 8 and at most 128.
pub fn put_field<T: RegionOutput>(
    dest: &mut T,
    value: u128,
    field: &'static str,
    bits: u32,
) -> Result<(), RegionCodecError> {
    debug_assert!(bits % 8 == 0 && bits <= 128);
    if bits < 128 && value >> bits != 0 {
        return Err(RegionCodecError::FieldOverflow {
            field,
            max_bits: bits,
        });
    }
    let bytes = value.to_be_bytes();
    dest.write(&bytes[16 - (bits / 8) as usize..]);
    Ok(())
}

/// Reads a big-endian field of `bits` width. `bits` must be a multiple of
/// 8 and at most 128.
pub fn read_field<I: RegionInput>(input: &mut I, bits: u32) -> Result<u128, RegionCodecError> {
    debug_assert!(bits % 8 == 0 && bits <= 128);
    let mut bytes = [0u8; 16];
    input.read(&mut bytes[16 - (bits / 8) as usize..])?;
    Ok(u128::from_be_bytes(bytes))
}

macro_rules! impl_region_codec_for_uint {
    ($t:ty) => {
        impl RegionEncode for $t {
            fn size_hint(&self) -> usize {
                size_of::<$t>()
            }

            fn encode_to<T: RegionOutput>(&self, dest: &mut T) -> Result<(), RegionCodecError> {
                dest.write(&self.to_be_bytes());
                Ok(())
            }
        }

        impl RegionDecode for $t {
            fn decode<I: RegionInput>(input: &mut I) -> Result<Self, RegionCodecError> {
                let mut buf = [0u8; size_of::<$t>()];
                input.read(&mut buf)?;
                Ok(<$t>::from_be_bytes(buf))
            }
        }
    };
}

impl_region_codec_for_uint!(u8);
impl_region_codec_for_uint!(u16);
impl_region_codec_for_uint!(u32);
impl_region_codec_for_uint!(u64);
impl_region_codec_for_uint!(u128);

// `None` is a zero tag byte; `Some(x)` is a one tag byte followed by `x`.
impl<V: RegionEncode> RegionEncode for Option<V> {
    fn size_hint(&self) -> usize {
        1 + self.as_ref().map_or(0, |value| value.size_hint())
    }

    fn encode_to<T: RegionOutput>(&self, dest: &mut T) -> Result<(), RegionCodecError> {
        match self {
            None => dest.push_byte(0),
            Some(value) => {
                dest.push_byte(1);
                value.encode_to(dest)?;
            }
        }
        Ok(())
    }
}

impl<V: RegionDecode> RegionDecode for Option<V> {
    fn decode<I: RegionInput>(input: &mut I) -> Result<Self, RegionCodecError> {
        match input.read_byte()? {
            0 => Ok(None),
            1 => Ok(Some(V::decode(input)?)),
            tag => Err(RegionCodecError::Input(format!(
                "Invalid Option tag byte: {tag}"
            ))),
        }
    }
}

impl<const N: usize> RegionEncode for [u8; N] {
    fn size_hint(&self) -> usize {
        N
    }

    fn encode_to<T: RegionOutput>(&self, dest: &mut T) -> Result<(), RegionCodecError> {
        dest.write(self);
        Ok(())
    }
}

impl<const N: usize> RegionDecode for [u8; N] {
    fn decode<I: RegionInput>(input: &mut I) -> Result<Self, RegionCodecError> {
        let mut array = [0u8; N];
        input.read(&mut array)?;
        Ok(array)
    }
}
