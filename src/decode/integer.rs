//! LEB128 integer decoding.
//!
//! Decoding is bounded by the width of the target type: an N-bit value may
//! use at most ceil(N/7) bytes, and bits of the final byte beyond the width
//! must be zero (unsigned) or copies of the sign bit (signed). Overlong or
//! out-of-range encodings are rejected.
//!
//! <https://www.w3.org/TR/wasm-core-2/#integers>
use crate::decode::read_byte;
use std::io::{self, Read};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeUnsignedError {
    #[error("uint{bits} too large")]
    TooLarge { bits: u32 },

    #[error("uint{bits} representation too long")]
    RepresentationTooLong { bits: u32 },

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Error, Debug)]
pub enum DecodeSignedError {
    #[error("int{bits} incorrect sign extension")]
    IncorrectSignExtension { bits: u32 },

    #[error("int{bits} representation too long")]
    RepresentationTooLong { bits: u32 },

    #[error(transparent)]
    Io(#[from] io::Error),
}

const fn max_len(bits: u32) -> u32 {
    bits.div_ceil(7)
}

/// Decodes an unsigned integer of at most `bits` (1..=64) bits.
pub fn decode_unsigned<R: Read + ?Sized>(
    reader: &mut R,
    bits: u32,
) -> Result<u64, DecodeUnsignedError> {
    let last = max_len(bits) - 1;
    let mut result: u64 = 0;

    for i in 0..=last {
        let byte = read_byte(reader)?;
        let payload = byte & 0b0111_1111 /* 0x7F */;
        result |= u64::from(payload) << (7 * i);

        if byte & 0b1000_0000 /* 0x80 */ == 0 {
            // the final permitted byte only carries the bits left over after
            // the previous groups of 7; anything above them must be zero
            if i == last && payload >> (bits - 7 * last) != 0 {
                return Err(DecodeUnsignedError::TooLarge { bits });
            }
            return Ok(result);
        }
    }

    Err(DecodeUnsignedError::RepresentationTooLong { bits })
}

/// Decodes a two's complement integer of at most `bits` (1..=64) bits.
pub fn decode_signed<R: Read + ?Sized>(reader: &mut R, bits: u32) -> Result<i64, DecodeSignedError> {
    let last = max_len(bits) - 1;
    let mut result: i64 = 0;
    let mut shift: u32 = 0;

    for i in 0..=last {
        let byte = read_byte(reader)?;
        let payload = byte & 0b0111_1111 /* 0x7F */;
        result |= i64::from(payload) << shift;
        shift += 7;

        if byte & 0b1000_0000 /* 0x80 */ == 0 {
            if i == last {
                // the sign bit and every unused bit above it must agree
                let used = bits - 7 * last;
                let extension = payload >> (used - 1);
                if extension != 0 && extension != 0b0111_1111 >> (used - 1) {
                    return Err(DecodeSignedError::IncorrectSignExtension { bits });
                }
            }

            if shift < 64 && byte & 0b0100_0000 /* 0x40 */ != 0 {
                result |= !0 << shift;
            }
            return Ok(result);
        }
    }

    Err(DecodeSignedError::RepresentationTooLong { bits })
}

pub fn decode_u32<R: Read + ?Sized>(reader: &mut R) -> Result<u32, DecodeUnsignedError> {
    let v = decode_unsigned(reader, 32)?;
    u32::try_from(v).map_err(|_| DecodeUnsignedError::TooLarge { bits: 32 })
}

pub fn decode_u64<R: Read + ?Sized>(reader: &mut R) -> Result<u64, DecodeUnsignedError> {
    decode_unsigned(reader, 64)
}

pub fn decode_i32<R: Read + ?Sized>(reader: &mut R) -> Result<i32, DecodeSignedError> {
    let v = decode_signed(reader, 32)?;
    i32::try_from(v).map_err(|_| DecodeSignedError::IncorrectSignExtension { bits: 32 })
}

pub fn decode_i64<R: Read + ?Sized>(reader: &mut R) -> Result<i64, DecodeSignedError> {
    decode_signed(reader, 64)
}

/// Signed 33-bit integers only occur as block type indices.
pub fn decode_s33<R: Read + ?Sized>(reader: &mut R) -> Result<i64, DecodeSignedError> {
    decode_signed(reader, 33)
}
