//! Reading primitives shared by the section and instruction decoders.
use crate::core::instruction::{Expr, Instruction};
use crate::decode::instructions::{self, Parsed};
use crate::decode::integer::{DecodeUnsignedError, decode_u32};
use std::any::type_name;
use std::fmt;
use std::io::{self, Cursor, Read};
use thiserror::Error;

/// Reader over a module's bytes. Positions are absolute offsets into the
/// module, which the instruction decoder records on every instruction.
pub(crate) type ByteReader<'a> = Cursor<&'a [u8]>;

pub(crate) fn read_byte<R: Read + ?Sized>(reader: &mut R) -> Result<u8, io::Error> {
    let [b] = read_array(reader)?;
    Ok(b)
}

pub(crate) fn read_array<const N: usize, R: Read + ?Sized>(
    reader: &mut R,
) -> Result<[u8; N], io::Error> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

#[derive(Debug, Error)]
pub enum ParseExpressionError {
    #[error("failed parsing instruction")]
    ParseInstruction(#[from] instructions::ParseError),

    #[error("`else` outside of an `if` block")]
    UnexpectedElse,

    #[error("`delegate` outside of a `try` block")]
    UnexpectedDelegate,
}

/// Decodes an instruction sequence up to the `end` that closes it.
pub(crate) fn decode_expr(reader: &mut ByteReader) -> Result<Expr, ParseExpressionError> {
    let mut expr = Vec::new();
    loop {
        match Instruction::parse(reader)? {
            Parsed::Instruction(ins) => expr.push(ins),
            Parsed::End => return Ok(expr),
            Parsed::Else => return Err(ParseExpressionError::UnexpectedElse),
            Parsed::Delegate(_) => return Err(ParseExpressionError::UnexpectedDelegate),
        }
    }
}

#[derive(Error)]
pub enum DecodeVectorError<E> {
    #[error("failed decoding vector length")]
    DecodeLength(#[from] DecodeUnsignedError),

    #[error("failed parsing vector element at position {position}")]
    ParseElement { position: u32, source: E },
}

// Debug output names the element error type, so nested vector errors stay
// readable in test failures.
impl<E: fmt::Debug> fmt::Debug for DecodeVectorError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DecodeLength(e) => f.debug_tuple("DecodeLength").field(e).finish(),
            Self::ParseElement { position, source } => {
                let full = type_name::<E>();
                let short = full.rsplit("::").next().unwrap_or(full);
                f.debug_struct("ParseElement")
                    .field("position", position)
                    .field("source", &format_args!("{short}::{source:?}"))
                    .finish()
            }
        }
    }
}

// a hostile length prefix must not translate into a huge allocation up front
const MAX_PREALLOCATED: u32 = 1 << 12;

pub(crate) fn decode_vector<R, F, T, E>(
    reader: &mut R,
    mut parse: F,
) -> Result<Vec<T>, DecodeVectorError<E>>
where
    R: Read + ?Sized,
    F: FnMut(&mut R) -> Result<T, E>,
{
    let len = decode_u32(reader)?;
    let mut items = Vec::with_capacity(len.min(MAX_PREALLOCATED) as usize);
    for position in 0..len {
        items.push(
            parse(reader).map_err(|source| DecodeVectorError::ParseElement { position, source })?,
        );
    }
    Ok(items)
}

#[derive(Debug, Error)]
pub enum DecodeByteVectorError {
    #[error("failed decoding vector length")]
    DecodeLength(#[from] DecodeUnsignedError),

    #[error("failed reading vector bytes")]
    Io(#[from] io::Error),

    #[error("byte vector truncated: declared {declared} bytes; found {found}")]
    Truncated { declared: u32, found: usize },
}

pub(crate) fn decode_byte_vector<R: Read + ?Sized>(
    reader: &mut R,
) -> Result<Vec<u8>, DecodeByteVectorError> {
    let declared = decode_u32(reader)?;
    let mut bytes = Vec::with_capacity(declared.min(MAX_PREALLOCATED) as usize);
    let found = reader.take(declared.into()).read_to_end(&mut bytes)?;
    if found != declared as usize {
        return Err(DecodeByteVectorError::Truncated { declared, found });
    }
    Ok(bytes)
}

#[derive(Debug, Error)]
pub enum DecodeNameError {
    #[error(transparent)]
    DecodeBytes(#[from] DecodeByteVectorError),

    #[error("name is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

pub(crate) fn decode_name<R: Read + ?Sized>(reader: &mut R) -> Result<String, DecodeNameError> {
    Ok(String::from_utf8(decode_byte_vector(reader)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_byte_vector() {
        let err = decode_byte_vector(&mut &[5, b'a', b'b'][..]).unwrap_err();
        assert!(matches!(
            err,
            DecodeByteVectorError::Truncated {
                declared: 5,
                found: 2
            }
        ));
    }

    #[test]
    fn invalid_utf8_name() {
        let err = decode_name(&mut &[2, 0xC3, 0x28][..]).unwrap_err();
        assert!(matches!(err, DecodeNameError::InvalidUtf8(_)));
    }

    #[test]
    fn vector_error_debug_names_element_type() {
        let err = decode_vector(&mut &[1, 0x80][..], |r| decode_u32(r)).unwrap_err();
        let debug = format!("{err:?}");
        assert!(debug.starts_with("ParseElement { position: 0, source: DecodeUnsignedError::Io"), "{debug}");
    }
}
