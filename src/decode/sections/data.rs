use crate::core::indices::MemIdx;
use crate::core::{Data, DataMode};
use crate::decode::ByteReader;
use crate::decode::helpers::{
    DecodeByteVectorError, DecodeVectorError, ParseExpressionError, decode_byte_vector,
    decode_expr, decode_vector,
};
use crate::decode::indices::DecodeIndexError;
use crate::decode::integer::{DecodeUnsignedError, decode_u32};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed decoding Data section")]
pub struct DecodeDataSectionError(#[from] pub DecodeVectorError<DecodeDataSegmentError>);

pub(crate) fn decode_data_section(
    reader: &mut ByteReader,
) -> Result<Vec<Data>, DecodeDataSectionError> {
    Ok(decode_vector(reader, parse_data)?)
}

#[derive(Debug, Error)]
pub enum DecodeDataSegmentError {
    #[error("failed decoding bitfield")]
    DecodeBitfield(DecodeUnsignedError),

    #[error("invalid bitfield: expected 0 (active), 1 (passive) or 2 (active with memory); got {0}")]
    InvalidBitfield(u32),

    #[error("failed decoding offset expression")]
    DecodeOffsetExpr(ParseExpressionError),

    #[error("failed decoding init byte vector")]
    DecodeInitVector(#[from] DecodeByteVectorError),

    #[error(transparent)]
    DecodeMemIdx(#[from] DecodeIndexError),
}

fn parse_data(reader: &mut ByteReader) -> Result<Data, DecodeDataSegmentError> {
    let mode = match decode_u32(reader).map_err(DecodeDataSegmentError::DecodeBitfield)? {
        0 => DataMode::Active {
            offset: decode_expr(reader).map_err(DecodeDataSegmentError::DecodeOffsetExpr)?,
        },
        1 => DataMode::Passive,
        2 => {
            let memory = MemIdx::decode(reader)?;
            let offset = decode_expr(reader).map_err(DecodeDataSegmentError::DecodeOffsetExpr)?;
            DataMode::ActiveWithMemory { memory, offset }
        }
        n => return Err(DecodeDataSegmentError::InvalidBitfield(n)),
    };

    Ok(Data {
        mode,
        init: decode_byte_vector(reader)?,
    })
}
