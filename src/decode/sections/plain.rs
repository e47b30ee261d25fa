//! Sections whose payload is a vector of one entity type, plus the Start
//! and DataCount sections, which hold a single number.
use crate::core::indices::{FuncIdx, TypeIdx};
use crate::core::types::{FuncType, MemType, TableType};
use crate::decode::helpers::{DecodeVectorError, decode_vector};
use crate::decode::indices::DecodeIndexError;
use crate::decode::integer::{DecodeUnsignedError, decode_u32};
use crate::decode::types::{DecodeFuncTypeError, DecodeMemTypeError, DecodeTableTypeError};
use std::io::Read;
use thiserror::Error;

macro_rules! vector_section {
    ($(#[$doc:meta])* $decode:ident -> Vec<$item:ty>, $error:ident($item_error:ty), $name:literal) => {
        #[derive(Debug, Error)]
        #[error("failed decoding {name} section", name = $name)]
        pub struct $error(#[from] pub DecodeVectorError<$item_error>);

        $(#[$doc])*
        pub(crate) fn $decode<R: Read + ?Sized>(reader: &mut R) -> Result<Vec<$item>, $error> {
            Ok(decode_vector(reader, <$item>::decode)?)
        }
    };
}

vector_section!(
    decode_type_section -> Vec<FuncType>,
    DecodeTypeSectionError(DecodeFuncTypeError),
    "Type"
);

vector_section!(
    /// Decodes the type index of every function the module defines. Bodies
    /// live in the Code section, in the same order.
    decode_function_section -> Vec<TypeIdx>,
    DecodeFunctionSectionError(DecodeIndexError),
    "Function"
);

vector_section!(
    decode_table_section -> Vec<TableType>,
    DecodeTableSectionError(DecodeTableTypeError),
    "Table"
);

vector_section!(
    decode_memory_section -> Vec<MemType>,
    DecodeMemorySectionError(DecodeMemTypeError),
    "Memory"
);

#[derive(Debug, Error)]
#[error("failed decoding Start section")]
pub struct DecodeStartSectionError(#[from] pub DecodeIndexError);

pub(crate) fn decode_start_section<R: Read + ?Sized>(
    reader: &mut R,
) -> Result<FuncIdx, DecodeStartSectionError> {
    Ok(FuncIdx::decode(reader)?)
}

#[derive(Debug, Error)]
#[error("failed decoding DataCount section")]
pub struct DecodeDataCountSectionError(#[from] pub DecodeUnsignedError);

/// The number of data segments, declared ahead of the Code section.
pub(crate) fn decode_data_count_section<R: Read + ?Sized>(
    reader: &mut R,
) -> Result<u32, DecodeDataCountSectionError> {
    Ok(decode_u32(reader)?)
}
