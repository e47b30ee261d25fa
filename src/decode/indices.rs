//! Index decoding. Every index space uses the same u32 encoding, so one
//! error type covers them all and names the space that failed.
//!
//! <https://www.w3.org/TR/wasm-core-2/#binary-indices>
use crate::core::indices::{FuncIdx, MemIdx, TableIdx, TypeIdx};
use crate::decode::integer::{DecodeUnsignedError, decode_u32};
use std::io::Read;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed decoding {space} index")]
pub struct DecodeIndexError {
    pub space: &'static str,
    #[source]
    pub source: DecodeUnsignedError,
}

macro_rules! index_decoders {
    ($($name:ident => $space:literal),+ $(,)?) => {$(
        impl $name {
            pub(crate) fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self, DecodeIndexError> {
                decode_u32(reader)
                    .map(Self)
                    .map_err(|source| DecodeIndexError { space: $space, source })
            }
        }
    )+};
}

index_decoders! {
    TypeIdx => "type",
    FuncIdx => "function",
    TableIdx => "table",
    MemIdx => "memory",
}
