//! Decoding of WebAssembly values, types, instructions and sections.
pub(crate) mod helpers;
pub mod indices;
pub mod instructions;
pub mod integer;
mod module;
pub mod sections;
pub mod types;

pub(crate) use helpers::{ByteReader, read_byte};
pub use helpers::{DecodeByteVectorError, DecodeNameError, DecodeVectorError, ParseExpressionError};
pub use module::{
    DecodeModuleError, DecodeSectionHeaderError, ParsePreambleError, SectionOutOfBoundsError,
    decode_module, decode_module_with,
};

/// A type encoded as a single marker byte, looked up in a static table.
pub(crate) trait FromMarkerByte
where
    Self: Sized + Copy + PartialEq + std::fmt::Debug + 'static,
{
    /// Built from the unrecognized byte.
    type Error: From<u8>;

    fn markers() -> &'static phf::OrderedMap<u8, Self>;

    /// The table as `0xNN (Variant)` pairs, for error messages.
    fn markers_formatted() -> String {
        let pairs: Vec<_> = Self::markers()
            .entries()
            .map(|(marker, variant)| format!("{marker:#04X} ({variant:?})"))
            .collect();
        pairs.join(", ")
    }

    fn from_marker(b: u8) -> Result<Self, Self::Error> {
        Self::markers().get(&b).copied().ok_or_else(|| b.into())
    }

    /// Reverse lookup, used by the encoder.
    fn to_marker(self) -> Option<u8> {
        Self::markers()
            .entries()
            .find_map(|(marker, variant)| (*variant == self).then_some(*marker))
    }
}
