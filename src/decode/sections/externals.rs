//! The Import and Export sections. Both describe an entity by an external
//! kind byte followed by what that kind needs.
use crate::core::indices::{FuncIdx, GlobalIdx, MemIdx, TableIdx, TagIdx, TypeIdx};
use crate::core::types::{GlobalType, MemType, TableType};
use crate::core::{Export, ExportDesc, Import, ImportDesc};
use crate::decode::helpers::{DecodeNameError, DecodeVectorError, decode_name, decode_vector};
use crate::decode::indices::DecodeIndexError;
use crate::decode::integer::{DecodeUnsignedError, decode_u32};
use crate::decode::types::{DecodeGlobalTypeError, DecodeMemTypeError, DecodeTableTypeError};
use crate::decode::{FromMarkerByte, read_byte};
use phf::phf_ordered_map;
use std::io::{self, Read};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExternKind {
    Func,
    Table,
    Mem,
    Global,
    Tag,
}

static EXTERN_KIND_MARKERS: phf::OrderedMap<u8, ExternKind> = phf_ordered_map! {
    0x00u8 => ExternKind::Func,
    0x01u8 => ExternKind::Table,
    0x02u8 => ExternKind::Mem,
    0x03u8 => ExternKind::Global,
    0x04u8 => ExternKind::Tag,
};

#[derive(Debug, Error)]
pub enum DecodeExternKindError {
    #[error("failed reading external kind byte")]
    Io(#[from] io::Error),

    #[error(
        "invalid external kind byte {0:#04X}: expected one of {markers}",
        markers = ExternKind::markers_formatted()
    )]
    InvalidMarker(u8),
}

impl From<u8> for DecodeExternKindError {
    fn from(b: u8) -> Self {
        Self::InvalidMarker(b)
    }
}

impl FromMarkerByte for ExternKind {
    type Error = DecodeExternKindError;

    fn markers() -> &'static phf::OrderedMap<u8, Self> {
        &EXTERN_KIND_MARKERS
    }
}

impl ExternKind {
    fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self, DecodeExternKindError> {
        Self::from_marker(read_byte(reader)?)
    }
}

#[derive(Debug, Error)]
#[error("failed decoding Import section")]
pub struct DecodeImportSectionError(#[from] pub DecodeVectorError<DecodeImportError>);

pub(crate) fn decode_import_section<R: Read + ?Sized>(
    reader: &mut R,
) -> Result<Vec<Import>, DecodeImportSectionError> {
    Ok(decode_vector(reader, parse_import)?)
}

#[derive(Debug, Error)]
pub enum DecodeImportError {
    #[error("failed decoding import module name")]
    DecodeModuleName(#[source] DecodeNameError),

    #[error("failed decoding import name")]
    DecodeName(#[source] DecodeNameError),

    #[error(transparent)]
    DecodeKind(#[from] DecodeExternKindError),

    #[error(transparent)]
    DecodeTypeIdx(#[from] DecodeIndexError),

    #[error(transparent)]
    DecodeTableType(#[from] DecodeTableTypeError),

    #[error(transparent)]
    DecodeMemType(#[from] DecodeMemTypeError),

    #[error(transparent)]
    DecodeGlobalType(#[from] DecodeGlobalTypeError),

    #[error("failed reading tag attribute")]
    ReadTagAttribute(#[source] io::Error),

    #[error("invalid tag attribute: expected 0x00; got {0:#04X}")]
    InvalidTagAttribute(u8),
}

fn parse_import<R: Read + ?Sized>(reader: &mut R) -> Result<Import, DecodeImportError> {
    let module = decode_name(reader).map_err(DecodeImportError::DecodeModuleName)?;
    let name = decode_name(reader).map_err(DecodeImportError::DecodeName)?;

    let desc = match ExternKind::decode(reader)? {
        ExternKind::Func => ImportDesc::Func(TypeIdx::decode(reader)?),
        ExternKind::Table => ImportDesc::Table(TableType::decode(reader)?),
        ExternKind::Mem => ImportDesc::Mem(MemType::decode(reader)?),
        ExternKind::Global => ImportDesc::Global(GlobalType::decode(reader)?),
        // the attribute byte is reserved; only exceptions (0) are defined
        ExternKind::Tag => match read_byte(reader).map_err(DecodeImportError::ReadTagAttribute)? {
            0x00 => ImportDesc::Tag(TypeIdx::decode(reader)?),
            attribute => return Err(DecodeImportError::InvalidTagAttribute(attribute)),
        },
    };

    Ok(Import { module, name, desc })
}

#[derive(Debug, Error)]
#[error("failed decoding Export section")]
pub struct DecodeExportSectionError(#[from] pub DecodeVectorError<DecodeExportError>);

pub(crate) fn decode_export_section<R: Read + ?Sized>(
    reader: &mut R,
) -> Result<Vec<Export>, DecodeExportSectionError> {
    Ok(decode_vector(reader, parse_export)?)
}

#[derive(Debug, Error)]
pub enum DecodeExportError {
    #[error("failed decoding export name")]
    DecodeName(#[from] DecodeNameError),

    #[error(transparent)]
    DecodeKind(#[from] DecodeExternKindError),

    #[error("failed decoding exported index")]
    DecodeIndex(#[from] DecodeUnsignedError),
}

fn parse_export<R: Read + ?Sized>(reader: &mut R) -> Result<Export, DecodeExportError> {
    let name = decode_name(reader)?;
    let kind = ExternKind::decode(reader)?;
    let idx = decode_u32(reader)?;

    let desc = match kind {
        ExternKind::Func => ExportDesc::Func(FuncIdx(idx)),
        ExternKind::Table => ExportDesc::Table(TableIdx(idx)),
        ExternKind::Mem => ExportDesc::Mem(MemIdx(idx)),
        ExternKind::Global => ExportDesc::Global(GlobalIdx(idx)),
        ExternKind::Tag => ExportDesc::Tag(TagIdx(idx)),
    };

    Ok(Export { name, desc })
}
