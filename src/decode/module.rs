//! The section scanner.
//!
//! The scanner reads the preamble and then the section table. Each known
//! section is handed to its decoder with a reader bounded to the payload,
//! and scanning always resumes at the declared end of the section.
use crate::config::Config;
use crate::core::{Module, Section, SectionKind};
use crate::decode::integer::{DecodeUnsignedError, decode_u32};
use crate::decode::read_byte;
use crate::decode::sections::*;
use crate::decode::ByteReader;
use phf::phf_ordered_map;
use std::io::{self, Cursor, Read};
use thiserror::Error;

const MAGIC_NUMBER: [u8; 4] = [0x00, 0x61, 0x73, 0x6D];

// Known section ids. Anything else becomes SectionKind::Unknown.
static SECTION_IDS: phf::OrderedMap<u8, SectionKind> = phf_ordered_map! {
    0u8 => SectionKind::Custom,
    1u8 => SectionKind::Type,
    2u8 => SectionKind::Import,
    3u8 => SectionKind::Function,
    4u8 => SectionKind::Table,
    5u8 => SectionKind::Memory,
    6u8 => SectionKind::Global,
    7u8 => SectionKind::Export,
    8u8 => SectionKind::Start,
    9u8 => SectionKind::Element,
    10u8 => SectionKind::Code,
    11u8 => SectionKind::Data,
    12u8 => SectionKind::DataCount,
    13u8 => SectionKind::Tag,
};

impl SectionKind {
    pub fn from_id(id: u8) -> Self {
        SECTION_IDS
            .get(&id)
            .copied()
            .unwrap_or(SectionKind::Unknown(id))
    }
}

/// The top-level error that may occur when attempting to decode bytes into
/// a [Module].
///
/// Encompasses all possible errors that may occur during decoding,
/// including section-specific errors.
#[derive(Debug, Error)]
pub enum DecodeModuleError {
    #[error("failed reading module bytes")]
    ReadInput(io::Error),

    #[error(transparent)]
    ParsePreamble(#[from] ParsePreambleError),

    #[error(transparent)]
    DecodeSectionHeader(#[from] DecodeSectionHeaderError),

    #[error(transparent)]
    SectionOutOfBounds(#[from] SectionOutOfBoundsError),

    // section-specific errors
    #[error(transparent)]
    DecodeCustomSection(#[from] DecodeCustomSectionError),

    #[error("failed decoding name section")]
    DecodeNameSection(#[from] DecodeNameSectionError),

    #[error(transparent)]
    DecodeTypeSection(#[from] DecodeTypeSectionError),

    #[error(transparent)]
    DecodeImportSection(#[from] DecodeImportSectionError),

    #[error(transparent)]
    DecodeFunctionSection(#[from] DecodeFunctionSectionError),

    #[error(transparent)]
    DecodeTableSection(#[from] DecodeTableSectionError),

    #[error(transparent)]
    DecodeMemorySection(#[from] DecodeMemorySectionError),

    #[error(transparent)]
    DecodeGlobalSection(#[from] DecodeGlobalSectionError),

    #[error(transparent)]
    DecodeExportSection(#[from] DecodeExportSectionError),

    #[error(transparent)]
    DecodeStartSection(#[from] DecodeStartSectionError),

    #[error(transparent)]
    DecodeElementSection(#[from] DecodeElementSectionError),

    #[error(transparent)]
    DecodeDataCountSection(#[from] DecodeDataCountSectionError),

    #[error(transparent)]
    DecodeCodeSection(#[from] DecodeCodeSectionError),

    #[error(transparent)]
    DecodeDataSection(#[from] DecodeDataSectionError),
}

/// Decode `input` into a WebAssembly [Module] with the default [Config].
pub fn decode_module(input: impl Read) -> Result<Module, DecodeModuleError> {
    decode_module_with(input, &Config::default())
}

/// Decode `input` into a WebAssembly [Module].
///
/// The whole input is read into memory and kept by the module.
pub fn decode_module_with(mut input: impl Read, config: &Config) -> Result<Module, DecodeModuleError> {
    let mut bytes = Vec::new();
    input
        .read_to_end(&mut bytes)
        .map_err(DecodeModuleError::ReadInput)?;

    let mut module = Module::default();
    let len = bytes.len() as u64;
    let mut reader = Cursor::new(bytes.as_slice());

    module.version = parse_preamble(&mut reader)?;
    if config.verbosity > 0 {
        tracing::debug!(version = module.version, size = len, "decoding module");
    }

    while let Some(header) = decode_section_header(&mut reader)? {
        let section = Section {
            kind: header.kind,
            size: header.size,
            offset: header.offset,
            begin: reader.position(),
        };
        if section.end() > len {
            return Err(SectionOutOfBoundsError {
                kind: section.kind,
                offset: section.offset,
                size: section.size,
                available: len - section.begin,
            }
            .into());
        }
        if config.verbosity > 0 {
            tracing::debug!(
                kind = ?section.kind,
                id = section.kind.id(),
                size = section.size,
                offset = section.offset,
                "section"
            );
        }

        let mut section_reader = Cursor::new(&bytes[..section.end() as usize]);
        section_reader.set_position(section.begin);
        decode_section(&mut module, &section, &mut section_reader, config)?;

        module.sections.push(section);
        reader.set_position(section.end());
    }

    module.bytes = bytes;
    Ok(module)
}

fn decode_section(
    module: &mut Module,
    section: &Section,
    reader: &mut ByteReader,
    config: &Config,
) -> Result<(), DecodeModuleError> {
    let entries = match section.kind {
        SectionKind::Custom => {
            let custom = decode_custom_section(reader)?;
            if config.verbosity > 0 {
                tracing::debug!(name = %custom.name, "custom section");
            }
            if custom.name == "name" {
                module.names = decode_name_section(&custom.contents, &mut module.warnings)?;
            }
            module.custom_sections.push(custom);
            None
        }
        SectionKind::Type => {
            module.types = decode_type_section(reader)?;
            Some(module.types.len())
        }
        SectionKind::Import => {
            module.imports = decode_import_section(reader)?;
            Some(module.imports.len())
        }
        SectionKind::Function => {
            module.functions = decode_function_section(reader)?;
            Some(module.functions.len())
        }
        SectionKind::Table => {
            module.tables = decode_table_section(reader)?;
            Some(module.tables.len())
        }
        SectionKind::Memory => {
            module.memories = decode_memory_section(reader)?;
            Some(module.memories.len())
        }
        SectionKind::Global => {
            module.globals = decode_global_section(reader)?;
            Some(module.globals.len())
        }
        SectionKind::Export => {
            module.exports = decode_export_section(reader)?;
            Some(module.exports.len())
        }
        SectionKind::Start => {
            module.start = Some(decode_start_section(reader)?);
            None
        }
        SectionKind::Element => {
            module.elements = decode_element_section(reader)?;
            Some(module.elements.len())
        }
        SectionKind::Code if config.read_code => {
            module.codes = decode_code_section(reader)?;
            Some(module.codes.len())
        }
        SectionKind::Data => {
            module.datas = decode_data_section(reader)?;
            Some(module.datas.len())
        }
        SectionKind::DataCount => {
            module.data_count = Some(decode_data_count_section(reader)?);
            None
        }
        SectionKind::Code | SectionKind::Tag | SectionKind::Unknown(_) => {
            if config.verbosity > 0 {
                tracing::debug!(kind = ?section.kind, "skipping section");
            }
            None
        }
    };

    if config.verbosity > 1
        && let Some(count) = entries
    {
        tracing::trace!(kind = ?section.kind, count, "section entries");
    }

    Ok(())
}

#[derive(Debug, Error)]
pub enum ParsePreambleError {
    #[error("failed decoding preamble")]
    Io(#[from] io::Error),

    #[error("unexpected magic number: expected {magic:02X?}; got {0:02X?}", magic = MAGIC_NUMBER)]
    UnexpectedMagic([u8; 4]),
}

/// Checks the magic number and returns the version field.
fn parse_preamble<R: Read + ?Sized>(reader: &mut R) -> Result<u32, ParsePreambleError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if magic != MAGIC_NUMBER {
        return Err(ParsePreambleError::UnexpectedMagic(magic));
    }

    let mut version = [0u8; 4];
    reader.read_exact(&mut version)?;
    Ok(u32::from_le_bytes(version))
}

#[derive(Debug, Error)]
#[error(
    "{kind:?} section at offset {offset:#X} declares {size} bytes; only {available} remain"
)]
pub struct SectionOutOfBoundsError {
    pub kind: SectionKind,
    pub offset: u64,
    pub size: u32,
    pub available: u64,
}

#[derive(Debug, Error)]
pub enum DecodeSectionHeaderError {
    #[error("failed reading section ID byte")]
    ReadSectionIdByte(#[from] io::Error),

    #[error("failed decoding section size")]
    DecodeSectionSize(#[from] DecodeUnsignedError),
}

struct SectionHeader {
    kind: SectionKind,
    size: u32,
    offset: u64,
}

fn decode_section_header(
    reader: &mut ByteReader,
) -> Result<Option<SectionHeader>, DecodeSectionHeaderError> {
    let offset = reader.position();
    let id = match read_byte(reader) {
        Ok(id) => id,
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let kind = SectionKind::from_id(id);
    let size = decode_u32(reader)?;

    Ok(Some(SectionHeader { kind, size, offset }))
}
