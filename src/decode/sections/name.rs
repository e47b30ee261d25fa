//! The `name` custom section.
//!
//! A sequence of subsections, each an id byte and a payload size. Unknown
//! subsections are skipped, and decoding always continues at the declared
//! end of a subsection.
use crate::core::{DecodeWarning, NameKind, Names};
use crate::decode::helpers::{DecodeNameError, DecodeVectorError, decode_name, decode_vector};
use crate::decode::integer::{DecodeUnsignedError, decode_u32};
use crate::decode::{ByteReader, read_byte};
use std::collections::BTreeMap;
use std::io::{self, Cursor};
use thiserror::Error;

const MODULE_NAME: u8 = 0;
const FUNCTION_NAMES: u8 = 1;
const LOCAL_NAMES: u8 = 2;
const GLOBAL_NAMES: u8 = 7;
const DATA_SEGMENT_NAMES: u8 = 9;

#[derive(Debug, Error)]
pub enum DecodeNameSectionError {
    #[error("failed reading name subsection id")]
    ReadSubsectionId(#[from] io::Error),

    #[error("failed decoding name subsection size")]
    DecodeSubsectionSize(#[from] DecodeUnsignedError),

    #[error("name subsection {id} of {size} bytes runs past the end of the section")]
    SubsectionOutOfBounds { id: u8, size: u32 },

    #[error("failed decoding module name")]
    DecodeModuleName(#[from] DecodeNameError),

    #[error("failed decoding name map in subsection {id}")]
    DecodeNameMap {
        id: u8,
        source: DecodeVectorError<DecodeNameAssocError>,
    },

    #[error("failed decoding local names")]
    DecodeLocalNames(#[from] DecodeVectorError<DecodeIndirectNameAssocError>),
}

#[derive(Debug, Error)]
pub enum DecodeNameAssocError {
    #[error("failed decoding name map index")]
    DecodeIndex(#[from] DecodeUnsignedError),

    #[error(transparent)]
    DecodeName(#[from] DecodeNameError),
}

#[derive(Debug, Error)]
pub enum DecodeIndirectNameAssocError {
    #[error("failed decoding function index")]
    DecodeIndex(#[from] DecodeUnsignedError),

    #[error("failed decoding local name map")]
    DecodeNameMap(#[from] DecodeVectorError<DecodeNameAssocError>),
}

/// Decodes the contents of a `name` custom section. Duplicate indices are
/// reported to `warnings` and the first entry is kept.
pub(crate) fn decode_name_section(
    contents: &[u8],
    warnings: &mut Vec<DecodeWarning>,
) -> Result<Names, DecodeNameSectionError> {
    let mut names = Names::default();
    let mut reader = Cursor::new(contents);
    let len = contents.len() as u64;

    while reader.position() < len {
        let id = read_byte(&mut reader)?;
        let size = decode_u32(&mut reader)?;
        let begin = reader.position();
        let end = begin + u64::from(size);
        if end > len {
            return Err(DecodeNameSectionError::SubsectionOutOfBounds { id, size });
        }

        let mut sub = Cursor::new(&contents[..end as usize]);
        sub.set_position(begin);

        let map_err = |source| DecodeNameSectionError::DecodeNameMap { id, source };
        match id {
            MODULE_NAME => names.module = Some(decode_name(&mut sub)?),
            FUNCTION_NAMES => {
                for (idx, name) in decode_name_map(&mut sub).map_err(map_err)? {
                    if insert_name(&mut names.functions, NameKind::Function, idx, name.clone(), warnings) {
                        // a name given to several indices resolves to the last
                        names.function_indices.insert(name, idx);
                    }
                }
            }
            LOCAL_NAMES => {
                for (function, locals) in decode_vector(&mut sub, parse_indirect_assoc)? {
                    if names.locals.contains_key(&function) {
                        tracing::warn!(function, "duplicate function in local names map ignored");
                        warnings.push(DecodeWarning::DuplicateLocalMap { function });
                        continue;
                    }
                    let mut map = BTreeMap::new();
                    for (idx, name) in locals {
                        insert_name(&mut map, NameKind::Local, idx, name, warnings);
                    }
                    names.locals.insert(function, map);
                }
            }
            GLOBAL_NAMES => {
                for (idx, name) in decode_name_map(&mut sub).map_err(map_err)? {
                    insert_name(&mut names.globals, NameKind::Global, idx, name, warnings);
                }
            }
            DATA_SEGMENT_NAMES => {
                for (idx, name) in decode_name_map(&mut sub).map_err(map_err)? {
                    insert_name(&mut names.data_segments, NameKind::DataSegment, idx, name, warnings);
                }
            }
            _ => tracing::debug!(id, size, "skipping unknown name subsection"),
        }

        reader.set_position(end);
    }

    Ok(names)
}

fn insert_name(
    map: &mut BTreeMap<u32, String>,
    kind: NameKind,
    index: u32,
    name: String,
    warnings: &mut Vec<DecodeWarning>,
) -> bool {
    if map.contains_key(&index) {
        tracing::warn!(%kind, index, %name, "duplicate name ignored");
        warnings.push(DecodeWarning::DuplicateName { kind, index, name });
        return false;
    }
    map.insert(index, name);
    true
}

fn decode_name_map(
    reader: &mut ByteReader,
) -> Result<Vec<(u32, String)>, DecodeVectorError<DecodeNameAssocError>> {
    decode_vector(reader, parse_name_assoc)
}

fn parse_name_assoc(reader: &mut ByteReader) -> Result<(u32, String), DecodeNameAssocError> {
    let idx = decode_u32(reader)?;
    Ok((idx, decode_name(reader)?))
}

fn parse_indirect_assoc(
    reader: &mut ByteReader,
) -> Result<(u32, Vec<(u32, String)>), DecodeIndirectNameAssocError> {
    let idx = decode_u32(reader)?;
    Ok((idx, decode_name_map(reader)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn subsection(id: u8, payload: &[u8]) -> Vec<u8> {
        let mut out = vec![id, payload.len() as u8];
        out.extend_from_slice(payload);
        out
    }

    #[test]
    fn first_duplicate_wins() {
        let contents = subsection(
            FUNCTION_NAMES,
            &[0x02, 0x00, 0x01, b'a', 0x00, 0x01, b'b'],
        );
        let mut warnings = Vec::new();
        let names = decode_name_section(&contents, &mut warnings).unwrap();

        assert_eq!(names.functions.get(&0).map(String::as_str), Some("a"));
        assert_eq!(names.function_indices.get("a"), Some(&0));
        assert_eq!(names.function_indices.get("b"), None);
        assert_eq!(
            warnings,
            vec![DecodeWarning::DuplicateName {
                kind: NameKind::Function,
                index: 0,
                name: "b".to_string(),
            }]
        );
        assert_eq!(
            warnings[0].to_string(),
            "duplicate function idx: 0 name: b ignored"
        );
    }

    #[test]
    fn reverse_map_keeps_last_index_of_a_name() {
        let contents = subsection(
            FUNCTION_NAMES,
            &[0x02, 0x00, 0x01, b'f', 0x04, 0x01, b'f'],
        );
        let mut warnings = Vec::new();
        let names = decode_name_section(&contents, &mut warnings).unwrap();

        assert_eq!(names.functions.len(), 2);
        assert_eq!(names.function_indices.get("f"), Some(&4));
        assert!(warnings.is_empty());
    }

    #[test]
    fn skips_unknown_subsections() {
        let mut contents = subsection(MODULE_NAME, &[0x01, b'm']);
        contents.extend(subsection(0x42, &[0xFF, 0xFF, 0xFF]));
        contents.extend(subsection(GLOBAL_NAMES, &[0x01, 0x03, 0x02, b's', b'p']));
        contents.extend(subsection(LOCAL_NAMES, &[0x01, 0x01, 0x01, 0x00, 0x01, b'x']));

        let mut warnings = Vec::new();
        let names = decode_name_section(&contents, &mut warnings).unwrap();

        assert_eq!(names.module.as_deref(), Some("m"));
        assert_eq!(names.globals.get(&3).map(String::as_str), Some("sp"));
        assert_eq!(names.local(1, 0), Some("x"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn subsection_past_end_is_an_error() {
        let contents = [FUNCTION_NAMES, 0x10, 0x00];
        assert!(matches!(
            decode_name_section(&contents, &mut Vec::new()),
            Err(DecodeNameSectionError::SubsectionOutOfBounds { id: 1, size: 16 })
        ));
    }
}
