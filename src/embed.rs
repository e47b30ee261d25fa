//! Splicing a payload into a prepared template module.
//!
//! The template exports two globals and two functions under fixed names.
//! Its first passive data segment holds the descriptor of the embedded
//! images and the passive segment right after it holds the image bytes.
//! Embedding replaces those two segments and the descriptor length global,
//! and copies everything else from the template.
use crate::core::instruction::Instruction;
use crate::core::{Data, DataMode, ExportDesc, Global, Module, SectionKind};
use crate::encode::{EncodeError, Encoder};
use std::io::Write;
use thiserror::Error;

pub const VERSION_EXPORT: &str = "MonoWebCilVersion";
pub const DESCRIPTOR_LENGTH_EXPORT: &str = "MonoWebCilDescriptorLength";
pub const GET_DESCRIPTOR_EXPORT: &str = "MonoWebCilGetDescriptor";
pub const GET_MODULE_DATA_EXPORT: &str = "MonoWebCilGetModuleData";

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("template does not export `{0}`")]
    MissingExport(&'static str),

    #[error("template export `{name}` is a {found}; expected a {expected}")]
    ExportKind {
        name: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("template export `{name}` refers to global {index}, which is imported")]
    ImportedGlobal { name: &'static str, index: u32 },

    #[error("template export `{name}` refers to global {index}, which does not exist")]
    MissingGlobal { name: &'static str, index: u32 },

    #[error("template has no passive data segment for the descriptor")]
    MissingDescriptorSegment,

    #[error("template data segment {index} must be passive; found mode {mode}")]
    UnexpectedDataMode { index: usize, mode: u32 },

    #[error("template has no data segment after the descriptor at {0}")]
    MissingModuleDataSegment(usize),

    #[error("{what} of {len} bytes does not fit in the descriptor")]
    TooLarge { what: &'static str, len: usize },

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// One image to embed, stored under `path`.
#[derive(Debug, Clone, Copy)]
pub struct Image<'a> {
    pub path: &'a str,
    pub content: &'a [u8],
}

/// Where the template keeps the entries that embedding replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    /// Defined-global index of the version global.
    pub version_global: u32,
    /// Defined-global index of the descriptor length global.
    pub descriptor_length_global: u32,
    pub descriptor_segment: usize,
    pub module_data_segment: usize,
}

impl Template {
    pub fn locate(module: &Module) -> Result<Self, EmbedError> {
        let version_global = defined_global(module, VERSION_EXPORT)?;
        let descriptor_length_global = defined_global(module, DESCRIPTOR_LENGTH_EXPORT)?;
        exported_function(module, GET_DESCRIPTOR_EXPORT)?;
        exported_function(module, GET_MODULE_DATA_EXPORT)?;

        let descriptor_segment = module
            .datas
            .iter()
            .position(|d| d.mode == DataMode::Passive)
            .ok_or(EmbedError::MissingDescriptorSegment)?;

        let module_data_segment = descriptor_segment + 1;
        match module.datas.get(module_data_segment) {
            Some(Data {
                mode: DataMode::Passive,
                ..
            }) => {}
            Some(data) => {
                return Err(EmbedError::UnexpectedDataMode {
                    index: module_data_segment,
                    mode: data.mode.tag(),
                });
            }
            None => return Err(EmbedError::MissingModuleDataSegment(descriptor_segment)),
        }

        Ok(Template {
            version_global,
            descriptor_length_global,
            descriptor_segment,
            module_data_segment,
        })
    }
}

fn find_export(module: &Module, name: &'static str) -> Result<ExportDesc, EmbedError> {
    module
        .find_export(name)
        .map(|e| e.desc)
        .ok_or(EmbedError::MissingExport(name))
}

fn defined_global(module: &Module, name: &'static str) -> Result<u32, EmbedError> {
    let index = match find_export(module, name)? {
        ExportDesc::Global(idx) => idx.0,
        other => {
            return Err(EmbedError::ExportKind {
                name,
                expected: "global",
                found: other.kind_name(),
            });
        }
    };

    let defined = index
        .checked_sub(module.imported_global_count())
        .ok_or(EmbedError::ImportedGlobal { name, index })?;
    if defined as usize >= module.globals.len() {
        return Err(EmbedError::MissingGlobal { name, index });
    }
    Ok(defined)
}

fn exported_function(module: &Module, name: &'static str) -> Result<(), EmbedError> {
    match find_export(module, name)? {
        ExportDesc::Func(_) => Ok(()),
        other => Err(EmbedError::ExportKind {
            name,
            expected: "function",
            found: other.kind_name(),
        }),
    }
}

fn u32_field(what: &'static str, len: usize) -> Result<[u8; 4], EmbedError> {
    u32::try_from(len)
        .map(u32::to_le_bytes)
        .map_err(|_| EmbedError::TooLarge { what, len })
}

/// Encodes the descriptor of `images`: the image count, then for each image
/// its descriptor size, the length of its NUL-terminated path, the path and
/// the content length. All numbers are little-endian u32.
pub fn descriptor_blob(images: &[Image]) -> Result<Vec<u8>, EmbedError> {
    let mut blob = Vec::new();
    blob.extend(u32_field("image count", images.len())?);

    for image in images {
        let path_len = image.path.len() + 1;
        blob.extend(u32_field("image descriptor", 4 + 4 + path_len + 4)?);
        blob.extend(u32_field("path", path_len)?);
        blob.extend_from_slice(image.path.as_bytes());
        blob.push(0);
        blob.extend(u32_field("image", image.content.len())?);
    }

    Ok(blob)
}

/// Replacement Global and Data arrays for `module`. The template's own
/// arrays are left untouched.
pub fn replacements(
    module: &Module,
    template: &Template,
    image: Image,
) -> Result<(Vec<Global>, Vec<Data>), EmbedError> {
    let descriptor = descriptor_blob(&[image])?;
    let descriptor_len = i32::try_from(descriptor.len()).map_err(|_| EmbedError::TooLarge {
        what: "descriptor",
        len: descriptor.len(),
    })?;

    let mut globals = module.globals.clone();
    let length_global = globals
        .get_mut(template.descriptor_length_global as usize)
        .ok_or(EmbedError::MissingGlobal {
            name: DESCRIPTOR_LENGTH_EXPORT,
            index: template.descriptor_length_global,
        })?;
    length_global.init = vec![Instruction::i32_const(descriptor_len)];

    let mut datas = module.datas.clone();
    datas
        .get_mut(template.descriptor_segment)
        .ok_or(EmbedError::MissingDescriptorSegment)?
        .init = descriptor;
    datas
        .get_mut(template.module_data_segment)
        .ok_or(EmbedError::MissingModuleDataSegment(template.descriptor_segment))?
        .init = image.content.to_vec();

    Ok((globals, datas))
}

/// Writes the template `module` with `image` embedded to `out`.
pub fn embed<W: Write>(module: &Module, image: Image, out: W) -> Result<W, EmbedError> {
    let template = Template::locate(module)?;
    tracing::debug!(?template, path = image.path, size = image.content.len(), "embedding");

    let (globals, datas) = replacements(module, &template, image)?;

    let mut encoder = Encoder::new(out);
    encoder.write_header(module.version)?;
    for section in &module.sections {
        match section.kind {
            SectionKind::Global => encoder.write_global_section(&globals)?,
            SectionKind::Data => encoder.write_data_section(&datas)?,
            _ => encoder.copy_section(module, section)?,
        }
    }

    Ok(encoder.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn descriptor_layout() {
        let blob = descriptor_blob(&[Image {
            path: "a.dll",
            content: &[0xAA; 300],
        }])
        .unwrap();

        let mut expected = vec![1, 0, 0, 0, 18, 0, 0, 0, 6, 0, 0, 0];
        expected.extend_from_slice(b"a.dll\0");
        expected.extend_from_slice(&[0x2C, 0x01, 0, 0]);
        assert_eq!(blob, expected);
    }

    #[test]
    fn empty_descriptor() {
        assert_eq!(descriptor_blob(&[]).unwrap(), [0, 0, 0, 0]);
    }
}
