//! Replacing the Data section of a module with the contents of a blob.
//!
//! The blob is stored as one segment, or split at runs of zero bytes so
//! that the zeros are left to the memory's initial contents. Every other
//! section is copied unchanged.
use crate::core::instruction::Instruction;
use crate::core::{Data, DataMode, Module, SectionKind};
use crate::encode::{EncodeError, Encoder};
use std::io::Write;
use thiserror::Error;

/// Zero runs shorter than this are kept inside a segment.
pub const DEFAULT_ZERO_RUN: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentMode {
    /// Segments are copied into memory 0 at `base_offset + index`.
    #[default]
    Active,
    Passive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteOptions {
    pub auto_split: bool,
    pub base_offset: i32,
    pub mode: SegmentMode,
    pub zero_run: usize,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        RewriteOptions {
            auto_split: false,
            base_offset: 0,
            mode: SegmentMode::Active,
            zero_run: DEFAULT_ZERO_RUN,
        }
    }
}

/// A slice of the blob that becomes one data segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub chunks: Vec<Chunk>,
    /// Number of zero bytes not covered by any chunk.
    pub stripped: usize,
}

/// Splits `data` around every run of at least `zero_run` zero bytes.
///
/// Leading and trailing zero runs produce no chunk. A blob without such a
/// run, the empty blob included, yields a single chunk covering all of it.
pub fn split(data: &[u8], zero_run: usize) -> Split {
    let zero_run = zero_run.max(1);
    let mut chunks = Vec::new();
    let mut offset = 0;
    let mut stripped = 0;

    loop {
        let Some(index) = find_zero_run(&data[offset..], zero_run) else {
            tracing::trace!(index = offset, size = data.len() - offset, "last chunk");
            chunks.push(Chunk {
                index: offset,
                size: data.len() - offset,
            });
            break;
        };

        if index != 0 {
            tracing::trace!(index = offset, size = index, "chunk");
            chunks.push(Chunk {
                index: offset,
                size: index,
            });
            offset += index + zero_run;
            stripped += zero_run;
        }

        match data[offset..].iter().position(|&b| b != 0) {
            Some(skip) => {
                offset += skip;
                stripped += skip;
            }
            None => {
                stripped += data.len() - offset;
                break;
            }
        }
    }

    Split { chunks, stripped }
}

fn find_zero_run(data: &[u8], len: usize) -> Option<usize> {
    let mut run = 0;
    for (i, &b) in data.iter().enumerate() {
        if b != 0 {
            run = 0;
            continue;
        }
        run += 1;
        if run == len {
            return Some(i + 1 - len);
        }
    }
    None
}

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("module has no Data section")]
    MissingDataSection,

    #[error("segment at blob offset {index} overflows the i32 memory offset")]
    OffsetOverflow { index: usize },

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// The data segments that store `blob` under `options`.
pub fn data_segments(blob: &[u8], options: &RewriteOptions) -> Result<Vec<Data>, RewriteError> {
    let chunks = if options.auto_split {
        let split = split(blob, options.zero_run);
        tracing::info!(
            segments = split.chunks.len(),
            stripped = split.stripped,
            "split data blob"
        );
        split.chunks
    } else {
        vec![Chunk {
            index: 0,
            size: blob.len(),
        }]
    };

    chunks
        .into_iter()
        .map(|chunk| {
            let mode = match options.mode {
                SegmentMode::Active => {
                    let offset = i32::try_from(chunk.index)
                        .ok()
                        .and_then(|index| options.base_offset.checked_add(index))
                        .ok_or(RewriteError::OffsetOverflow { index: chunk.index })?;
                    DataMode::Active {
                        offset: vec![Instruction::i32_const(offset)],
                    }
                }
                SegmentMode::Passive => DataMode::Passive,
            };
            Ok(Data {
                mode,
                init: blob[chunk.index..chunk.index + chunk.size].to_vec(),
            })
        })
        .collect()
}

/// Writes `module` to `out` with its Data section replaced by segments
/// holding `blob`. A DataCount section is regenerated with the new count.
pub fn rewrite_data_section<W: Write>(
    module: &Module,
    blob: &[u8],
    options: &RewriteOptions,
    out: W,
) -> Result<W, RewriteError> {
    if !module.has_section(SectionKind::Data) {
        return Err(RewriteError::MissingDataSection);
    }

    let datas = data_segments(blob, options)?;
    let count = u32::try_from(datas.len()).map_err(|_| EncodeError::TooLarge(datas.len()))?;

    let mut encoder = Encoder::new(out);
    encoder.write_header(module.version)?;
    for section in &module.sections {
        match section.kind {
            SectionKind::Data => encoder.write_data_section(&datas)?,
            SectionKind::DataCount => encoder.write_data_count_section(count)?,
            _ => encoder.copy_section(module, section)?,
        }
    }

    Ok(encoder.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::instruction::Operands;
    use pretty_assertions::assert_eq;

    fn chunk(index: usize, size: usize) -> Chunk {
        Chunk { index, size }
    }

    #[test]
    fn splits_around_long_zero_runs() {
        let mut data = vec![1u8; 32];
        data[10..22].fill(0);

        let split = split(&data, 9);
        assert_eq!(split.chunks, [chunk(0, 10), chunk(22, 10)]);
        assert_eq!(split.stripped, 12);
    }

    #[test]
    fn short_zero_runs_stay() {
        let mut data = vec![1u8; 20];
        data[5..13].fill(0);

        let split = split(&data, 9);
        assert_eq!(split.chunks, [chunk(0, 20)]);
        assert_eq!(split.stripped, 0);
    }

    #[test]
    fn leading_and_trailing_zeros() {
        let mut data = vec![0u8; 40];
        data[12..15].fill(7);

        let split = split(&data, 9);
        assert_eq!(split.chunks, [chunk(12, 3)]);
        assert_eq!(split.stripped, 37);
    }

    #[test]
    fn empty_and_all_zero_blobs() {
        assert_eq!(split(&[], 9).chunks, [chunk(0, 0)]);

        let zeros = split(&[0u8; 16], 9);
        assert!(zeros.chunks.is_empty());
        assert_eq!(zeros.stripped, 16);
    }

    #[test]
    fn active_offsets_follow_chunks() {
        let mut data = vec![1u8; 32];
        data[10..22].fill(0);
        let options = RewriteOptions {
            auto_split: true,
            base_offset: 100,
            ..Default::default()
        };

        let offsets: Vec<_> = data_segments(&data, &options)
            .unwrap()
            .iter()
            .map(|d| d.mode.offset().map(|e| e[0].operands.clone()))
            .collect();
        assert_eq!(offsets, [Some(Operands::I32(100)), Some(Operands::I32(122))]);
    }
}
