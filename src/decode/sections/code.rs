use crate::core::instruction::walk_all;
use crate::core::opcode::CoreOpcode;
use crate::core::types::ValType;
use crate::core::{Code, FunctionBody, Local, Module};
use crate::decode::ByteReader;
use crate::decode::helpers::{DecodeVectorError, ParseExpressionError, decode_expr, decode_vector};
use crate::decode::integer::{DecodeUnsignedError, decode_u32};
use crate::decode::types::DecodeValTypeError;
use std::cell::OnceCell;
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed decoding Code section")]
pub struct DecodeCodeSectionError(#[from] pub DecodeVectorError<DecodeCodeEntryError>);

#[derive(Debug, Error)]
pub enum DecodeCodeEntryError {
    #[error("failed decoding size of function code")]
    DecodeFunctionSize(#[from] DecodeUnsignedError),

    #[error("function body of {size} bytes at offset {offset:#X} runs past the end of the section")]
    OutOfBounds { offset: u64, size: u32 },
}

/// Records where each function body lives without decoding it.
pub(crate) fn decode_code_section(
    reader: &mut ByteReader,
) -> Result<Vec<Code>, DecodeCodeSectionError> {
    let mut index = 0;
    Ok(decode_vector(reader, |r| parse_code_entry(r, &mut index))?)
}

fn parse_code_entry(reader: &mut ByteReader, index: &mut u32) -> Result<Code, DecodeCodeEntryError> {
    let size = decode_u32(reader)?;
    let offset = reader.position();
    let end = offset + u64::from(size);
    if end > reader.get_ref().len() as u64 {
        return Err(DecodeCodeEntryError::OutOfBounds { offset, size });
    }
    reader.set_position(end);

    let code = Code {
        index: *index,
        size,
        offset,
        body: OnceCell::new(),
    };
    *index += 1;
    Ok(code)
}

#[derive(Debug, Error)]
pub enum DecodeCodeError {
    #[error("no Code entry for function {0}")]
    MissingEntry(u32),

    #[error("function body at offset {offset:#X} lies outside the module")]
    OutOfBounds { offset: u64 },

    #[error("failed decoding locals vector")]
    DecodeLocalsVector(#[from] DecodeVectorError<DecodeCodeLocalsError>),

    #[error("failed decoding function body expression")]
    DecodeFunctionBody(#[from] ParseExpressionError),

    #[error("Code entry size mismatch: declared {declared_bytes} bytes; consumed {consumed_bytes}")]
    EntrySizeMismatch {
        declared_bytes: u32,
        consumed_bytes: u64,
    },
}

#[derive(Debug, Error)]
pub enum DecodeCodeLocalsError {
    #[error("failed decoding count of function locals")]
    DecodeLocalsCount(DecodeUnsignedError),

    #[error("too many locals: expected at most {max_locals}; got {actual_locals}")]
    LocalsCountOutOfBound { max_locals: u64, actual_locals: u64 },

    #[error("failed decoding local Value type")]
    DecodeLocalValType(#[from] DecodeValTypeError),
}

impl Module {
    /// Locals and instructions of the defined function `idx`.
    ///
    /// The body is decoded on the first call and cached on the Code entry.
    pub fn function_body(&self, idx: u32) -> Result<&FunctionBody, DecodeCodeError> {
        let code = self
            .codes
            .get(idx as usize)
            .ok_or(DecodeCodeError::MissingEntry(idx))?;
        if let Some(body) = code.body.get() {
            return Ok(body);
        }

        let body = decode_function_body(&self.bytes, code)?;
        Ok(code.body.get_or_init(|| body))
    }

    /// Offsets of the `call` instructions in the defined function `idx`
    /// that target `callee`, an index in the full function index space.
    pub fn function_calls(&self, idx: u32, callee: u32) -> Result<Vec<u64>, DecodeCodeError> {
        let body = self.function_body(idx)?;
        let mut calls = Vec::new();
        walk_all(&body.instructions, &mut |ins| {
            if ins.is(CoreOpcode::Call) && ins.index() == Some(callee) {
                calls.push(ins.offset);
            }
        });
        Ok(calls)
    }
}

fn decode_function_body(bytes: &[u8], code: &Code) -> Result<FunctionBody, DecodeCodeError> {
    tracing::trace!(function = code.index, offset = code.offset, "decoding function body");

    let end = code.offset + u64::from(code.size);
    let bytes = usize::try_from(end)
        .ok()
        .and_then(|end| bytes.get(..end))
        .ok_or(DecodeCodeError::OutOfBounds {
            offset: code.offset,
        })?;
    let mut reader = Cursor::new(bytes);
    reader.set_position(code.offset);

    let mut expanded_locals: u64 = 0;
    let max_locals = u64::from(u32::MAX);
    let locals = decode_vector(&mut reader, |r| {
        parse_code_local(r, &mut expanded_locals, max_locals)
    })?;

    let instructions = decode_expr(&mut reader)?;

    if reader.position() != end {
        return Err(DecodeCodeError::EntrySizeMismatch {
            declared_bytes: code.size,
            consumed_bytes: reader.position() - code.offset,
        });
    }

    Ok(FunctionBody {
        locals,
        instructions,
    })
}

fn parse_code_local(
    reader: &mut ByteReader,
    expanded_locals: &mut u64,
    max_locals: u64,
) -> Result<Local, DecodeCodeLocalsError> {
    let count = decode_u32(reader).map_err(DecodeCodeLocalsError::DecodeLocalsCount)?;

    *expanded_locals += u64::from(count);
    if *expanded_locals > max_locals {
        return Err(DecodeCodeLocalsError::LocalsCountOutOfBound {
            max_locals,
            actual_locals: *expanded_locals,
        });
    }

    Ok(Local {
        count,
        ty: ValType::decode(reader)?,
    })
}
