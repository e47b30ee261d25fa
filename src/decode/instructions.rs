//! WebAssembly instruction decoding.
//!
//! The decoder reads one opcode, looks up the [Shape] of its immediates in
//! the opcode tables and decodes the matching [Operands] variant. Control
//! instructions recurse until the terminator that closes their block.
//!
//! Defined in <https://www.w3.org/TR/wasm-core-2/#instructions>
use crate::core::indices::TypeIdx;
use crate::core::instruction::{Block, BlockType, Instruction, MemArg, Operands};
use crate::core::opcode::{
    ATOMIC_PREFIX, AtomicOpcode, CoreOpcode, DELEGATE, ELSE, END, MISC_PREFIX, MiscOpcode,
    Opcode, SIMD_PREFIX, Shape, SimdOpcode,
};
use crate::core::types::{RefType, ValType};
use crate::decode::FromMarkerByte;
use crate::decode::helpers::{ByteReader, DecodeVectorError, decode_vector, read_array, read_byte};
use crate::decode::integer::{
    DecodeSignedError, DecodeUnsignedError, decode_i32, decode_i64, decode_s33, decode_u32,
};
use crate::decode::types::{DecodeRefTypeError, DecodeValTypeError};
use std::io::{self, Cursor, Read};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed reading instruction opcode")]
    ReadOpcode(#[from] io::Error),

    #[error("unknown opcode {0:#04X} ({0})")]
    UnknownOpcode(u8),

    #[error("failed reading opcode after prefix {prefix:#04X}")]
    ReadPrefixedOpcode {
        prefix: u8,
        source: DecodeUnsignedError,
    },

    #[error("unknown opcode {code:#04X} ({code}) after prefix {prefix:#04X}")]
    UnknownPrefixedOpcode { prefix: u8, code: u32 },

    #[error("failed decoding immediates of `{opcode}` at offset {offset:#X}")]
    Operands {
        opcode: Opcode,
        offset: u64,
        source: OperandError,
    },

    #[error("failed decoding block type")]
    BlockType(#[from] DecodeBlockTypeError),

    #[error("failed decoding delegate label")]
    DelegateLabel(DecodeUnsignedError),

    #[error("unexpected `else` inside `{0}`")]
    UnexpectedElse(Opcode),

    #[error("unexpected `delegate` inside `{0}`")]
    UnexpectedDelegate(Opcode),
}

#[derive(Debug, Error)]
pub enum OperandError {
    #[error("failed decoding unsigned immediate")]
    Unsigned(#[from] DecodeUnsignedError),

    #[error("failed decoding signed immediate")]
    Signed(#[from] DecodeSignedError),

    #[error("failed reading immediate bytes")]
    ReadBytes(#[from] io::Error),

    #[error("failed decoding branch targets")]
    BranchTargets(#[from] DecodeVectorError<DecodeUnsignedError>),

    #[error("failed decoding select result types")]
    ValTypes(#[from] DecodeVectorError<DecodeValTypeError>),

    #[error(transparent)]
    RefType(#[from] DecodeRefTypeError),
}

/// Outcome of decoding one opcode: an instruction, or one of the
/// terminators that close a block.
#[derive(Debug, PartialEq)]
pub(crate) enum Parsed {
    Instruction(Instruction),
    End,
    Else,
    Delegate(u32),
}

impl Instruction {
    pub(crate) fn parse(reader: &mut ByteReader) -> Result<Parsed, ParseError> {
        let offset = reader.position();
        let byte = read_byte(reader)?;

        let opcode = match byte {
            END => return Ok(Parsed::End),
            ELSE => return Ok(Parsed::Else),
            DELEGATE => {
                let label = decode_u32(reader).map_err(ParseError::DelegateLabel)?;
                return Ok(Parsed::Delegate(label));
            }
            MISC_PREFIX | SIMD_PREFIX | ATOMIC_PREFIX => {
                let code = decode_u32(reader)
                    .map_err(|source| ParseError::ReadPrefixedOpcode { prefix: byte, source })?;
                let opcode = match byte {
                    MISC_PREFIX => MiscOpcode::from_code(code).map(Opcode::Misc),
                    SIMD_PREFIX => SimdOpcode::from_code(code).map(Opcode::Simd),
                    _ => AtomicOpcode::from_code(code).map(Opcode::Atomic),
                };
                opcode.ok_or(ParseError::UnknownPrefixedOpcode { prefix: byte, code })?
            }
            b => Opcode::Core(CoreOpcode::from_code(b).ok_or(ParseError::UnknownOpcode(b))?),
        };

        let operands = match opcode.shape() {
            Shape::Block => Operands::Block(parse_block(opcode, reader)?),
            shape => decode_immediates(shape, reader).map_err(|source| ParseError::Operands {
                opcode,
                offset,
                source,
            })?,
        };

        Ok(Parsed::Instruction(Instruction {
            opcode,
            offset,
            operands,
        }))
    }
}

fn parse_block(opcode: Opcode, reader: &mut ByteReader) -> Result<Block, ParseError> {
    let ty = BlockType::decode(reader)?;
    let is_if = opcode == Opcode::Core(CoreOpcode::If);
    let is_try = opcode == Opcode::Core(CoreOpcode::Try);

    let mut block = Block {
        ty,
        body: Vec::new(),
        alternative: None,
        delegate: None,
    };

    // `catch` and `catch_all` stay in the body of a `try` as plain
    // instructions; only `end` and `delegate` close it
    loop {
        match Instruction::parse(reader)? {
            Parsed::Instruction(ins) => match &mut block.alternative {
                Some(alternative) => alternative.push(ins),
                None => block.body.push(ins),
            },
            Parsed::End => return Ok(block),
            Parsed::Else if is_if && block.alternative.is_none() => {
                block.alternative = Some(Vec::new());
            }
            Parsed::Else => return Err(ParseError::UnexpectedElse(opcode)),
            Parsed::Delegate(label) if is_try => {
                block.delegate = Some(label);
                return Ok(block);
            }
            Parsed::Delegate(_) => return Err(ParseError::UnexpectedDelegate(opcode)),
        }
    }
}

fn decode_immediates<R: Read + ?Sized>(shape: Shape, reader: &mut R) -> Result<Operands, OperandError> {
    Ok(match shape {
        // blocks are decoded by parse_block
        Shape::None | Shape::Block => Operands::None,
        Shape::Index => Operands::Index(decode_u32(reader)?),
        Shape::IndexPair => {
            let first = decode_u32(reader)?;
            Operands::IndexPair(first, decode_u32(reader)?)
        }
        Shape::BranchTable => {
            let targets = decode_vector(reader, decode_u32)?;
            Operands::BranchTable {
                targets,
                default: decode_u32(reader)?,
            }
        }
        Shape::I32 => Operands::I32(decode_i32(reader)?),
        Shape::I64 => Operands::I64(decode_i64(reader)?),
        Shape::F32 => Operands::F32(f32::from_le_bytes(read_array(reader)?)),
        Shape::F64 => Operands::F64(f64::from_le_bytes(read_array(reader)?)),
        Shape::MemArg => Operands::MemArg(MemArg::decode(reader)?),
        Shape::MemArgLane => {
            let memarg = MemArg::decode(reader)?;
            Operands::MemArgLane(memarg, read_byte(reader)?)
        }
        Shape::Lane => Operands::Lane(read_byte(reader)?),
        Shape::V128 => Operands::V128(read_array(reader)?),
        Shape::SelectTyped => Operands::ValTypes(decode_vector(reader, ValType::decode)?),
        Shape::RefNull => Operands::RefType(RefType::decode(reader)?),
        Shape::Reserved => {
            read_byte(reader)?;
            Operands::None
        }
    })
}

impl MemArg {
    pub(crate) fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self, DecodeUnsignedError> {
        let align = decode_u32(reader)?;
        let offset = decode_u32(reader)?;
        Ok(MemArg { align, offset })
    }
}

#[derive(Debug, Error)]
pub enum DecodeBlockTypeError {
    #[error("failed reading block type")]
    Io(#[from] io::Error),

    #[error("failed decoding block type index")]
    TypeIndex(#[from] DecodeSignedError),

    #[error("negative block type index: {0}")]
    NegativeTypeIndex(i64),
}

impl BlockType {
    const EMPTY: u8 = 0x40;

    pub(crate) fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self, DecodeBlockTypeError> {
        let b = read_byte(reader)?;
        if b == Self::EMPTY {
            return Ok(BlockType::Empty);
        }
        if let Ok(t) = ValType::from_marker(b) {
            return Ok(BlockType::Value(t));
        }

        // neither empty nor a value type, so the byte starts an s33 type index
        let mut reader = Cursor::new([b]).chain(reader);
        let x = decode_s33(&mut reader)?;
        let idx = u32::try_from(x).map_err(|_| DecodeBlockTypeError::NegativeTypeIndex(x))?;
        Ok(BlockType::TypeIndex(TypeIdx(idx)))
    }
}
