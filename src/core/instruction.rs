//! The in-memory instruction model.
//!
//! An [Instruction] pairs an [Opcode] with its byte offset in the module and
//! one [Operands] value whose variant is determined by the opcode's shape.
use crate::core::indices::TypeIdx;
use crate::core::opcode::{CoreOpcode, Opcode};
use crate::core::types::{RefType, ValType};
use std::fmt;

pub type Expr = Vec<Instruction>;

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub opcode: Opcode,
    /// Absolute offset of the opcode byte in the module.
    pub offset: u64,
    pub operands: Operands,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operands {
    None,
    Index(u32),
    IndexPair(u32, u32),
    BranchTable { targets: Vec<u32>, default: u32 },
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    MemArg(MemArg),
    MemArgLane(MemArg, u8),
    Lane(u8),
    V128([u8; 16]),
    ValTypes(Vec<ValType>),
    RefType(RefType),
    Block(Block),
}

/// Alignment exponent and static offset of a memory access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemArg {
    pub align: u32,
    pub offset: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    Empty,
    Value(ValType),
    TypeIndex(TypeIdx),
}

/// Body of a `block`, `loop`, `if` or `try`.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub ty: BlockType,
    pub body: Vec<Instruction>,
    /// The `else` arm of an `if`.
    pub alternative: Option<Vec<Instruction>>,
    /// Target label of a `try` closed by `delegate`.
    pub delegate: Option<u32>,
}

impl Instruction {
    pub fn new(opcode: impl Into<Opcode>, operands: Operands) -> Self {
        Instruction {
            opcode: opcode.into(),
            offset: 0,
            operands,
        }
    }

    pub fn i32_const(value: i32) -> Self {
        Self::new(CoreOpcode::I32Const, Operands::I32(value))
    }

    pub fn is(&self, op: CoreOpcode) -> bool {
        self.opcode == Opcode::Core(op)
    }

    /// The single index operand, if the instruction carries one.
    pub fn index(&self) -> Option<u32> {
        match self.operands {
            Operands::Index(idx) => Some(idx),
            _ => None,
        }
    }

    pub fn block(&self) -> Option<&Block> {
        match &self.operands {
            Operands::Block(block) => Some(block),
            _ => None,
        }
    }

    /// Visits this instruction and every instruction nested inside it, in
    /// encoding order.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Instruction)) {
        f(self);
        if let Some(block) = self.block() {
            walk_all(&block.body, f);
            if let Some(alternative) = &block.alternative {
                walk_all(alternative, f);
            }
        }
    }
}

pub fn walk_all<'a>(instructions: &'a [Instruction], f: &mut impl FnMut(&'a Instruction)) {
    for instruction in instructions {
        instruction.walk(f);
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockType::Empty => Ok(()),
            BlockType::Value(t) => write!(f, " (result {t})"),
            BlockType::TypeIndex(idx) => write!(f, " (type {idx})"),
        }
    }
}

impl fmt::Display for MemArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.offset != 0 {
            write!(f, " offset={}", self.offset)?;
        }
        write!(f, " align={}", 1u64 << self.align.min(63))
    }
}

/// Renders the instruction head: the mnemonic and its immediates, without
/// any nested body.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.opcode.mnemonic())?;
        match &self.operands {
            Operands::None => Ok(()),
            Operands::Index(idx) => write!(f, " {idx}"),
            Operands::IndexPair(a, b) => write!(f, " {a} {b}"),
            Operands::BranchTable { targets, default } => {
                for t in targets {
                    write!(f, " {t}")?;
                }
                write!(f, " {default}")
            }
            Operands::I32(v) => write!(f, " {v}"),
            Operands::I64(v) => write!(f, " {v}"),
            Operands::F32(v) => write!(f, " {v}"),
            Operands::F64(v) => write!(f, " {v}"),
            Operands::MemArg(m) => write!(f, "{m}"),
            Operands::MemArgLane(m, lane) => write!(f, "{m} {lane}"),
            Operands::Lane(lane) => write!(f, " {lane}"),
            Operands::V128(bytes) => {
                f.write_str(" i8x16")?;
                for b in bytes {
                    write!(f, " {b:#04x}")?;
                }
                Ok(())
            }
            Operands::ValTypes(types) => {
                f.write_str(" (result")?;
                for t in types {
                    write!(f, " {t}")?;
                }
                f.write_str(")")
            }
            Operands::RefType(RefType::Func) => f.write_str(" func"),
            Operands::RefType(RefType::Extern) => f.write_str(" extern"),
            Operands::Block(block) => write!(f, "{}", block.ty),
        }
    }
}
