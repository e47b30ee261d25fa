//! Encoding of the parts of a module that get regenerated.
//!
//! Sections that are not regenerated are copied byte for byte from the
//! source module. Instruction sequences are only encodable as constant
//! expressions made of a single instruction followed by `end`.
mod integer;

pub use integer::{
    i32_len, i64_len, signed_len, u32_len, unsigned_len, write_i32, write_i64, write_signed,
    write_u32, write_u64, write_unsigned,
};

use crate::core::instruction::{Instruction, Operands};
use crate::core::opcode::{CoreOpcode, END, Opcode};
use crate::core::{Data, DataMode, Global, Module, Section, SectionKind};
use std::io::{self, Write};
use thiserror::Error;

const MAGIC_NUMBER: [u8; 4] = [0x00, 0x61, 0x73, 0x6D];

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed writing output")]
    Io(#[from] io::Error),

    #[error("cannot encode `{0}` in a constant expression")]
    UnsupportedInstruction(String),

    #[error("only single-instruction constant expressions can be encoded; got {len} instructions")]
    UnsupportedExpression { len: usize },

    #[error("length {0} does not fit in u32")]
    TooLarge(usize),
}

fn checked_len(len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::TooLarge(len))
}

/// Writes module parts to `W`.
///
/// The encoder does no buffering of its own; sizes of regenerated sections
/// are computed up front with the `*_len` helpers.
pub struct Encoder<W: Write> {
    writer: W,
}

impl<W: Write> Encoder<W> {
    pub fn new(writer: W) -> Self {
        Encoder { writer }
    }

    /// Flushes and returns the underlying writer.
    pub fn finish(mut self) -> Result<W, EncodeError> {
        self.writer.flush()?;
        Ok(self.writer)
    }

    pub fn write_header(&mut self, version: u32) -> Result<(), EncodeError> {
        self.writer.write_all(&MAGIC_NUMBER)?;
        self.writer.write_all(&version.to_le_bytes())?;
        Ok(())
    }

    pub fn write_byte(&mut self, b: u8) -> Result<(), EncodeError> {
        self.writer.write_all(&[b])?;
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), EncodeError> {
        write_u32(&mut self.writer, value)?;
        Ok(())
    }

    pub fn write_section_header(&mut self, kind: SectionKind, size: u32) -> Result<(), EncodeError> {
        self.write_byte(kind.id())?;
        self.write_u32(size)
    }

    /// Copies `section`, header included, from the bytes `module` was
    /// decoded from.
    pub fn copy_section(&mut self, module: &Module, section: &Section) -> Result<(), EncodeError> {
        tracing::trace!(kind = ?section.kind, size = section.size, "copying section");
        let raw = module
            .source()
            .get(section.raw_range())
            .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))?;
        self.writer.write_all(raw)?;
        Ok(())
    }

    pub fn write_const_expr(&mut self, expr: &[Instruction]) -> Result<(), EncodeError> {
        let ins = single_instruction(expr)?;
        match (ins.opcode, &ins.operands) {
            (Opcode::Core(CoreOpcode::I32Const), Operands::I32(v)) => {
                self.write_byte(CoreOpcode::I32Const.code())?;
                write_i32(&mut self.writer, *v)?;
            }
            (Opcode::Core(CoreOpcode::I64Const), Operands::I64(v)) => {
                self.write_byte(CoreOpcode::I64Const.code())?;
                write_i64(&mut self.writer, *v)?;
            }
            (Opcode::Core(CoreOpcode::F32Const), Operands::F32(v)) => {
                self.write_byte(CoreOpcode::F32Const.code())?;
                self.writer.write_all(&v.to_le_bytes())?;
            }
            (Opcode::Core(CoreOpcode::F64Const), Operands::F64(v)) => {
                self.write_byte(CoreOpcode::F64Const.code())?;
                self.writer.write_all(&v.to_le_bytes())?;
            }
            (Opcode::Core(op @ (CoreOpcode::GlobalGet | CoreOpcode::RefFunc)), Operands::Index(idx)) => {
                self.write_byte(op.code())?;
                self.write_u32(*idx)?;
            }
            (Opcode::Core(CoreOpcode::RefNull), Operands::RefType(t)) => {
                self.write_byte(CoreOpcode::RefNull.code())?;
                self.write_byte(t.marker())?;
            }
            _ => return Err(EncodeError::UnsupportedInstruction(ins.to_string())),
        }
        self.write_byte(END)
    }

    pub fn write_global(&mut self, global: &Global) -> Result<(), EncodeError> {
        self.write_byte(global.r#type.1.marker())?;
        self.write_byte(global.r#type.0.marker())?;
        self.write_const_expr(&global.init)
    }

    pub fn write_global_section(&mut self, globals: &[Global]) -> Result<(), EncodeError> {
        self.write_section_header(SectionKind::Global, global_section_len(globals)?)?;
        self.write_u32(checked_len(globals.len())?)?;
        for global in globals {
            self.write_global(global)?;
        }
        Ok(())
    }

    pub fn write_data_segment(&mut self, data: &Data) -> Result<(), EncodeError> {
        self.write_u32(data.mode.tag())?;
        match &data.mode {
            DataMode::Active { offset } => self.write_const_expr(offset)?,
            DataMode::Passive => {}
            DataMode::ActiveWithMemory { memory, offset } => {
                self.write_u32(memory.0)?;
                self.write_const_expr(offset)?;
            }
        }
        self.write_u32(checked_len(data.init.len())?)?;
        self.writer.write_all(&data.init)?;
        Ok(())
    }

    pub fn write_data_section(&mut self, datas: &[Data]) -> Result<(), EncodeError> {
        self.write_section_header(SectionKind::Data, data_section_len(datas)?)?;
        self.write_u32(checked_len(datas.len())?)?;
        for data in datas {
            self.write_data_segment(data)?;
        }
        Ok(())
    }

    pub fn write_data_count_section(&mut self, count: u32) -> Result<(), EncodeError> {
        self.write_section_header(SectionKind::DataCount, u32_len(count))?;
        self.write_u32(count)
    }
}

fn single_instruction(expr: &[Instruction]) -> Result<&Instruction, EncodeError> {
    match expr {
        [ins] => Ok(ins),
        _ => Err(EncodeError::UnsupportedExpression { len: expr.len() }),
    }
}

/// Encoded size of a constant expression, `end` included.
pub fn const_expr_len(expr: &[Instruction]) -> Result<u32, EncodeError> {
    let ins = single_instruction(expr)?;
    let immediates = match (ins.opcode, &ins.operands) {
        (Opcode::Core(CoreOpcode::I32Const), Operands::I32(v)) => i32_len(*v),
        (Opcode::Core(CoreOpcode::I64Const), Operands::I64(v)) => i64_len(*v),
        (Opcode::Core(CoreOpcode::F32Const), Operands::F32(_)) => 4,
        (Opcode::Core(CoreOpcode::F64Const), Operands::F64(_)) => 8,
        (Opcode::Core(CoreOpcode::GlobalGet | CoreOpcode::RefFunc), Operands::Index(idx)) => {
            u32_len(*idx)
        }
        (Opcode::Core(CoreOpcode::RefNull), Operands::RefType(_)) => 1,
        _ => return Err(EncodeError::UnsupportedInstruction(ins.to_string())),
    };
    Ok(1 + immediates + 1)
}

pub fn global_len(global: &Global) -> Result<u32, EncodeError> {
    Ok(2 + const_expr_len(&global.init)?)
}

pub fn data_segment_len(data: &Data) -> Result<u32, EncodeError> {
    let mode = match &data.mode {
        DataMode::Active { offset } => const_expr_len(offset)?,
        DataMode::Passive => 0,
        DataMode::ActiveWithMemory { memory, offset } => u32_len(memory.0) + const_expr_len(offset)?,
    };
    let init = checked_len(data.init.len())?;
    Ok(u32_len(data.mode.tag()) + mode + u32_len(init) + init)
}

pub fn global_section_len(globals: &[Global]) -> Result<u32, EncodeError> {
    vector_len(globals, global_len)
}

pub fn data_section_len(datas: &[Data]) -> Result<u32, EncodeError> {
    vector_len(datas, data_segment_len)
}

fn vector_len<T>(
    items: &[T],
    item_len: impl Fn(&T) -> Result<u32, EncodeError>,
) -> Result<u32, EncodeError> {
    let mut len = u64::from(u32_len(checked_len(items.len())?));
    for item in items {
        len += u64::from(item_len(item)?);
    }
    u32::try_from(len).map_err(|_| EncodeError::TooLarge(len as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::indices::MemIdx;
    use crate::core::types::{GlobalType, Mut, RefType, ValType};
    use pretty_assertions::assert_eq;

    fn encode(f: impl FnOnce(&mut Encoder<Vec<u8>>) -> Result<(), EncodeError>) -> Vec<u8> {
        let mut encoder = Encoder::new(Vec::new());
        f(&mut encoder).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn const_expressions() {
        let cases = [
            (Instruction::i32_const(-1), vec![0x41, 0x7F, 0x0B]),
            (
                Instruction::new(CoreOpcode::GlobalGet, Operands::Index(200)),
                vec![0x23, 0xC8, 0x01, 0x0B],
            ),
            (
                Instruction::new(CoreOpcode::RefNull, Operands::RefType(RefType::Extern)),
                vec![0xD0, 0x6F, 0x0B],
            ),
            (
                Instruction::new(CoreOpcode::F32Const, Operands::F32(1.0)),
                vec![0x43, 0x00, 0x00, 0x80, 0x3F, 0x0B],
            ),
        ];
        for (ins, expected) in cases {
            let expr = vec![ins];
            assert_eq!(encode(|e| e.write_const_expr(&expr)), expected);
            assert_eq!(const_expr_len(&expr).unwrap() as usize, expected.len());
        }
    }

    #[test]
    fn unsupported_expressions() {
        let mut encoder = Encoder::new(Vec::new());
        let add = vec![Instruction::new(CoreOpcode::I32Add, Operands::None)];
        assert!(matches!(
            encoder.write_const_expr(&add),
            Err(EncodeError::UnsupportedInstruction(s)) if s == "i32.add"
        ));

        let two = vec![Instruction::i32_const(1), Instruction::i32_const(2)];
        assert!(matches!(
            encoder.write_const_expr(&two),
            Err(EncodeError::UnsupportedExpression { len: 2 })
        ));
        assert!(matches!(
            const_expr_len(&[]),
            Err(EncodeError::UnsupportedExpression { len: 0 })
        ));
    }

    #[test]
    fn global_section() {
        let globals = [Global {
            r#type: GlobalType(Mut::Var, ValType::I32),
            init: vec![Instruction::i32_const(1024)],
        }];
        let bytes = encode(|e| e.write_global_section(&globals));
        assert_eq!(bytes, [0x06, 0x07, 0x01, 0x7F, 0x01, 0x41, 0x80, 0x08, 0x0B]);
    }

    #[test]
    fn data_segments_in_every_mode() {
        let datas = [
            Data {
                mode: DataMode::Active {
                    offset: vec![Instruction::i32_const(8)],
                },
                init: vec![1, 2],
            },
            Data {
                mode: DataMode::Passive,
                init: vec![3],
            },
            Data {
                mode: DataMode::ActiveWithMemory {
                    memory: MemIdx(1),
                    offset: vec![Instruction::i32_const(0)],
                },
                init: vec![],
            },
        ];
        let bytes = encode(|e| e.write_data_section(&datas));
        assert_eq!(
            bytes,
            [
                0x0B, 0x11, 0x03, // id, size, count
                0x00, 0x41, 0x08, 0x0B, 0x02, 0x01, 0x02, // active
                0x01, 0x01, 0x03, // passive
                0x02, 0x01, 0x41, 0x00, 0x0B, 0x00, // active with memory
            ]
        );
        assert_eq!(data_section_len(&datas).unwrap(), 17);
    }

    #[test]
    fn data_count_section() {
        assert_eq!(encode(|e| e.write_data_count_section(300)), [0x0C, 0x02, 0xAC, 0x02]);
    }
}
