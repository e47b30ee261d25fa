use crate::core::indices::{FuncIdx, TableIdx};
use crate::core::instruction::Expr;
use crate::core::types::RefType;
use crate::core::{Elem, ElemItems, ElemMode};
use crate::decode::helpers::{DecodeVectorError, ParseExpressionError, decode_expr, decode_vector};
use crate::decode::indices::DecodeIndexError;
use crate::decode::integer::{DecodeUnsignedError, decode_u32};
use crate::decode::types::DecodeRefTypeError;
use crate::decode::{ByteReader, read_byte};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed decoding Element section")]
pub struct DecodeElementSectionError(#[from] pub DecodeVectorError<DecodeElementError>);

pub(crate) fn decode_element_section(
    reader: &mut ByteReader,
) -> Result<Vec<Elem>, DecodeElementSectionError> {
    Ok(decode_vector(reader, parse_elem)?)
}

#[derive(Debug, Error)]
pub enum DecodeElementError {
    #[error("failed decoding bitfield")]
    DecodeBitfield(DecodeUnsignedError),

    #[error("invalid bitfield: expected value in range [0,7]; got {0}")]
    InvalidBitfield(u32),

    #[error("failed decoding offset expression")]
    DecodeOffsetExpression(ParseExpressionError),

    #[error("failed decoding Element kind")]
    DecodeElementKind(#[from] DecodeElementKindError),

    #[error(transparent)]
    DecodeTableIdx(#[from] DecodeIndexError),

    #[error(transparent)]
    DecodeReferenceType(#[from] DecodeRefTypeError),

    #[error("failed decoding element expressions")]
    DecodeInit(DecodeVectorError<ParseExpressionError>),

    #[error(transparent)]
    DecodeFuncIdxVector(#[from] DecodeVectorError<DecodeIndexError>),
}

// Bit 0 clear: active. Bit 0 set: bit 1 picks declarative over passive.
// For active segments bit 1 means an explicit table index. Bit 2 means the
// items are expressions rather than function indices, with a reference type
// in place of the element kind byte.
const PASSIVE_OR_DECLARATIVE: u32 = 0b001;
const EXPLICIT_TABLE_OR_DECLARATIVE: u32 = 0b010;
const EXPRESSIONS: u32 = 0b100;

fn parse_elem(reader: &mut ByteReader) -> Result<Elem, DecodeElementError> {
    let flags = decode_u32(reader).map_err(DecodeElementError::DecodeBitfield)?;
    if flags > 7 {
        return Err(DecodeElementError::InvalidBitfield(flags));
    }

    let mode = if flags & PASSIVE_OR_DECLARATIVE == 0 {
        let table = if flags & EXPLICIT_TABLE_OR_DECLARATIVE != 0 {
            TableIdx::decode(reader)?
        } else {
            TableIdx(0)
        };
        let offset = decode_expr(reader).map_err(DecodeElementError::DecodeOffsetExpression)?;
        ElemMode::Active { table, offset }
    } else if flags & EXPLICIT_TABLE_OR_DECLARATIVE != 0 {
        ElemMode::Declarative
    } else {
        ElemMode::Passive
    };

    // flags 0 and 4 carry neither an element kind nor a reference type
    let has_type = flags & 0b011 != 0;

    let (r#type, items) = if flags & EXPRESSIONS == 0 {
        let r#type = if has_type {
            parse_elemkind(reader)?
        } else {
            RefType::Func
        };
        let funcs = decode_vector(reader, FuncIdx::decode)?;
        (r#type, ElemItems::Functions(funcs))
    } else {
        let r#type = if has_type {
            RefType::decode(reader)?
        } else {
            RefType::Func
        };
        let exprs: Vec<Expr> =
            decode_vector(reader, decode_expr).map_err(DecodeElementError::DecodeInit)?;
        (r#type, ElemItems::Expressions(exprs))
    };

    Ok(Elem {
        flags,
        mode,
        r#type,
        items,
    })
}

#[derive(Debug, Error)]
pub enum DecodeElementKindError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("expected byte 0x00; got {0:#04X}")]
    InvalidElemKind(u8),
}

fn parse_elemkind(reader: &mut ByteReader) -> Result<RefType, DecodeElementKindError> {
    // the legacy encodings use 0x00 for funcref, which is not a RefType marker
    let b = read_byte(reader)?;
    if b != 0x00 {
        return Err(DecodeElementKindError::InvalidElemKind(b));
    }

    Ok(RefType::Func)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::instruction::{Instruction, Operands};
    use crate::core::opcode::{CoreOpcode, Opcode};
    use std::io::Cursor;

    fn elem(bytes: &[u8]) -> Elem {
        parse_elem(&mut Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn active_function_indices() {
        let e = elem(&[0x00, 0x41, 0x01, 0x0B, 0x02, 0x03, 0x04]);
        assert_eq!(
            e.mode,
            ElemMode::Active {
                table: TableIdx(0),
                offset: vec![Instruction {
                    opcode: Opcode::Core(CoreOpcode::I32Const),
                    offset: 1,
                    operands: Operands::I32(1),
                }],
            }
        );
        assert_eq!(e.items, ElemItems::Functions(vec![FuncIdx(3), FuncIdx(4)]));
    }

    #[test]
    fn explicit_table_with_elemkind() {
        let e = elem(&[0x02, 0x01, 0x41, 0x00, 0x0B, 0x00, 0x01, 0x07]);
        assert!(matches!(e.mode, ElemMode::Active { table: TableIdx(1), .. }));
        assert_eq!(e.r#type, RefType::Func);
        assert_eq!(e.items.len(), 1);
    }

    #[test]
    fn passive_and_declarative_expressions() {
        // ref.null extern; end
        let e = elem(&[0x05, 0x6F, 0x01, 0xD0, 0x6F, 0x0B]);
        assert_eq!(e.mode, ElemMode::Passive);
        assert_eq!(e.r#type, RefType::Extern);
        assert!(matches!(e.items, ElemItems::Expressions(ref v) if v.len() == 1));

        let e = elem(&[0x03, 0x00, 0x00]);
        assert_eq!(e.mode, ElemMode::Declarative);
        assert!(e.items.is_empty());
    }

    #[test]
    fn rejects_unknown_bitfield() {
        assert!(matches!(
            parse_elem(&mut Cursor::new(&[0x08u8][..])),
            Err(DecodeElementError::InvalidBitfield(8))
        ));
    }
}
