use crate::core::Global;
use crate::core::types::GlobalType;
use crate::decode::ByteReader;
use crate::decode::helpers::{DecodeVectorError, ParseExpressionError, decode_expr, decode_vector};
use crate::decode::types::DecodeGlobalTypeError;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed decoding Global section")]
pub struct DecodeGlobalSectionError(#[from] pub DecodeVectorError<DecodeGlobalError>);

pub(crate) fn decode_global_section(
    reader: &mut ByteReader,
) -> Result<Vec<Global>, DecodeGlobalSectionError> {
    Ok(decode_vector(reader, parse_global)?)
}

#[derive(Debug, Error)]
pub enum DecodeGlobalError {
    #[error(transparent)]
    DecodeGlobalType(#[from] DecodeGlobalTypeError),

    #[error("failed decoding global initializer")]
    DecodeInit(#[from] ParseExpressionError),
}

fn parse_global(reader: &mut ByteReader) -> Result<Global, DecodeGlobalError> {
    let r#type = GlobalType::decode(reader)?;
    let init = decode_expr(reader)?;
    Ok(Global { r#type, init })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::instruction::Operands;
    use crate::core::opcode::{CoreOpcode, Opcode};
    use std::io::Cursor;

    fn global(bytes: &[u8]) -> Result<Global, DecodeGlobalError> {
        parse_global(&mut Cursor::new(bytes))
    }

    #[test]
    fn constant_initializers() {
        let g = global(&[0x7F, 0x00, 0x41, 0x2A, 0x0B]).unwrap();
        assert_eq!(g.init.len(), 1);
        assert_eq!(g.init[0].operands, Operands::I32(42));
        assert_eq!(g.init[0].offset, 2);

        // extended-const: global.get 0; i32.const 8; i32.add
        let g = global(&[0x7F, 0x00, 0x23, 0x00, 0x41, 0x08, 0x6A, 0x0B]).unwrap();
        assert_eq!(g.init.len(), 3);
    }

    #[test]
    fn initializer_is_not_validated() {
        // i32.const 0; nop; call 0
        let g = global(&[0x7F, 0x00, 0x41, 0x00, 0x01, 0x10, 0x00, 0x0B]).unwrap();
        let opcodes: Vec<_> = g.init.iter().map(|ins| ins.opcode).collect();
        assert_eq!(
            opcodes,
            [
                Opcode::Core(CoreOpcode::I32Const),
                Opcode::Core(CoreOpcode::Nop),
                Opcode::Core(CoreOpcode::Call),
            ]
        );
        assert_eq!(g.init[2].offset, 5);
    }
}
