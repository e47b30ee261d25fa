mod common;

use common::*;
use std::error::Error;
use std::io::{Cursor, ErrorKind};
use wainfo::core::SectionKind;
use wainfo::decode::instructions::ParseError;
use wainfo::decode::integer::DecodeUnsignedError;
use wainfo::decode::sections::{DecodeCodeError, DecodeTypeSectionError};
use wainfo::decode::types::DecodeFuncTypeError;
use wainfo::decode::{
    DecodeModuleError, DecodeSectionHeaderError, DecodeVectorError, ParseExpressionError,
    ParsePreambleError, SectionOutOfBoundsError,
};
use wainfo::{Module, decode_module};

fn decode(wasm: Vec<u8>) -> Result<Module, DecodeModuleError> {
    decode_module(Cursor::new(wasm))
}

#[test]
fn bad_magic() {
    let err = decode(b"\0wasm\x01\0\0".to_vec()).expect_err("bad magic should fail to decode");

    match err {
        DecodeModuleError::ParsePreamble(ParsePreambleError::UnexpectedMagic(magic)) => {
            assert_eq!(&magic, b"\0was");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn truncated_version() {
    let err = decode(b"\0asm\x01\0".to_vec()).expect_err("truncated version should fail");

    match err {
        DecodeModuleError::ParsePreamble(ParsePreambleError::Io(e)) => {
            assert_eq!(e.kind(), ErrorKind::UnexpectedEof);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn section_size_representation_too_long() {
    let mut wasm = ModuleBuilder::new().build();
    wasm.extend([TYPE, 0x80, 0x80, 0x80, 0x80, 0x80, 0x00]);

    let err = decode(wasm).expect_err("overlong section size should fail");

    assert!(matches!(
        err,
        DecodeModuleError::DecodeSectionHeader(DecodeSectionHeaderError::DecodeSectionSize(
            DecodeUnsignedError::RepresentationTooLong { bits: 32 }
        ))
    ));
}

#[test]
fn section_past_end_of_input() {
    let mut wasm = ModuleBuilder::new().build();
    wasm.extend([TYPE, 10, 1, 0x60, 0, 0]);

    let err = decode(wasm).expect_err("section past the input should fail");

    match err {
        DecodeModuleError::SectionOutOfBounds(SectionOutOfBoundsError {
            kind,
            offset,
            size,
            available,
        }) => {
            assert_eq!(kind, SectionKind::Type);
            assert_eq!(offset, 8);
            assert_eq!(size, 10);
            assert_eq!(available, 4);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn function_type_form_mismatch() {
    let wasm = ModuleBuilder::new()
        .section(TYPE, &[1, 0x61, 0, 0])
        .build();

    let err = decode(wasm).expect_err("bad function type form should fail");

    match err {
        DecodeModuleError::DecodeTypeSection(DecodeTypeSectionError(
            DecodeVectorError::ParseElement {
                position,
                source: DecodeFuncTypeError::InvalidForm(0x61),
            },
        )) => assert_eq!(position, 0),
        other => panic!("unexpected error: {other:?}"),
    }
}

fn single_function(code: &[u8]) -> Module {
    let wasm = ModuleBuilder::new()
        .section(TYPE, &vector(&[func_type(&[], &[])]))
        .section(FUNCTION, &vector(&[vec![0]]))
        .section(CODE, &vector(&[body(code)]))
        .build();
    decode(wasm).unwrap()
}

#[test]
fn unterminated_block_in_function_body() {
    // block; i32.const 1; drop  with neither `end` present
    let module = single_function(&[0x02, 0x40, 0x41, 0x01, 0x1A]);

    let err = module
        .function_body(0)
        .expect_err("unterminated block should fail");

    match err {
        DecodeCodeError::DecodeFunctionBody(ParseExpressionError::ParseInstruction(
            ParseError::ReadOpcode(e),
        )) => assert_eq!(e.kind(), ErrorKind::UnexpectedEof),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!module.codes[0].is_resolved());
}

#[test]
fn unknown_opcode_in_function_body() {
    let module = single_function(&[0x01, 0x27, 0x0B]);

    let err = module.function_body(0).expect_err("unknown opcode should fail");

    assert!(matches!(
        err,
        DecodeCodeError::DecodeFunctionBody(ParseExpressionError::ParseInstruction(
            ParseError::UnknownOpcode(0x27)
        ))
    ));
    assert_eq!(
        err.source().map(|e| e.to_string()),
        Some("failed parsing instruction".to_string())
    );
}

#[test]
fn unknown_prefixed_opcode_in_function_body() {
    let module = single_function(&[0xFC, 0x7F, 0x0B]);

    let err = module.function_body(0).expect_err("unknown prefixed opcode should fail");

    assert!(matches!(
        err,
        DecodeCodeError::DecodeFunctionBody(ParseExpressionError::ParseInstruction(
            ParseError::UnknownPrefixedOpcode { prefix: 0xFC, code: 0x7F }
        ))
    ));
}
