mod common;

use common::*;
use pretty_assertions::assert_eq;
use std::io::Cursor;
use wainfo::core::instruction::Operands;
use wainfo::core::opcode::{CoreOpcode, Opcode};
use wainfo::core::types::ValType;
use wainfo::core::{DecodeWarning, NameKind, SectionKind};
use wainfo::decode::sections::DecodeCodeError;
use wainfo::encode::Encoder;
use wainfo::{Config, Disassembler, decode_module, decode_module_with};

#[test]
fn type_section_with_one_signature() {
    // (func (param i32) (result i32))
    let wasm = ModuleBuilder::new()
        .section(TYPE, &vector(&[func_type(&[I32], &[I32])]))
        .build();

    let module = decode_module(Cursor::new(wasm)).unwrap();

    assert_eq!(module.version, 1);
    assert_eq!(module.sections.len(), 1);
    assert_eq!(module.sections[0].kind, SectionKind::Type);
    assert_eq!(module.types.len(), 1);
    assert_eq!(module.types[0].parameters, [ValType::I32]);
    assert_eq!(module.types[0].results, [ValType::I32]);
}

#[test]
fn unknown_sections_are_skipped() {
    let wasm = ModuleBuilder::new()
        .section(0x20, &[0xDE, 0xAD, 0xBE, 0xEF])
        .section(TYPE, &vector(&[func_type(&[], &[])]))
        .build();

    let module = decode_module(Cursor::new(wasm)).unwrap();

    let kinds: Vec<_> = module.sections.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, [SectionKind::Unknown(0x20), SectionKind::Type]);
    assert_eq!(module.types.len(), 1);
}

#[test]
fn name_section_maps() {
    let wasm = ModuleBuilder::new()
        .custom(
            "name",
            &name_section(&[
                (0, string("demo")),
                (1, name_map(&[(0, "main"), (1, "helper")])),
                (7, name_map(&[(0, "__stack_pointer")])),
                (0x42, vec![1, 2, 3]),
                (9, name_map(&[(0, ".rodata")])),
            ]),
        )
        .build();

    let module = decode_module(Cursor::new(wasm)).unwrap();
    let names = &module.names;

    assert_eq!(names.module.as_deref(), Some("demo"));
    assert_eq!(names.functions[&1], "helper");
    assert_eq!(names.function_indices["main"], 0);
    assert_eq!(names.globals[&0], "__stack_pointer");
    assert_eq!(names.data_segments[&0], ".rodata");
    assert!(module.warnings.is_empty());
    assert_eq!(module.custom_section_names().collect::<Vec<_>>(), ["name"]);
}

#[test]
fn duplicate_function_name_keeps_first() {
    let wasm = ModuleBuilder::new()
        .custom(
            "name",
            &name_section(&[(1, name_map(&[(0, "first"), (0, "second")]))]),
        )
        .build();

    let module = decode_module(Cursor::new(wasm)).unwrap();

    assert_eq!(module.names.functions[&0], "first");
    assert!(!module.names.function_indices.contains_key("second"));
    assert_eq!(module.warnings.len(), 1);
    assert!(matches!(
        &module.warnings[0],
        DecodeWarning::DuplicateName { kind: NameKind::Function, index: 0, name } if name == "second"
    ));
}

#[test]
fn shared_function_name_resolves_to_last_index() {
    let wasm = ModuleBuilder::new()
        .section(TYPE, &vector(&[func_type(&[], &[])]))
        .section(FUNCTION, &vector(&[vec![0], vec![0], vec![0]]))
        .custom(
            "name",
            &name_section(&[(1, name_map(&[(0, "helper"), (1, "main"), (2, "helper")]))]),
        )
        .build();

    let module = decode_module(Cursor::new(wasm)).unwrap();

    assert_eq!(module.names.functions[&0], "helper");
    assert_eq!(module.names.functions[&2], "helper");
    assert_eq!(module.function_index("helper"), Some(2));
    assert_eq!(module.function_index("main"), Some(1));
    assert!(module.warnings.is_empty());
}

#[test]
fn global_initializer_is_not_validated() {
    // (global i32 (i32.const 0) nop)
    let wasm = ModuleBuilder::new()
        .section(GLOBAL, &vector(&[vec![I32, 0x00, 0x41, 0x00, 0x01, 0x0B]]))
        .build();

    let module = decode_module(Cursor::new(wasm)).unwrap();

    assert_eq!(module.globals.len(), 1);
    let opcodes: Vec<_> = module.globals[0].init.iter().map(|ins| ins.opcode).collect();
    assert_eq!(
        opcodes,
        [
            Opcode::Core(CoreOpcode::I32Const),
            Opcode::Core(CoreOpcode::Nop),
        ]
    );
}

#[test]
fn function_bodies_are_decoded_on_demand() {
    let module = decode_module(Cursor::new(three_functions(2))).unwrap();

    assert_eq!(module.codes.len(), 3);
    assert!(module.codes.iter().all(|c| !c.is_resolved()));

    let body = module.function_body(1).unwrap();
    assert!(body.locals.is_empty());
    assert_eq!(body.instructions.len(), 1);
    assert!(body.instructions[0].is(CoreOpcode::Call));
    assert_eq!(body.instructions[0].operands, Operands::Index(0));

    assert!(module.codes[1].is_resolved());
    assert!(!module.codes[0].is_resolved());

    // the second request is served from the cache
    let again = module.function_body(1).unwrap();
    assert!(std::ptr::eq(body, again));
}

#[test]
fn call_sites_are_reported_with_offsets() {
    let module = decode_module(Cursor::new(three_functions(2))).unwrap();

    // preamble (8), Type section (7), Function section (6), Code header (2),
    // entry count, entry 0 (5), entry 1 size and locals count
    assert_eq!(module.function_calls(1, 0).unwrap(), [31]);
    assert!(module.function_calls(0, 0).unwrap().is_empty());
    assert!(module.function_calls(2, 0).unwrap().is_empty());
}

#[test]
fn code_section_can_be_skipped() {
    let config = Config {
        read_code: false,
        ..Default::default()
    };
    let module = decode_module_with(Cursor::new(three_functions(2)), &config).unwrap();

    assert!(module.has_section(SectionKind::Code));
    assert!(module.codes.is_empty());
    assert!(matches!(
        module.function_body(0),
        Err(DecodeCodeError::MissingEntry(0))
    ));
}

#[test]
fn disassembly_uses_function_names() {
    let module = decode_module(Cursor::new(three_functions(2))).unwrap();
    let disasm = Disassembler::new(&module);

    let text = disasm.function(1).unwrap();
    assert!(text.starts_with("(func $b"), "{text}");
    assert!(text.contains("call 0 <a>"), "{text}");
}

#[test]
fn unchanged_sections_copy_verbatim() {
    let wasm = three_functions(7);
    let module = decode_module(Cursor::new(wasm.clone())).unwrap();

    let mut encoder = Encoder::new(Vec::new());
    encoder.write_header(module.version).unwrap();
    for section in &module.sections {
        encoder.copy_section(&module, section).unwrap();
    }

    assert_eq!(encoder.finish().unwrap(), wasm);
}
