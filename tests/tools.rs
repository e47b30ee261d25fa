mod common;

use common::*;
use pretty_assertions::assert_eq;
use regex::Regex;
use std::io::Cursor;
use wainfo::FunctionFilter;
use wainfo::core::instruction::Operands;
use wainfo::core::{DataMode, Module};
use wainfo::decode_module;
use wainfo::diff::{DiffOptions, Difference, FunctionDiff, FunctionStatus, diff_modules};
use wainfo::embed::{
    DESCRIPTOR_LENGTH_EXPORT, EmbedError, GET_DESCRIPTOR_EXPORT, GET_MODULE_DATA_EXPORT, Image,
    Template, VERSION_EXPORT, descriptor_blob, embed, replacements,
};
use wainfo::rewrite::{RewriteError, RewriteOptions, SegmentMode, rewrite_data_section};

fn decode(wasm: Vec<u8>) -> Module {
    decode_module(Cursor::new(wasm)).unwrap()
}

fn data_module() -> Vec<u8> {
    let mut active = vec![0, 0x41, 0, 0x0B];
    active.extend(vector(&[vec![0xAB], vec![0xCD]]));

    ModuleBuilder::new()
        .section(MEMORY, &vector(&[vec![0x00, 1]]))
        .section(DATA_COUNT, &[1])
        .section(DATA, &vector(&[active]))
        .custom("producers", b"test")
        .build()
}

fn blob_with_zero_run() -> Vec<u8> {
    let mut blob: Vec<u8> = (1..=32).collect();
    blob[10..22].fill(0);
    blob
}

#[test]
fn rewrite_splits_blob_at_zero_run() {
    let module = decode(data_module());
    let blob = blob_with_zero_run();
    let options = RewriteOptions {
        auto_split: true,
        base_offset: 100,
        ..Default::default()
    };

    let out = rewrite_data_section(&module, &blob, &options, Vec::new()).unwrap();
    let rewritten = decode(out);

    let kinds = |m: &Module| m.sections.iter().map(|s| s.kind).collect::<Vec<_>>();
    assert_eq!(kinds(&rewritten), kinds(&module));
    assert_eq!(rewritten.memories, module.memories);
    assert_eq!(rewritten.data_count, Some(2));
    assert_eq!(rewritten.datas.len(), 2);

    let offsets: Vec<_> = rewritten
        .datas
        .iter()
        .map(|d| d.mode.offset().map(|e| e[0].operands.clone()))
        .collect();
    assert_eq!(offsets, [Some(Operands::I32(100)), Some(Operands::I32(122))]);
    assert_eq!(rewritten.datas[0].init, &blob[..10]);
    assert_eq!(rewritten.datas[1].init, &blob[22..]);
}

#[test]
fn rewrite_passive_single_segment() {
    let module = decode(data_module());
    let blob = blob_with_zero_run();
    let options = RewriteOptions {
        mode: SegmentMode::Passive,
        ..Default::default()
    };

    let rewritten = decode(rewrite_data_section(&module, &blob, &options, Vec::new()).unwrap());

    assert_eq!(rewritten.data_count, Some(1));
    assert_eq!(rewritten.datas.len(), 1);
    assert_eq!(rewritten.datas[0].mode, DataMode::Passive);
    assert_eq!(rewritten.datas[0].init, blob);
}

#[test]
fn rewrite_requires_data_section() {
    let module = decode(three_functions(1));

    let err = rewrite_data_section(&module, &[1, 2, 3], &RewriteOptions::default(), Vec::new())
        .expect_err("a module without Data section cannot be rewritten");
    assert!(matches!(err, RewriteError::MissingDataSection));
}

fn template(version_export_kind: u8) -> Vec<u8> {
    ModuleBuilder::new()
        .section(TYPE, &vector(&[func_type(&[], &[])]))
        .section(FUNCTION, &vector(&[vec![0], vec![0]]))
        .section(MEMORY, &vector(&[vec![0x00, 1]]))
        .section(
            GLOBAL,
            &vector(&[
                global_i32(false, 1),
                global_i32(true, 5),
                global_i32(true, 6),
                global_i32(false, 0),
            ]),
        )
        .section(
            EXPORT,
            &vector(&[
                export(VERSION_EXPORT, version_export_kind, 0),
                export(DESCRIPTOR_LENGTH_EXPORT, 3, 3),
                export(GET_DESCRIPTOR_EXPORT, 0, 0),
                export(GET_MODULE_DATA_EXPORT, 0, 1),
            ]),
        )
        .section(DATA_COUNT, &[2])
        .section(CODE, &vector(&[body(&[0x0B]), body(&[0x0B])]))
        .section(DATA, &vector(&[passive_data(&[0; 4]), passive_data(&[0; 8])]))
        .build()
}

#[test]
fn embed_replaces_descriptor_length_global() {
    let module = decode(template(3));
    let content = [0x5A; 300];
    let image = Image {
        path: "a.dll",
        content: &content,
    };

    let located = Template::locate(&module).unwrap();
    assert_eq!(located.version_global, 0);
    assert_eq!(located.descriptor_length_global, 3);
    assert_eq!(located.descriptor_segment, 0);
    assert_eq!(located.module_data_segment, 1);

    let (globals, datas) = replacements(&module, &located, image).unwrap();
    let descriptor = descriptor_blob(&[image]).unwrap();

    assert_eq!(globals.len(), module.globals.len());
    for (idx, (new, old)) in globals.iter().zip(&module.globals).enumerate() {
        if idx == 3 {
            assert_eq!(new.r#type, old.r#type);
            assert_eq!(new.init.len(), 1);
            assert_eq!(new.init[0].operands, Operands::I32(descriptor.len() as i32));
        } else {
            assert_eq!(new, old);
        }
    }
    assert_eq!(datas[0].init, descriptor);
    assert_eq!(datas[1].init, content);

    // the template itself is untouched
    assert_eq!(module.globals[3].init[0].operands, Operands::I32(0));
    assert_eq!(module.datas[1].init, [0; 8]);
}

#[test]
fn embedded_module_decodes() {
    let module = decode(template(3));
    let content = b"payload bytes";
    let image = Image {
        path: "lib.dll",
        content,
    };

    let out = decode(embed(&module, image, Vec::new()).unwrap());

    assert_eq!(out.exports, module.exports);
    assert_eq!(out.codes.len(), 2);
    assert_eq!(&out.globals[..3], &module.globals[..3]);
    assert_eq!(out.globals[3].init[0].operands, Operands::I32(24));
    assert_eq!(out.datas[0].init, descriptor_blob(&[image]).unwrap());
    assert_eq!(out.datas[1].init, content);
    assert!(out.datas.iter().all(|d| d.mode == DataMode::Passive));
}

#[test]
fn embed_rejects_mismatched_export_kind() {
    let module = decode(template(0));

    let err = Template::locate(&module).expect_err("version exported as a function");
    match err {
        EmbedError::ExportKind {
            name,
            expected,
            found,
        } => {
            assert_eq!(name, VERSION_EXPORT);
            assert_eq!(expected, "global");
            assert_eq!(found, "function");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn embed_requires_exports() {
    let module = decode(three_functions(1));

    let err = Template::locate(&module).expect_err("plain module is not a template");
    assert!(matches!(err, EmbedError::MissingExport(VERSION_EXPORT)));
}

fn diff(left: Vec<u8>, right: Vec<u8>, options: &DiffOptions) -> wainfo::diff::DiffReport {
    diff_modules(&decode(left), &decode(right), options).unwrap()
}

#[test]
fn diff_reports_the_one_changed_function() {
    let options = DiffOptions {
        functions: true,
        ..Default::default()
    };

    let report = diff(three_functions(2), three_functions(3), &options);

    assert!(report.differences.is_empty());
    let status = |name: &str, status| FunctionDiff {
        name: name.to_string(),
        status,
    };
    assert_eq!(
        report.functions,
        [
            status("a", FunctionStatus::Equal),
            status("b", FunctionStatus::Equal),
            status("c", FunctionStatus::Different),
        ]
    );
    assert!(!report.is_equal());
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn diff_of_identical_modules() {
    let options = DiffOptions {
        functions: true,
        ..Default::default()
    };

    let report = diff(three_functions(2), three_functions(2), &options);

    assert!(report.is_equal());
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.functions.len(), 3);
}

#[test]
fn diff_respects_function_filter() {
    let options = DiffOptions {
        functions: true,
        filter: FunctionFilter {
            name: Some(Regex::new("^[ab]$").unwrap()),
            offset: None,
        },
    };

    let report = diff(three_functions(2), three_functions(3), &options);

    assert!(report.is_equal());
    assert_eq!(report.functions.len(), 2);
}

fn two_helpers(second: u8) -> Vec<u8> {
    ModuleBuilder::new()
        .section(TYPE, &vector(&[func_type(&[], &[I32])]))
        .section(FUNCTION, &vector(&[vec![0], vec![0]]))
        .section(
            CODE,
            &vector(&[body(&[0x41, 1, 0x0B]), body(&[0x41, second, 0x0B])]),
        )
        .custom(
            "name",
            &name_section(&[(1, name_map(&[(0, "helper"), (1, "helper")]))]),
        )
        .build()
}

#[test]
fn diff_pairs_functions_sharing_a_name() {
    let options = DiffOptions {
        functions: true,
        ..Default::default()
    };

    let report = diff(two_helpers(2), two_helpers(3), &options);

    let status = |name: &str, status| FunctionDiff {
        name: name.to_string(),
        status,
    };
    assert_eq!(
        report.functions,
        [
            status("helper#0", FunctionStatus::Equal),
            status("helper#1", FunctionStatus::Different),
        ]
    );
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn diff_reports_unpaired_duplicate() {
    let options = DiffOptions {
        functions: true,
        ..Default::default()
    };
    let single = ModuleBuilder::new()
        .section(TYPE, &vector(&[func_type(&[], &[I32])]))
        .section(FUNCTION, &vector(&[vec![0]]))
        .section(CODE, &vector(&[body(&[0x41, 1, 0x0B])]))
        .custom("name", &name_section(&[(1, name_map(&[(0, "helper")]))]))
        .build();

    let report = diff(two_helpers(2), single, &options);

    let statuses: Vec<_> = report.functions.iter().map(|f| f.status).collect();
    assert_eq!(
        statuses,
        [FunctionStatus::Equal, FunctionStatus::OnlyInLeft]
    );
    assert_eq!(report.functions[1].name, "helper#1");
}

#[test]
fn diff_summary_catches_extra_sections() {
    let right = ModuleBuilder::new()
        .section(TYPE, &vector(&[func_type(&[], &[I32])]))
        .section(FUNCTION, &vector(&[vec![0], vec![0], vec![0]]))
        .build();

    let report = diff(three_functions(2), right, &DiffOptions::default());

    assert_eq!(
        report.differences[0],
        Difference::SectionCount { left: 4, right: 2 }
    );
    assert_eq!(report.differences.len(), 1);
    assert!(report.functions.is_empty());
    assert_eq!(report.exit_code(), 1);
}
