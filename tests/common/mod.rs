//! Builds small modules byte by byte for the integration tests.
#![allow(dead_code)]

use wainfo::encode::write_u32;

pub const TYPE: u8 = 1;
pub const IMPORT: u8 = 2;
pub const FUNCTION: u8 = 3;
pub const MEMORY: u8 = 5;
pub const GLOBAL: u8 = 6;
pub const EXPORT: u8 = 7;
pub const CODE: u8 = 10;
pub const DATA: u8 = 11;
pub const DATA_COUNT: u8 = 12;

pub const I32: u8 = 0x7F;

pub struct ModuleBuilder {
    bytes: Vec<u8>,
}

impl ModuleBuilder {
    pub fn new() -> Self {
        ModuleBuilder {
            bytes: b"\0asm\x01\0\0\0".to_vec(),
        }
    }

    pub fn section(mut self, id: u8, payload: &[u8]) -> Self {
        self.bytes.push(id);
        write_u32(&mut self.bytes, payload.len() as u32).unwrap();
        self.bytes.extend_from_slice(payload);
        self
    }

    pub fn custom(self, name: &str, payload: &[u8]) -> Self {
        let mut contents = string(name);
        contents.extend_from_slice(payload);
        self.section(0, &contents)
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

pub fn vector(items: &[Vec<u8>]) -> Vec<u8> {
    let mut out = Vec::new();
    write_u32(&mut out, items.len() as u32).unwrap();
    for item in items {
        out.extend_from_slice(item);
    }
    out
}

pub fn string(s: &str) -> Vec<u8> {
    let mut out = Vec::new();
    write_u32(&mut out, s.len() as u32).unwrap();
    out.extend_from_slice(s.as_bytes());
    out
}

pub fn func_type(params: &[u8], results: &[u8]) -> Vec<u8> {
    let mut out = vec![0x60];
    out.extend(vector(&params.iter().map(|&p| vec![p]).collect::<Vec<_>>()));
    out.extend(vector(&results.iter().map(|&r| vec![r]).collect::<Vec<_>>()));
    out
}

/// A size-prefixed Code entry without locals. `code` must include the
/// final `end`.
pub fn body(code: &[u8]) -> Vec<u8> {
    let mut entry = vec![0];
    entry.extend_from_slice(code);

    let mut out = Vec::new();
    write_u32(&mut out, entry.len() as u32).unwrap();
    out.extend(entry);
    out
}

pub fn export(name: &str, kind: u8, index: u32) -> Vec<u8> {
    let mut out = string(name);
    out.push(kind);
    write_u32(&mut out, index).unwrap();
    out
}

/// A `(global i32 (i32.const value))` entry.
pub fn global_i32(mutable: bool, value: u8) -> Vec<u8> {
    vec![I32, mutable as u8, 0x41, value, 0x0B]
}

pub fn passive_data(content: &[u8]) -> Vec<u8> {
    let mut out = vec![1];
    write_u32(&mut out, content.len() as u32).unwrap();
    out.extend_from_slice(content);
    out
}

pub fn name_map(entries: &[(u32, &str)]) -> Vec<u8> {
    vector(
        &entries
            .iter()
            .map(|&(idx, name)| {
                let mut out = Vec::new();
                write_u32(&mut out, idx).unwrap();
                out.extend(string(name));
                out
            })
            .collect::<Vec<_>>(),
    )
}

/// Payload of a `name` custom section made of `(id, contents)` subsections.
pub fn name_section(subsections: &[(u8, Vec<u8>)]) -> Vec<u8> {
    let mut out = Vec::new();
    for (id, contents) in subsections {
        out.push(*id);
        write_u32(&mut out, contents.len() as u32).unwrap();
        out.extend_from_slice(contents);
    }
    out
}

/// Three functions of type `() -> i32`: `a` returns 1, `b` returns
/// `call a` and `c` returns `second`.
pub fn three_functions(second: u8) -> Vec<u8> {
    ModuleBuilder::new()
        .section(TYPE, &vector(&[func_type(&[], &[I32])]))
        .section(FUNCTION, &vector(&[vec![0], vec![0], vec![0]]))
        .section(
            CODE,
            &vector(&[
                body(&[0x41, 1, 0x0B]),
                body(&[0x10, 0, 0x0B]),
                body(&[0x41, second, 0x0B]),
            ]),
        )
        .custom(
            "name",
            &name_section(&[(1, name_map(&[(0, "a"), (1, "b"), (2, "c")]))]),
        )
        .build()
}
