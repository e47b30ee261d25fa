//! Inspection and rewriting of modules in the binary format of the
//! WebAssembly [specification].
//!
//! [`decode_module()`] scans a module into a [`Module`]: the section table,
//! every known section, and the `name` section. Function bodies are decoded
//! on first use through [`Module::function_body`]. On top of the decoded
//! model the crate provides a [disassembler](disasm), a [differ](diff), a
//! [Data section rewriter](rewrite) and a [template embedder](embed), the
//! last two writing through the [encoder](encode).
//!
//! The decoder checks structure only. It rejects a bad magic number, unknown
//! opcodes and invalid marker bytes, but does not validate types or control
//! flow.
//!
//! [specification]: https://www.w3.org/TR/wasm-core-2/
#![forbid(unsafe_code)]

pub mod config;
pub mod core;
pub mod decode;
pub mod diff;
pub mod disasm;
pub mod embed;
pub mod encode;
pub mod rewrite;

pub use crate::config::{Config, FunctionFilter};
pub use crate::core::{DecodeWarning, Module, Section, SectionKind};
pub use crate::decode::{DecodeModuleError, decode_module, decode_module_with};
pub use crate::disasm::Disassembler;
