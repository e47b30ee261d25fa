//! Text rendering of a decoded module.
//!
//! The output is meant for people and for textual comparison, not for
//! reassembly.
use crate::core::instruction::Instruction;
use crate::core::opcode::CoreOpcode;
use crate::core::{DataMode, ElemItems, ElemMode, ExportDesc, ImportDesc, Module, SectionKind};
use crate::decode::sections::DecodeCodeError;
use std::fmt::{self, Write};
use thiserror::Error;

const INDENT: &str = "  ";

#[derive(Debug, Error)]
pub enum DisassembleError {
    #[error("failed decoding function {idx}")]
    DecodeCode { idx: u32, source: DecodeCodeError },

    #[error(transparent)]
    Fmt(#[from] fmt::Error),
}

pub struct Disassembler<'m> {
    module: &'m Module,
    offsets: bool,
}

impl<'m> Disassembler<'m> {
    pub fn new(module: &'m Module) -> Self {
        Disassembler {
            module,
            offsets: false,
        }
    }

    /// Prefix every instruction with its offset in the module.
    pub fn with_offsets(mut self, offsets: bool) -> Self {
        self.offsets = offsets;
        self
    }

    /// Version, size and section table. Custom sections show their name.
    pub fn summary(&self, path: &str) -> Result<String, fmt::Error> {
        let module = self.module;
        let mut out = String::new();

        out.write_str("Module:")?;
        if let Some(name) = module.names.module.as_deref().filter(|n| !n.is_empty()) {
            write!(out, " name: {name}")?;
        }
        writeln!(out, " path: {path}")?;
        writeln!(out, "{INDENT}size: {}", module.source().len())?;
        writeln!(out, "{INDENT}binary format version: {}", module.version)?;
        writeln!(out, "{INDENT}sections: {}", module.sections.len())?;

        let mut custom_names = module.custom_section_names();
        for section in &module.sections {
            write!(out, "{INDENT}{INDENT}id: {:?}", section.kind)?;
            if section.kind == SectionKind::Custom
                && let Some(name) = custom_names.next()
            {
                write!(out, " name: {name}")?;
            }
            writeln!(out, " size: {}", section.size)?;
        }

        Ok(out)
    }

    /// Per-section listing of types, imports, exports, globals, tables,
    /// memories, element and data segments.
    pub fn details(&self) -> Result<String, fmt::Error> {
        let module = self.module;
        let mut out = String::new();

        if !module.types.is_empty() {
            writeln!(out, "Type section count: {}", module.types.len())?;
            for (i, ty) in module.types.iter().enumerate() {
                writeln!(out, "{INDENT}type[{i}]: {ty}")?;
            }
        }

        if !module.imports.is_empty() {
            writeln!(out, "Import section count: {}", module.imports.len())?;
            for import in &module.imports {
                let desc = match &import.desc {
                    ImportDesc::Func(t) => format!("func (type {t})"),
                    ImportDesc::Table(t) => format!("table {t}"),
                    ImportDesc::Mem(m) => format!("memory {m}"),
                    ImportDesc::Global(g) => format!("global {g}"),
                    ImportDesc::Tag(t) => format!("tag (type {t})"),
                };
                writeln!(out, "{INDENT}{}.{}: {desc}", import.module, import.name)?;
            }
        }

        if !module.functions.is_empty() {
            writeln!(out, "Function section count: {}", module.functions.len())?;
        }

        for (i, table) in module.tables.iter().enumerate() {
            writeln!(out, "Table {i}: {table}")?;
        }
        for (i, memory) in module.memories.iter().enumerate() {
            writeln!(out, "Memory {i}: {memory}")?;
        }

        if !module.globals.is_empty() {
            writeln!(out, "Global section count: {}", module.globals.len())?;
            let imported = module.imported_global_count();
            for (i, global) in module.globals.iter().enumerate() {
                let idx = imported + i as u32;
                write!(out, "{INDENT}global[{idx}] {} {}", module.global_name(idx), global.r#type)?;
                for ins in &global.init {
                    write!(out, " ({ins})")?;
                }
                out.write_char('\n')?;
            }
        }

        if !module.exports.is_empty() {
            writeln!(out, "Export section count: {}", module.exports.len())?;
            for export in &module.exports {
                let idx = match export.desc {
                    ExportDesc::Func(i) => i.0,
                    ExportDesc::Table(i) => i.0,
                    ExportDesc::Mem(i) => i.0,
                    ExportDesc::Global(i) => i.0,
                    ExportDesc::Tag(i) => i.0,
                };
                writeln!(out, "{INDENT}{}: {} {idx}", export.name, export.desc.kind_name())?;
            }
        }

        if let Some(start) = module.start {
            writeln!(out, "Start function: {}", module.function_name_absolute(start.0))?;
        }

        if !module.elements.is_empty() {
            writeln!(out, "Element section count: {}", module.elements.len())?;
            for (i, elem) in module.elements.iter().enumerate() {
                write!(out, "{INDENT}element[{i}] flags: {} {}", elem.flags, elem.r#type)?;
                match &elem.mode {
                    ElemMode::Active { table, offset } => {
                        write!(out, " table: {table} offset:")?;
                        for ins in offset {
                            write!(out, " ({ins})")?;
                        }
                    }
                    ElemMode::Passive => out.write_str(" passive")?,
                    ElemMode::Declarative => out.write_str(" declarative")?,
                }
                let kind = match elem.items {
                    ElemItems::Functions(_) => "functions",
                    ElemItems::Expressions(_) => "expressions",
                };
                writeln!(out, " {kind}: {}", elem.items.len())?;
            }
        }

        if let Some(count) = module.data_count {
            writeln!(out, "DataCount: {count}")?;
        }

        if !module.datas.is_empty() {
            writeln!(out, "Data section count: {}", module.datas.len())?;
            for (i, data) in module.datas.iter().enumerate() {
                write!(out, "{INDENT}data[{i}]")?;
                if let Some(name) = module.names.data_segments.get(&(i as u32)) {
                    write!(out, " {name}")?;
                }
                match &data.mode {
                    DataMode::Active { offset } => {
                        for ins in offset {
                            write!(out, " offset: ({ins})")?;
                        }
                    }
                    DataMode::Passive => out.write_str(" passive")?,
                    DataMode::ActiveWithMemory { memory, offset } => {
                        write!(out, " memory: {memory}")?;
                        for ins in offset {
                            write!(out, " offset: ({ins})")?;
                        }
                    }
                }
                writeln!(out, " size: {}", data.init.len())?;
            }
        }

        Ok(out)
    }

    /// The signature line of the defined function `idx`.
    pub fn signature(&self, idx: u32) -> String {
        let module = self.module;
        let mut out = format!("(func ${}", module.function_name(idx));
        if let Some(ty) = module.function_type(idx) {
            let imported = module.imported_function_count();
            for (i, param) in ty.parameters.iter().enumerate() {
                match module.names.local(imported + idx, i as u32) {
                    Some(name) => out.push_str(&format!(" (param ${name} {param})")),
                    None => out.push_str(&format!(" (param {param})")),
                }
            }
            if !ty.results.is_empty() {
                out.push_str(" (result");
                for result in &ty.results {
                    out.push_str(&format!(" {result}"));
                }
                out.push(')');
            }
        }
        out.push(')');
        out
    }

    /// Signature, locals and instruction tree of the defined function `idx`.
    pub fn function(&self, idx: u32) -> Result<String, DisassembleError> {
        let body = self
            .module
            .function_body(idx)
            .map_err(|source| DisassembleError::DecodeCode { idx, source })?;

        let mut out = self.signature(idx);
        out.push('\n');

        for local in &body.locals {
            writeln!(out, "{INDENT}(local {} x {})", local.count, local.ty)?;
        }
        self.write_instructions(&mut out, &body.instructions, 1)?;
        Ok(out)
    }

    fn write_instructions(
        &self,
        out: &mut String,
        instructions: &[Instruction],
        depth: usize,
    ) -> fmt::Result {
        for ins in instructions {
            self.write_line(out, Some(ins.offset), depth, &self.render(ins))?;

            if let Some(block) = ins.block() {
                self.write_instructions(out, &block.body, depth + 1)?;
                if let Some(alternative) = &block.alternative {
                    self.write_line(out, None, depth, "else")?;
                    self.write_instructions(out, alternative, depth + 1)?;
                }
                match block.delegate {
                    Some(label) => {
                        self.write_line(out, None, depth, &format!("delegate {label}"))?;
                    }
                    None => self.write_line(out, None, depth, "end")?,
                }
            }
        }
        Ok(())
    }

    fn write_line(
        &self,
        out: &mut String,
        offset: Option<u64>,
        depth: usize,
        text: &str,
    ) -> fmt::Result {
        match offset {
            Some(offset) if self.offsets => write!(out, "[{offset:#08x}] ")?,
            None if self.offsets => out.write_str("           ")?,
            _ => {}
        }
        for _ in 0..depth {
            out.write_str(INDENT)?;
        }
        writeln!(out, "{text}")
    }

    // instruction head with names resolved for calls and globals
    fn render(&self, ins: &Instruction) -> String {
        let module = self.module;
        let resolved = match ins.index() {
            Some(idx) if ins.is(CoreOpcode::Call) || ins.is(CoreOpcode::RefFunc) => {
                Some(module.function_name_absolute(idx))
            }
            Some(idx) if ins.is(CoreOpcode::GlobalGet) || ins.is(CoreOpcode::GlobalSet) => {
                Some(module.global_name(idx))
            }
            _ => None,
        };
        match resolved {
            Some(name) => format!("{ins} <{name}>"),
            None => ins.to_string(),
        }
    }
}
