use super::indices::{FuncIdx, GlobalIdx, MemIdx, TableIdx, TagIdx, TypeIdx};
use super::instruction::{Expr, Instruction};
use super::names::{DecodeWarning, Names};
use super::types::{FuncType, GlobalType, MemType, RefType, TableType, ValType};
use std::cell::OnceCell;
use std::ops::Range;

/// A decoded WebAssembly module.
///
/// The module owns the bytes it was decoded from. Sections that are not
/// regenerated can be copied out verbatim, and function bodies are decoded
/// from those bytes on first use.
///
/// Entities are stored in the order they appear in their section. Function,
/// global and other index spaces start with the imported entities, so the
/// position of a defined entity in its vector is its index minus the number
/// of imports of that kind.
///
/// <https://www.w3.org/TR/wasm-core-2/#binary-module>
#[derive(Debug, Default, PartialEq)]
pub struct Module {
    pub version: u32,

    /// Every section in file order, unknown ones included.
    pub sections: Vec<Section>,

    pub custom_sections: Vec<CustomSection>,
    pub types: Vec<FuncType>,
    pub imports: Vec<Import>,
    /// Type of each function defined by the module.
    pub functions: Vec<TypeIdx>,
    pub tables: Vec<TableType>,
    pub memories: Vec<MemType>,
    pub globals: Vec<Global>,
    pub exports: Vec<Export>,
    pub start: Option<FuncIdx>,
    pub elements: Vec<Elem>,
    pub data_count: Option<u32>,
    /// Empty unless the Code section was read.
    pub codes: Vec<Code>,
    pub datas: Vec<Data>,

    pub names: Names,
    pub warnings: Vec<DecodeWarning>,

    pub(crate) bytes: Vec<u8>,
}

/// One entry of the section table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    /// Size of the payload in bytes.
    pub size: u32,
    /// Offset of the section id byte.
    pub offset: u64,
    /// Offset of the first payload byte.
    pub begin: u64,
}

impl Section {
    pub fn end(&self) -> u64 {
        self.begin + u64::from(self.size)
    }

    pub(crate) fn raw_range(&self) -> Range<usize> {
        self.offset as usize..self.end() as usize
    }

    pub(crate) fn payload_range(&self) -> Range<usize> {
        self.begin as usize..self.end() as usize
    }
}

#[derive(PartialEq, Eq, Debug, Copy, Clone, Hash)]
pub enum SectionKind {
    Custom,
    Type,
    Import,
    Function,
    Table,
    Memory,
    Global,
    Export,
    Start,
    Element,
    Code,
    Data,
    DataCount,
    Tag,
    /// A section id this crate does not know about. Its payload is skipped.
    Unknown(u8),
}

impl SectionKind {
    pub fn id(self) -> u8 {
        match self {
            SectionKind::Custom => 0,
            SectionKind::Type => 1,
            SectionKind::Import => 2,
            SectionKind::Function => 3,
            SectionKind::Table => 4,
            SectionKind::Memory => 5,
            SectionKind::Global => 6,
            SectionKind::Export => 7,
            SectionKind::Start => 8,
            SectionKind::Element => 9,
            SectionKind::Code => 10,
            SectionKind::Data => 11,
            SectionKind::DataCount => 12,
            SectionKind::Tag => 13,
            SectionKind::Unknown(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomSection {
    pub name: String,
    pub contents: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub module: String,
    pub name: String,
    pub desc: ImportDesc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportDesc {
    Func(TypeIdx),
    Table(TableType),
    Mem(MemType),
    Global(GlobalType),
    Tag(TypeIdx),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub name: String,
    pub desc: ExportDesc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportDesc {
    Func(FuncIdx),
    Table(TableIdx),
    Mem(MemIdx),
    Global(GlobalIdx),
    Tag(TagIdx),
}

impl ExportDesc {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ExportDesc::Func(_) => "function",
            ExportDesc::Table(_) => "table",
            ExportDesc::Mem(_) => "memory",
            ExportDesc::Global(_) => "global",
            ExportDesc::Tag(_) => "tag",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Global {
    pub r#type: GlobalType,
    pub init: Expr,
}

/// An element segment. Which fields the encoding carried is determined by
/// `flags`; the decoded fields are normalized into `mode`, `r#type` and
/// `items`.
///
/// <https://www.w3.org/TR/wasm-core-2/#element-section>
#[derive(Debug, Clone, PartialEq)]
pub struct Elem {
    pub flags: u32,
    pub mode: ElemMode,
    pub r#type: RefType,
    pub items: ElemItems,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElemMode {
    Active { table: TableIdx, offset: Expr },
    Passive,
    Declarative,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElemItems {
    Functions(Vec<FuncIdx>),
    Expressions(Vec<Expr>),
}

impl ElemItems {
    pub fn len(&self) -> usize {
        match self {
            ElemItems::Functions(f) => f.len(),
            ElemItems::Expressions(e) => e.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A data segment.
///
/// <https://www.w3.org/TR/wasm-core-2/#data-section>
#[derive(Debug, Clone, PartialEq)]
pub struct Data {
    pub mode: DataMode,
    pub init: Vec<u8>,
}

/// The mode tag of a data segment, which also fixes which of the memory
/// index and the offset expression are encoded.
#[derive(Debug, Clone, PartialEq)]
pub enum DataMode {
    /// Tag 0: active in memory 0.
    Active { offset: Expr },
    /// Tag 1.
    Passive,
    /// Tag 2: active in an explicit memory.
    ActiveWithMemory { memory: MemIdx, offset: Expr },
}

impl DataMode {
    pub fn tag(&self) -> u32 {
        match self {
            DataMode::Active { .. } => 0,
            DataMode::Passive => 1,
            DataMode::ActiveWithMemory { .. } => 2,
        }
    }

    pub fn offset(&self) -> Option<&Expr> {
        match self {
            DataMode::Active { offset } | DataMode::ActiveWithMemory { offset, .. } => {
                Some(offset)
            }
            DataMode::Passive => None,
        }
    }
}

/// A Code section entry. Only the location of the body is recorded while
/// scanning; the body itself is decoded once, on first request, through
/// [Module::function_body].
#[derive(Debug, Default, PartialEq)]
pub struct Code {
    /// Index of the function among the module's defined functions.
    pub index: u32,
    /// Size of the body in bytes.
    pub size: u32,
    /// Absolute offset of the first body byte.
    pub offset: u64,
    pub(crate) body: OnceCell<FunctionBody>,
}

impl Code {
    pub fn is_resolved(&self) -> bool {
        self.body.get().is_some()
    }

    pub(crate) fn contains(&self, offset: u64) -> bool {
        self.offset <= offset && offset < self.offset + u64::from(self.size)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionBody {
    pub locals: Vec<Local>,
    pub instructions: Vec<Instruction>,
}

/// A run of `count` locals of the same type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Local {
    pub count: u32,
    pub ty: ValType,
}

impl Module {
    /// The bytes the module was decoded from.
    pub fn source(&self) -> &[u8] {
        &self.bytes
    }

    /// Payload bytes of `section`.
    pub fn section_bytes(&self, section: &Section) -> &[u8] {
        &self.bytes[section.payload_range()]
    }

    pub fn sections_of(&self, kind: SectionKind) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(move |s| s.kind == kind)
    }

    pub fn has_section(&self, kind: SectionKind) -> bool {
        self.sections_of(kind).next().is_some()
    }

    pub fn find_export(&self, name: &str) -> Option<&Export> {
        self.exports.iter().find(|e| e.name == name)
    }

    pub fn imported_function_count(&self) -> u32 {
        self.count_imports(|d| matches!(d, ImportDesc::Func(_)))
    }

    pub fn imported_global_count(&self) -> u32 {
        self.count_imports(|d| matches!(d, ImportDesc::Global(_)))
    }

    fn count_imports(&self, pred: impl Fn(&ImportDesc) -> bool) -> u32 {
        let n = self.imports.iter().filter(|i| pred(&i.desc)).count();
        u32::try_from(n).unwrap_or(u32::MAX)
    }

    /// Signature of the defined function `idx`.
    pub fn function_type(&self, idx: u32) -> Option<&FuncType> {
        let type_idx = self.functions.get(idx as usize)?;
        self.types.get(type_idx.0 as usize)
    }

    /// Name of the defined function `idx`, or `idx:<idx>` when the name
    /// section does not provide one.
    pub fn function_name(&self, idx: u32) -> String {
        self.imported_function_count()
            .checked_add(idx)
            .and_then(|full| self.names.functions.get(&full))
            .filter(|name| !name.is_empty())
            .cloned()
            .unwrap_or_else(|| format!("idx:{idx}"))
    }

    /// Name of the function `idx` in the full function index space.
    pub fn function_name_absolute(&self, idx: u32) -> String {
        let imported = self.imported_function_count();
        match self.names.functions.get(&idx) {
            Some(name) if !name.is_empty() => name.clone(),
            _ if idx >= imported => self.function_name(idx - imported),
            _ => format!("import:{idx}"),
        }
    }

    /// Defined-function index of the function called `name`.
    pub fn function_index(&self, name: &str) -> Option<u32> {
        let full = *self.names.function_indices.get(name)?;
        full.checked_sub(self.imported_function_count())
    }

    pub fn global_name(&self, idx: u32) -> String {
        self.names
            .globals
            .get(&idx)
            .cloned()
            .unwrap_or_else(|| format!("global:{idx}"))
    }

    pub fn custom_section_names(&self) -> impl Iterator<Item = &str> {
        self.custom_sections.iter().map(|s| s.name.as_str())
    }
}
