//! Names recovered from the `name` custom section.
//!
//! <https://www.w3.org/TR/wasm-core-2/#name-section>
use std::collections::{BTreeMap, HashMap};
use std::fmt;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Names {
    pub module: Option<String>,
    /// Function names keyed by index in the function index space, imports
    /// included.
    pub functions: BTreeMap<u32, String>,
    /// Reverse of [Self::functions].
    pub function_indices: HashMap<String, u32>,
    /// Local names keyed by function index, then by local index.
    pub locals: BTreeMap<u32, BTreeMap<u32, String>>,
    pub globals: BTreeMap<u32, String>,
    pub data_segments: BTreeMap<u32, String>,
}

impl Names {
    pub fn is_empty(&self) -> bool {
        self.module.is_none()
            && self.functions.is_empty()
            && self.locals.is_empty()
            && self.globals.is_empty()
            && self.data_segments.is_empty()
    }

    pub fn local(&self, func: u32, local: u32) -> Option<&str> {
        self.locals
            .get(&func)
            .and_then(|m| m.get(&local))
            .map(String::as_str)
    }
}

/// The name map a [DecodeWarning] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Function,
    Local,
    Global,
    DataSegment,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NameKind::Function => "function",
            NameKind::Local => "local",
            NameKind::Global => "global",
            NameKind::DataSegment => "data segment",
        })
    }
}

/// Non-fatal problems found while decoding. The first entry of a duplicated
/// index is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeWarning {
    DuplicateName {
        kind: NameKind,
        index: u32,
        name: String,
    },
    DuplicateLocalMap {
        function: u32,
    },
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeWarning::DuplicateName { kind, index, name } => {
                write!(f, "duplicate {kind} idx: {index} name: {name} ignored")
            }
            DecodeWarning::DuplicateLocalMap { function } => {
                write!(f, "duplicate function idx: {function} in local names map ignored")
            }
        }
    }
}
