//! Types of the entities a module defines or imports.
use super::{RefType, ValType};
use std::fmt;

/// A function signature: parameter types followed by result types.
///
/// <https://www.w3.org/TR/wasm-core-2/#binary-functype>
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct FuncType {
    pub parameters: Vec<ValType>,
    pub results: Vec<ValType>,
}

/// Size range of a table (in entries) or a memory (in pages). A missing
/// maximum means the storage may grow without bound.
///
/// <https://www.w3.org/TR/wasm-core-2/#binary-limits>
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Limits {
    pub min: u64,
    pub max: Option<u64>,
    /// Set for memories declared `shared` by the threads proposal.
    pub shared: bool,
    /// Set for 64-bit indexed memories (memory64).
    pub index64: bool,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct MemType {
    pub limits: Limits,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct TableType {
    pub reftype: RefType,
    pub limits: Limits,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct GlobalType(pub Mut, pub ValType);

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Mut {
    Const,
    Var,
}

fn write_list(f: &mut fmt::Formatter<'_>, keyword: &str, types: &[ValType]) -> fmt::Result {
    if types.is_empty() {
        return Ok(());
    }
    write!(f, " ({keyword}")?;
    for t in types {
        write!(f, " {t}")?;
    }
    f.write_str(")")
}

impl fmt::Display for FuncType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(func")?;
        write_list(f, "param", &self.parameters)?;
        write_list(f, "result", &self.results)?;
        f.write_str(")")
    }
}

impl fmt::Display for Limits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.index64 {
            f.write_str("i64 ")?;
        }
        write!(f, "{}", self.min)?;
        if let Some(max) = self.max {
            write!(f, " {max}")?;
        }
        if self.shared {
            f.write_str(" shared")?;
        }
        Ok(())
    }
}

impl fmt::Display for MemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.limits, f)
    }
}

impl fmt::Display for TableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.limits, self.reftype)
    }
}

impl fmt::Display for GlobalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Mut::Const => fmt::Display::fmt(&self.1, f),
            Mut::Var => write!(f, "(mut {})", self.1),
        }
    }
}
