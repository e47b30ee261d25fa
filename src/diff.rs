//! Structural comparison of two modules.
//!
//! Modules are compared by their section tables and entity counts, and
//! optionally function by function through their disassembly.
use crate::config::FunctionFilter;
use crate::core::{Module, SectionKind};
use crate::disasm::{DisassembleError, Disassembler};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Difference {
    SectionCount {
        left: usize,
        right: usize,
    },
    SectionKind {
        position: usize,
        left: SectionKind,
        right: SectionKind,
    },
    SectionSize {
        position: usize,
        kind: SectionKind,
        left: u32,
        right: u32,
    },
    EntityCount {
        entity: &'static str,
        left: usize,
        right: usize,
    },
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difference::SectionCount { left, right } => {
                write!(f, "section count differs: {left} vs {right}")
            }
            Difference::SectionKind {
                position,
                left,
                right,
            } => write!(f, "section {position} differs: {left:?} vs {right:?}"),
            Difference::SectionSize {
                position,
                kind,
                left,
                right,
            } => write!(f, "section {position} ({kind:?}) size differs: {left} vs {right}"),
            Difference::EntityCount {
                entity,
                left,
                right,
            } => write!(f, "{entity} count differs: {left} vs {right}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionStatus {
    Equal,
    Different,
    OnlyInLeft,
    OnlyInRight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDiff {
    pub name: String,
    pub status: FunctionStatus,
}

#[derive(Debug, Default)]
pub struct DiffOptions {
    /// Compare function bodies as well as the section summary.
    pub functions: bool,
    pub filter: FunctionFilter,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DiffReport {
    pub differences: Vec<Difference>,
    /// Empty unless function comparison was requested.
    pub functions: Vec<FunctionDiff>,
}

impl DiffReport {
    pub fn is_equal(&self) -> bool {
        self.differences.is_empty()
            && self
                .functions
                .iter()
                .all(|f| f.status == FunctionStatus::Equal)
    }

    /// 0 when nothing differs, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_equal() { 0 } else { 1 }
    }
}

pub fn diff_modules(
    left: &Module,
    right: &Module,
    options: &DiffOptions,
) -> Result<DiffReport, DisassembleError> {
    let mut report = DiffReport {
        differences: summary_differences(left, right),
        functions: Vec::new(),
    };
    if options.functions {
        report.functions = diff_functions(left, right, &options.filter)?;
    }
    Ok(report)
}

/// Differences in the section tables and entity counts.
pub fn summary_differences(left: &Module, right: &Module) -> Vec<Difference> {
    let mut differences = Vec::new();

    if left.sections.len() != right.sections.len() {
        differences.push(Difference::SectionCount {
            left: left.sections.len(),
            right: right.sections.len(),
        });
    }

    for (position, (l, r)) in left.sections.iter().zip(&right.sections).enumerate() {
        if l.kind != r.kind {
            differences.push(Difference::SectionKind {
                position,
                left: l.kind,
                right: r.kind,
            });
        } else if l.size != r.size {
            differences.push(Difference::SectionSize {
                position,
                kind: l.kind,
                left: l.size,
                right: r.size,
            });
        }
    }

    let counts = |m: &Module| {
        [
            ("type", m.types.len()),
            ("import", m.imports.len()),
            ("function", m.functions.len()),
            ("table", m.tables.len()),
            ("memory", m.memories.len()),
            ("global", m.globals.len()),
            ("export", m.exports.len()),
            ("element", m.elements.len()),
            ("data", m.datas.len()),
        ]
    };
    for ((entity, l), (_, r)) in counts(left).into_iter().zip(counts(right)) {
        if l != r {
            differences.push(Difference::EntityCount {
                entity,
                left: l,
                right: r,
            });
        }
    }

    differences
}

/// Compares the disassembly of the functions selected by `filter`.
///
/// Functions are matched by name, and without a name section their names
/// are `idx:<n>`. Functions sharing a name are paired in index order and
/// reported as `<name>#<k>`, counting from 0 within the name.
pub fn diff_functions(
    left: &Module,
    right: &Module,
    filter: &FunctionFilter,
) -> Result<Vec<FunctionDiff>, DisassembleError> {
    let left_disasm = Disassembler::new(left);
    let right_disasm = Disassembler::new(right);

    let left_groups = group_by_name(left, filter);
    let right_groups = group_by_name(right, filter);
    let names: BTreeSet<&String> = left_groups.keys().chain(right_groups.keys()).collect();

    let mut result = Vec::new();
    for name in names {
        let l = left_groups.get(name).map_or(&[][..], Vec::as_slice);
        let r = right_groups.get(name).map_or(&[][..], Vec::as_slice);
        let shared = l.len() > 1 || r.len() > 1;

        for k in 0..l.len().max(r.len()) {
            let status = match (l.get(k), r.get(k)) {
                (Some(&li), Some(&ri)) => {
                    if left_disasm.function(li)? == right_disasm.function(ri)? {
                        FunctionStatus::Equal
                    } else {
                        FunctionStatus::Different
                    }
                }
                (Some(_), None) => FunctionStatus::OnlyInLeft,
                (None, Some(_)) => FunctionStatus::OnlyInRight,
                (None, None) => continue,
            };
            let name = if shared {
                format!("{name}#{k}")
            } else {
                name.clone()
            };
            tracing::debug!(%name, ?status, "compared function");
            result.push(FunctionDiff { name, status });
        }
    }

    Ok(result)
}

// selected defined indices by display name, each list in index order
fn group_by_name(module: &Module, filter: &FunctionFilter) -> BTreeMap<String, Vec<u32>> {
    let mut groups: BTreeMap<String, Vec<u32>> = BTreeMap::new();
    for idx in module.filter_functions(filter) {
        groups.entry(module.function_name(idx)).or_default().push(idx);
    }
    groups
}
