pub mod indices;
pub mod instruction;
pub mod opcode;
pub mod types;

mod module;
mod names;
pub use module::{
    Code, CustomSection, Data, DataMode, Elem, ElemItems, ElemMode, Export, ExportDesc,
    FunctionBody, Global, Import, ImportDesc, Local, Module, Section, SectionKind,
};
pub use names::{DecodeWarning, NameKind, Names};
