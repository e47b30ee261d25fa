//! Value and entity types shared by the decoder, the encoder and the
//! disassembler.
//!
//! <https://www.w3.org/TR/wasm-core-2/#types>
mod entity;
mod value;

pub use entity::{FuncType, GlobalType, Limits, MemType, Mut, TableType};
pub use value::{NumType, RefType, ValType, VecType};
