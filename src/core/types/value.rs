use std::fmt;

/// The type of a single value on the operand stack, in a local or in a global.
///
/// The encoded marker byte determines the kind: bytes at or below `0x70` are
/// reference types, `0x7B` is the vector type and the remaining recognized
/// bytes are number types.
///
/// <https://www.w3.org/TR/wasm-core-2/#binary-valtype>
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum ValType {
    Num(NumType),
    Vec(VecType),
    Ref(RefType),
}

impl ValType {
    pub const I32: ValType = ValType::Num(NumType::Int32);
    pub const I64: ValType = ValType::Num(NumType::Int64);
    pub const F32: ValType = ValType::Num(NumType::Float32);
    pub const F64: ValType = ValType::Num(NumType::Float64);
}

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum NumType {
    Int32,
    Int64,
    Float32,
    Float64,
}

/// The 128 bit packed vector type of the SIMD instructions.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum VecType {
    V128,
}

/// Opaque references to functions or host objects.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum RefType {
    Func,
    Extern,
}

impl fmt::Display for ValType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValType::Num(NumType::Int32) => "i32",
            ValType::Num(NumType::Int64) => "i64",
            ValType::Num(NumType::Float32) => "f32",
            ValType::Num(NumType::Float64) => "f64",
            ValType::Vec(VecType::V128) => "v128",
            ValType::Ref(r) => return fmt::Display::fmt(r, f),
        };
        f.write_str(name)
    }
}

impl fmt::Display for RefType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RefType::Func => "funcref",
            RefType::Extern => "externref",
        })
    }
}
