//! Opcode tables.
//!
//! Every opcode maps to a mnemonic and to the [Shape] of its immediate
//! operands. The instruction decoder dispatches on the shape alone, so adding
//! an opcode only requires a new table row.
//!
//! <https://www.w3.org/TR/wasm-core-2/#binary-instr>
use std::fmt;

/// Prefix byte of the miscellaneous opcode space.
pub const MISC_PREFIX: u8 = 0xFC;
/// Prefix byte of the SIMD opcode space.
pub const SIMD_PREFIX: u8 = 0xFD;
/// Prefix byte of the threads/atomics opcode space.
pub const ATOMIC_PREFIX: u8 = 0xFE;

pub const END: u8 = 0x0B;
pub const ELSE: u8 = 0x05;
pub const DELEGATE: u8 = 0x18;

/// Layout of the immediates that follow an opcode.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Shape {
    None,
    /// Block type followed by a nested instruction sequence.
    Block,
    Index,
    IndexPair,
    BranchTable,
    I32,
    I64,
    F32,
    F64,
    MemArg,
    MemArgLane,
    Lane,
    V128,
    SelectTyped,
    RefNull,
    /// A single reserved byte carrying no information.
    Reserved,
}

macro_rules! opcodes {
    (
        $(#[$meta:meta])*
        pub enum $name:ident: $repr:ty {
            $($variant:ident = $code:literal => $mnemonic:literal, $shape:ident;)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
        pub enum $name {
            $($variant,)*
        }

        impl $name {
            pub fn from_code(code: $repr) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)*
                    _ => None,
                }
            }

            pub fn code(self) -> $repr {
                match self {
                    $(Self::$variant => $code,)*
                }
            }

            pub fn mnemonic(self) -> &'static str {
                match self {
                    $(Self::$variant => $mnemonic,)*
                }
            }

            pub fn shape(self) -> Shape {
                match self {
                    $(Self::$variant => Shape::$shape,)*
                }
            }
        }
    };
}

/// An opcode from any of the four opcode spaces.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Opcode {
    Core(CoreOpcode),
    Misc(MiscOpcode),
    Simd(SimdOpcode),
    Atomic(AtomicOpcode),
}

impl Opcode {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Core(op) => op.mnemonic(),
            Opcode::Misc(op) => op.mnemonic(),
            Opcode::Simd(op) => op.mnemonic(),
            Opcode::Atomic(op) => op.mnemonic(),
        }
    }

    pub fn shape(self) -> Shape {
        match self {
            Opcode::Core(op) => op.shape(),
            Opcode::Misc(op) => op.shape(),
            Opcode::Simd(op) => op.shape(),
            Opcode::Atomic(op) => op.shape(),
        }
    }
}

impl From<CoreOpcode> for Opcode {
    fn from(op: CoreOpcode) -> Self {
        Opcode::Core(op)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

opcodes! {
    /// Single-byte opcodes of the core instruction set, including the legacy
    /// exception-handling and tail-call instructions.
    pub enum CoreOpcode: u8 {
        Unreachable = 0x00 => "unreachable", None;
        Nop = 0x01 => "nop", None;
        Block = 0x02 => "block", Block;
        Loop = 0x03 => "loop", Block;
        If = 0x04 => "if", Block;
        Try = 0x06 => "try", Block;
        Catch = 0x07 => "catch", Index;
        Throw = 0x08 => "throw", Index;
        Rethrow = 0x09 => "rethrow", Index;
        Br = 0x0C => "br", Index;
        BrIf = 0x0D => "br_if", Index;
        BrTable = 0x0E => "br_table", BranchTable;
        Return = 0x0F => "return", None;
        Call = 0x10 => "call", Index;
        CallIndirect = 0x11 => "call_indirect", IndexPair;
        ReturnCall = 0x12 => "return_call", Index;
        ReturnCallIndirect = 0x13 => "return_call_indirect", IndexPair;
        CatchAll = 0x19 => "catch_all", None;
        Drop = 0x1A => "drop", None;
        Select = 0x1B => "select", None;
        SelectTyped = 0x1C => "select", SelectTyped;
        LocalGet = 0x20 => "local.get", Index;
        LocalSet = 0x21 => "local.set", Index;
        LocalTee = 0x22 => "local.tee", Index;
        GlobalGet = 0x23 => "global.get", Index;
        GlobalSet = 0x24 => "global.set", Index;
        TableGet = 0x25 => "table.get", Index;
        TableSet = 0x26 => "table.set", Index;
        I32Load = 0x28 => "i32.load", MemArg;
        I64Load = 0x29 => "i64.load", MemArg;
        F32Load = 0x2A => "f32.load", MemArg;
        F64Load = 0x2B => "f64.load", MemArg;
        I32Load8S = 0x2C => "i32.load8_s", MemArg;
        I32Load8U = 0x2D => "i32.load8_u", MemArg;
        I32Load16S = 0x2E => "i32.load16_s", MemArg;
        I32Load16U = 0x2F => "i32.load16_u", MemArg;
        I64Load8S = 0x30 => "i64.load8_s", MemArg;
        I64Load8U = 0x31 => "i64.load8_u", MemArg;
        I64Load16S = 0x32 => "i64.load16_s", MemArg;
        I64Load16U = 0x33 => "i64.load16_u", MemArg;
        I64Load32S = 0x34 => "i64.load32_s", MemArg;
        I64Load32U = 0x35 => "i64.load32_u", MemArg;
        I32Store = 0x36 => "i32.store", MemArg;
        I64Store = 0x37 => "i64.store", MemArg;
        F32Store = 0x38 => "f32.store", MemArg;
        F64Store = 0x39 => "f64.store", MemArg;
        I32Store8 = 0x3A => "i32.store8", MemArg;
        I32Store16 = 0x3B => "i32.store16", MemArg;
        I64Store8 = 0x3C => "i64.store8", MemArg;
        I64Store16 = 0x3D => "i64.store16", MemArg;
        I64Store32 = 0x3E => "i64.store32", MemArg;
        MemorySize = 0x3F => "memory.size", Index;
        MemoryGrow = 0x40 => "memory.grow", Index;
        I32Const = 0x41 => "i32.const", I32;
        I64Const = 0x42 => "i64.const", I64;
        F32Const = 0x43 => "f32.const", F32;
        F64Const = 0x44 => "f64.const", F64;
        I32Eqz = 0x45 => "i32.eqz", None;
        I32Eq = 0x46 => "i32.eq", None;
        I32Ne = 0x47 => "i32.ne", None;
        I32LtS = 0x48 => "i32.lt_s", None;
        I32LtU = 0x49 => "i32.lt_u", None;
        I32GtS = 0x4A => "i32.gt_s", None;
        I32GtU = 0x4B => "i32.gt_u", None;
        I32LeS = 0x4C => "i32.le_s", None;
        I32LeU = 0x4D => "i32.le_u", None;
        I32GeS = 0x4E => "i32.ge_s", None;
        I32GeU = 0x4F => "i32.ge_u", None;
        I64Eqz = 0x50 => "i64.eqz", None;
        I64Eq = 0x51 => "i64.eq", None;
        I64Ne = 0x52 => "i64.ne", None;
        I64LtS = 0x53 => "i64.lt_s", None;
        I64LtU = 0x54 => "i64.lt_u", None;
        I64GtS = 0x55 => "i64.gt_s", None;
        I64GtU = 0x56 => "i64.gt_u", None;
        I64LeS = 0x57 => "i64.le_s", None;
        I64LeU = 0x58 => "i64.le_u", None;
        I64GeS = 0x59 => "i64.ge_s", None;
        I64GeU = 0x5A => "i64.ge_u", None;
        F32Eq = 0x5B => "f32.eq", None;
        F32Ne = 0x5C => "f32.ne", None;
        F32Lt = 0x5D => "f32.lt", None;
        F32Gt = 0x5E => "f32.gt", None;
        F32Le = 0x5F => "f32.le", None;
        F32Ge = 0x60 => "f32.ge", None;
        F64Eq = 0x61 => "f64.eq", None;
        F64Ne = 0x62 => "f64.ne", None;
        F64Lt = 0x63 => "f64.lt", None;
        F64Gt = 0x64 => "f64.gt", None;
        F64Le = 0x65 => "f64.le", None;
        F64Ge = 0x66 => "f64.ge", None;
        I32Clz = 0x67 => "i32.clz", None;
        I32Ctz = 0x68 => "i32.ctz", None;
        I32Popcnt = 0x69 => "i32.popcnt", None;
        I32Add = 0x6A => "i32.add", None;
        I32Sub = 0x6B => "i32.sub", None;
        I32Mul = 0x6C => "i32.mul", None;
        I32DivS = 0x6D => "i32.div_s", None;
        I32DivU = 0x6E => "i32.div_u", None;
        I32RemS = 0x6F => "i32.rem_s", None;
        I32RemU = 0x70 => "i32.rem_u", None;
        I32And = 0x71 => "i32.and", None;
        I32Or = 0x72 => "i32.or", None;
        I32Xor = 0x73 => "i32.xor", None;
        I32Shl = 0x74 => "i32.shl", None;
        I32ShrS = 0x75 => "i32.shr_s", None;
        I32ShrU = 0x76 => "i32.shr_u", None;
        I32Rotl = 0x77 => "i32.rotl", None;
        I32Rotr = 0x78 => "i32.rotr", None;
        I64Clz = 0x79 => "i64.clz", None;
        I64Ctz = 0x7A => "i64.ctz", None;
        I64Popcnt = 0x7B => "i64.popcnt", None;
        I64Add = 0x7C => "i64.add", None;
        I64Sub = 0x7D => "i64.sub", None;
        I64Mul = 0x7E => "i64.mul", None;
        I64DivS = 0x7F => "i64.div_s", None;
        I64DivU = 0x80 => "i64.div_u", None;
        I64RemS = 0x81 => "i64.rem_s", None;
        I64RemU = 0x82 => "i64.rem_u", None;
        I64And = 0x83 => "i64.and", None;
        I64Or = 0x84 => "i64.or", None;
        I64Xor = 0x85 => "i64.xor", None;
        I64Shl = 0x86 => "i64.shl", None;
        I64ShrS = 0x87 => "i64.shr_s", None;
        I64ShrU = 0x88 => "i64.shr_u", None;
        I64Rotl = 0x89 => "i64.rotl", None;
        I64Rotr = 0x8A => "i64.rotr", None;
        F32Abs = 0x8B => "f32.abs", None;
        F32Neg = 0x8C => "f32.neg", None;
        F32Ceil = 0x8D => "f32.ceil", None;
        F32Floor = 0x8E => "f32.floor", None;
        F32Trunc = 0x8F => "f32.trunc", None;
        F32Nearest = 0x90 => "f32.nearest", None;
        F32Sqrt = 0x91 => "f32.sqrt", None;
        F32Add = 0x92 => "f32.add", None;
        F32Sub = 0x93 => "f32.sub", None;
        F32Mul = 0x94 => "f32.mul", None;
        F32Div = 0x95 => "f32.div", None;
        F32Min = 0x96 => "f32.min", None;
        F32Max = 0x97 => "f32.max", None;
        F32Copysign = 0x98 => "f32.copysign", None;
        F64Abs = 0x99 => "f64.abs", None;
        F64Neg = 0x9A => "f64.neg", None;
        F64Ceil = 0x9B => "f64.ceil", None;
        F64Floor = 0x9C => "f64.floor", None;
        F64Trunc = 0x9D => "f64.trunc", None;
        F64Nearest = 0x9E => "f64.nearest", None;
        F64Sqrt = 0x9F => "f64.sqrt", None;
        F64Add = 0xA0 => "f64.add", None;
        F64Sub = 0xA1 => "f64.sub", None;
        F64Mul = 0xA2 => "f64.mul", None;
        F64Div = 0xA3 => "f64.div", None;
        F64Min = 0xA4 => "f64.min", None;
        F64Max = 0xA5 => "f64.max", None;
        F64Copysign = 0xA6 => "f64.copysign", None;
        I32WrapI64 = 0xA7 => "i32.wrap_i64", None;
        I32TruncF32S = 0xA8 => "i32.trunc_f32_s", None;
        I32TruncF32U = 0xA9 => "i32.trunc_f32_u", None;
        I32TruncF64S = 0xAA => "i32.trunc_f64_s", None;
        I32TruncF64U = 0xAB => "i32.trunc_f64_u", None;
        I64ExtendI32S = 0xAC => "i64.extend_i32_s", None;
        I64ExtendI32U = 0xAD => "i64.extend_i32_u", None;
        I64TruncF32S = 0xAE => "i64.trunc_f32_s", None;
        I64TruncF32U = 0xAF => "i64.trunc_f32_u", None;
        I64TruncF64S = 0xB0 => "i64.trunc_f64_s", None;
        I64TruncF64U = 0xB1 => "i64.trunc_f64_u", None;
        F32ConvertI32S = 0xB2 => "f32.convert_i32_s", None;
        F32ConvertI32U = 0xB3 => "f32.convert_i32_u", None;
        F32ConvertI64S = 0xB4 => "f32.convert_i64_s", None;
        F32ConvertI64U = 0xB5 => "f32.convert_i64_u", None;
        F32DemoteF64 = 0xB6 => "f32.demote_f64", None;
        F64ConvertI32S = 0xB7 => "f64.convert_i32_s", None;
        F64ConvertI32U = 0xB8 => "f64.convert_i32_u", None;
        F64ConvertI64S = 0xB9 => "f64.convert_i64_s", None;
        F64ConvertI64U = 0xBA => "f64.convert_i64_u", None;
        F64PromoteF32 = 0xBB => "f64.promote_f32", None;
        I32ReinterpretF32 = 0xBC => "i32.reinterpret_f32", None;
        I64ReinterpretF64 = 0xBD => "i64.reinterpret_f64", None;
        F32ReinterpretI32 = 0xBE => "f32.reinterpret_i32", None;
        F64ReinterpretI64 = 0xBF => "f64.reinterpret_i64", None;
        I32Extend8S = 0xC0 => "i32.extend8_s", None;
        I32Extend16S = 0xC1 => "i32.extend16_s", None;
        I64Extend8S = 0xC2 => "i64.extend8_s", None;
        I64Extend16S = 0xC3 => "i64.extend16_s", None;
        I64Extend32S = 0xC4 => "i64.extend32_s", None;
        RefNull = 0xD0 => "ref.null", RefNull;
        RefIsNull = 0xD1 => "ref.is_null", None;
        RefFunc = 0xD2 => "ref.func", Index;
    }
}

opcodes! {
    /// Opcodes following the `0xFC` prefix: saturating truncations and bulk
    /// memory and table operations.
    pub enum MiscOpcode: u32 {
        I32TruncSatF32S = 0 => "i32.trunc_sat_f32_s", None;
        I32TruncSatF32U = 1 => "i32.trunc_sat_f32_u", None;
        I32TruncSatF64S = 2 => "i32.trunc_sat_f64_s", None;
        I32TruncSatF64U = 3 => "i32.trunc_sat_f64_u", None;
        I64TruncSatF32S = 4 => "i64.trunc_sat_f32_s", None;
        I64TruncSatF32U = 5 => "i64.trunc_sat_f32_u", None;
        I64TruncSatF64S = 6 => "i64.trunc_sat_f64_s", None;
        I64TruncSatF64U = 7 => "i64.trunc_sat_f64_u", None;
        MemoryInit = 8 => "memory.init", IndexPair;
        DataDrop = 9 => "data.drop", Index;
        MemoryCopy = 10 => "memory.copy", IndexPair;
        MemoryFill = 11 => "memory.fill", Index;
        TableInit = 12 => "table.init", IndexPair;
        ElemDrop = 13 => "elem.drop", Index;
        TableCopy = 14 => "table.copy", IndexPair;
        TableGrow = 15 => "table.grow", Index;
        TableSize = 16 => "table.size", Index;
        TableFill = 17 => "table.fill", Index;
    }
}

opcodes! {
    /// Opcodes following the `0xFD` prefix (128 bit SIMD, including relaxed SIMD).
    pub enum SimdOpcode: u32 {
        V128Load = 0x00 => "v128.load", MemArg;
        V128Load8x8S = 0x01 => "v128.load8x8_s", MemArg;
        V128Load8x8U = 0x02 => "v128.load8x8_u", MemArg;
        V128Load16x4S = 0x03 => "v128.load16x4_s", MemArg;
        V128Load16x4U = 0x04 => "v128.load16x4_u", MemArg;
        V128Load32x2S = 0x05 => "v128.load32x2_s", MemArg;
        V128Load32x2U = 0x06 => "v128.load32x2_u", MemArg;
        V128Load8Splat = 0x07 => "v128.load8_splat", MemArg;
        V128Load16Splat = 0x08 => "v128.load16_splat", MemArg;
        V128Load32Splat = 0x09 => "v128.load32_splat", MemArg;
        V128Load64Splat = 0x0A => "v128.load64_splat", MemArg;
        V128Store = 0x0B => "v128.store", MemArg;
        V128Const = 0x0C => "v128.const", V128;
        I8x16Shuffle = 0x0D => "i8x16.shuffle", V128;
        I8x16Swizzle = 0x0E => "i8x16.swizzle", None;
        I8x16Splat = 0x0F => "i8x16.splat", None;
        I16x8Splat = 0x10 => "i16x8.splat", None;
        I32x4Splat = 0x11 => "i32x4.splat", None;
        I64x2Splat = 0x12 => "i64x2.splat", None;
        F32x4Splat = 0x13 => "f32x4.splat", None;
        F64x2Splat = 0x14 => "f64x2.splat", None;
        I8x16ExtractLaneS = 0x15 => "i8x16.extract_lane_s", Lane;
        I8x16ExtractLaneU = 0x16 => "i8x16.extract_lane_u", Lane;
        I8x16ReplaceLane = 0x17 => "i8x16.replace_lane", Lane;
        I16x8ExtractLaneS = 0x18 => "i16x8.extract_lane_s", Lane;
        I16x8ExtractLaneU = 0x19 => "i16x8.extract_lane_u", Lane;
        I16x8ReplaceLane = 0x1A => "i16x8.replace_lane", Lane;
        I32x4ExtractLane = 0x1B => "i32x4.extract_lane", Lane;
        I32x4ReplaceLane = 0x1C => "i32x4.replace_lane", Lane;
        I64x2ExtractLane = 0x1D => "i64x2.extract_lane", Lane;
        I64x2ReplaceLane = 0x1E => "i64x2.replace_lane", Lane;
        F32x4ExtractLane = 0x1F => "f32x4.extract_lane", Lane;
        F32x4ReplaceLane = 0x20 => "f32x4.replace_lane", Lane;
        F64x2ExtractLane = 0x21 => "f64x2.extract_lane", Lane;
        F64x2ReplaceLane = 0x22 => "f64x2.replace_lane", Lane;
        I8x16Eq = 0x23 => "i8x16.eq", None;
        I8x16Ne = 0x24 => "i8x16.ne", None;
        I8x16LtS = 0x25 => "i8x16.lt_s", None;
        I8x16LtU = 0x26 => "i8x16.lt_u", None;
        I8x16GtS = 0x27 => "i8x16.gt_s", None;
        I8x16GtU = 0x28 => "i8x16.gt_u", None;
        I8x16LeS = 0x29 => "i8x16.le_s", None;
        I8x16LeU = 0x2A => "i8x16.le_u", None;
        I8x16GeS = 0x2B => "i8x16.ge_s", None;
        I8x16GeU = 0x2C => "i8x16.ge_u", None;
        I16x8Eq = 0x2D => "i16x8.eq", None;
        I16x8Ne = 0x2E => "i16x8.ne", None;
        I16x8LtS = 0x2F => "i16x8.lt_s", None;
        I16x8LtU = 0x30 => "i16x8.lt_u", None;
        I16x8GtS = 0x31 => "i16x8.gt_s", None;
        I16x8GtU = 0x32 => "i16x8.gt_u", None;
        I16x8LeS = 0x33 => "i16x8.le_s", None;
        I16x8LeU = 0x34 => "i16x8.le_u", None;
        I16x8GeS = 0x35 => "i16x8.ge_s", None;
        I16x8GeU = 0x36 => "i16x8.ge_u", None;
        I32x4Eq = 0x37 => "i32x4.eq", None;
        I32x4Ne = 0x38 => "i32x4.ne", None;
        I32x4LtS = 0x39 => "i32x4.lt_s", None;
        I32x4LtU = 0x3A => "i32x4.lt_u", None;
        I32x4GtS = 0x3B => "i32x4.gt_s", None;
        I32x4GtU = 0x3C => "i32x4.gt_u", None;
        I32x4LeS = 0x3D => "i32x4.le_s", None;
        I32x4LeU = 0x3E => "i32x4.le_u", None;
        I32x4GeS = 0x3F => "i32x4.ge_s", None;
        I32x4GeU = 0x40 => "i32x4.ge_u", None;
        F32x4Eq = 0x41 => "f32x4.eq", None;
        F32x4Ne = 0x42 => "f32x4.ne", None;
        F32x4Lt = 0x43 => "f32x4.lt", None;
        F32x4Gt = 0x44 => "f32x4.gt", None;
        F32x4Le = 0x45 => "f32x4.le", None;
        F32x4Ge = 0x46 => "f32x4.ge", None;
        F64x2Eq = 0x47 => "f64x2.eq", None;
        F64x2Ne = 0x48 => "f64x2.ne", None;
        F64x2Lt = 0x49 => "f64x2.lt", None;
        F64x2Gt = 0x4A => "f64x2.gt", None;
        F64x2Le = 0x4B => "f64x2.le", None;
        F64x2Ge = 0x4C => "f64x2.ge", None;
        V128Not = 0x4D => "v128.not", None;
        V128And = 0x4E => "v128.and", None;
        V128Andnot = 0x4F => "v128.andnot", None;
        V128Or = 0x50 => "v128.or", None;
        V128Xor = 0x51 => "v128.xor", None;
        V128Bitselect = 0x52 => "v128.bitselect", None;
        V128AnyTrue = 0x53 => "v128.any_true", None;
        V128Load8Lane = 0x54 => "v128.load8_lane", MemArgLane;
        V128Load16Lane = 0x55 => "v128.load16_lane", MemArgLane;
        V128Load32Lane = 0x56 => "v128.load32_lane", MemArgLane;
        V128Load64Lane = 0x57 => "v128.load64_lane", MemArgLane;
        V128Store8Lane = 0x58 => "v128.store8_lane", MemArgLane;
        V128Store16Lane = 0x59 => "v128.store16_lane", MemArgLane;
        V128Store32Lane = 0x5A => "v128.store32_lane", MemArgLane;
        V128Store64Lane = 0x5B => "v128.store64_lane", MemArgLane;
        V128Load32Zero = 0x5C => "v128.load32_zero", MemArg;
        V128Load64Zero = 0x5D => "v128.load64_zero", MemArg;
        F32x4DemoteF64x2Zero = 0x5E => "f32x4.demote_f64x2_zero", None;
        F64x2PromoteLowF32x4 = 0x5F => "f64x2.promote_low_f32x4", None;
        I8x16Abs = 0x60 => "i8x16.abs", None;
        I8x16Neg = 0x61 => "i8x16.neg", None;
        I8x16Popcnt = 0x62 => "i8x16.popcnt", None;
        I8x16AllTrue = 0x63 => "i8x16.all_true", None;
        I8x16Bitmask = 0x64 => "i8x16.bitmask", None;
        I8x16NarrowI16x8S = 0x65 => "i8x16.narrow_i16x8_s", None;
        I8x16NarrowI16x8U = 0x66 => "i8x16.narrow_i16x8_u", None;
        F32x4Ceil = 0x67 => "f32x4.ceil", None;
        F32x4Floor = 0x68 => "f32x4.floor", None;
        F32x4Trunc = 0x69 => "f32x4.trunc", None;
        F32x4Nearest = 0x6A => "f32x4.nearest", None;
        I8x16Shl = 0x6B => "i8x16.shl", None;
        I8x16ShrS = 0x6C => "i8x16.shr_s", None;
        I8x16ShrU = 0x6D => "i8x16.shr_u", None;
        I8x16Add = 0x6E => "i8x16.add", None;
        I8x16AddSatS = 0x6F => "i8x16.add_sat_s", None;
        I8x16AddSatU = 0x70 => "i8x16.add_sat_u", None;
        I8x16Sub = 0x71 => "i8x16.sub", None;
        I8x16SubSatS = 0x72 => "i8x16.sub_sat_s", None;
        I8x16SubSatU = 0x73 => "i8x16.sub_sat_u", None;
        F64x2Ceil = 0x74 => "f64x2.ceil", None;
        F64x2Floor = 0x75 => "f64x2.floor", None;
        I8x16MinS = 0x76 => "i8x16.min_s", None;
        I8x16MinU = 0x77 => "i8x16.min_u", None;
        I8x16MaxS = 0x78 => "i8x16.max_s", None;
        I8x16MaxU = 0x79 => "i8x16.max_u", None;
        F64x2Trunc = 0x7A => "f64x2.trunc", None;
        I8x16AvgrU = 0x7B => "i8x16.avgr_u", None;
        I16x8ExtaddPairwiseI8x16S = 0x7C => "i16x8.extadd_pairwise_i8x16_s", None;
        I16x8ExtaddPairwiseI8x16U = 0x7D => "i16x8.extadd_pairwise_i8x16_u", None;
        I32x4ExtaddPairwiseI16x8S = 0x7E => "i32x4.extadd_pairwise_i16x8_s", None;
        I32x4ExtaddPairwiseI16x8U = 0x7F => "i32x4.extadd_pairwise_i16x8_u", None;
        I16x8Abs = 0x80 => "i16x8.abs", None;
        I16x8Neg = 0x81 => "i16x8.neg", None;
        I16x8Q15mulrSatS = 0x82 => "i16x8.q15mulr_sat_s", None;
        I16x8AllTrue = 0x83 => "i16x8.all_true", None;
        I16x8Bitmask = 0x84 => "i16x8.bitmask", None;
        I16x8NarrowI32x4S = 0x85 => "i16x8.narrow_i32x4_s", None;
        I16x8NarrowI32x4U = 0x86 => "i16x8.narrow_i32x4_u", None;
        I16x8ExtendLowI8x16S = 0x87 => "i16x8.extend_low_i8x16_s", None;
        I16x8ExtendHighI8x16S = 0x88 => "i16x8.extend_high_i8x16_s", None;
        I16x8ExtendLowI8x16U = 0x89 => "i16x8.extend_low_i8x16_u", None;
        I16x8ExtendHighI8x16U = 0x8A => "i16x8.extend_high_i8x16_u", None;
        I16x8Shl = 0x8B => "i16x8.shl", None;
        I16x8ShrS = 0x8C => "i16x8.shr_s", None;
        I16x8ShrU = 0x8D => "i16x8.shr_u", None;
        I16x8Add = 0x8E => "i16x8.add", None;
        I16x8AddSatS = 0x8F => "i16x8.add_sat_s", None;
        I16x8AddSatU = 0x90 => "i16x8.add_sat_u", None;
        I16x8Sub = 0x91 => "i16x8.sub", None;
        I16x8SubSatS = 0x92 => "i16x8.sub_sat_s", None;
        I16x8SubSatU = 0x93 => "i16x8.sub_sat_u", None;
        F64x2Nearest = 0x94 => "f64x2.nearest", None;
        I16x8Mul = 0x95 => "i16x8.mul", None;
        I16x8MinS = 0x96 => "i16x8.min_s", None;
        I16x8MinU = 0x97 => "i16x8.min_u", None;
        I16x8MaxS = 0x98 => "i16x8.max_s", None;
        I16x8MaxU = 0x99 => "i16x8.max_u", None;
        I16x8AvgrU = 0x9B => "i16x8.avgr_u", None;
        I16x8ExtmulLowI8x16S = 0x9C => "i16x8.extmul_low_i8x16_s", None;
        I16x8ExtmulHighI8x16S = 0x9D => "i16x8.extmul_high_i8x16_s", None;
        I16x8ExtmulLowI8x16U = 0x9E => "i16x8.extmul_low_i8x16_u", None;
        I16x8ExtmulHighI8x16U = 0x9F => "i16x8.extmul_high_i8x16_u", None;
        I32x4Abs = 0xA0 => "i32x4.abs", None;
        I32x4Neg = 0xA1 => "i32x4.neg", None;
        I32x4AllTrue = 0xA3 => "i32x4.all_true", None;
        I32x4Bitmask = 0xA4 => "i32x4.bitmask", None;
        I32x4ExtendLowI16x8S = 0xA7 => "i32x4.extend_low_i16x8_s", None;
        I32x4ExtendHighI16x8S = 0xA8 => "i32x4.extend_high_i16x8_s", None;
        I32x4ExtendLowI16x8U = 0xA9 => "i32x4.extend_low_i16x8_u", None;
        I32x4ExtendHighI16x8U = 0xAA => "i32x4.extend_high_i16x8_u", None;
        I32x4Shl = 0xAB => "i32x4.shl", None;
        I32x4ShrS = 0xAC => "i32x4.shr_s", None;
        I32x4ShrU = 0xAD => "i32x4.shr_u", None;
        I32x4Add = 0xAE => "i32x4.add", None;
        I32x4Sub = 0xB1 => "i32x4.sub", None;
        I32x4Mul = 0xB5 => "i32x4.mul", None;
        I32x4MinS = 0xB6 => "i32x4.min_s", None;
        I32x4MinU = 0xB7 => "i32x4.min_u", None;
        I32x4MaxS = 0xB8 => "i32x4.max_s", None;
        I32x4MaxU = 0xB9 => "i32x4.max_u", None;
        I32x4DotI16x8S = 0xBA => "i32x4.dot_i16x8_s", None;
        I32x4ExtmulLowI16x8S = 0xBC => "i32x4.extmul_low_i16x8_s", None;
        I32x4ExtmulHighI16x8S = 0xBD => "i32x4.extmul_high_i16x8_s", None;
        I32x4ExtmulLowI16x8U = 0xBE => "i32x4.extmul_low_i16x8_u", None;
        I32x4ExtmulHighI16x8U = 0xBF => "i32x4.extmul_high_i16x8_u", None;
        I64x2Abs = 0xC0 => "i64x2.abs", None;
        I64x2Neg = 0xC1 => "i64x2.neg", None;
        I64x2AllTrue = 0xC3 => "i64x2.all_true", None;
        I64x2Bitmask = 0xC4 => "i64x2.bitmask", None;
        I64x2ExtendLowI32x4S = 0xC7 => "i64x2.extend_low_i32x4_s", None;
        I64x2ExtendHighI32x4S = 0xC8 => "i64x2.extend_high_i32x4_s", None;
        I64x2ExtendLowI32x4U = 0xC9 => "i64x2.extend_low_i32x4_u", None;
        I64x2ExtendHighI32x4U = 0xCA => "i64x2.extend_high_i32x4_u", None;
        I64x2Shl = 0xCB => "i64x2.shl", None;
        I64x2ShrS = 0xCC => "i64x2.shr_s", None;
        I64x2ShrU = 0xCD => "i64x2.shr_u", None;
        I64x2Add = 0xCE => "i64x2.add", None;
        I64x2Sub = 0xD1 => "i64x2.sub", None;
        I64x2Mul = 0xD5 => "i64x2.mul", None;
        I64x2Eq = 0xD6 => "i64x2.eq", None;
        I64x2Ne = 0xD7 => "i64x2.ne", None;
        I64x2LtS = 0xD8 => "i64x2.lt_s", None;
        I64x2GtS = 0xD9 => "i64x2.gt_s", None;
        I64x2LeS = 0xDA => "i64x2.le_s", None;
        I64x2GeS = 0xDB => "i64x2.ge_s", None;
        I64x2ExtmulLowI32x4S = 0xDC => "i64x2.extmul_low_i32x4_s", None;
        I64x2ExtmulHighI32x4S = 0xDD => "i64x2.extmul_high_i32x4_s", None;
        I64x2ExtmulLowI32x4U = 0xDE => "i64x2.extmul_low_i32x4_u", None;
        I64x2ExtmulHighI32x4U = 0xDF => "i64x2.extmul_high_i32x4_u", None;
        F32x4Abs = 0xE0 => "f32x4.abs", None;
        F32x4Neg = 0xE1 => "f32x4.neg", None;
        F32x4Sqrt = 0xE3 => "f32x4.sqrt", None;
        F32x4Add = 0xE4 => "f32x4.add", None;
        F32x4Sub = 0xE5 => "f32x4.sub", None;
        F32x4Mul = 0xE6 => "f32x4.mul", None;
        F32x4Div = 0xE7 => "f32x4.div", None;
        F32x4Min = 0xE8 => "f32x4.min", None;
        F32x4Max = 0xE9 => "f32x4.max", None;
        F32x4Pmin = 0xEA => "f32x4.pmin", None;
        F32x4Pmax = 0xEB => "f32x4.pmax", None;
        F64x2Abs = 0xEC => "f64x2.abs", None;
        F64x2Neg = 0xED => "f64x2.neg", None;
        F64x2Sqrt = 0xEF => "f64x2.sqrt", None;
        F64x2Add = 0xF0 => "f64x2.add", None;
        F64x2Sub = 0xF1 => "f64x2.sub", None;
        F64x2Mul = 0xF2 => "f64x2.mul", None;
        F64x2Div = 0xF3 => "f64x2.div", None;
        F64x2Min = 0xF4 => "f64x2.min", None;
        F64x2Max = 0xF5 => "f64x2.max", None;
        F64x2Pmin = 0xF6 => "f64x2.pmin", None;
        F64x2Pmax = 0xF7 => "f64x2.pmax", None;
        I32x4TruncSatF32x4S = 0xF8 => "i32x4.trunc_sat_f32x4_s", None;
        I32x4TruncSatF32x4U = 0xF9 => "i32x4.trunc_sat_f32x4_u", None;
        F32x4ConvertI32x4S = 0xFA => "f32x4.convert_i32x4_s", None;
        F32x4ConvertI32x4U = 0xFB => "f32x4.convert_i32x4_u", None;
        I32x4TruncSatF64x2SZero = 0xFC => "i32x4.trunc_sat_f64x2_s_zero", None;
        I32x4TruncSatF64x2UZero = 0xFD => "i32x4.trunc_sat_f64x2_u_zero", None;
        F64x2ConvertLowI32x4S = 0xFE => "f64x2.convert_low_i32x4_s", None;
        F64x2ConvertLowI32x4U = 0xFF => "f64x2.convert_low_i32x4_u", None;
        I8x16RelaxedSwizzle = 0x100 => "i8x16.relaxed_swizzle", None;
        I32x4RelaxedTruncF32x4S = 0x101 => "i32x4.relaxed_trunc_f32x4_s", None;
        I32x4RelaxedTruncF32x4U = 0x102 => "i32x4.relaxed_trunc_f32x4_u", None;
        I32x4RelaxedTruncF64x2SZero = 0x103 => "i32x4.relaxed_trunc_f64x2_s_zero", None;
        I32x4RelaxedTruncF64x2UZero = 0x104 => "i32x4.relaxed_trunc_f64x2_u_zero", None;
        F32x4RelaxedMadd = 0x105 => "f32x4.relaxed_madd", None;
        F32x4RelaxedNmadd = 0x106 => "f32x4.relaxed_nmadd", None;
        F64x2RelaxedMadd = 0x107 => "f64x2.relaxed_madd", None;
        F64x2RelaxedNmadd = 0x108 => "f64x2.relaxed_nmadd", None;
        I8x16RelaxedLaneselect = 0x109 => "i8x16.relaxed_laneselect", None;
        I16x8RelaxedLaneselect = 0x10A => "i16x8.relaxed_laneselect", None;
        I32x4RelaxedLaneselect = 0x10B => "i32x4.relaxed_laneselect", None;
        I64x2RelaxedLaneselect = 0x10C => "i64x2.relaxed_laneselect", None;
        F32x4RelaxedMin = 0x10D => "f32x4.relaxed_min", None;
        F32x4RelaxedMax = 0x10E => "f32x4.relaxed_max", None;
        F64x2RelaxedMin = 0x10F => "f64x2.relaxed_min", None;
        F64x2RelaxedMax = 0x110 => "f64x2.relaxed_max", None;
        I16x8RelaxedQ15mulrS = 0x111 => "i16x8.relaxed_q15mulr_s", None;
        I16x8RelaxedDotI8x16I7x16S = 0x112 => "i16x8.relaxed_dot_i8x16_i7x16_s", None;
        I32x4RelaxedDotI8x16I7x16AddS = 0x113 => "i32x4.relaxed_dot_i8x16_i7x16_add_s", None;
    }
}

opcodes! {
    /// Opcodes following the `0xFE` prefix (shared-memory atomics).
    pub enum AtomicOpcode: u32 {
        MemoryAtomicNotify = 0x00 => "memory.atomic.notify", MemArg;
        MemoryAtomicWait32 = 0x01 => "memory.atomic.wait32", MemArg;
        MemoryAtomicWait64 = 0x02 => "memory.atomic.wait64", MemArg;
        AtomicFence = 0x03 => "atomic.fence", Reserved;
        I32AtomicLoad = 0x10 => "i32.atomic.load", MemArg;
        I64AtomicLoad = 0x11 => "i64.atomic.load", MemArg;
        I32AtomicLoad8U = 0x12 => "i32.atomic.load8_u", MemArg;
        I32AtomicLoad16U = 0x13 => "i32.atomic.load16_u", MemArg;
        I64AtomicLoad8U = 0x14 => "i64.atomic.load8_u", MemArg;
        I64AtomicLoad16U = 0x15 => "i64.atomic.load16_u", MemArg;
        I64AtomicLoad32U = 0x16 => "i64.atomic.load32_u", MemArg;
        I32AtomicStore = 0x17 => "i32.atomic.store", MemArg;
        I64AtomicStore = 0x18 => "i64.atomic.store", MemArg;
        I32AtomicStore8 = 0x19 => "i32.atomic.store8", MemArg;
        I32AtomicStore16 = 0x1A => "i32.atomic.store16", MemArg;
        I64AtomicStore8 = 0x1B => "i64.atomic.store8", MemArg;
        I64AtomicStore16 = 0x1C => "i64.atomic.store16", MemArg;
        I64AtomicStore32 = 0x1D => "i64.atomic.store32", MemArg;
        I32AtomicRmwAdd = 0x1E => "i32.atomic.rmw.add", MemArg;
        I64AtomicRmwAdd = 0x1F => "i64.atomic.rmw.add", MemArg;
        I32AtomicRmw8AddU = 0x20 => "i32.atomic.rmw8.add_u", MemArg;
        I32AtomicRmw16AddU = 0x21 => "i32.atomic.rmw16.add_u", MemArg;
        I64AtomicRmw8AddU = 0x22 => "i64.atomic.rmw8.add_u", MemArg;
        I64AtomicRmw16AddU = 0x23 => "i64.atomic.rmw16.add_u", MemArg;
        I64AtomicRmw32AddU = 0x24 => "i64.atomic.rmw32.add_u", MemArg;
        I32AtomicRmwSub = 0x25 => "i32.atomic.rmw.sub", MemArg;
        I64AtomicRmwSub = 0x26 => "i64.atomic.rmw.sub", MemArg;
        I32AtomicRmw8SubU = 0x27 => "i32.atomic.rmw8.sub_u", MemArg;
        I32AtomicRmw16SubU = 0x28 => "i32.atomic.rmw16.sub_u", MemArg;
        I64AtomicRmw8SubU = 0x29 => "i64.atomic.rmw8.sub_u", MemArg;
        I64AtomicRmw16SubU = 0x2A => "i64.atomic.rmw16.sub_u", MemArg;
        I64AtomicRmw32SubU = 0x2B => "i64.atomic.rmw32.sub_u", MemArg;
        I32AtomicRmwAnd = 0x2C => "i32.atomic.rmw.and", MemArg;
        I64AtomicRmwAnd = 0x2D => "i64.atomic.rmw.and", MemArg;
        I32AtomicRmw8AndU = 0x2E => "i32.atomic.rmw8.and_u", MemArg;
        I32AtomicRmw16AndU = 0x2F => "i32.atomic.rmw16.and_u", MemArg;
        I64AtomicRmw8AndU = 0x30 => "i64.atomic.rmw8.and_u", MemArg;
        I64AtomicRmw16AndU = 0x31 => "i64.atomic.rmw16.and_u", MemArg;
        I64AtomicRmw32AndU = 0x32 => "i64.atomic.rmw32.and_u", MemArg;
        I32AtomicRmwOr = 0x33 => "i32.atomic.rmw.or", MemArg;
        I64AtomicRmwOr = 0x34 => "i64.atomic.rmw.or", MemArg;
        I32AtomicRmw8OrU = 0x35 => "i32.atomic.rmw8.or_u", MemArg;
        I32AtomicRmw16OrU = 0x36 => "i32.atomic.rmw16.or_u", MemArg;
        I64AtomicRmw8OrU = 0x37 => "i64.atomic.rmw8.or_u", MemArg;
        I64AtomicRmw16OrU = 0x38 => "i64.atomic.rmw16.or_u", MemArg;
        I64AtomicRmw32OrU = 0x39 => "i64.atomic.rmw32.or_u", MemArg;
        I32AtomicRmwXor = 0x3A => "i32.atomic.rmw.xor", MemArg;
        I64AtomicRmwXor = 0x3B => "i64.atomic.rmw.xor", MemArg;
        I32AtomicRmw8XorU = 0x3C => "i32.atomic.rmw8.xor_u", MemArg;
        I32AtomicRmw16XorU = 0x3D => "i32.atomic.rmw16.xor_u", MemArg;
        I64AtomicRmw8XorU = 0x3E => "i64.atomic.rmw8.xor_u", MemArg;
        I64AtomicRmw16XorU = 0x3F => "i64.atomic.rmw16.xor_u", MemArg;
        I64AtomicRmw32XorU = 0x40 => "i64.atomic.rmw32.xor_u", MemArg;
        I32AtomicRmwXchg = 0x41 => "i32.atomic.rmw.xchg", MemArg;
        I64AtomicRmwXchg = 0x42 => "i64.atomic.rmw.xchg", MemArg;
        I32AtomicRmw8XchgU = 0x43 => "i32.atomic.rmw8.xchg_u", MemArg;
        I32AtomicRmw16XchgU = 0x44 => "i32.atomic.rmw16.xchg_u", MemArg;
        I64AtomicRmw8XchgU = 0x45 => "i64.atomic.rmw8.xchg_u", MemArg;
        I64AtomicRmw16XchgU = 0x46 => "i64.atomic.rmw16.xchg_u", MemArg;
        I64AtomicRmw32XchgU = 0x47 => "i64.atomic.rmw32.xchg_u", MemArg;
        I32AtomicRmwCmpxchg = 0x48 => "i32.atomic.rmw.cmpxchg", MemArg;
        I64AtomicRmwCmpxchg = 0x49 => "i64.atomic.rmw.cmpxchg", MemArg;
        I32AtomicRmw8CmpxchgU = 0x4A => "i32.atomic.rmw8.cmpxchg_u", MemArg;
        I32AtomicRmw16CmpxchgU = 0x4B => "i32.atomic.rmw16.cmpxchg_u", MemArg;
        I64AtomicRmw8CmpxchgU = 0x4C => "i64.atomic.rmw8.cmpxchg_u", MemArg;
        I64AtomicRmw16CmpxchgU = 0x4D => "i64.atomic.rmw16.cmpxchg_u", MemArg;
        I64AtomicRmw32CmpxchgU = 0x4E => "i64.atomic.rmw32.cmpxchg_u", MemArg;
    }
}
