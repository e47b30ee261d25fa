//! Decoding of value, reference, function, table, memory and global types.
//!
//! <https://www.w3.org/TR/wasm-core-2/#binary-types>
use crate::core::types::{
    FuncType, GlobalType, Limits, MemType, Mut, NumType, RefType, TableType, ValType, VecType,
};
use crate::decode::helpers::{DecodeVectorError, decode_vector};
use crate::decode::integer::{DecodeUnsignedError, decode_u32, decode_u64};
use crate::decode::{FromMarkerByte, read_byte};
use phf::phf_ordered_map;
use std::io::{self, Read};
use thiserror::Error;

/// Declares the marker table of a type encoded as one byte, the error for
/// reading it, and its `decode` and `marker` functions.
macro_rules! marker_type {
    ($ty:ident, $table:ident, $error:ident, $what:literal, { $($byte:literal => $value:expr),+ $(,)? }) => {
        static $table: phf::OrderedMap<u8, $ty> = phf_ordered_map! {
            $($byte => $value),+
        };

        #[derive(Debug, Error)]
        pub enum $error {
            #[error("failed reading {what} byte", what = $what)]
            Io(#[from] io::Error),

            #[error(
                "invalid {what} byte {0:#04X}: expected one of {markers}",
                what = $what,
                markers = <$ty as FromMarkerByte>::markers_formatted()
            )]
            InvalidMarker(u8),
        }

        impl From<u8> for $error {
            fn from(b: u8) -> Self {
                Self::InvalidMarker(b)
            }
        }

        impl FromMarkerByte for $ty {
            type Error = $error;

            fn markers() -> &'static phf::OrderedMap<u8, Self> {
                &$table
            }
        }

        impl $ty {
            pub(crate) fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self, $error> {
                Self::from_marker(read_byte(reader)?)
            }

            // every variant has an entry in the table
            pub(crate) fn marker(self) -> u8 {
                self.to_marker().unwrap_or_default()
            }
        }
    };
}

marker_type!(ValType, VAL_TYPE_MARKERS, DecodeValTypeError, "value type", {
    0x7Fu8 => ValType::Num(NumType::Int32),
    0x7Eu8 => ValType::Num(NumType::Int64),
    0x7Du8 => ValType::Num(NumType::Float32),
    0x7Cu8 => ValType::Num(NumType::Float64),
    0x7Bu8 => ValType::Vec(VecType::V128),
    0x70u8 => ValType::Ref(RefType::Func),
    0x6Fu8 => ValType::Ref(RefType::Extern),
});

marker_type!(RefType, REF_TYPE_MARKERS, DecodeRefTypeError, "reference type", {
    0x70u8 => RefType::Func,
    0x6Fu8 => RefType::Extern,
});

marker_type!(Mut, MUT_MARKERS, DecodeMutError, "mutability", {
    0x00u8 => Mut::Const,
    0x01u8 => Mut::Var,
});

#[derive(Debug, Error)]
pub enum DecodeFuncTypeError {
    #[error("failed reading function type form")]
    ReadForm(#[from] io::Error),

    #[error("unexpected function type form: expected {form:#04X}; got {0:#04X}", form = FuncType::FORM)]
    InvalidForm(u8),

    #[error("failed decoding parameter types")]
    DecodeParameters(#[source] DecodeVectorError<DecodeValTypeError>),

    #[error("failed decoding result types")]
    DecodeResults(#[source] DecodeVectorError<DecodeValTypeError>),
}

impl FuncType {
    pub const FORM: u8 = 0x60;

    pub(crate) fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self, DecodeFuncTypeError> {
        let form = read_byte(reader)?;
        if form != Self::FORM {
            return Err(DecodeFuncTypeError::InvalidForm(form));
        }

        Ok(FuncType {
            parameters: decode_vector(reader, ValType::decode)
                .map_err(DecodeFuncTypeError::DecodeParameters)?,
            results: decode_vector(reader, ValType::decode)
                .map_err(DecodeFuncTypeError::DecodeResults)?,
        })
    }
}

#[derive(Debug, Error)]
pub enum DecodeLimitsError {
    #[error("failed reading limits flags")]
    ReadFlags(io::Error),

    #[error("unexpected limits flags: expected a value in [0x00, 0x07]; got {0:#04X}")]
    InvalidFlags(u8),

    #[error("failed decoding minimum")]
    DecodeMin(#[source] DecodeUnsignedError),

    #[error("failed decoding maximum")]
    DecodeMax(#[source] DecodeUnsignedError),
}

const HAS_MAX: u8 = 0b001;
const SHARED: u8 = 0b010;
const INDEX64: u8 = 0b100;

impl Limits {
    pub(crate) fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self, DecodeLimitsError> {
        let flags = read_byte(reader).map_err(DecodeLimitsError::ReadFlags)?;
        if flags > (HAS_MAX | SHARED | INDEX64) {
            return Err(DecodeLimitsError::InvalidFlags(flags));
        }

        let index64 = flags & INDEX64 != 0;
        let bound = |r: &mut R| {
            if index64 {
                decode_u64(r)
            } else {
                decode_u32(r).map(u64::from)
            }
        };

        let min = bound(reader).map_err(DecodeLimitsError::DecodeMin)?;
        let max = if flags & HAS_MAX != 0 {
            Some(bound(reader).map_err(DecodeLimitsError::DecodeMax)?)
        } else {
            None
        };

        Ok(Limits {
            min,
            max,
            shared: flags & SHARED != 0,
            index64,
        })
    }
}

#[derive(Debug, Error)]
#[error("failed decoding memory type")]
pub struct DecodeMemTypeError(#[from] pub DecodeLimitsError);

impl MemType {
    pub(crate) fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self, DecodeMemTypeError> {
        Ok(MemType {
            limits: Limits::decode(reader)?,
        })
    }
}

#[derive(Debug, Error)]
pub enum DecodeTableTypeError {
    #[error("failed decoding table element type")]
    DecodeRefType(#[from] DecodeRefTypeError),

    #[error("failed decoding table limits")]
    DecodeLimits(#[from] DecodeLimitsError),
}

impl TableType {
    pub(crate) fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self, DecodeTableTypeError> {
        let reftype = RefType::decode(reader)?;
        let limits = Limits::decode(reader)?;
        Ok(TableType { reftype, limits })
    }
}

#[derive(Debug, Error)]
pub enum DecodeGlobalTypeError {
    #[error("failed decoding global value type")]
    DecodeValType(#[from] DecodeValTypeError),

    #[error("failed decoding global mutability")]
    DecodeMut(#[from] DecodeMutError),
}

impl GlobalType {
    pub(crate) fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Self, DecodeGlobalTypeError> {
        let valtype = ValType::decode(reader)?;
        let r#mut = Mut::decode(reader)?;
        Ok(GlobalType(r#mut, valtype))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn value_type_markers_select_the_kind() {
        for (marker, ty) in VAL_TYPE_MARKERS.entries() {
            match ty {
                ValType::Ref(_) => assert!(*marker <= 0x70),
                ValType::Vec(_) => assert_eq!(*marker, 0x7B),
                ValType::Num(_) => assert!((0x7C..=0x7F).contains(marker)),
            }
            assert_eq!(ty.marker(), *marker);
        }
    }

    #[test]
    fn unknown_value_type() {
        let err = ValType::decode(&mut &[0x40u8][..]).unwrap_err();
        assert!(matches!(err, DecodeValTypeError::InvalidMarker(0x40)));
        assert!(err.to_string().starts_with("invalid value type byte 0x40"));
    }

    #[test]
    fn function_type() {
        let ty = FuncType::decode(&mut &[0x60, 2, 0x7F, 0x7E, 1, 0x7D][..]).unwrap();
        assert_eq!(ty.parameters, [ValType::I32, ValType::I64]);
        assert_eq!(ty.results, [ValType::F32]);
    }

    #[test]
    fn limits_flags() {
        let limits = |bytes: &[u8]| Limits::decode(&mut &bytes[..]).unwrap();

        assert_eq!(
            limits(&[0x00, 1]),
            Limits {
                min: 1,
                max: None,
                shared: false,
                index64: false,
            }
        );
        assert_eq!(
            limits(&[0x03, 1, 16]),
            Limits {
                min: 1,
                max: Some(16),
                shared: true,
                index64: false,
            }
        );

        // memory64 bounds may exceed u32
        let mut bytes = vec![0x05, 1];
        bytes.extend([0x80, 0x80, 0x80, 0x80, 0x20]);
        let wide = limits(&bytes);
        assert!(wide.index64);
        assert_eq!(wide.max, Some(1 << 33));
        assert_eq!(wide.to_string(), "i64 1 8589934592");
    }

    #[test]
    fn invalid_limits_flags() {
        let err = Limits::decode(&mut &[0x08u8, 1][..]).unwrap_err();
        assert!(matches!(err, DecodeLimitsError::InvalidFlags(0x08)));
    }

    #[test]
    fn global_type() {
        let ty = GlobalType::decode(&mut &[0x7E, 0x01][..]).unwrap();
        assert_eq!(ty, GlobalType(Mut::Var, ValType::I64));
        assert_eq!(ty.to_string(), "(mut i64)");

        let err = GlobalType::decode(&mut &[0x7F, 0x02][..]).unwrap_err();
        assert!(matches!(
            err,
            DecodeGlobalTypeError::DecodeMut(DecodeMutError::InvalidMarker(0x02))
        ));
    }
}
