use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::io::Cursor;
use wainfo::decode::integer::{DecodeSignedError, decode_i32, decode_i64, decode_u32, decode_u64};
use wainfo::encode::{i32_len, i64_len, u32_len, write_i32, write_i64, write_u32, write_u64};

fn encoded_i32(value: i32) -> Vec<u8> {
    let mut buf = Vec::new();
    let written = write_i32(&mut buf, value).unwrap();
    assert_eq!(written as usize, buf.len());
    buf
}

#[test]
fn signed_edge_values() {
    assert_eq!(encoded_i32(-1), [0x7F]);
    assert_eq!(encoded_i32(-64), [0x40]);
    assert_eq!(encoded_i32(-65), [0xBF, 0x7F]);
    assert_eq!(encoded_i32(63), [0x3F]);
    assert_eq!(encoded_i32(64), [0xC0, 0x00]);
    assert_eq!(encoded_i32(i32::MIN), [0x80, 0x80, 0x80, 0x80, 0x78]);

    for value in [-1, -65, i32::MIN, i32::MAX, 0] {
        let bytes = encoded_i32(value);
        assert_eq!(decode_i32(&mut Cursor::new(&bytes)).unwrap(), value);
        assert_eq!(i32_len(value) as usize, bytes.len());
    }
}

#[test]
fn signed_overflow_is_rejected() {
    // sign bits beyond bit 31 disagree with bit 31
    let err = decode_i32(&mut Cursor::new([0x80, 0x80, 0x80, 0x80, 0x70])).unwrap_err();
    assert!(matches!(err, DecodeSignedError::IncorrectSignExtension { bits: 32 }), "{err:?}");
}

proptest! {
    #[test]
    fn u32_round_trip(value in any::<u32>()) {
        let mut buf = Vec::new();
        write_u32(&mut buf, value).unwrap();
        prop_assert_eq!(buf.len(), u32_len(value) as usize);
        prop_assert_eq!(decode_u32(&mut Cursor::new(&buf)).unwrap(), value);
    }

    #[test]
    fn u64_round_trip(value in any::<u64>()) {
        let mut buf = Vec::new();
        write_u64(&mut buf, value).unwrap();
        prop_assert_eq!(decode_u64(&mut Cursor::new(&buf)).unwrap(), value);
    }

    #[test]
    fn i32_round_trip(value in any::<i32>()) {
        let buf = encoded_i32(value);
        prop_assert_eq!(buf.len(), i32_len(value) as usize);
        prop_assert_eq!(decode_i32(&mut Cursor::new(&buf)).unwrap(), value);
    }

    #[test]
    fn i64_round_trip(value in any::<i64>()) {
        let mut buf = Vec::new();
        write_i64(&mut buf, value).unwrap();
        prop_assert_eq!(buf.len(), i64_len(value) as usize);
        prop_assert_eq!(decode_i64(&mut Cursor::new(&buf)).unwrap(), value);
    }
}
