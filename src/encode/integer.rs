//! LEB128 integer encoding, always in the shortest form.
use std::io::{self, Write};

/// Writes `value` as unsigned LEB128 and returns the number of bytes written.
pub fn write_unsigned<W: Write + ?Sized>(writer: &mut W, mut value: u64) -> io::Result<u32> {
    let mut written = 0;
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        writer.write_all(&[byte])?;
        written += 1;
        if value == 0 {
            return Ok(written);
        }
    }
}

/// Writes `value` as signed LEB128 and returns the number of bytes written.
pub fn write_signed<W: Write + ?Sized>(writer: &mut W, mut value: i64) -> io::Result<u32> {
    let mut written = 0;
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        // done once the remaining bits are all copies of the sign bit of
        // the group just emitted
        let done = (value == 0 && byte & 0x40 == 0) || (value == -1 && byte & 0x40 != 0);
        writer.write_all(&[if done { byte } else { byte | 0x80 }])?;
        written += 1;
        if done {
            return Ok(written);
        }
    }
}

pub fn unsigned_len(mut value: u64) -> u32 {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}

pub fn signed_len(mut value: i64) -> u32 {
    let mut len = 1;
    while !(-0x40..0x40).contains(&value) {
        value >>= 7;
        len += 1;
    }
    len
}

pub fn write_u32<W: Write + ?Sized>(writer: &mut W, value: u32) -> io::Result<u32> {
    write_unsigned(writer, value.into())
}

pub fn write_u64<W: Write + ?Sized>(writer: &mut W, value: u64) -> io::Result<u32> {
    write_unsigned(writer, value)
}

pub fn write_i32<W: Write + ?Sized>(writer: &mut W, value: i32) -> io::Result<u32> {
    write_signed(writer, value.into())
}

pub fn write_i64<W: Write + ?Sized>(writer: &mut W, value: i64) -> io::Result<u32> {
    write_signed(writer, value)
}

pub fn u32_len(value: u32) -> u32 {
    unsigned_len(value.into())
}

pub fn i32_len(value: i32) -> u32 {
    signed_len(value.into())
}

pub fn i64_len(value: i64) -> u32 {
    signed_len(value)
}
