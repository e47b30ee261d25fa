use crate::core::CustomSection;
use crate::decode::ByteReader;
use crate::decode::helpers::{DecodeNameError, decode_name};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed decoding custom section name")]
pub struct DecodeCustomSectionError(#[from] pub DecodeNameError);

/// Splits a custom section into its name and the bytes that follow it.
/// The reader must be bounded to the section payload.
pub(crate) fn decode_custom_section(
    reader: &mut ByteReader,
) -> Result<CustomSection, DecodeCustomSectionError> {
    let name = decode_name(reader)?;

    let payload = *reader.get_ref();
    let start = usize::try_from(reader.position()).map_or(payload.len(), |p| p.min(payload.len()));
    reader.set_position(payload.len() as u64);

    Ok(CustomSection {
        name,
        contents: payload[start..].to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn name_and_contents() {
        // the reader starts mid-buffer, as it does inside a module
        let bytes = [0xFF, 0xFF, 3, b'f', b'o', b'o', 1, 2, 3];
        let mut reader = Cursor::new(&bytes[..]);
        reader.set_position(2);

        let custom = decode_custom_section(&mut reader).unwrap();
        assert_eq!(custom.name, "foo");
        assert_eq!(custom.contents, [1, 2, 3]);
        assert_eq!(reader.position(), 9);
    }
}
