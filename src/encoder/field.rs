//! Per-field wire encoding
//!
//! Layout rules:
//! - uint / word / byte: little-endian at a fixed width of 4 / 2 / 1 bytes
//! - array: one byte per comma-separated element, declared size ignored
//! - str: raw UTF-8 bytes, exactly the declared size, no padding

use crate::schema::FieldType;

use super::errors::{EncodeError, EncodeResult};
use super::literal::parse_integer;

/// The bytes produced for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    field_type: FieldType,
    bytes: Vec<u8>,
}

impl Encoded {
    /// Returns the wire bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes actually emitted.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decoded elements of an array field, in order.
    ///
    /// Returns `None` for every other type.
    pub fn elements(&self) -> Option<&[u8]> {
        match self.field_type {
            FieldType::ByteArray => Some(&self.bytes),
            _ => None,
        }
    }
}

/// Encodes one raw value according to its schema type and declared size.
pub fn encode(field_type: FieldType, declared_size: u64, raw_value: &str) -> EncodeResult<Encoded> {
    let bytes = match field_type {
        FieldType::UnsignedInt32 => {
            let value = parse_integer(raw_value, u32::MAX as u64)?;
            (value as u32).to_le_bytes().to_vec()
        }
        FieldType::Word => {
            let value = parse_integer(raw_value, u16::MAX as u64)?;
            (value as u16).to_le_bytes().to_vec()
        }
        FieldType::Byte => {
            let value = parse_integer(raw_value, u8::MAX as u64)?;
            vec![value as u8]
        }
        FieldType::ByteArray => encode_byte_array(raw_value)?,
        FieldType::FixedString => {
            let bytes = raw_value.as_bytes();
            if bytes.len() as u64 != declared_size {
                return Err(EncodeError::length_mismatch(
                    raw_value,
                    declared_size,
                    bytes.len(),
                ));
            }
            bytes.to_vec()
        }
    };

    Ok(Encoded { field_type, bytes })
}

fn encode_byte_array(raw_value: &str) -> EncodeResult<Vec<u8>> {
    raw_value
        .split(',')
        .map(|element| parse_integer(element, u8::MAX as u64).map(|v| v as u8))
        .collect()
}

/// Decodes a scalar field back to its integer value.
///
/// Returns `None` for non-scalar types or when `bytes` is not exactly the
/// type's width.
pub fn decode_scalar(field_type: FieldType, bytes: &[u8]) -> Option<u64> {
    if Some(bytes.len()) != field_type.scalar_width() {
        return None;
    }

    match field_type {
        FieldType::UnsignedInt32 => {
            Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as u64)
        }
        FieldType::Word => Some(u16::from_le_bytes([bytes[0], bytes[1]]) as u64),
        FieldType::Byte => Some(bytes[0] as u64),
        FieldType::ByteArray | FieldType::FixedString => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::EncodeErrorCode;

    #[test]
    fn test_scalar_layout_is_little_endian() {
        assert_eq!(
            encode(FieldType::UnsignedInt32, 4, "0x00000001").unwrap().bytes(),
            &[0x01, 0x00, 0x00, 0x00]
        );
        assert_eq!(
            encode(FieldType::UnsignedInt32, 4, "17").unwrap().bytes(),
            &[0x11, 0x00, 0x00, 0x00]
        );
        assert_eq!(
            encode(FieldType::Word, 2, "0x1234").unwrap().bytes(),
            &[0x34, 0x12]
        );
        assert_eq!(encode(FieldType::Byte, 1, "0x02").unwrap().bytes(), &[0x02]);
    }

    #[test]
    fn test_scalar_round_trip_at_boundaries() {
        let cases = [
            (FieldType::Byte, vec![0u64, 1, 0x7F, 0xFF]),
            (FieldType::Word, vec![0, 1, 0x00FF, 0x0100, 0xFFFF]),
            (FieldType::UnsignedInt32, vec![0, 1, 0xFFFF, 0x10000, 0xFFFF_FFFF]),
        ];

        for (ty, values) in cases {
            for v in values {
                let encoded = encode(ty, ty.scalar_width().unwrap() as u64, &v.to_string()).unwrap();
                assert_eq!(decode_scalar(ty, encoded.bytes()), Some(v), "{} {}", ty, v);

                let hex = format!("0x{:X}", v);
                let encoded = encode(ty, 0, &hex).unwrap();
                assert_eq!(decode_scalar(ty, encoded.bytes()), Some(v), "{} {}", ty, hex);
            }
        }
    }

    #[test]
    fn test_scalar_overflow_rejected() {
        let err = encode(FieldType::Byte, 1, "256").unwrap_err();
        assert_eq!(err.code(), EncodeErrorCode::MibinEncodeOutOfRange);

        let err = encode(FieldType::Word, 2, "0x10000").unwrap_err();
        assert_eq!(err.code(), EncodeErrorCode::MibinEncodeOutOfRange);

        let err = encode(FieldType::UnsignedInt32, 4, "4294967296").unwrap_err();
        assert_eq!(err.code(), EncodeErrorCode::MibinEncodeOutOfRange);
    }

    #[test]
    fn test_scalar_width_ignores_declared_size() {
        let encoded = encode(FieldType::Word, 8, "1").unwrap();
        assert_eq!(encoded.len(), 2);
    }

    #[test]
    fn test_byte_array_emits_one_byte_per_element() {
        let encoded = encode(FieldType::ByteArray, 16, "0x10, 32,0xFF").unwrap();
        assert_eq!(encoded.bytes(), &[0x10, 0x20, 0xFF]);
        assert_eq!(encoded.elements(), Some(&[0x10u8, 0x20, 0xFF][..]));

        let single = encode(FieldType::ByteArray, 1, "7").unwrap();
        assert_eq!(single.len(), 1);

        let many = encode(FieldType::ByteArray, 2, "1,2,3,4,5,6").unwrap();
        assert_eq!(many.len(), 6);
    }

    #[test]
    fn test_byte_array_bad_element() {
        let err = encode(FieldType::ByteArray, 3, "1,300,2").unwrap_err();
        assert_eq!(err.code(), EncodeErrorCode::MibinEncodeOutOfRange);

        let err = encode(FieldType::ByteArray, 3, "1,,2").unwrap_err();
        assert_eq!(err.code(), EncodeErrorCode::MibinEncodeInvalidInteger);
    }

    #[test]
    fn test_fixed_string_exact_length() {
        let encoded = encode(FieldType::FixedString, 8, "ABCDEFGH").unwrap();
        assert_eq!(encoded.bytes(), b"ABCDEFGH");
        assert!(encoded.elements().is_none());
    }

    #[test]
    fn test_fixed_string_length_mismatch() {
        for raw in ["ABCDEFG", "ABCDEFGHI", ""] {
            let err = encode(FieldType::FixedString, 8, raw).unwrap_err();
            assert_eq!(err.code(), EncodeErrorCode::MibinEncodeLengthMismatch);
        }
    }

    #[test]
    fn test_fixed_string_counts_utf8_bytes() {
        // Two characters, four bytes
        assert!(encode(FieldType::FixedString, 4, "éé").is_ok());
        assert!(encode(FieldType::FixedString, 2, "éé").is_err());
    }

    #[test]
    fn test_decode_rejects_wrong_width() {
        assert_eq!(decode_scalar(FieldType::UnsignedInt32, &[1, 2, 3]), None);
        assert_eq!(decode_scalar(FieldType::FixedString, b"ab"), None);
    }
}
