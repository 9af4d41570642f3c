//! Schema type definitions
//!
//! Supported wire types:
//! - uint: 32-bit unsigned, little-endian
//! - byte: 8-bit unsigned
//! - word: 16-bit unsigned, little-endian
//! - array: comma-separated list of bytes, one byte per element
//! - str: UTF-8 bytes of an exact declared length

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Wire type of a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// 4 bytes, little-endian
    UnsignedInt32,
    /// 1 byte
    Byte,
    /// 2 bytes, little-endian
    Word,
    /// One byte per comma-separated element
    ByteArray,
    /// Raw UTF-8 bytes, length must equal the declared size
    FixedString,
}

impl FieldType {
    /// Returns the schema source tag for this type
    pub fn tag(&self) -> &'static str {
        match self {
            FieldType::UnsignedInt32 => "uint",
            FieldType::Byte => "byte",
            FieldType::Word => "word",
            FieldType::ByteArray => "array",
            FieldType::FixedString => "str",
        }
    }

    /// Returns the encoded width of scalar types, `None` for variable ones
    pub fn scalar_width(&self) -> Option<usize> {
        match self {
            FieldType::UnsignedInt32 => Some(4),
            FieldType::Byte => Some(1),
            FieldType::Word => Some(2),
            FieldType::ByteArray | FieldType::FixedString => None,
        }
    }

    /// Returns the largest value a scalar type can hold
    pub fn max_value(&self) -> Option<u64> {
        self.scalar_width().map(|width| (1u64 << (width * 8)) - 1)
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "uint" => Ok(FieldType::UnsignedInt32),
            "byte" => Ok(FieldType::Byte),
            "word" => Ok(FieldType::Word),
            "array" => Ok(FieldType::ByteArray),
            "str" => Ok(FieldType::FixedString),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// One schema row: a field name bound to its wire type and declared size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Unique field name
    pub name: String,
    /// Wire type
    pub field_type: FieldType,
    /// Declared byte size. Authoritative for scalars and strings,
    /// advisory for arrays.
    pub declared_size: u64,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType, declared_size: u64) -> Self {
        Self {
            name: name.into(),
            field_type,
            declared_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_parse_back() {
        for ty in [
            FieldType::UnsignedInt32,
            FieldType::Byte,
            FieldType::Word,
            FieldType::ByteArray,
            FieldType::FixedString,
        ] {
            assert_eq!(ty.tag().parse::<FieldType>(), Ok(ty));
        }
    }

    #[test]
    fn test_unknown_tag_rejected() {
        assert_eq!("float".parse::<FieldType>(), Err("float".to_string()));
        // Tags are case-sensitive
        assert!("UINT".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_scalar_ranges() {
        assert_eq!(FieldType::Byte.max_value(), Some(0xFF));
        assert_eq!(FieldType::Word.max_value(), Some(0xFFFF));
        assert_eq!(FieldType::UnsignedInt32.max_value(), Some(0xFFFF_FFFF));
        assert_eq!(FieldType::ByteArray.max_value(), None);
        assert_eq!(FieldType::FixedString.scalar_width(), None);
    }
}
