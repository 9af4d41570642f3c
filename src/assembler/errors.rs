//! Assembly error types
//!
//! Every assembly error is fatal to the pass. Bytes already written to the
//! sink are not rolled back; the caller discards the partial artifact.

use std::fmt;
use std::io;

use crate::encoder::EncodeError;
use crate::schema::SchemaError;

/// What went wrong while packing a field
#[derive(Debug)]
pub enum AssembleErrorKind {
    /// Field name did not resolve in the schema
    Schema(SchemaError),
    /// Value could not be encoded for its type
    Encode(EncodeError),
    /// The size marker appeared a second time
    DuplicateSizeMarker,
    /// The size marker is typed as an array or a string
    SizeMarkerNotScalar,
    /// The sink rejected a write
    Io(io::Error),
}

/// Assembly error with the field that caused it
#[derive(Debug)]
pub struct AssembleError {
    section: String,
    field: String,
    kind: AssembleErrorKind,
}

impl AssembleError {
    pub fn new(section: impl Into<String>, field: impl Into<String>, kind: AssembleErrorKind) -> Self {
        Self {
            section: section.into(),
            field: field.into(),
            kind,
        }
    }

    /// Stable string code
    pub fn code(&self) -> &'static str {
        match &self.kind {
            AssembleErrorKind::Schema(e) => e.code().code(),
            AssembleErrorKind::Encode(e) => e.code().code(),
            AssembleErrorKind::DuplicateSizeMarker => "MIBIN_ASSEMBLE_DUPLICATE_SIZE_MARKER",
            AssembleErrorKind::SizeMarkerNotScalar => "MIBIN_ASSEMBLE_SIZE_MARKER_NOT_SCALAR",
            AssembleErrorKind::Io(_) => "MIBIN_ASSEMBLE_IO_FAILED",
        }
    }

    pub fn kind(&self) -> &AssembleErrorKind {
        &self.kind
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// True when the document and schema do not match
    pub fn is_schema_error(&self) -> bool {
        matches!(self.kind, AssembleErrorKind::Schema(_))
    }

    /// True when a value failed to encode
    pub fn is_encode_error(&self) -> bool {
        matches!(self.kind, AssembleErrorKind::Encode(_))
    }
}

impl fmt::Display for AssembleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            AssembleErrorKind::Schema(e) => write!(f, "{}", e)?,
            AssembleErrorKind::Encode(e) => write!(f, "[FATAL] {}", e)?,
            AssembleErrorKind::DuplicateSizeMarker => {
                write!(f, "[FATAL] {}: size marker defined more than once", self.code())?
            }
            AssembleErrorKind::SizeMarkerNotScalar => {
                write!(f, "[FATAL] {}: size marker must be an integer field", self.code())?
            }
            AssembleErrorKind::Io(e) => write!(f, "[FATAL] {}: {}", self.code(), e)?,
        }
        write!(f, " (section '{}', field '{}')", self.section, self.field)
    }
}

impl std::error::Error for AssembleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            AssembleErrorKind::Schema(e) => Some(e),
            AssembleErrorKind::Encode(e) => Some(e),
            AssembleErrorKind::Io(e) => Some(e),
            AssembleErrorKind::DuplicateSizeMarker | AssembleErrorKind::SizeMarkerNotScalar => None,
        }
    }
}

/// Result type for assembly
pub type AssembleResult<T> = Result<T, AssembleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_pass_through() {
        let err = AssembleError::new(
            "header",
            "serial",
            AssembleErrorKind::Schema(SchemaError::unknown_field("serial")),
        );
        assert_eq!(err.code(), "MIBIN_SCHEMA_UNKNOWN_FIELD");
        assert!(err.is_schema_error());

        let display = err.to_string();
        assert!(display.contains("section 'header'"));
        assert!(display.contains("field 'serial'"));
    }

    #[test]
    fn test_encode_error_display() {
        let err = AssembleError::new(
            "content",
            "name",
            AssembleErrorKind::Encode(EncodeError::length_mismatch("ABC", 8, 3)),
        );
        assert_eq!(err.code(), "MIBIN_ENCODE_LENGTH_MISMATCH");
        assert!(err.is_encode_error());
        assert!(err.to_string().starts_with("[FATAL] MIBIN_ENCODE_LENGTH_MISMATCH"));
    }
}
