//! Schema error types
//!
//! Error codes:
//! - MIBIN_SCHEMA_UNKNOWN_FIELD (FATAL)
//! - MIBIN_SCHEMA_UNKNOWN_TYPE (FATAL)
//! - MIBIN_SCHEMA_MALFORMED (FATAL)
//!
//! Every schema error aborts the run: it means the schema and the value
//! document do not belong together, or the schema itself is corrupt.

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The run must abort
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Field name referenced by the document has no schema row
    MibinSchemaUnknownField,
    /// Schema row carries a type tag outside the supported set
    MibinSchemaUnknownType,
    /// Schema source could not be read or a row is not `name,type,size`
    MibinSchemaMalformed,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::MibinSchemaUnknownField => "MIBIN_SCHEMA_UNKNOWN_FIELD",
            SchemaErrorCode::MibinSchemaUnknownType => "MIBIN_SCHEMA_UNKNOWN_TYPE",
            SchemaErrorCode::MibinSchemaMalformed => "MIBIN_SCHEMA_MALFORMED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with field and source context
#[derive(Debug, Clone)]
pub struct SchemaError {
    /// Error code
    code: SchemaErrorCode,
    /// Human-readable message
    message: String,
    /// Offending field name if applicable
    field: Option<String>,
    /// 1-based line in the schema source if applicable
    line: Option<usize>,
}

impl SchemaError {
    /// Create an unknown field error
    pub fn unknown_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            code: SchemaErrorCode::MibinSchemaUnknownField,
            message: format!("Field '{}' not found in schema", field),
            field: Some(field),
            line: None,
        }
    }

    /// Create an unknown type tag error
    pub fn unknown_type(field: impl Into<String>, tag: impl Into<String>, line: usize) -> Self {
        let field = field.into();
        Self {
            code: SchemaErrorCode::MibinSchemaUnknownType,
            message: format!("Unknown field type '{}' for field '{}'", tag.into(), field),
            field: Some(field),
            line: Some(line),
        }
    }

    /// Create an error for a malformed schema row
    pub fn malformed_row(line: usize, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::MibinSchemaMalformed,
            message: format!("Malformed schema row: {}", reason.into()),
            field: None,
            line: Some(line),
        }
    }

    /// Create an error for an unreadable schema source
    pub fn malformed_source(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::MibinSchemaMalformed,
            message: format!("Cannot read schema '{}': {}", path.into(), reason.into()),
            field: None,
            line: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending field name if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns the schema source line if applicable
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Schema errors always abort the run
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)?;
        if let Some(line) = self.line {
            write!(f, " (line {})", line)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::MibinSchemaUnknownField.code(), "MIBIN_SCHEMA_UNKNOWN_FIELD");
        assert_eq!(SchemaErrorCode::MibinSchemaUnknownType.code(), "MIBIN_SCHEMA_UNKNOWN_TYPE");
        assert_eq!(SchemaErrorCode::MibinSchemaMalformed.code(), "MIBIN_SCHEMA_MALFORMED");
    }

    #[test]
    fn test_all_schema_errors_are_fatal() {
        assert!(SchemaError::unknown_field("id").is_fatal());
        assert!(SchemaError::unknown_type("id", "float", 3).is_fatal());
        assert!(SchemaError::malformed_row(1, "missing size").is_fatal());
    }

    #[test]
    fn test_display_names_field_and_line() {
        let err = SchemaError::unknown_type("brd_ver", "float", 7);
        let display = format!("{}", err);
        assert!(display.contains("MIBIN_SCHEMA_UNKNOWN_TYPE"));
        assert!(display.contains("FATAL"));
        assert!(display.contains("brd_ver"));
        assert!(display.contains("float"));
        assert!(display.contains("line 7"));
    }

    #[test]
    fn test_unknown_field_keeps_name() {
        let err = SchemaError::unknown_field("serial");
        assert_eq!(err.field(), Some("serial"));
        assert!(err.line().is_none());
    }
}
