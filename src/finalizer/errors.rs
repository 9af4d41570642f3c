//! Integrity error types
//!
//! Error codes:
//! - MIBIN_INTEGRITY_SIZE_MISMATCH (FATAL)
//! - MIBIN_INTEGRITY_SIZE_MARKER_MISSING (FATAL)
//! - MIBIN_INTEGRITY_IO_FAILED (FATAL)
//! - MIBIN_INTEGRITY_CHECKSUM_MISMATCH (FATAL, inspection only)
//!
//! A malformed artifact is never deleted by the finalizer. The error
//! carries its path so it can be inspected.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Severity levels for integrity errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The artifact must not be used
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Integrity-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityErrorCode {
    /// Body length disagrees with the size marker
    MibinIntegritySizeMismatch,
    /// No size marker and one is required
    MibinIntegritySizeMarkerMissing,
    /// Artifact could not be read or appended to
    MibinIntegrityIoFailed,
    /// Stored trailer does not match the body
    MibinIntegrityChecksumMismatch,
}

impl IntegrityErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            IntegrityErrorCode::MibinIntegritySizeMismatch => "MIBIN_INTEGRITY_SIZE_MISMATCH",
            IntegrityErrorCode::MibinIntegritySizeMarkerMissing => {
                "MIBIN_INTEGRITY_SIZE_MARKER_MISSING"
            }
            IntegrityErrorCode::MibinIntegrityIoFailed => "MIBIN_INTEGRITY_IO_FAILED",
            IntegrityErrorCode::MibinIntegrityChecksumMismatch => {
                "MIBIN_INTEGRITY_CHECKSUM_MISMATCH"
            }
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

impl fmt::Display for IntegrityErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Integrity error with the artifact it concerns
#[derive(Debug)]
pub struct IntegrityError {
    code: IntegrityErrorCode,
    message: String,
    path: PathBuf,
    source: Option<io::Error>,
}

impl IntegrityError {
    /// Body length disagrees with the size marker
    pub fn size_mismatch(path: &Path, expected_body: Option<u64>, declared: u64, actual: u64) -> Self {
        let message = match expected_body {
            Some(expected) => format!(
                "artifact body is {} bytes, size marker {} requires {}",
                actual, declared, expected
            ),
            None => format!(
                "size marker {} is smaller than the 4-byte trailer (body is {} bytes)",
                declared, actual
            ),
        };
        Self {
            code: IntegrityErrorCode::MibinIntegritySizeMismatch,
            message,
            path: path.to_path_buf(),
            source: None,
        }
    }

    /// Artifact too short to carry a trailer
    pub fn truncated(path: &Path, actual: u64) -> Self {
        Self {
            code: IntegrityErrorCode::MibinIntegritySizeMismatch,
            message: format!("artifact is {} bytes, too short for a 4-byte trailer", actual),
            path: path.to_path_buf(),
            source: None,
        }
    }

    /// No size marker was assembled and one is required
    pub fn size_marker_missing(path: &Path) -> Self {
        Self {
            code: IntegrityErrorCode::MibinIntegritySizeMarkerMissing,
            message: "document has no size marker".to_string(),
            path: path.to_path_buf(),
            source: None,
        }
    }

    /// I/O failure against the artifact
    pub fn io_error_at_path(path: &Path, source: io::Error) -> Self {
        Self {
            code: IntegrityErrorCode::MibinIntegrityIoFailed,
            message: format!("I/O error: {}", source),
            path: path.to_path_buf(),
            source: Some(source),
        }
    }

    /// Stored trailer does not match the recomputed checksum
    pub fn checksum_mismatch(path: &Path, stored: u32, computed: u32) -> Self {
        Self {
            code: IntegrityErrorCode::MibinIntegrityChecksumMismatch,
            message: format!(
                "stored crc32 {:08x} does not match computed {:08x}",
                stored, computed
            ),
            path: path.to_path_buf(),
            source: None,
        }
    }

    pub fn code(&self) -> IntegrityErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Artifact left in place for inspection
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_fatal(&self) -> bool {
        true
    }
}

impl fmt::Display for IntegrityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} ({})",
            self.code.severity(),
            self.code.code(),
            self.message,
            self.path.display()
        )
    }
}

impl std::error::Error for IntegrityError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for finalization
pub type IntegrityResult<T> = Result<T, IntegrityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_code_and_path() {
        let err = IntegrityError::size_mismatch(Path::new("/tmp/a.bin"), Some(13), 17, 17);
        let display = err.to_string();
        assert!(display.starts_with("[FATAL] MIBIN_INTEGRITY_SIZE_MISMATCH"));
        assert!(display.contains("/tmp/a.bin"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_io_error_has_source() {
        use std::error::Error;
        let err = IntegrityError::io_error_at_path(
            Path::new("x"),
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.code().code(), "MIBIN_INTEGRITY_IO_FAILED");
        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "[FATAL] MIBIN_INTEGRITY_IO_FAILED: I/O error: gone (x)",
            "the operator must see the underlying cause"
        );
    }
}
