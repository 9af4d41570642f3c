//! Encoder error types
//!
//! Error codes:
//! - MIBIN_ENCODE_INVALID_INTEGER
//! - MIBIN_ENCODE_OUT_OF_RANGE
//! - MIBIN_ENCODE_LENGTH_MISMATCH
//!
//! An encode error is fatal to the assembly pass that raised it. The
//! in-progress artifact must be discarded by the caller.

use std::fmt;

/// Encoder error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeErrorCode {
    /// Value is not a decimal or `0x`-prefixed hexadecimal integer
    MibinEncodeInvalidInteger,
    /// Integer does not fit the field's bit width
    MibinEncodeOutOfRange,
    /// Fixed string byte length differs from the declared size
    MibinEncodeLengthMismatch,
}

impl EncodeErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            EncodeErrorCode::MibinEncodeInvalidInteger => "MIBIN_ENCODE_INVALID_INTEGER",
            EncodeErrorCode::MibinEncodeOutOfRange => "MIBIN_ENCODE_OUT_OF_RANGE",
            EncodeErrorCode::MibinEncodeLengthMismatch => "MIBIN_ENCODE_LENGTH_MISMATCH",
        }
    }
}

impl fmt::Display for EncodeErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Encoder error with the offending raw value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeError {
    code: EncodeErrorCode,
    message: String,
    value: String,
}

impl EncodeError {
    /// Value could not be parsed as an integer literal
    pub fn invalid_integer(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            code: EncodeErrorCode::MibinEncodeInvalidInteger,
            message: format!("'{}' is not a decimal or 0x-prefixed integer", value),
            value,
        }
    }

    /// Integer exceeds the type's maximum
    pub fn out_of_range(value: impl Into<String>, max: u64) -> Self {
        let value = value.into();
        Self {
            code: EncodeErrorCode::MibinEncodeOutOfRange,
            message: format!("'{}' is outside the range [0, {}]", value, max),
            value,
        }
    }

    /// Fixed string does not match its declared byte length
    pub fn length_mismatch(value: impl Into<String>, expected: u64, actual: usize) -> Self {
        let value = value.into();
        Self {
            code: EncodeErrorCode::MibinEncodeLengthMismatch,
            message: format!(
                "'{}' encodes to {} bytes, declared size is {}",
                value, actual, expected
            ),
            value,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> EncodeErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the raw value that failed to encode
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for EncodeError {}

/// Result type for encoder operations
pub type EncodeResult<T> = Result<T, EncodeError>;
