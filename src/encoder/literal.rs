//! Integer literal parsing shared by scalar and array fields
//!
//! Accepted forms: decimal (`17`) or hexadecimal with a `0x`/`0X` prefix
//! (`0x11`). Surrounding whitespace is ignored. Signs other than a leading
//! `+` are rejected.

use std::num::IntErrorKind;

use super::errors::{EncodeError, EncodeResult};

/// Parses an unsigned integer literal and checks it against `max`.
pub fn parse_integer(raw: &str, max: u64) -> EncodeResult<u64> {
    let text = raw.trim();

    if text.starts_with('-') && text.len() > 1 {
        return Err(EncodeError::out_of_range(raw, max));
    }

    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(digits) => u64::from_str_radix(digits, 16),
        None => text.parse::<u64>(),
    };

    let value = parsed.map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => EncodeError::out_of_range(raw, max),
        _ => EncodeError::invalid_integer(raw),
    })?;

    if value > max {
        return Err(EncodeError::out_of_range(raw, max));
    }

    Ok(value)
}
