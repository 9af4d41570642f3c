//! Length check, checksum and trailer append
//!
//! Steps are strictly ordered:
//! 1. Read the artifact length from disk
//! 2. Compare it against `declared_total_size - 4`
//! 3. Stream the file from disk through CRC32
//! 4. Append the checksum as 4 little-endian bytes and fsync
//!
//! A length mismatch stops before step 3 and leaves the file untouched.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::observability::{log_event_with_fields, Event};

use super::checksum::{compute_file_checksum, trailer_bytes, TRAILER_LEN};
use super::errors::{IntegrityError, IntegrityResult};

/// Outcome of a successful finalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalizeReport {
    /// Length of the body the checksum covers
    pub body_len: u64,
    /// Appended checksum
    pub crc32: u32,
    /// Length after the trailer was appended
    pub final_len: u64,
}

/// Outcome of verifying a finished artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verification {
    pub body_len: u64,
    pub crc32: u32,
}

/// Checks the body length and appends the CRC32 trailer.
///
/// With no size marker the length check is skipped and logged, unless
/// `require_marker` is set, in which case the artifact is rejected.
pub fn finalize(
    path: &Path,
    declared_total_size: Option<u64>,
    require_marker: bool,
) -> IntegrityResult<FinalizeReport> {
    let body_len = artifact_len(path)?;
    let path_str = path.display().to_string();

    match declared_total_size {
        Some(declared) => {
            let expected = declared.checked_sub(TRAILER_LEN);
            if expected != Some(body_len) {
                let err = IntegrityError::size_mismatch(path, expected, declared, body_len);
                let actual = body_len.to_string();
                let declared = declared.to_string();
                log_event_with_fields(
                    Event::IntegrityFailure,
                    &[
                        ("actual", actual.as_str()),
                        ("declared", declared.as_str()),
                        ("path", path_str.as_str()),
                    ],
                );
                return Err(err);
            }
        }
        None if require_marker => {
            log_event_with_fields(
                Event::IntegrityFailure,
                &[("path", path_str.as_str()), ("reason", "size marker missing")],
            );
            return Err(IntegrityError::size_marker_missing(path));
        }
        None => {
            log_event_with_fields(Event::SizeCheckSkipped, &[("path", path_str.as_str())]);
        }
    }

    let crc32 = compute_file_checksum(path, None)?;

    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|e| IntegrityError::io_error_at_path(path, e))?;
    file.write_all(&trailer_bytes(crc32))
        .map_err(|e| IntegrityError::io_error_at_path(path, e))?;
    file.sync_all()
        .map_err(|e| IntegrityError::io_error_at_path(path, e))?;

    let final_len = body_len + TRAILER_LEN;
    let crc = format!("{:08x}", crc32);
    let len = final_len.to_string();
    log_event_with_fields(
        Event::ChecksumAppended,
        &[("crc32", crc.as_str()), ("length", len.as_str())],
    );

    Ok(FinalizeReport {
        body_len,
        crc32,
        final_len,
    })
}

/// Recomputes the checksum of a finished artifact and compares it with
/// its trailer.
pub fn verify_artifact(path: &Path) -> IntegrityResult<Verification> {
    let len = artifact_len(path)?;
    if len < TRAILER_LEN {
        return Err(IntegrityError::truncated(path, len));
    }
    let body_len = len - TRAILER_LEN;

    let mut trailer = [0u8; 4];
    let mut file = File::open(path).map_err(|e| IntegrityError::io_error_at_path(path, e))?;
    file.seek(SeekFrom::Start(body_len))
        .and_then(|_| file.read_exact(&mut trailer))
        .map_err(|e| IntegrityError::io_error_at_path(path, e))?;
    drop(file);

    let stored = u32::from_le_bytes(trailer);
    let computed = compute_file_checksum(path, Some(body_len))?;
    if stored != computed {
        return Err(IntegrityError::checksum_mismatch(path, stored, computed));
    }

    Ok(Verification {
        body_len,
        crc32: computed,
    })
}

fn artifact_len(path: &Path) -> IntegrityResult<u64> {
    fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| IntegrityError::io_error_at_path(path, e))
}
