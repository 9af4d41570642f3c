//! CRC32 checksum computation for artifacts
//!
//! Standard CRC-32 (IEEE polynomial, reflected, init and xorout
//! 0xFFFFFFFF) via crc32fast. The trailer is its little-endian encoding.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crc32fast::Hasher;

use super::errors::{IntegrityError, IntegrityResult};

/// Width of the checksum trailer in bytes.
pub const TRAILER_LEN: u64 = 4;

/// Computes a CRC32 checksum over the provided data.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Computes a CRC32 checksum of the first `limit` bytes of a file, or of
/// the whole file when `limit` is `None`.
///
/// Reads the file from disk in chunks; nothing is taken from memory.
pub fn compute_file_checksum(path: &Path, limit: Option<u64>) -> IntegrityResult<u32> {
    let file = File::open(path).map_err(|e| IntegrityError::io_error_at_path(path, e))?;

    let mut reader: Box<dyn Read> = match limit {
        Some(n) => Box::new(BufReader::new(file).take(n)),
        None => Box::new(BufReader::new(file)),
    };
    let mut hasher = Hasher::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| IntegrityError::io_error_at_path(path, e))?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize())
}

/// Trailer bytes for a checksum.
pub fn trailer_bytes(checksum: u32) -> [u8; 4] {
    checksum.to_le_bytes()
}
