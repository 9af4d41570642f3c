//! Integrity Finalizer subsystem for mibin
//!
//! Confirms the assembled body on disk has the length its size marker
//! promises, then appends a CRC32 trailer computed from the file as
//! stored. After the trailer is written the artifact is never modified.
//!
//! `verify_artifact` performs the reverse check for inspection.

pub mod checksum;
mod errors;
mod finalizer;

pub use checksum::{compute_checksum, compute_file_checksum, TRAILER_LEN};
pub use errors::{IntegrityError, IntegrityErrorCode, IntegrityResult, Severity};
pub use finalizer::{finalize, verify_artifact, FinalizeReport, Verification};
