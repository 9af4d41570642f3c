//! Record Assembler subsystem for mibin
//!
//! Drives the encoder over a resolved value document, writing the record
//! body into a byte sink and returning an `AssemblyReport` that carries the
//! size marker's value to the finalizer. No state outlives a pass.

mod assembler;
mod errors;

pub use assembler::{assemble, Assembler, AssemblyReport, DEFAULT_SIZE_FIELD};
pub use errors::{AssembleError, AssembleErrorKind, AssembleResult};
