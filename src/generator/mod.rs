//! Generation pipeline for mibin
//!
//! Wires the collector, assembler and finalizer into one sequential run
//! and owns artifact placement: date-stamped output folder, staging file,
//! rename into place.

mod errors;
mod pipeline;

pub use errors::{GenerateError, GenerateResult};
pub use pipeline::{
    artifact_name, build_artifact, generate, modified_path, pack, GenerateRequest,
    GenerationOutcome, PackOutcome,
};
