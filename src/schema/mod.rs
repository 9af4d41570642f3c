//! Schema Registry subsystem for mibin
//!
//! The schema maps every field name to a wire type and a declared size.
//! It is an external table; mibin only reads it.
//!
//! # Design Principles
//!
//! - Built once per run, read-only afterwards
//! - First definition wins
//! - Unknown names and unknown types are fatal, never defaulted

mod errors;
mod loader;
mod types;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use loader::SchemaRegistry;
pub use types::{FieldDescriptor, FieldType};
