//! Pipeline errors

use std::path::PathBuf;

use thiserror::Error;

use crate::assembler::AssembleError;
use crate::collector::CollectError;
use crate::config::ConfigError;
use crate::document::DocumentError;
use crate::finalizer::IntegrityError;
use crate::schema::SchemaError;

/// Result type for a generation run
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Any failure that ends a generation run
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Settings error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Collection error: {0}")]
    Collect(#[from] CollectError),

    #[error(transparent)]
    Assemble(#[from] AssembleError),

    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    #[error("Naming section '{section}' has no first field to name the artifact")]
    NamingFieldMissing { section: String },

    #[error("Artifact name '{name}' is not a plain file name")]
    InvalidArtifactName { name: String },

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenerateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerateError::Io {
            path: path.into(),
            source,
        }
    }

    /// Stable string code for the failure
    pub fn code(&self) -> &'static str {
        match self {
            GenerateError::Config(_) => "MIBIN_CONFIG_INVALID",
            GenerateError::Schema(e) => e.code().code(),
            GenerateError::Document(_) => "MIBIN_DOCUMENT_INVALID",
            GenerateError::Collect(CollectError::RetriesExhausted { .. }) => {
                "MIBIN_COLLECT_RETRIES_EXHAUSTED"
            }
            GenerateError::Collect(CollectError::Cancelled { .. }) => "MIBIN_COLLECT_CANCELLED",
            GenerateError::Collect(CollectError::Document(_)) => "MIBIN_DOCUMENT_INVALID",
            GenerateError::Assemble(e) => e.code(),
            GenerateError::Integrity(e) => e.code().code(),
            GenerateError::NamingFieldMissing { .. } => "MIBIN_GENERATE_NAMING_FIELD_MISSING",
            GenerateError::InvalidArtifactName { .. } => "MIBIN_GENERATE_INVALID_ARTIFACT_NAME",
            GenerateError::Io { .. } => "MIBIN_GENERATE_IO_FAILED",
        }
    }
}
