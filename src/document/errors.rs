//! Value document errors

use thiserror::Error;

/// Result type for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Value document errors
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Line {line}: entry outside of any section")]
    EntryOutsideSection { line: usize },

    #[error("Line {line}: malformed section header '{header}'")]
    MalformedSection { line: usize, header: String },

    #[error("Line {line}: duplicate section '{section}'")]
    DuplicateSection { line: usize, section: String },

    #[error("Line {line}: duplicate key '{key}' in section '{section}'")]
    DuplicateKey {
        line: usize,
        section: String,
        key: String,
    },

    #[error("Line {line}: empty key")]
    EmptyKey { line: usize },

    #[error("Section '{0}' not found")]
    SectionNotFound(String),

    #[error("Field '{field}' in section '{section}': size limit '{value}' is not an integer")]
    InvalidSizeLimit {
        section: String,
        field: String,
        value: String,
    },

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl DocumentError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        DocumentError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
