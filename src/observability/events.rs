//! Observable pipeline events
//!
//! Events are explicit and typed; the string form is what appears in the
//! `event` key of a log line.

use std::fmt;

/// Observable events in a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Inputs
    /// Settings file loaded and validated
    SettingsLoaded,
    /// Schema registry built
    SchemaLoaded,
    /// Value document parsed
    DocumentLoaded,

    // Collection
    /// A value was accepted for a field
    FieldCollected,
    /// A value was rejected and a retry consumed
    FieldRejected,
    /// Reserved fields forced to their fill values
    ReservedFieldsNormalized,
    /// Resolved document written and synced
    DocumentPersisted,
    /// Appending to the audit trail failed
    AuditWriteFailed,

    // Assembly
    /// One field encoded and written
    FieldPacked,
    /// All fields packed
    AssemblyComplete,

    // Finalization
    /// No size marker present, length comparison skipped
    SizeCheckSkipped,
    /// CRC32 trailer appended
    ChecksumAppended,
    /// Artifact moved into its final location
    ArtifactReady,
    /// Artifact length disagrees with the size marker (FATAL)
    IntegrityFailure,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::SettingsLoaded => "SETTINGS_LOADED",
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::DocumentLoaded => "DOCUMENT_LOADED",

            Event::FieldCollected => "FIELD_COLLECTED",
            Event::FieldRejected => "FIELD_REJECTED",
            Event::ReservedFieldsNormalized => "RESERVED_FIELDS_NORMALIZED",
            Event::DocumentPersisted => "DOCUMENT_PERSISTED",
            Event::AuditWriteFailed => "AUDIT_WRITE_FAILED",

            Event::FieldPacked => "FIELD_PACKED",
            Event::AssemblyComplete => "ASSEMBLY_COMPLETE",

            Event::SizeCheckSkipped => "SIZE_CHECK_SKIPPED",
            Event::ChecksumAppended => "CHECKSUM_APPENDED",
            Event::ArtifactReady => "ARTIFACT_READY",
            Event::IntegrityFailure => "INTEGRITY_FAILURE",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::IntegrityFailure)
    }

    /// Events that report something skipped or rejected but not fatal
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Event::FieldRejected | Event::SizeCheckSkipped | Event::AuditWriteFailed
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
