//! Observability subsystem for mibin
//!
//! Provides:
//! - Structured logging (JSON lines)
//! - Typed pipeline events
//! - Stage scopes
//! - The operator audit trail
//!
//! # Principles
//!
//! 1. Observability is read-only with respect to the record being built
//! 2. A logging or audit failure never changes the outcome of a run
//! 3. Synchronous, no background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use mibin::observability::{log_event_with_fields, Event, StageScope};
//!
//! log_event_with_fields(Event::FieldPacked, &[("field", "size")]);
//!
//! let scope = StageScope::new("FINALIZE");
//! // ... do work ...
//! scope.complete(&[]);
//! ```

mod events;
mod logger;
mod scope;
pub mod audit;

pub use audit::{AuditTerminator, AuditTrail, FileAuditTrail, MemoryAuditTrail};
pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::StageScope;

fn severity_for(event: Event) -> Severity {
    if event.is_fatal() {
        Severity::Fatal
    } else if event.is_warning() {
        Severity::Warn
    } else {
        Severity::Info
    }
}

/// Log a pipeline event
pub fn log_event(event: Event) {
    Logger::log(severity_for(event), event.as_str(), &[]);
}

/// Log a pipeline event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_for(event), event.as_str(), fields);
}

/// Log a per-field event at TRACE level
pub fn trace_event(event: Event, fields: &[(&str, &str)]) {
    Logger::trace(event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_mapping() {
        assert_eq!(severity_for(Event::IntegrityFailure), Severity::Fatal);
        assert_eq!(severity_for(Event::FieldRejected), Severity::Warn);
        assert_eq!(severity_for(Event::ArtifactReady), Severity::Info);
    }

    #[test]
    fn test_log_event() {
        log_event(Event::SchemaLoaded);
        log_event_with_fields(Event::ChecksumAppended, &[("crc32", "0xdeadbeef")]);
        trace_event(Event::FieldPacked, &[("field", "id")]);
    }
}
