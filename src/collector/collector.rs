//! Bounded-retry value collection
//!
//! For each dynamic field:
//! 1. Ask the source for a value
//! 2. Validate it (length for text, range for numeric fields)
//! 3. On rejection, consume one attempt and ask again
//! 4. After the last failed attempt, stop the whole fill
//!
//! Accepted values in audited sections are appended to the audit trail as
//! they arrive. Audit failures are logged and otherwise ignored.

use crate::config::Settings;
use crate::document::{DocumentError, ValueDocument};
use crate::observability::{log_event_with_fields, AuditTrail, Event};

use super::errors::{CollectError, CollectResult, ValidationError};
use super::source::{FieldKind, FieldRequest, Response, ValueSource};

/// Outcome of a successful fill
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionSummary {
    /// Values accepted from the source
    pub collected: usize,
    /// Values written to the audit trail
    pub audited: usize,
    /// Audit writes that failed
    pub audit_failures: usize,
}

/// Drives a `ValueSource` through the dynamic fields of a document.
pub struct Collector<'a> {
    settings: &'a Settings,
    source: &'a mut dyn ValueSource,
    audit: Option<&'a dyn AuditTrail>,
}

impl<'a> Collector<'a> {
    pub fn new(settings: &'a Settings, source: &'a mut dyn ValueSource) -> Self {
        Self {
            settings,
            source,
            audit: None,
        }
    }

    /// Attach an audit trail for the configured audit sections.
    pub fn with_audit(mut self, audit: &'a dyn AuditTrail) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Validation rule for `field`, given its size limit from the document.
    pub fn kind_for(&self, field: &str, max_size: usize) -> FieldKind {
        match self.settings.numeric_fields.get(field) {
            Some(range) => FieldKind::Numeric {
                min: range.min,
                max: range.max,
            },
            None => FieldKind::Text { max_size },
        }
    }

    /// Collects one value, retrying up to the configured budget.
    pub fn collect(&mut self, section: &str, field: &str, kind: FieldKind) -> CollectResult<String> {
        let max_attempts = self.settings.max_retries;
        let hint = self.settings.format_hints.get(field).map(String::as_str);

        for attempt in 1..=max_attempts {
            let request = FieldRequest {
                section,
                field,
                kind,
                hint,
                attempt,
                max_attempts,
            };

            let input = match self.source.request(&request) {
                Response::Value(input) => input,
                Response::Cancel => {
                    return Err(CollectError::Cancelled {
                        field: field.to_string(),
                    })
                }
            };

            match validate(field, kind, &input) {
                Ok(value) => return Ok(value),
                Err(reason) => {
                    let attempt_str = attempt.to_string();
                    let reason_str = reason.to_string();
                    log_event_with_fields(
                        Event::FieldRejected,
                        &[
                            ("attempt", attempt_str.as_str()),
                            ("field", field),
                            ("reason", reason_str.as_str()),
                        ],
                    );
                    self.source.rejected(&request, &reason);
                }
            }
        }

        Err(CollectError::RetriesExhausted {
            field: field.to_string(),
            attempts: max_attempts,
        })
    }

    /// Fills every dynamic section of `doc` in place.
    ///
    /// Before the fill, each dynamic entry's value is that field's size
    /// limit. Reserved fields are skipped; see `normalize_reserved`.
    pub fn fill(&mut self, doc: &mut ValueDocument) -> CollectResult<CollectionSummary> {
        let mut summary = CollectionSummary::default();
        let settings = self.settings;

        for section_name in &settings.dynamic_sections {
            let entries: Vec<(String, String)> = doc
                .section(section_name)
                .ok_or_else(|| DocumentError::SectionNotFound(section_name.clone()))?
                .iter()
                .filter(|(field, _)| !settings.is_reserved(section_name, field))
                .map(|(field, limit)| (field.to_string(), limit.to_string()))
                .collect();

            let terminator = settings.audit_sections.get(section_name).copied();

            for (field, limit) in entries {
                let kind = if settings.numeric_fields.contains_key(&field) {
                    self.kind_for(&field, 0)
                } else {
                    let max_size = limit.trim().parse::<usize>().map_err(|_| {
                        DocumentError::InvalidSizeLimit {
                            section: section_name.clone(),
                            field: field.clone(),
                            value: limit.clone(),
                        }
                    })?;
                    self.kind_for(&field, max_size)
                };

                let value = self.collect(section_name, &field, kind)?;
                log_event_with_fields(
                    Event::FieldCollected,
                    &[
                        ("field", field.as_str()),
                        ("section", section_name.as_str()),
                        ("value", value.as_str()),
                    ],
                );

                if let (Some(terminator), Some(audit)) = (terminator, self.audit) {
                    match audit.record(&value, terminator) {
                        Ok(()) => summary.audited += 1,
                        Err(e) => {
                            summary.audit_failures += 1;
                            let error = e.to_string();
                            log_event_with_fields(
                                Event::AuditWriteFailed,
                                &[("error", error.as_str()), ("field", field.as_str())],
                            );
                        }
                    }
                }

                if let Some(section) = doc.section_mut(section_name) {
                    section.set(field, value);
                }
                summary.collected += 1;
            }
        }

        Ok(summary)
    }
}

/// Checks one input against its rule, returning the value to store.
pub fn validate(field: &str, kind: FieldKind, input: &str) -> Result<String, ValidationError> {
    match kind {
        FieldKind::Text { max_size } => {
            if input.len() > max_size {
                return Err(ValidationError::TooLong {
                    field: field.to_string(),
                    len: input.len(),
                    max: max_size,
                });
            }
            Ok(input.to_string())
        }
        FieldKind::Numeric { min, max } => {
            let trimmed = input.trim();
            let value: i64 = trimmed.parse().map_err(|_| ValidationError::NotNumeric {
                field: field.to_string(),
                value: input.to_string(),
            })?;
            if value < min || value > max {
                return Err(ValidationError::OutOfRange {
                    field: field.to_string(),
                    value,
                    min,
                    max,
                });
            }
            Ok(trimmed.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::ScriptedSource;
    use crate::document::Section;
    use crate::observability::{AuditTerminator, MemoryAuditTrail};
    use std::collections::BTreeMap;
    use std::io;

    fn settings_for(sections: &[&str]) -> Settings {
        let mut audit_sections = BTreeMap::new();
        audit_sections.insert(sections[sections.len() - 1].to_string(), AuditTerminator::Newline);
        Settings {
            dynamic_sections: sections.iter().map(|s| s.to_string()).collect(),
            audit_sections,
            reserved_fields: Vec::new(),
            ..Settings::default()
        }
    }

    #[test]
    fn test_validate_text_length_in_bytes() {
        assert_eq!(validate("s", FieldKind::Text { max_size: 4 }, "ABCD"), Ok("ABCD".into()));
        assert!(validate("s", FieldKind::Text { max_size: 4 }, "ABCDE").is_err());
        // Three characters, six bytes
        assert!(validate("s", FieldKind::Text { max_size: 4 }, "ééé").is_err());
        assert_eq!(validate("s", FieldKind::Text { max_size: 4 }, ""), Ok(String::new()));
    }

    #[test]
    fn test_validate_numeric() {
        let kind = FieldKind::Numeric { min: 0, max: 255 };
        assert_eq!(validate("brd_ver", kind, " 7 "), Ok("7".into()));
        assert_eq!(validate("brd_ver", kind, "255"), Ok("255".into()));
        assert!(matches!(
            validate("brd_ver", kind, "256"),
            Err(ValidationError::OutOfRange { value: 256, .. })
        ));
        assert!(matches!(
            validate("brd_ver", kind, "-1"),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate("brd_ver", kind, "v2"),
            Err(ValidationError::NotNumeric { .. })
        ));
    }

    #[test]
    fn test_retry_then_accept() {
        let settings = Settings::default();
        let mut source = ScriptedSource::from_values(["TOOLONG", "OK"]);
        let mut collector = Collector::new(&settings, &mut source);

        let value = collector
            .collect("cm_content", "serial", FieldKind::Text { max_size: 4 })
            .unwrap();
        assert_eq!(value, "OK");
        drop(collector);
        assert_eq!(source.served(), 2);
        assert_eq!(source.rejections(), 1);
    }

    #[test]
    fn test_retries_exhausted_stops_asking() {
        let settings = Settings::default();
        let mut source = ScriptedSource::from_values(["ABCDE", "ABCDE", "ABCDE", "ABCD"]);
        let mut collector = Collector::new(&settings, &mut source);

        let err = collector
            .collect("cm_content", "serial", FieldKind::Text { max_size: 4 })
            .unwrap_err();
        assert!(matches!(err, CollectError::RetriesExhausted { attempts: 3, .. }));
        drop(collector);
        assert_eq!(source.served(), 3, "no fourth request may be issued");
        assert_eq!(source.remaining(), 1);
    }

    #[test]
    fn test_cancel_is_fatal() {
        let settings = Settings::default();
        let mut source = ScriptedSource::new();
        let mut collector = Collector::new(&settings, &mut source);
        let err = collector
            .collect("cm_content", "serial", FieldKind::Text { max_size: 4 })
            .unwrap_err();
        assert!(matches!(err, CollectError::Cancelled { .. }));
    }

    #[test]
    fn test_fill_sets_values_and_audits() {
        let settings = settings_for(&["dyn_a", "dyn_b"]);
        let mut doc = ValueDocument::new()
            .with_section(Section::new("static").with("id", "1"))
            .with_section(Section::new("dyn_a").with("serial", "6").with("brd_ver", "1"))
            .with_section(Section::new("dyn_b").with("fazit", "4"));

        let mut source = ScriptedSource::from_values(["SN0001", "12", "FZ01"]);
        let audit = MemoryAuditTrail::new();
        let summary = Collector::new(&settings, &mut source)
            .with_audit(&audit)
            .fill(&mut doc)
            .unwrap();

        assert_eq!(summary.collected, 3);
        assert_eq!(summary.audited, 1);
        assert_eq!(doc.section("dyn_a").unwrap().get("serial"), Some("SN0001"));
        assert_eq!(doc.section("dyn_a").unwrap().get("brd_ver"), Some("12"));
        assert_eq!(doc.section("dyn_b").unwrap().get("fazit"), Some("FZ01"));
        assert_eq!(doc.section("static").unwrap().get("id"), Some("1"));
        assert_eq!(audit.contents(), "FZ01\n");
    }

    #[test]
    fn test_fill_skips_reserved_fields() {
        let mut settings = settings_for(&["dyn_a"]);
        settings.reserved_fields = vec![crate::config::ReservedField::new("dyn_a", "reserved", "0")];
        let mut doc =
            ValueDocument::new().with_section(Section::new("dyn_a").with("serial", "4").with("reserved", "4"));

        let mut source = ScriptedSource::from_values(["SN01"]);
        let summary = Collector::new(&settings, &mut source).fill(&mut doc).unwrap();
        assert_eq!(summary.collected, 1);
        assert_eq!(source.served(), 1);
        // Left for the normalization pass
        assert_eq!(doc.section("dyn_a").unwrap().get("reserved"), Some("4"));
    }

    #[test]
    fn test_fill_missing_section_is_error() {
        let settings = settings_for(&["dyn_a"]);
        let mut doc = ValueDocument::new();
        let mut source = ScriptedSource::new();
        let err = Collector::new(&settings, &mut source).fill(&mut doc).unwrap_err();
        assert!(matches!(err, CollectError::Document(DocumentError::SectionNotFound(_))));
    }

    #[test]
    fn test_fill_bad_size_limit_is_error() {
        let settings = settings_for(&["dyn_a"]);
        let mut doc = ValueDocument::new().with_section(Section::new("dyn_a").with("serial", "eight"));
        let mut source = ScriptedSource::from_values(["x"]);
        let err = Collector::new(&settings, &mut source).fill(&mut doc).unwrap_err();
        assert!(matches!(
            err,
            CollectError::Document(DocumentError::InvalidSizeLimit { .. })
        ));
        assert_eq!(source.served(), 0);
    }

    struct BrokenTrail;

    impl AuditTrail for BrokenTrail {
        fn record(&self, _value: &str, _terminator: AuditTerminator) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
    }

    #[test]
    fn test_audit_failure_does_not_block_collection() {
        let settings = settings_for(&["dyn_a"]);
        let mut doc = ValueDocument::new()
            .with_section(Section::new("dyn_a").with("serial", "4").with("lot", "4"));
        let mut source = ScriptedSource::from_values(["SN01", "LT02"]);

        let summary = Collector::new(&settings, &mut source)
            .with_audit(&BrokenTrail)
            .fill(&mut doc)
            .unwrap();
        assert_eq!(summary.collected, 2);
        assert_eq!(summary.audit_failures, 2);
        assert_eq!(doc.section("dyn_a").unwrap().get("lot"), Some("LT02"));
    }
}
