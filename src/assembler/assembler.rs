//! Record assembly: schema lookup, encode, write, account
//!
//! Sections are walked in document order and fields in insertion order.
//! For each field:
//! 1. Resolve its descriptor (unknown names abort)
//! 2. Encode the raw value (failures abort)
//! 3. Write the bytes to the sink
//! 4. Add the descriptor's declared size to the running total
//!
//! The running total sums declared sizes, not bytes written, so an array
//! field counts its schema size whatever its element count. The size
//! marker's own value is captured separately and returned in the report.

use std::io::Write;

use crate::document::ValueDocument;
use crate::encoder::{decode_scalar, encode};
use crate::observability::{log_event_with_fields, trace_event, Event};
use crate::schema::SchemaRegistry;

use super::errors::{AssembleError, AssembleErrorKind, AssembleResult};

/// Conventional name of the size marker field.
pub const DEFAULT_SIZE_FIELD: &str = "size";

/// Result of a successful assembly pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyReport {
    /// Fields packed
    pub field_count: usize,
    /// Sum of schema-declared sizes of all packed fields
    pub cumulative_declared_size: u64,
    /// Bytes actually written to the sink
    pub bytes_written: u64,
    /// Value of the size marker, if the document has one
    pub declared_total_size: Option<u64>,
    /// Decoded elements of every array field, in packing order
    pub byte_arrays: Vec<(String, Vec<u8>)>,
}

/// Packs value documents against one schema.
#[derive(Debug, Clone)]
pub struct Assembler<'a> {
    registry: &'a SchemaRegistry,
    size_field: &'a str,
}

impl<'a> Assembler<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            size_field: DEFAULT_SIZE_FIELD,
        }
    }

    /// Use a different field name as the size marker.
    pub fn with_size_field(mut self, size_field: &'a str) -> Self {
        self.size_field = size_field;
        self
    }

    /// Encodes every field of `doc` into `sink`.
    ///
    /// On error, whatever was already written stays in the sink.
    pub fn assemble<W: Write>(&self, doc: &ValueDocument, sink: &mut W) -> AssembleResult<AssemblyReport> {
        let mut report = AssemblyReport::default();

        for section in doc.sections() {
            for (field, raw_value) in section.iter() {
                let fail = |kind| AssembleError::new(section.name(), field, kind);

                let descriptor = self
                    .registry
                    .resolve(field)
                    .map_err(|e| fail(AssembleErrorKind::Schema(e)))?;

                let encoded = encode(descriptor.field_type, descriptor.declared_size, raw_value)
                    .map_err(|e| fail(AssembleErrorKind::Encode(e)))?;

                let size_value = if field == self.size_field {
                    if report.declared_total_size.is_some() {
                        return Err(fail(AssembleErrorKind::DuplicateSizeMarker));
                    }
                    let value = decode_scalar(descriptor.field_type, encoded.bytes())
                        .ok_or_else(|| fail(AssembleErrorKind::SizeMarkerNotScalar))?;
                    Some(value)
                } else {
                    None
                };

                sink.write_all(encoded.bytes())
                    .map_err(|e| fail(AssembleErrorKind::Io(e)))?;

                if let Some(elements) = encoded.elements() {
                    report.byte_arrays.push((field.to_string(), elements.to_vec()));
                }
                if size_value.is_some() {
                    report.declared_total_size = size_value;
                }

                report.bytes_written += encoded.len() as u64;
                report.cumulative_declared_size += descriptor.declared_size;
                report.field_count += 1;

                let bytes = encoded.len().to_string();
                trace_event(
                    Event::FieldPacked,
                    &[
                        ("bytes", bytes.as_str()),
                        ("field", field),
                        ("type", descriptor.field_type.tag()),
                    ],
                );
            }
        }

        sink.flush()
            .map_err(|e| AssembleError::new("", "", AssembleErrorKind::Io(e)))?;

        let field_count = report.field_count.to_string();
        let declared = report.cumulative_declared_size.to_string();
        let written = report.bytes_written.to_string();
        let marker = report
            .declared_total_size
            .map(|v| v.to_string())
            .unwrap_or_else(|| "absent".to_string());
        log_event_with_fields(
            Event::AssemblyComplete,
            &[
                ("bytes_written", written.as_str()),
                ("declared_size", declared.as_str()),
                ("field_count", field_count.as_str()),
                ("size_marker", marker.as_str()),
            ],
        );

        Ok(report)
    }
}

/// Assembles `doc` with the conventional `size` marker.
pub fn assemble<W: Write>(
    doc: &ValueDocument,
    registry: &SchemaRegistry,
    sink: &mut W,
) -> AssembleResult<AssemblyReport> {
    Assembler::new(registry).assemble(doc, sink)
}
