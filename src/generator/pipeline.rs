//! The generation pipeline
//!
//! collect -> normalize reserved -> persist modified document -> reload ->
//! assemble into a staging file -> finalize -> rename into place.
//!
//! Each stage completes before the next begins. The artifact only appears
//! at its final path once its trailer has been written, so a cancelled or
//! failed run never leaves a half-built file under the artifact's name.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::assembler::{Assembler, AssemblyReport};
use crate::collector::{normalize_reserved, CollectionSummary, Collector, ValueSource};
use crate::config::Settings;
use crate::document::{ini, ValueDocument};
use crate::finalizer::{finalize, FinalizeReport};
use crate::observability::{log_event_with_fields, Event, FileAuditTrail, StageScope};
use crate::schema::SchemaRegistry;

use super::errors::{GenerateError, GenerateResult};

/// Inputs of an interactive generation run
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub ini_path: PathBuf,
    pub schema_path: PathBuf,
    pub settings: Settings,
    /// Date stamping the output folder and audit trail
    pub date: NaiveDate,
}

impl GenerateRequest {
    /// A request dated today on the local clock.
    pub fn new(ini_path: impl Into<PathBuf>, schema_path: impl Into<PathBuf>, settings: Settings) -> Self {
        Self {
            ini_path: ini_path.into(),
            schema_path: schema_path.into(),
            settings,
            date: chrono::Local::now().date_naive(),
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// `<output_root>/<YYYYMMDD>`
    pub fn output_dir(&self) -> PathBuf {
        self.settings
            .output_root
            .join(self.date.format("%Y%m%d").to_string())
    }
}

/// Everything a successful generation produced
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub artifact_path: PathBuf,
    pub modified_document_path: PathBuf,
    pub audit_path: PathBuf,
    pub collection: CollectionSummary,
    pub assembly: AssemblyReport,
    pub finalized: FinalizeReport,
}

/// Result of building one artifact from a resolved document
#[derive(Debug, Clone)]
pub struct PackOutcome {
    pub artifact_path: PathBuf,
    pub assembly: AssemblyReport,
    pub finalized: FinalizeReport,
}

/// Runs the full interactive pipeline.
pub fn generate(request: &GenerateRequest, source: &mut dyn ValueSource) -> GenerateResult<GenerationOutcome> {
    let settings = &request.settings;
    let registry = load_schema(&request.schema_path)?;
    let mut doc = load_document(&request.ini_path)?;

    // A modified copy from an earlier run must not outlive a failed collection
    let modified_document_path = modified_path(&request.ini_path);
    remove_if_exists(&modified_document_path)?;

    let out_dir = request.output_dir();
    fs::create_dir_all(&out_dir).map_err(|e| GenerateError::io(&out_dir, e))?;
    let audit = FileAuditTrail::daily(&out_dir, request.date);

    let scope = StageScope::new("COLLECTION");
    let collection = Collector::new(settings, source)
        .with_audit(&audit)
        .fill(&mut doc)?;
    let collected = collection.collected.to_string();
    scope.complete(&[("fields", collected.as_str())]);

    normalize_reserved(&mut doc, &settings.reserved_fields);

    ini::persist_modified(&modified_document_path, &doc)?;
    let persisted = modified_document_path.display().to_string();
    log_event_with_fields(Event::DocumentPersisted, &[("path", persisted.as_str())]);

    // Assembly works from the persisted copy, not the in-memory document
    let resolved = load_document(&modified_document_path)?;
    let name = artifact_name(&resolved, settings)?;
    let target = out_dir.join(&name);
    if target.parent() != Some(out_dir.as_path()) {
        return Err(GenerateError::InvalidArtifactName { name });
    }

    let packed = build_artifact(&resolved, &registry, settings, &target)?;

    Ok(GenerationOutcome {
        artifact_path: packed.artifact_path,
        modified_document_path,
        audit_path: audit.path().to_path_buf(),
        collection,
        assembly: packed.assembly,
        finalized: packed.finalized,
    })
}

/// Builds an artifact from an already resolved document, with no
/// collection step.
pub fn pack(
    ini_path: &Path,
    schema_path: &Path,
    out_path: &Path,
    settings: &Settings,
) -> GenerateResult<PackOutcome> {
    let registry = load_schema(schema_path)?;
    let doc = load_document(ini_path)?;
    build_artifact(&doc, &registry, settings, out_path)
}

/// `<dir>/<stem>_modified.ini` next to the source document.
pub fn modified_path(ini_path: &Path) -> PathBuf {
    let stem = ini_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    ini_path.with_file_name(format!("{}_modified.ini", stem))
}

/// File name of the artifact: the first value of the naming section.
///
/// The value is used as a bare file name inside the output folder; path
/// separators and `.`/`..` are rejected.
pub fn artifact_name(doc: &ValueDocument, settings: &Settings) -> GenerateResult<String> {
    let missing = || GenerateError::NamingFieldMissing {
        section: settings.naming_section.clone(),
    };
    let (_, value) = doc
        .section(&settings.naming_section)
        .and_then(|s| s.first())
        .ok_or_else(missing)?;
    let value = value.trim();
    if value.is_empty() {
        return Err(missing());
    }

    let name = format!("{}.{}", value, settings.artifact_extension);
    let is_plain = |part: &str| part != "." && part != ".." && !part.contains(['/', '\\', '\0']);
    if !is_plain(value) || !is_plain(name.as_str()) {
        return Err(GenerateError::InvalidArtifactName { name });
    }
    Ok(name)
}

/// Assembles `doc` into a staging file next to `target`, finalizes it and
/// renames it onto `target`.
///
/// The staging file is removed if assembly fails and kept if finalization
/// fails, so a malformed body can be inspected.
pub fn build_artifact(
    doc: &ValueDocument,
    registry: &SchemaRegistry,
    settings: &Settings,
    target: &Path,
) -> GenerateResult<PackOutcome> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|e| GenerateError::io(&dir, e))?;
    remove_if_exists(target)?;

    let file_name = target
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let staging = dir.join(format!(".{}.{}.partial", file_name, Uuid::new_v4()));

    let scope = StageScope::new("ASSEMBLY");
    let assembly = match assemble_into(doc, registry, settings, &staging) {
        Ok(report) => report,
        Err(e) => {
            cleanup_staging(&staging);
            return Err(e);
        }
    };
    let written = assembly.bytes_written.to_string();
    scope.complete(&[("bytes", written.as_str())]);

    let scope = StageScope::new("FINALIZE");
    let finalized = finalize(&staging, assembly.declared_total_size, settings.require_size_marker)?;
    let crc = format!("{:08x}", finalized.crc32);
    scope.complete(&[("crc32", crc.as_str())]);

    fs::rename(&staging, target).map_err(|e| GenerateError::io(target, e))?;
    let path = target.display().to_string();
    let length = finalized.final_len.to_string();
    log_event_with_fields(
        Event::ArtifactReady,
        &[("length", length.as_str()), ("path", path.as_str())],
    );

    Ok(PackOutcome {
        artifact_path: target.to_path_buf(),
        assembly,
        finalized,
    })
}

fn assemble_into(
    doc: &ValueDocument,
    registry: &SchemaRegistry,
    settings: &Settings,
    staging: &Path,
) -> GenerateResult<AssemblyReport> {
    let file = File::create(staging).map_err(|e| GenerateError::io(staging, e))?;
    let mut writer = BufWriter::new(file);

    let report = Assembler::new(registry)
        .with_size_field(&settings.size_field)
        .assemble(doc, &mut writer)?;

    writer.flush().map_err(|e| GenerateError::io(staging, e))?;
    let file = writer
        .into_inner()
        .map_err(|e| GenerateError::io(staging, e.into_error()))?;
    file.sync_all().map_err(|e| GenerateError::io(staging, e))?;

    Ok(report)
}

fn load_schema(path: &Path) -> GenerateResult<SchemaRegistry> {
    let registry = SchemaRegistry::load(path)?;
    let fields = registry.len().to_string();
    let shadowed = registry.shadowed_rows().to_string();
    log_event_with_fields(
        Event::SchemaLoaded,
        &[("fields", fields.as_str()), ("shadowed", shadowed.as_str())],
    );
    Ok(registry)
}

fn load_document(path: &Path) -> GenerateResult<ValueDocument> {
    let doc = ini::load(path)?;
    let display = path.display().to_string();
    let fields = doc.field_count().to_string();
    log_event_with_fields(
        Event::DocumentLoaded,
        &[("fields", fields.as_str()), ("path", display.as_str())],
    );
    Ok(doc)
}

fn remove_if_exists(path: &Path) -> GenerateResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(GenerateError::io(path, e)),
    }
}

fn cleanup_staging(path: &Path) {
    // Already on an error path
    let _ = fs::remove_file(path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Section;
    use tempfile::TempDir;

    #[test]
    fn test_modified_path() {
        assert_eq!(
            modified_path(Path::new("/data/board.ini")),
            PathBuf::from("/data/board_modified.ini")
        );
    }

    #[test]
    fn test_artifact_name_from_first_field() {
        let settings = Settings::default();
        let doc = ValueDocument::new().with_section(
            Section::new("oem_content_dynamic_1")
                .with("fazit", "FZ1234")
                .with("serial", "S1"),
        );
        assert_eq!(artifact_name(&doc, &settings).unwrap(), "FZ1234.bin");
    }

    #[test]
    fn test_artifact_name_missing() {
        let settings = Settings::default();
        let doc = ValueDocument::new().with_section(Section::new("oem_content_dynamic_1"));
        assert!(matches!(
            artifact_name(&doc, &settings),
            Err(GenerateError::NamingFieldMissing { .. })
        ));
        assert!(artifact_name(&ValueDocument::new(), &settings).is_err());
    }

    #[test]
    fn test_artifact_name_rejects_path_components() {
        let settings = Settings::default();
        for value in ["../../evil", "sub/board", "..\\board", "..", ".", "/abs"] {
            let doc = ValueDocument::new()
                .with_section(Section::new("oem_content_dynamic_1").with("fazit", value));
            match artifact_name(&doc, &settings) {
                Err(GenerateError::InvalidArtifactName { .. }) => {}
                other => panic!("'{}' must be rejected, got {:?}", value, other),
            }
        }

        let doc = ValueDocument::new()
            .with_section(Section::new("oem_content_dynamic_1").with("fazit", "FZ..42"));
        assert_eq!(artifact_name(&doc, &settings).unwrap(), "FZ..42.bin");
    }

    #[test]
    fn test_output_dir_is_date_stamped() {
        let mut settings = Settings::default();
        settings.output_root = PathBuf::from("/out");
        let request = GenerateRequest::new("a.ini", "s.csv", settings)
            .with_date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(request.output_dir(), PathBuf::from("/out/20240309"));
    }

    #[test]
    fn test_build_artifact_failure_removes_staging() {
        let dir = TempDir::new().unwrap();
        let registry = SchemaRegistry::parse("id,uint,4\n").unwrap();
        let doc = ValueDocument::new()
            .with_section(Section::new("s").with("id", "1").with("unknown", "2"));
        let target = dir.path().join("out.bin");

        let result = build_artifact(&doc, &registry, &Settings::default(), &target);
        assert!(matches!(result, Err(GenerateError::Assemble(_))));
        assert!(!target.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0, "staging file removed");
    }

    #[test]
    fn test_build_artifact_integrity_failure_keeps_staging() {
        let dir = TempDir::new().unwrap();
        let registry = SchemaRegistry::parse("id,uint,4\nsize,uint,4\n").unwrap();
        let doc = ValueDocument::new()
            .with_section(Section::new("s").with("id", "1").with("size", "100"));
        let target = dir.path().join("out.bin");

        let err = match build_artifact(&doc, &registry, &Settings::default(), &target) {
            Err(GenerateError::Integrity(e)) => e,
            other => panic!("expected integrity error, got {:?}", other),
        };
        assert!(!target.exists());
        assert!(err.path().exists(), "malformed body kept for inspection");
        assert_eq!(fs::read(err.path()).unwrap().len(), 8);
    }

    #[test]
    fn test_build_artifact_replaces_existing_target() {
        let dir = TempDir::new().unwrap();
        let registry = SchemaRegistry::parse("id,uint,4\nsize,uint,4\n").unwrap();
        let doc = ValueDocument::new()
            .with_section(Section::new("s").with("id", "1").with("size", "12"));
        let target = dir.path().join("out.bin");
        fs::write(&target, b"stale").unwrap();

        let outcome = build_artifact(&doc, &registry, &Settings::default(), &target).unwrap();
        assert_eq!(outcome.finalized.final_len, 12);
        assert_eq!(fs::read(&target).unwrap().len(), 12);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
