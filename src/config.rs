//! Generator settings
//!
//! Settings come from an optional JSON file. Every key has a default, so an
//! absent file or an empty object `{}` describes the standard record layout.
//! Settings are validated once after loading; an invalid file is fatal.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::AuditTerminator;

/// Result type for settings operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Inclusive integer bounds for a numeric operator field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: i64,
    pub max: i64,
}

/// A field whose value is forced after collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedField {
    pub section: String,
    pub field: String,
    pub value: String,
}

impl ReservedField {
    pub fn new(
        section: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            section: section.into(),
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Settings file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Attempts per operator field before giving up
    pub max_retries: u32,

    /// Name of the field holding the record's declared total size
    pub size_field: String,

    /// Fields validated as integers within a range instead of by length
    pub numeric_fields: BTreeMap<String, NumericRange>,

    /// Extra prompt text per field, e.g. an expected date format
    pub format_hints: BTreeMap<String, String>,

    /// Sections whose values are supplied at run time, in collection order
    pub dynamic_sections: Vec<String>,

    /// Dynamic sections whose accepted values go to the audit trail
    pub audit_sections: BTreeMap<String, AuditTerminator>,

    /// Fields forced to fixed values after collection
    pub reserved_fields: Vec<ReservedField>,

    /// Section whose first value names the output artifact
    pub naming_section: String,

    /// Artifact file extension, without the dot
    pub artifact_extension: String,

    /// Root under which date-stamped output folders are created
    pub output_root: PathBuf,

    /// Treat a document without a size marker as an error
    pub require_size_marker: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let mut numeric_fields = BTreeMap::new();
        numeric_fields.insert("brd_ver".to_string(), NumericRange { min: 0, max: 255 });

        let mut format_hints = BTreeMap::new();
        format_hints.insert("production_date".to_string(), "DDMMYYYY".to_string());

        let mut audit_sections = BTreeMap::new();
        audit_sections.insert("cm_content".to_string(), AuditTerminator::Tab);
        audit_sections.insert("oem_content_dynamic_1".to_string(), AuditTerminator::Tab);
        audit_sections.insert("oem_content_dynamic_2".to_string(), AuditTerminator::Newline);

        Self {
            max_retries: 3,
            size_field: "size".to_string(),
            numeric_fields,
            format_hints,
            dynamic_sections: vec![
                "me_content_dynamic_1".to_string(),
                "me_content_dynamic_2".to_string(),
                "cm_content".to_string(),
                "oem_content_dynamic_1".to_string(),
                "oem_content_dynamic_2".to_string(),
            ],
            audit_sections,
            reserved_fields: vec![
                ReservedField::new("me_content_dynamic_2", "reserved_ME", "0xFFFFFFFF"),
                ReservedField::new("cm_content", "reserved_cm", "0"),
                ReservedField::new("oem_content_dynamic_2", "reserved_OEM", "0"),
            ],
            naming_section: "oem_content_dynamic_1".to_string(),
            artifact_extension: "bin".to_string(),
            output_root: PathBuf::from("."),
            require_size_marker: false,
        }
    }
}

impl Settings {
    /// Load settings from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_json(&content)
    }

    /// Parse and validate settings from JSON text
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let settings: Settings = serde_json::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from `path` if given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate cross-field rules
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_retries == 0 {
            return Err(ConfigError::Invalid("max_retries must be > 0".into()));
        }

        if self.size_field.trim().is_empty() {
            return Err(ConfigError::Invalid("size_field must not be empty".into()));
        }

        for (field, range) in &self.numeric_fields {
            if range.min > range.max {
                return Err(ConfigError::Invalid(format!(
                    "numeric field '{}': min {} exceeds max {}",
                    field, range.min, range.max
                )));
            }
        }

        for section in self.audit_sections.keys() {
            if !self.is_dynamic(section) {
                return Err(ConfigError::Invalid(format!(
                    "audit section '{}' is not a dynamic section",
                    section
                )));
            }
        }

        for reserved in &self.reserved_fields {
            if reserved.section.is_empty() || reserved.field.is_empty() {
                return Err(ConfigError::Invalid(
                    "reserved fields need both a section and a field".into(),
                ));
            }
        }

        if self.naming_section.trim().is_empty() {
            return Err(ConfigError::Invalid("naming_section must not be empty".into()));
        }

        let ext = self.artifact_extension.trim();
        if ext.is_empty() || ext.contains('/') || ext.contains('\\') || ext.starts_with('.') {
            return Err(ConfigError::Invalid(format!(
                "artifact_extension '{}' must be a bare extension",
                self.artifact_extension
            )));
        }

        Ok(())
    }

    /// Whether `section` is filled in at run time
    pub fn is_dynamic(&self, section: &str) -> bool {
        self.dynamic_sections.iter().any(|s| s == section)
    }

    /// Whether `field` in `section` is reserved and never prompted for
    pub fn is_reserved(&self, section: &str, field: &str) -> bool {
        self.reserved_fields
            .iter()
            .any(|r| r.section == section && r.field == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_object_is_defaults() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.max_retries, 3);
        assert_eq!(settings.size_field, "size");
        assert_eq!(settings.numeric_fields["brd_ver"], NumericRange { min: 0, max: 255 });
        assert_eq!(settings.dynamic_sections.len(), 5);
        assert!(settings.is_reserved("cm_content", "reserved_cm"));
        assert!(!settings.is_reserved("cm_content", "serial"));
    }

    #[test]
    fn test_partial_override() {
        let settings = Settings::from_json(
            r#"{"max_retries": 5, "output_root": "/tmp/out", "require_size_marker": true}"#,
        )
        .unwrap();
        assert_eq!(settings.max_retries, 5);
        assert_eq!(settings.output_root, PathBuf::from("/tmp/out"));
        assert!(settings.require_size_marker);
        assert_eq!(settings.naming_section, "oem_content_dynamic_1");
    }

    #[test]
    fn test_zero_retries_rejected() {
        let err = Settings::from_json(r#"{"max_retries": 0}"#).unwrap_err();
        assert!(err.to_string().contains("max_retries"));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err =
            Settings::from_json(r#"{"numeric_fields": {"brd_ver": {"min": 9, "max": 1}}}"#)
                .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_audit_section_must_be_dynamic() {
        let err = Settings::from_json(r#"{"audit_sections": {"mi_global_header": "tab"}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("mi_global_header"));
    }

    #[test]
    fn test_bad_extension_rejected() {
        assert!(Settings::from_json(r#"{"artifact_extension": ".bin"}"#).is_err());
        assert!(Settings::from_json(r#"{"artifact_extension": ""}"#).is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Settings::from_json(r#"{"max_retires": 3}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mibin.json");
        fs::write(&path, r#"{"size_field": "total_len"}"#).unwrap();

        let settings = Settings::load_or_default(Some(&path)).unwrap();
        assert_eq!(settings.size_field, "total_len");

        let missing = Settings::load(&temp_dir.path().join("nope.json"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }
}
