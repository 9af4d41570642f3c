//! Schema registry loaded from a comma-delimited schema source
//!
//! Each row is `field_name,type_tag,size`. The registry is built once per
//! run and is read-only afterwards:
//! - First definition of a name wins; later duplicates are ignored
//! - Unknown type tags abort loading (FATAL)
//! - Unresolved names are surfaced to the caller, never defaulted

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::errors::{SchemaError, SchemaResult};
use super::types::{FieldDescriptor, FieldType};

/// Lookup table from field name to descriptor.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    /// Where the schema was loaded from, if it came from disk
    source: Option<PathBuf>,
    /// Descriptors indexed by field name
    fields: HashMap<String, FieldDescriptor>,
    /// Rows skipped because their name was already defined
    shadowed: usize,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a schema file from disk.
    ///
    /// The file is read in one pass and closed before parsing begins.
    pub fn load(path: &Path) -> SchemaResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed_source(path.display().to_string(), e.to_string())
        })?;

        let mut registry = Self::parse(&content)?;
        registry.source = Some(path.to_path_buf());
        Ok(registry)
    }

    /// Parses schema rows from text.
    ///
    /// Blank lines and lines starting with `#` are skipped.
    pub fn parse(content: &str) -> SchemaResult<Self> {
        let mut registry = Self::new();

        for (index, raw) in content.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let descriptor = parse_row(line, line_no)?;
            registry.insert(descriptor);
        }

        Ok(registry)
    }

    /// Registers a descriptor directly. Returns `false` if the name was
    /// already defined, in which case the existing definition is kept.
    pub fn insert(&mut self, descriptor: FieldDescriptor) -> bool {
        if self.fields.contains_key(&descriptor.name) {
            self.shadowed += 1;
            return false;
        }
        self.fields.insert(descriptor.name.clone(), descriptor);
        true
    }

    /// Resolves a field name to its descriptor.
    pub fn resolve(&self, field_name: &str) -> SchemaResult<&FieldDescriptor> {
        self.fields
            .get(field_name)
            .ok_or_else(|| SchemaError::unknown_field(field_name))
    }

    /// Gets a descriptor without producing an error.
    pub fn get(&self, field_name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(field_name)
    }

    /// Returns the path the schema was loaded from.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Returns the number of distinct fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns how many duplicate rows were ignored.
    pub fn shadowed_rows(&self) -> usize {
        self.shadowed
    }
}

fn parse_row(line: &str, line_no: usize) -> SchemaResult<FieldDescriptor> {
    let cells: Vec<&str> = line.split(',').map(str::trim).collect();
    if cells.len() < 3 {
        return Err(SchemaError::malformed_row(
            line_no,
            format!("expected 'name,type,size', got '{}'", line),
        ));
    }

    let name = cells[0];
    if name.is_empty() {
        return Err(SchemaError::malformed_row(line_no, "empty field name"));
    }

    let field_type: FieldType = cells[1]
        .parse()
        .map_err(|tag: String| SchemaError::unknown_type(name, tag, line_no))?;

    let declared_size: u64 = cells[2].parse().map_err(|_| {
        SchemaError::malformed_row(
            line_no,
            format!("size '{}' of field '{}' is not an integer", cells[2], name),
        )
    })?;

    Ok(FieldDescriptor::new(name, field_type, declared_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaErrorCode;
    use tempfile::TempDir;

    const SAMPLE: &str = "id,uint,4\nflag,byte,1\nsize,uint,4\nname,str,8\n";

    #[test]
    fn test_parse_and_resolve() {
        let registry = SchemaRegistry::parse(SAMPLE).unwrap();
        assert_eq!(registry.len(), 4);

        let name = registry.resolve("name").unwrap();
        assert_eq!(name.field_type, FieldType::FixedString);
        assert_eq!(name.declared_size, 8);

        let flag = registry.resolve("flag").unwrap();
        assert_eq!(flag.field_type, FieldType::Byte);
    }

    #[test]
    fn test_unknown_field_is_error() {
        let registry = SchemaRegistry::parse(SAMPLE).unwrap();
        let err = registry.resolve("missing").unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::MibinSchemaUnknownField);
        assert_eq!(err.field(), Some("missing"));
    }

    #[test]
    fn test_first_definition_wins() {
        let registry = SchemaRegistry::parse("id,uint,4\nid,byte,1\n").unwrap();
        let id = registry.resolve("id").unwrap();
        assert_eq!(id.field_type, FieldType::UnsignedInt32);
        assert_eq!(id.declared_size, 4);
        assert_eq!(registry.shadowed_rows(), 1);
    }

    #[test]
    fn test_unknown_type_tag_aborts_load() {
        let err = SchemaRegistry::parse("id,uint,4\nratio,float,4\n").unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::MibinSchemaUnknownType);
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_malformed_rows() {
        let err = SchemaRegistry::parse("id,uint\n").unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::MibinSchemaMalformed);

        let err = SchemaRegistry::parse("id,uint,four\n").unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::MibinSchemaMalformed);
        assert!(err.message().contains("four"));
    }

    #[test]
    fn test_blank_lines_comments_and_whitespace() {
        let registry =
            SchemaRegistry::parse("# name,type,size\n\n  id , uint , 4 \r\naddr,array,3\n").unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve("id").unwrap().declared_size, 4);
        assert_eq!(
            registry.resolve("addr").unwrap().field_type,
            FieldType::ByteArray
        );
    }

    #[test]
    fn test_load_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mi_config.csv");
        fs::write(&path, SAMPLE).unwrap();

        let registry = SchemaRegistry::load(&path).unwrap();
        assert_eq!(registry.source(), Some(path.as_path()));
        assert!(registry.get("size").is_some());
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = SchemaRegistry::load(&temp_dir.path().join("nope.csv"));
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().code(), SchemaErrorCode::MibinSchemaMalformed);
    }
}
