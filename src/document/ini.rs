//! INI-style reader and writer for value documents
//!
//! Accepted syntax:
//! - `[section]` headers
//! - `key=value` or `key: value` entries (first delimiter wins)
//! - `;` or `#` full-line comments, blank lines
//! - a bare `key` reads as an empty value
//!
//! The writer emits `key=value` with no surrounding spaces.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use super::errors::{DocumentError, DocumentResult};
use super::types::{Section, ValueDocument};

/// Banner section placed at the top of every generated document.
pub const WARNING_SECTION: &str = "warning";

/// Comment line written under the banner section.
pub const WARNING_COMMENT: &str = "; This is an autogenerated file. !DO NOT MODIFY!";

/// Parses document text.
pub fn parse(content: &str) -> DocumentResult<ValueDocument> {
    let mut doc = ValueDocument::new();
    let mut current: Option<Section> = None;

    for (index, raw) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            let name = line
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| DocumentError::MalformedSection {
                    line: line_no,
                    header: line.to_string(),
                })?;

            if let Some(done) = current.take() {
                doc.push(done);
            }
            if doc.section(name).is_some() {
                return Err(DocumentError::DuplicateSection {
                    line: line_no,
                    section: name.to_string(),
                });
            }
            current = Some(Section::new(name));
            continue;
        }

        let section = current
            .as_mut()
            .ok_or(DocumentError::EntryOutsideSection { line: line_no })?;

        let (key, value) = match line.find(|c: char| c == '=' || c == ':') {
            Some(pos) => (line[..pos].trim(), line[pos + 1..].trim()),
            None => (line, ""),
        };

        if key.is_empty() {
            return Err(DocumentError::EmptyKey { line: line_no });
        }
        if section.contains(key) {
            return Err(DocumentError::DuplicateKey {
                line: line_no,
                section: section.name().to_string(),
                key: key.to_string(),
            });
        }
        section.set(key, value);
    }

    if let Some(done) = current.take() {
        doc.push(done);
    }

    Ok(doc)
}

/// Renders a document, sections separated by a blank line.
pub fn render(doc: &ValueDocument) -> String {
    render_sections(doc.sections())
}

fn render_sections<'a>(sections: impl IntoIterator<Item = &'a Section>) -> String {
    let mut out = String::new();
    for section in sections {
        out.push('[');
        out.push_str(section.name());
        out.push_str("]\n");
        for (key, value) in section.iter() {
            out.push_str(key);
            out.push('=');
            out.push_str(value);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// Reads and parses a document file.
pub fn load(path: &Path) -> DocumentResult<ValueDocument> {
    let content = fs::read_to_string(path).map_err(|e| DocumentError::io(path, e))?;
    parse(&content)
}

/// Writes the resolved document to `path` with the warning banner first.
///
/// Any existing file is removed before writing, and the new file is
/// fsynced before returning so that a later stage reads exactly these bytes.
pub fn persist_modified(path: &Path, doc: &ValueDocument) -> DocumentResult<()> {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(DocumentError::io(path, e)),
    }

    let mut content = format!("[{}]\n{}\n\n", WARNING_SECTION, WARNING_COMMENT);
    // A banner carried over from an earlier run is replaced, not repeated
    content.push_str(&render_sections(
        doc.sections().iter().filter(|s| s.name() != WARNING_SECTION),
    ));

    let mut file = File::create(path).map_err(|e| DocumentError::io(path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| DocumentError::io(path, e))?;
    file.sync_all().map_err(|e| DocumentError::io(path, e))?;

    Ok(())
}
