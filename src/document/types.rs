//! Ordered, sectioned value document
//!
//! Order is part of the data: sections are packed in document order and
//! keys in insertion order, so the layout of the binary follows the layout
//! of the document exactly.

/// An ordered group of `field = raw value` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Builder-style insert, for documents assembled in code.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Replaces the value of an existing key in place, or appends a new one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// First entry of the section.
    pub fn first(&self) -> Option<(&str, &str)> {
        self.entries.first().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The whole value document: sections in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueDocument {
    sections: Vec<Section>,
}

impl ValueDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append, for documents assembled in code.
    pub fn with_section(mut self, section: Section) -> Self {
        self.push(section);
        self
    }

    /// Appends a section, replacing any section with the same name.
    pub fn push(&mut self, section: Section) {
        match self.sections.iter_mut().find(|s| s.name == section.name) {
            Some(existing) => *existing = section,
            None => self.sections.push(section),
        }
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.name == name)
    }

    /// Returns the named section, appending an empty one if missing.
    pub fn section_or_insert(&mut self, name: &str) -> &mut Section {
        let index = match self.sections.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index]
    }

    /// Sections in document order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Total number of fields across all sections.
    pub fn field_count(&self) -> usize {
        self.sections.iter().map(Section::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_keeps_position() {
        let mut section = Section::new("cm_content")
            .with("serial", "8")
            .with("reserved_cm", "4")
            .with("lot", "6");

        section.set("reserved_cm", "0");
        let keys: Vec<_> = section.keys().collect();
        assert_eq!(keys, vec!["serial", "reserved_cm", "lot"]);
        assert_eq!(section.get("reserved_cm"), Some("0"));
    }

    #[test]
    fn test_set_appends_new_key() {
        let mut section = Section::new("s").with("a", "1");
        section.set("b", "2");
        assert_eq!(section.iter().collect::<Vec<_>>(), vec![("a", "1"), ("b", "2")]);
        assert_eq!(section.first(), Some(("a", "1")));
    }

    #[test]
    fn test_section_or_insert() {
        let mut doc = ValueDocument::new().with_section(Section::new("header"));
        doc.section_or_insert("content").set("x", "1");
        doc.section_or_insert("header").set("id", "7");

        let names: Vec<_> = doc.sections().iter().map(Section::name).collect();
        assert_eq!(names, vec!["header", "content"]);
        assert_eq!(doc.field_count(), 2);
    }
}
