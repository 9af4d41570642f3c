//! Post-collection normalization of reserved fields
//!
//! Reserved fields are never supplied by the operator. After every dynamic
//! section is filled, each one is forced to its configured fill value. A
//! reserved field missing from its section is appended to it.

use crate::config::ReservedField;
use crate::document::ValueDocument;
use crate::observability::{log_event_with_fields, Event};

/// Forces every reserved field to its fill value. Returns how many were set.
pub fn normalize_reserved(doc: &mut ValueDocument, reserved: &[ReservedField]) -> usize {
    for entry in reserved {
        doc.section_or_insert(&entry.section)
            .set(entry.field.as_str(), entry.value.as_str());
    }

    let count = reserved.len().to_string();
    log_event_with_fields(Event::ReservedFieldsNormalized, &[("count", count.as_str())]);
    reserved.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::document::Section;
    use crate::encoder::encode;
    use crate::schema::FieldType;

    #[test]
    fn test_default_reserved_values() {
        let settings = Settings::default();
        let mut doc = ValueDocument::new()
            .with_section(Section::new("me_content_dynamic_2").with("reserved_ME", "4"))
            .with_section(Section::new("cm_content").with("serial", "SN01").with("reserved_cm", "4"))
            .with_section(Section::new("oem_content_dynamic_2").with("reserved_OEM", "1"));

        let count = normalize_reserved(&mut doc, &settings.reserved_fields);
        assert_eq!(count, 3);

        let me = doc.section("me_content_dynamic_2").unwrap().get("reserved_ME").unwrap();
        assert_eq!(me, "0xFFFFFFFF");
        // The fill value must survive encoding as an all-ones 32-bit word
        assert_eq!(encode(FieldType::UnsignedInt32, 4, me).unwrap().bytes(), &[0xFF; 4]);

        assert_eq!(doc.section("cm_content").unwrap().get("reserved_cm"), Some("0"));
        assert_eq!(doc.section("oem_content_dynamic_2").unwrap().get("reserved_OEM"), Some("0"));
    }

    #[test]
    fn test_position_preserved_and_missing_appended() {
        let mut doc = ValueDocument::new()
            .with_section(Section::new("cm").with("reserved", "9").with("serial", "SN"));
        let reserved = vec![
            ReservedField::new("cm", "reserved", "0"),
            ReservedField::new("cm", "tail", "0"),
        ];

        normalize_reserved(&mut doc, &reserved);
        let keys: Vec<_> = doc.section("cm").unwrap().keys().collect();
        assert_eq!(keys, vec!["reserved", "serial", "tail"]);
    }

    #[test]
    fn test_idempotent() {
        let reserved = vec![ReservedField::new("cm", "reserved", "0")];
        let mut once = ValueDocument::new().with_section(Section::new("cm").with("reserved", "5"));
        normalize_reserved(&mut once, &reserved);
        let mut twice = once.clone();
        normalize_reserved(&mut twice, &reserved);
        assert_eq!(once, twice);
    }
}
