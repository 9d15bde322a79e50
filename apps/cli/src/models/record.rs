//! Lenient access to the extraction record.
//!
//! The model behind the service occasionally returns list and map fields
//! as JSON-encoded strings. List sections are re-parsed to arrays and map
//! sections to objects, degrading to the empty collection when the text
//! does not parse.

use serde_json::Value;

/// Sections expected to hold arrays of entries.
pub const LIST_SECTIONS: [&str; 5] = [
    "work",
    "education",
    "projects",
    "certifications",
    "achievements",
];

/// Sections expected to hold string-keyed maps.
const MAP_SECTIONS: [&str; 2] = ["social", "other"];

/// Re-parses string-encoded sections in place. Non-object records and
/// absent sections are left alone.
pub fn normalize_record(record: &mut Value) {
    let Some(map) = record.as_object_mut() else {
        return;
    };
    for section in LIST_SECTIONS {
        if let Some(value) = map.get_mut(section) {
            if let Some(text) = value.as_str() {
                let reparsed = serde_json::from_str::<Value>(text)
                    .ok()
                    .filter(Value::is_array);
                *value = reparsed.unwrap_or_else(|| Value::Array(Vec::new()));
            }
        }
    }
    for section in MAP_SECTIONS {
        if let Some(value) = map.get_mut(section) {
            if let Some(text) = value.as_str() {
                let reparsed = serde_json::from_str::<Value>(text)
                    .ok()
                    .filter(Value::is_object);
                *value = reparsed.unwrap_or_else(|| Value::Object(serde_json::Map::new()));
            }
        }
    }
}

/// Full name assembled from `first_name` / `last_name`, if present.
pub fn display_name(record: &Value) -> Option<String> {
    let first = record
        .get("first_name")
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim();
    let last = record
        .get("last_name")
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim();
    let full = format!("{first} {last}");
    let full = full.trim();
    (!full.is_empty()).then(|| full.to_string())
}

/// Number of entries in a list section (0 when absent or malformed).
pub fn section_len(record: &Value, section: &str) -> usize {
    record
        .get(section)
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

/// One-line description of the record for progress reporting.
pub fn summarize(record: &Value) -> String {
    let name = display_name(record).unwrap_or_else(|| "unnamed candidate".to_string());
    let sections: Vec<String> = LIST_SECTIONS
        .iter()
        .map(|section| (section, section_len(record, section)))
        .filter(|(_, n)| *n > 0)
        .map(|(section, n)| format!("{n} {section}"))
        .collect();
    if sections.is_empty() {
        name
    } else {
        format!("{name} ({})", sections.join(", "))
    }
}
