//! Helpers for grouped answer structures (group id -> field id -> value).
//!
//! These run before [`super::change_detection::diff`] when a record stores its
//! fields in groups; the diff engine itself only sees flat maps.

use serde_json::{Map, Value};

use super::change_detection::normalize;

/// Collapse `group -> field -> value` into `field -> value`
///
/// Groups are visited in map order. A later group only replaces a field when
/// the value already collected for it normalizes to empty. Top-level entries
/// that are not objects are carried over as plain fields.
pub fn flatten(grouped: &Map<String, Value>) -> Map<String, Value> {
    let mut flat = Map::new();

    for (group_key, group) in grouped {
        match group {
            Value::Object(fields) => {
                for (field, value) in fields {
                    merge_field(&mut flat, field, value);
                }
            }
            other => merge_field(&mut flat, group_key, other),
        }
    }

    flat
}

fn merge_field(flat: &mut Map<String, Value>, field: &str, value: &Value) {
    let keep_existing = flat
        .get(field)
        .map(|existing| !normalize(Some(existing)).is_empty())
        .unwrap_or(false);
    if !keep_existing {
        flat.insert(field.to_string(), value.clone());
    }
}

/// First candidate key with a non-empty value, in normalized form
pub fn pick_first(flat: &Map<String, Value>, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .map(|key| normalize(flat.get(*key)))
        .find(|value| !value.is_empty())
}
