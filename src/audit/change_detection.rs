//! Field-level change detection between two versions of a record.
//!
//! Pure functions only: nothing here touches storage. Values are compared by
//! their [`normalize`]d form, which puts `null`, missing keys, blank strings
//! and empty containers in one equivalence class.

use std::collections::HashMap;

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::types::internal::{ChangeType, FieldChange};

/// Fields treated as credentials when no list is configured
pub const DEFAULT_SENSITIVE_FIELDS: [&str; 5] = ["password", "password_hash", "secret", "api_key", "token"];

/// Comparison key for a value
///
/// * `None`, `null`, whitespace-only strings, `[]` and `{}` become `""`
/// * other arrays/objects become canonical JSON with object keys sorted
/// * scalars become their string form
pub fn normalize(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => {
            if s.trim().is_empty() {
                String::new()
            } else {
                s.clone()
            }
        }
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Array(items)) if items.is_empty() => String::new(),
        Some(Value::Object(map)) if map.is_empty() => String::new(),
        Some(container) => canonical_json(container),
    }
}

/// Serialize with object keys in sorted order, independent of insertion order
fn canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let body = keys
                .into_iter()
                .map(|key| format!("{}:{}", Value::String(key.clone()), canonical_json(&map[key])))
                .collect::<Vec<_>>()
                .join(",");
            format!("{{{}}}", body)
        }
        Value::Array(items) => {
            let body = items.iter().map(canonical_json).collect::<Vec<_>>().join(",");
            format!("[{}]", body)
        }
        scalar => scalar.to_string(),
    }
}

/// Compare two record states and list the field changes
///
/// 1. For every key of `new_state`: when the normalized values differ a
///    change is emitted, `added` if the old value normalizes to empty
///    (missing, `null`, blank or an empty container), `changed` otherwise. A sensitive field whose new value is empty while
///    the old one is not is skipped: a blank credential input means "keep".
/// 2. For every key only in `old_state`: `removed`, unless the old value was
///    already empty.
///
/// Labels come from `field_labels`, falling back to [`humanize`]. Values of
/// sensitive fields are stored as `sha256:` digests.
pub fn diff(
    old_state: &Map<String, Value>,
    new_state: &Map<String, Value>,
    field_labels: &HashMap<String, String>,
    sensitive_fields: &[&str],
) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    for (key, new_value) in new_state {
        let old_value = old_state.get(key);
        let old_normalized = normalize(old_value);
        let new_normalized = normalize(Some(new_value));
        let sensitive = is_sensitive(key, sensitive_fields);

        if sensitive && new_normalized.is_empty() && !old_normalized.is_empty() {
            continue;
        }
        if old_normalized == new_normalized {
            continue;
        }

        let change_type = if old_normalized.is_empty() {
            ChangeType::Added
        } else {
            ChangeType::Changed
        };

        changes.push(FieldChange {
            field_name: key.clone(),
            field_label: label_for(key, field_labels),
            old_value: stored_value(old_normalized, sensitive),
            new_value: stored_value(new_normalized, sensitive),
            change_type,
        });
    }

    for (key, old_value) in old_state {
        if new_state.contains_key(key) {
            continue;
        }
        let old_normalized = normalize(Some(old_value));
        if old_normalized.is_empty() {
            continue;
        }

        changes.push(FieldChange {
            field_name: key.clone(),
            field_label: label_for(key, field_labels),
            old_value: stored_value(old_normalized, is_sensitive(key, sensitive_fields)),
            new_value: None,
            change_type: ChangeType::Removed,
        });
    }

    changes
}

fn is_sensitive(key: &str, sensitive_fields: &[&str]) -> bool {
    sensitive_fields.iter().any(|field| field.eq_ignore_ascii_case(key))
}

fn label_for(key: &str, field_labels: &HashMap<String, String>) -> String {
    field_labels.get(key).cloned().unwrap_or_else(|| humanize(key))
}

fn stored_value(normalized: String, sensitive: bool) -> Option<String> {
    if normalized.is_empty() {
        None
    } else if sensitive {
        Some(redact(&normalized))
    } else {
        Some(normalized)
    }
}

/// SHA-256 digest so equal secrets still correlate across entries
pub fn redact(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    format!("sha256:{:x}", hasher.finalize())
}

/// `first_name`, `firstName`, `first-name` -> `First Name`
pub fn humanize(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower_or_digit = false;

    for ch in key.chars() {
        if ch == '_' || ch == '-' || ch == '.' || ch.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower_or_digit = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower_or_digit && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower_or_digit = ch.is_lowercase() || ch.is_ascii_digit();
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn no_labels() -> HashMap<String, String> {
        HashMap::new()
    }

    #[test]
    fn test_normalize_collapses_empty_representations() {
        assert_eq!(normalize(None), "");
        assert_eq!(normalize(Some(&Value::Null)), "");
        assert_eq!(normalize(Some(&json!(""))), "");
        assert_eq!(normalize(Some(&json!("   "))), "");
        assert_eq!(normalize(Some(&json!([]))), "");
        assert_eq!(normalize(Some(&json!({}))), "");
    }

    #[test]
    fn test_normalize_scalars_to_string_form() {
        assert_eq!(normalize(Some(&json!(42))), "42");
        assert_eq!(normalize(Some(&json!(1.5))), "1.5");
        assert_eq!(normalize(Some(&json!(true))), "true");
        assert_eq!(normalize(Some(&json!("Acme"))), "Acme");
    }

    #[test]
    fn test_normalize_containers_ignore_key_order() {
        let mut a = Map::new();
        a.insert("b".to_string(), json!(2));
        a.insert("a".to_string(), json!({"y": 1, "x": [1, 2]}));
        let mut b = Map::new();
        b.insert("a".to_string(), json!({"x": [1, 2], "y": 1}));
        b.insert("b".to_string(), json!(2));

        let left = normalize(Some(&Value::Object(a)));
        let right = normalize(Some(&Value::Object(b)));
        assert_eq!(left, right);
        assert_eq!(left, r#"{"a":{"x":[1,2],"y":1},"b":2}"#);
    }

    #[test]
    fn test_diff_of_equal_states_is_empty() {
        let old = map(json!({"name": "Acme", "tags": [], "notes": null, "size": 10}));
        let new = map(json!({"name": "Acme", "tags": null, "notes": "", "size": "10"}));

        assert!(diff(&old, &new, &no_labels(), &[]).is_empty());
    }

    #[test]
    fn test_diff_reports_added_changed_removed() {
        let old = map(json!({"name": "Acme", "city": "Oslo", "phone": "123", "fax": ""}));
        let new = map(json!({"name": "Acme Inc", "email": "hi@acme.test"}));

        let changes = diff(&old, &new, &no_labels(), &[]);
        let by_field = |field: &str| changes.iter().find(|c| c.field_name == field).cloned();

        let name = by_field("name").unwrap();
        assert_eq!(name.change_type, ChangeType::Changed);
        assert_eq!(name.old_value.as_deref(), Some("Acme"));
        assert_eq!(name.new_value.as_deref(), Some("Acme Inc"));

        let email = by_field("email").unwrap();
        assert_eq!(email.change_type, ChangeType::Added);
        assert_eq!(email.old_value, None);

        assert_eq!(by_field("city").unwrap().change_type, ChangeType::Removed);
        assert_eq!(by_field("phone").unwrap().change_type, ChangeType::Removed);
        // Nothing meaningful existed in `fax`
        assert!(by_field("fax").is_none());
        assert_eq!(changes.len(), 4);
    }

    #[test]
    fn test_diff_empty_old_value_is_added() {
        let new = map(json!({"title": "Manager"}));

        for old in [json!({"title": ""}), json!({"title": null}), json!({"title": []}), json!({"title": "  "})] {
            let changes = diff(&map(old), &new, &no_labels(), &[]);
            assert_eq!(changes.len(), 1);
            assert_eq!(changes[0].change_type, ChangeType::Added);
            assert_eq!(changes[0].old_value, None);
        }
    }

    #[test]
    fn test_sensitive_field_cleared_is_not_a_change() {
        let old = map(json!({"password": "hash1"}));
        let new = map(json!({"password": ""}));

        assert!(diff(&old, &new, &no_labels(), &["password"]).is_empty());
    }

    #[test]
    fn test_sensitive_field_set_is_added_and_redacted() {
        let old = map(json!({"password": ""}));
        let new = map(json!({"password": "hash1"}));

        let changes = diff(&old, &new, &no_labels(), &["password"]);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change_type, ChangeType::Added);
        assert_eq!(changes[0].old_value, None);
        assert_eq!(changes[0].new_value, Some(redact("hash1")));

        let missing_old = diff(&Map::new(), &new, &no_labels(), &["password"]);
        assert_eq!(missing_old[0].change_type, ChangeType::Added);
    }

    #[test]
    fn test_sensitive_rule_only_applies_to_listed_fields() {
        let old = map(json!({"nickname": "bob"}));
        let new = map(json!({"nickname": ""}));

        let changes = diff(&old, &new, &no_labels(), &["password"]);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change_type, ChangeType::Changed);
        assert_eq!(changes[0].new_value, None);
    }

    #[test]
    fn test_diff_uses_labels_then_humanized_keys() {
        let old = map(json!({}));
        let new = map(json!({"first_name": "Ada", "dept_code": "R&D"}));
        let mut labels = HashMap::new();
        labels.insert("dept_code".to_string(), "Department".to_string());

        let changes = diff(&old, &new, &labels, &[]);
        let label = |field: &str| {
            changes
                .iter()
                .find(|c| c.field_name == field)
                .map(|c| c.field_label.clone())
                .unwrap()
        };
        assert_eq!(label("first_name"), "First Name");
        assert_eq!(label("dept_code"), "Department");
    }

    #[test]
    fn test_diff_detects_nested_group_changes() {
        let old = map(json!({"answers": {"g1": {"q1": "yes"}}}));
        let new = map(json!({"answers": {"g1": {"q1": "no"}}}));

        let changes = diff(&old, &new, &no_labels(), &[]);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].old_value.as_deref(), Some(r#"{"g1":{"q1":"yes"}}"#));
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("first_name"), "First Name");
        assert_eq!(humanize("firstName"), "First Name");
        assert_eq!(humanize("first-name"), "First Name");
        assert_eq!(humanize("address2_line"), "Address2 Line");
        assert_eq!(humanize("EMAIL"), "Email");
        assert_eq!(humanize(""), "");
    }
}
