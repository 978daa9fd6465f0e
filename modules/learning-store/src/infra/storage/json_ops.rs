//! In-place edits of JSON array documents, used by the bulk maintenance
//! operations. Each returns `true` when the document changed.

use serde::de::DeserializeOwned;
use serde_json::Value as Json;

/// Decode a JSON column. The column content is written by this crate, so a
/// shape mismatch yields the type's default rather than an error.
pub(crate) fn decode<T: DeserializeOwned + Default>(value: Json) -> T {
    serde_json::from_value(value).unwrap_or_default()
}

/// Remove every element equal to `value`.
pub(crate) fn pull(doc: &mut Json, value: &str) -> bool {
    let Json::Array(items) = doc else {
        return false;
    };
    let before = items.len();
    items.retain(|item| item.as_str() != Some(value));
    items.len() != before
}

/// Append each of `values` not already present.
pub(crate) fn add_to_set(doc: &mut Json, values: &[String]) -> bool {
    if doc.is_null() {
        *doc = Json::Array(Vec::new());
    }
    let Json::Array(items) = doc else {
        return false;
    };
    let mut changed = false;
    for v in values {
        if !items.iter().any(|item| item.as_str() == Some(v.as_str())) {
            items.push(Json::String(v.clone()));
            changed = true;
        }
    }
    changed
}

/// For every object in the array whose `key` equals `key_value`, remove
/// `value` from its array field `field`.
pub(crate) fn pull_nested(
    doc: &mut Json,
    key: &str,
    key_value: &str,
    field: &str,
    value: &str,
) -> bool {
    let Json::Array(items) = doc else {
        return false;
    };
    let mut changed = false;
    for item in items
        .iter_mut()
        .filter(|item| item.get(key).and_then(Json::as_str) == Some(key_value))
    {
        if let Some(inner) = item.get_mut(field) {
            changed |= pull(inner, value);
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pull_removes_all_copies() {
        let mut doc = json!(["a", "b", "a"]);
        assert!(pull(&mut doc, "a"));
        assert_eq!(doc, json!(["b"]));
        assert!(!pull(&mut doc, "zzz"));
    }

    #[test]
    fn add_to_set_skips_existing() {
        let mut doc = json!(["a"]);
        assert!(add_to_set(&mut doc, &["a".into(), "b".into(), "b".into()]));
        assert_eq!(doc, json!(["a", "b"]));
        assert!(!add_to_set(&mut doc, &["b".into()]));

        let mut empty = Json::Null;
        assert!(add_to_set(&mut empty, &["x".into()]));
        assert_eq!(empty, json!(["x"]));
    }

    #[test]
    fn pull_nested_only_touches_matching_entries() {
        let mut doc = json!([
            {"courseId": "c1", "accessibleGroups": ["g1", "g2"]},
            {"courseId": "c2", "accessibleGroups": ["g1"]},
        ]);
        assert!(pull_nested(&mut doc, "courseId", "c1", "accessibleGroups", "g1"));
        assert_eq!(
            doc,
            json!([
                {"courseId": "c1", "accessibleGroups": ["g2"]},
                {"courseId": "c2", "accessibleGroups": ["g1"]},
            ])
        );
        assert!(!pull_nested(&mut doc, "courseId", "c3", "accessibleGroups", "g1"));
    }

    #[test]
    fn decode_falls_back_to_default() {
        let tags: Vec<String> = decode(json!(["a"]));
        assert_eq!(tags, vec!["a".to_owned()]);
        let bad: Vec<String> = decode(json!({"not": "a list"}));
        assert!(bad.is_empty());
    }
}
