//! JSON document helpers shared by the pipeline stages.

use std::cmp::Ordering;

use coursekit_criteria::{Criterion, Operator};
use serde_json::{Map, Value as Json};

use super::PipelineError;

/// Value at a dotted path. Missing segments yield `None`.
pub(crate) fn get_path<'a>(doc: &'a Json, path: &str) -> Option<&'a Json> {
    path.split('.').try_fold(doc, |cur, seg| match cur {
        Json::Object(map) => map.get(seg),
        _ => None,
    })
}

/// Set the value at a dotted path, creating intermediate objects.
/// Non-object documents are left untouched.
pub(crate) fn set_path(doc: &mut Json, path: &str, value: Json) {
    let mut cur = doc;
    let mut segments = path.split('.').peekable();
    while let Some(seg) = segments.next() {
        let Json::Object(map) = cur else {
            return;
        };
        if segments.peek().is_none() {
            map.insert(seg.to_owned(), value);
            return;
        }
        cur = map
            .entry(seg.to_owned())
            .or_insert_with(|| Json::Object(Map::new()));
    }
}

fn type_rank(v: &Json) -> u8 {
    match v {
        Json::Null => 0,
        Json::Number(_) => 1,
        Json::String(_) => 2,
        Json::Object(_) => 3,
        Json::Array(_) => 4,
        Json::Bool(_) => 5,
    }
}

/// Total order over JSON values used by `sort`, `max` and `min`.
/// Values of different types order by type; numbers compare numerically.
pub(crate) fn compare(a: &Json, b: &Json) -> Ordering {
    match (a, b) {
        (Json::Number(x), Json::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.total_cmp(&y)
        }
        (Json::String(x), Json::String(y)) => x.cmp(y),
        (Json::Bool(x), Json::Bool(y)) => x.cmp(y),
        (Json::Array(x), Json::Array(y)) => x
            .iter()
            .zip(y)
            .map(|(l, r)| compare(l, r))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn json_eq(a: &Json, b: &Json) -> bool {
    match (a, b) {
        (Json::Number(_), Json::Number(_)) => compare(a, b).is_eq(),
        _ => a == b,
    }
}

/// Scalar comparison: only values of the same kind are comparable.
fn ordered(a: &Json, b: &Json, accept: fn(Ordering) -> bool) -> bool {
    let comparable = matches!(
        (a, b),
        (Json::Number(_), Json::Number(_)) | (Json::String(_), Json::String(_))
    );
    comparable && accept(compare(a, b))
}

/// Apply `test` to the value, or to each element when the value is an array,
/// which is how document stores match array fields.
fn any_element(v: &Json, test: impl Fn(&Json) -> bool) -> bool {
    match v {
        Json::Array(items) => test(v) || items.iter().any(test),
        _ => test(v),
    }
}

/// Evaluate one criterion against a document.
pub(crate) fn matches(doc: &Json, c: &Criterion) -> Result<bool, PipelineError> {
    let target = c.value.to_json();
    let found = get_path(doc, &c.field).filter(|v| !v.is_null());

    Ok(match c.op {
        Operator::Exists => {
            let Json::Bool(want) = target else {
                return Err(PipelineError::InvalidArgument {
                    stage: "match",
                    reason: format!("exists on {} needs a bool", c.field),
                });
            };
            found.is_some() == want
        }
        Operator::Eq => match found {
            Some(v) => any_element(v, |x| json_eq(x, &target)),
            None => target.is_null(),
        },
        Operator::Neq => match found {
            Some(v) => !any_element(v, |x| json_eq(x, &target)),
            None => !target.is_null(),
        },
        Operator::In => {
            let Json::Array(options) = &target else {
                return Err(PipelineError::InvalidArgument {
                    stage: "match",
                    reason: format!("in on {} needs a list", c.field),
                });
            };
            found.is_some_and(|v| any_element(v, |x| options.iter().any(|o| json_eq(x, o))))
        }
        Operator::Contains => {
            let needle = target.as_str().map(str::to_lowercase).unwrap_or_default();
            found.is_some_and(|v| {
                any_element(v, |x| {
                    x.as_str()
                        .is_some_and(|s| s.to_lowercase().contains(&needle))
                })
            })
        }
        Operator::Gt => found.is_some_and(|v| any_element(v, |x| ordered(x, &target, Ordering::is_gt))),
        Operator::Gte => found.is_some_and(|v| any_element(v, |x| ordered(x, &target, Ordering::is_ge))),
        Operator::Lt => found.is_some_and(|v| any_element(v, |x| ordered(x, &target, Ordering::is_lt))),
        Operator::Lte => found.is_some_and(|v| any_element(v, |x| ordered(x, &target, Ordering::is_le))),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use coursekit_criteria::Value;
    use serde_json::json;

    fn crit(field: &str, op: Operator, value: impl Into<Value>) -> Criterion {
        Criterion {
            field: field.to_owned(),
            op,
            value: value.into(),
        }
    }

    #[test]
    fn paths_read_and_write_nested_values() {
        let mut doc = json!({"a": {"b": 1}});
        assert_eq!(get_path(&doc, "a.b"), Some(&json!(1)));
        assert_eq!(get_path(&doc, "a.c"), None);
        set_path(&mut doc, "a.c.d", json!("x"));
        assert_eq!(doc, json!({"a": {"b": 1, "c": {"d": "x"}}}));
    }

    #[test]
    fn array_fields_match_by_element() {
        let doc = json!({"tags": ["vip", "summer-sale"]});
        assert!(matches(&doc, &crit("tags", Operator::Eq, "vip")).unwrap());
        assert!(!matches(&doc, &crit("tags", Operator::Neq, "vip")).unwrap());
        assert!(matches(&doc, &crit("tags", Operator::In, vec!["x", "summer-sale"])).unwrap());
        assert!(matches(&doc, &crit("tags", Operator::Contains, "SUMMER")).unwrap());
    }

    #[test]
    fn ordering_only_between_same_kinds() {
        let doc = json!({"n": 5, "s": "b"});
        assert!(matches(&doc, &crit("n", Operator::Gt, 4_i64)).unwrap());
        assert!(matches(&doc, &crit("n", Operator::Lte, 5.0)).unwrap());
        assert!(!matches(&doc, &crit("n", Operator::Gt, "a")).unwrap());
        assert!(matches(&doc, &crit("s", Operator::Gte, "a")).unwrap());
    }

    #[test]
    fn exists_and_null_semantics() {
        let doc = json!({"a": null, "b": 1});
        assert!(!matches(&doc, &crit("a", Operator::Exists, true)).unwrap());
        assert!(matches(&doc, &crit("missing", Operator::Exists, false)).unwrap());
        assert!(matches(&doc, &crit("missing", Operator::Eq, Value::Null)).unwrap());
        assert!(matches(&doc, &crit("a", Operator::Exists, "yes")).is_err());
    }
}
