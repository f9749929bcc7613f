//! Slash-delimited addressing into draft documents.
//!
//! Paths look like `/extracted/water/ph`. Writes are permissive: a missing
//! intermediate, or one holding a scalar, is overwritten with a fresh empty
//! mapping. Removals are conservative: a missing intermediate makes the call
//! a no-op.
//!
//! Sequences are containers only for segments that address them. A decimal
//! index inside the sequence selects an element; for the final segment of a
//! write, `-` or an index equal to the length appends. On an intermediate
//! segment, an index equal to the length appends a fresh mapping and
//! descends into it. Any other segment treats the sequence like a scalar.

use serde_json::{Map, Value};

use crate::error::{ApplyError, Result};

/// Split `path` into segments after stripping one leading slash.
pub fn segments(path: &str) -> Result<Vec<&str>> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return Err(ApplyError::EmptyPath(path.to_string()));
    }
    Ok(trimmed.split('/').collect())
}

/// Replace the value at `path`, creating intermediate mappings as needed.
pub fn set(root: &mut Value, path: &str, value: Value) -> Result<()> {
    let parts = segments(path)?;
    set_at(root, &parts, value);
    Ok(())
}

/// Delete the value at `path`, returning it if something was removed.
pub fn remove(root: &mut Value, path: &str) -> Result<Option<Value>> {
    let parts = segments(path)?;
    let Some((last, parents)) = parts.split_last() else {
        return Err(ApplyError::EmptyPath(path.to_string()));
    };

    let mut cur = root;
    for key in parents {
        match child_mut(cur, key) {
            Some(next) => cur = next,
            None => return Ok(None),
        }
    }

    Ok(match cur {
        Value::Object(map) => map.remove(*last),
        Value::Array(items) => parse_index(last)
            .filter(|i| *i < items.len())
            .map(|i| items.remove(i)),
        _ => None,
    })
}

/// Read the value at `path` without creating anything.
pub fn get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let parts = segments(path).ok()?;
    parts.iter().try_fold(root, |node, key| match node {
        Value::Object(map) => map.get(*key),
        Value::Array(items) => parse_index(key).and_then(|i| items.get(i)),
        _ => None,
    })
}

fn set_at(node: &mut Value, parts: &[&str], value: Value) {
    let Some((key, rest)) = parts.split_first() else {
        *node = value;
        return;
    };

    match node {
        Value::Object(map) => {
            let child = map.entry((*key).to_string()).or_insert(Value::Null);
            set_at(child, rest, value);
            return;
        }
        Value::Array(items) => {
            let index = parse_index(key);
            let appends = rest.is_empty() && (*key == "-" || index == Some(items.len()));
            if appends {
                items.push(value);
                return;
            }
            // An intermediate one past the end grows the sequence by a mapping.
            if index == Some(items.len()) {
                items.push(Value::Object(Map::new()));
            }
            if let Some(index) = index.filter(|i| *i < items.len()) {
                set_at(&mut items[index], rest, value);
                return;
            }
        }
        _ => {}
    }

    // Not addressable by this segment: destructive create.
    *node = Value::Object(Map::new());
    set_at(node, parts, value);
}

fn child_mut<'a>(node: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    match node {
        Value::Object(map) => map.get_mut(key),
        Value::Array(items) => parse_index(key).and_then(move |i| items.get_mut(i)),
        _ => None,
    }
}

fn parse_index(key: &str) -> Option<usize> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_segments_strip_leading_slash() {
        assert_eq!(segments("/a/b").unwrap(), vec!["a", "b"]);
        assert_eq!(segments("a/b").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_path_is_rejected() {
        assert!(matches!(segments(""), Err(ApplyError::EmptyPath(_))));
        assert!(matches!(segments("/"), Err(ApplyError::EmptyPath(_))));

        let mut doc = json!({});
        assert!(set(&mut doc, "/", json!(1)).is_err());
        assert!(remove(&mut doc, "").is_err());
    }

    #[test]
    fn test_set_creates_intermediates() {
        let mut doc = json!({});
        set(&mut doc, "/extracted/water/ph", json!(7.4)).unwrap();
        assert_eq!(doc, json!({"extracted": {"water": {"ph": 7.4}}}));
    }

    #[test]
    fn test_set_overwrites_scalar_intermediate() {
        let mut doc = json!({"a": {"b": 1}});
        set(&mut doc, "/a/b/c", json!(2)).unwrap();
        assert_eq!(doc, json!({"a": {"b": {"c": 2}}}));
    }

    #[test]
    fn test_set_overwrites_null_intermediate() {
        let mut doc = json!({"a": null});
        set(&mut doc, "/a/b", json!("x")).unwrap();
        assert_eq!(doc, json!({"a": {"b": "x"}}));
    }

    #[test]
    fn test_set_replaces_existing_value() {
        let mut doc = json!({"summary": "old", "extracted": {"k": [1, 2]}});
        set(&mut doc, "/summary", json!("new")).unwrap();
        set(&mut doc, "/extracted/k", json!({"x": 1})).unwrap();
        assert_eq!(doc, json!({"summary": "new", "extracted": {"k": {"x": 1}}}));
    }

    #[test]
    fn test_set_addresses_sequence_elements() {
        let mut doc = json!({"items": [{"n": 1}, {"n": 2}]});
        set(&mut doc, "/items/1/n", json!(5)).unwrap();
        set(&mut doc, "/items/-", json!({"n": 3})).unwrap();
        set(&mut doc, "/items/3", json!({"n": 4})).unwrap();
        assert_eq!(
            doc,
            json!({"items": [{"n": 1}, {"n": 5}, {"n": 3}, {"n": 4}]})
        );
    }

    #[test]
    fn test_set_through_index_past_end_extends_sequence() {
        let mut doc = json!({"items": [{"n": 1}, {"n": 2}]});
        set(&mut doc, "/items/2/n", json!(3)).unwrap();
        assert_eq!(doc, json!({"items": [{"n": 1}, {"n": 2}, {"n": 3}]}));

        let mut doc = json!({"items": []});
        set(&mut doc, "/items/0/a/b", json!(true)).unwrap();
        assert_eq!(doc, json!({"items": [{"a": {"b": true}}]}));
    }

    #[test]
    fn test_set_non_index_on_sequence_replaces_it() {
        let mut doc = json!({"highlights": ["a"]});
        set(&mut doc, "/highlights/latest/text", json!("b")).unwrap();
        assert_eq!(doc, json!({"highlights": {"latest": {"text": "b"}}}));
    }

    #[test]
    fn test_remove_existing_key() {
        let mut doc = json!({"x": {"y": 1, "z": 2}});
        let removed = remove(&mut doc, "/x/y").unwrap();
        assert_eq!(removed, Some(json!(1)));
        assert_eq!(doc, json!({"x": {"z": 2}}));
    }

    #[test]
    fn test_remove_missing_intermediate_is_noop() {
        let mut doc = json!({"a": 1});
        let before = doc.clone();
        assert_eq!(remove(&mut doc, "/x/y").unwrap(), None);
        assert_eq!(remove(&mut doc, "/a/b").unwrap(), None);
        assert_eq!(doc, before);
    }

    #[test]
    fn test_remove_sequence_element() {
        let mut doc = json!({"list": [1, 2, 3]});
        assert_eq!(remove(&mut doc, "/list/1").unwrap(), Some(json!(2)));
        assert_eq!(remove(&mut doc, "/list/9").unwrap(), None);
        assert_eq!(doc, json!({"list": [1, 3]}));
    }

    #[test]
    fn test_get() {
        let doc = json!({"a": {"b": [10, 20]}});
        assert_eq!(get(&doc, "/a/b/1"), Some(&json!(20)));
        assert_eq!(get(&doc, "/a/c"), None);
        assert_eq!(get(&doc, ""), None);
    }
}
