//! In-place path mutation of JSON documents.
//!
//! Each override is applied in two passes. The first walks the document
//! read-only, detects conflicts and computes the coerced leaf value; the
//! second creates missing containers and writes the leaf. A failing pair
//! therefore never leaves a half-written leaf behind, while pairs applied
//! before it in the same batch stay in place.

use super::BodyError;
use crate::coercion::{coerce_by_existing, coerce_by_inference};
use crate::models::{DataTable, TableError};
use crate::path::{PathExpression, Segment};
use log::{debug, info};
use serde_json::{Map, Value};

/// Applies every column of a two-row table (keys, then values) to `doc`.
pub fn apply_table(doc: &mut Value, table: &DataTable) -> Result<(), BodyError> {
    let pairs = table.two_row_pairs()?;
    info!("Updating JSON with {} table entries", pairs.len());

    for (key, value) in pairs {
        apply_pair(doc, key, value)?;
    }

    debug!("Updated JSON: {}", doc);
    Ok(())
}

/// Applies parallel key and value sequences to `doc`, pair by pair.
///
/// The sequences must have equal length.
pub fn apply<K, V>(doc: &mut Value, keys: &[K], values: &[V]) -> Result<(), BodyError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    if keys.len() != values.len() {
        return Err(TableError::Malformed(format!(
            "{} keys but {} values",
            keys.len(),
            values.len()
        ))
        .into());
    }

    for (key, value) in keys.iter().zip(values) {
        apply_pair(doc, key.as_ref(), value.as_ref())?;
    }
    Ok(())
}

/// Sets the leaf addressed by `key` to `raw`, coerced to the right JSON type.
///
/// # Examples
///
/// ```
/// use request_composer::body::apply_pair;
/// use serde_json::json;
///
/// let mut doc = json!({});
/// apply_pair(&mut doc, "a.b[2].c", "5").unwrap();
/// assert_eq!(doc, json!({"a": {"b": [{}, {}, {"c": 5}]}}));
/// ```
pub fn apply_pair(doc: &mut Value, key: &str, raw: &str) -> Result<(), BodyError> {
    let path = PathExpression::parse(key)?;
    let value = match inspect(doc, &path)? {
        Some(existing) => coerce_by_existing(existing, raw)?,
        None => coerce_by_inference(raw),
    };

    debug!("Setting '{}' to {}", path, value);
    write(doc, &path, value)
}

fn conflict(path: &PathExpression, segment: &Segment) -> BodyError {
    BodyError::PathConflict {
        path: path.as_str().to_string(),
        segment: segment.to_string(),
    }
}

/// Walks `path` without mutating and returns the current leaf, if any.
///
/// `null` containers count as absent and are replaced on write.
fn inspect<'a>(doc: &'a Value, path: &PathExpression) -> Result<Option<&'a Value>, BodyError> {
    let (parents, leaf) = path.split_leaf();

    let mut current = Some(doc);
    for segment in parents {
        current = match current {
            Some(container) => inspect_container(container, segment, path)?,
            None => None,
        };
    }

    match current {
        Some(container) => inspect_leaf(container, leaf, path),
        None => Ok(None),
    }
}

fn inspect_container<'a>(
    current: &'a Value,
    segment: &Segment,
    path: &PathExpression,
) -> Result<Option<&'a Value>, BodyError> {
    let map = current.as_object().ok_or_else(|| conflict(path, segment))?;

    match (map.get(&segment.name), segment.index) {
        (None | Some(Value::Null), _) => Ok(None),
        (Some(field @ Value::Object(_)), None) => Ok(Some(field)),
        (Some(Value::Array(items)), Some(i)) => match items.get(i) {
            None | Some(Value::Null) => Ok(None),
            Some(item @ Value::Object(_)) => Ok(Some(item)),
            Some(_) => Err(conflict(path, segment)),
        },
        _ => Err(conflict(path, segment)),
    }
}

fn inspect_leaf<'a>(
    current: &'a Value,
    leaf: &Segment,
    path: &PathExpression,
) -> Result<Option<&'a Value>, BodyError> {
    let map = current.as_object().ok_or_else(|| conflict(path, leaf))?;

    match (map.get(&leaf.name), leaf.index) {
        (field, None) => Ok(field),
        (None | Some(Value::Null), Some(_)) => Ok(None),
        (Some(Value::Array(items)), Some(i)) => Ok(items.get(i)),
        (Some(_), Some(_)) => Err(conflict(path, leaf)),
    }
}

/// Creates missing containers along `path` and sets the leaf.
fn write(doc: &mut Value, path: &PathExpression, value: Value) -> Result<(), BodyError> {
    let (parents, leaf) = path.split_leaf();

    let mut current = doc;
    for segment in parents {
        current = descend(current, segment, path)?;
    }

    let map = current
        .as_object_mut()
        .ok_or_else(|| conflict(path, leaf))?;

    match leaf.index {
        None => {
            map.insert(leaf.name.clone(), value);
        }
        Some(i) => {
            let slot = map.entry(leaf.name.clone()).or_insert(Value::Null);
            let items = ensure_array(slot).ok_or_else(|| conflict(path, leaf))?;
            let len = i.checked_add(1).ok_or_else(|| conflict(path, leaf))?;
            if items.len() < len {
                items.resize(len, Value::Null);
            }
            items[i] = value;
        }
    }
    Ok(())
}

fn descend<'a>(
    current: &'a mut Value,
    segment: &Segment,
    path: &PathExpression,
) -> Result<&'a mut Value, BodyError> {
    let map = current
        .as_object_mut()
        .ok_or_else(|| conflict(path, segment))?;
    let slot = map.entry(segment.name.clone()).or_insert(Value::Null);

    let next = match segment.index {
        None => slot,
        Some(i) => {
            let items = ensure_array(slot).ok_or_else(|| conflict(path, segment))?;
            let len = i.checked_add(1).ok_or_else(|| conflict(path, segment))?;
            if items.len() < len {
                items.resize_with(len, || Value::Object(Map::new()));
            }
            &mut items[i]
        }
    };

    if next.is_null() {
        *next = Value::Object(Map::new());
    }
    if !next.is_object() {
        return Err(conflict(path, segment));
    }
    Ok(next)
}

fn ensure_array(slot: &mut Value) -> Option<&mut Vec<Value>> {
    if slot.is_null() {
        *slot = Value::Array(Vec::new());
    }
    slot.as_array_mut()
}
