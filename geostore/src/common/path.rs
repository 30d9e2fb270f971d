use serde_json::{Map, Value};

use crate::common::FIELD_SEPARATOR;
use crate::errors::{ErrorKind, GeoStoreError, GeoStoreResult};

/// Reads the value at a dotted path.
///
/// Segments address object members by key and array elements by numeric
/// index, so `features.0.properties.iso` walks into the first feature.
/// Returns `None` when any segment is missing.
pub fn get_value<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }

    let mut current = root;
    for segment in path.split(FIELD_SEPARATOR) {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Writes `value` at a dotted path, creating intermediate objects.
///
/// An array segment must be an index inside the array, or equal to its
/// length on the last segment, which appends.
///
/// # Errors
///
/// Returns `ValidationError` for an empty path or segment, a non-numeric or
/// out-of-range array index, or a path that steps into a scalar.
pub fn set_value(root: &mut Value, path: &str, value: Value) -> GeoStoreResult<()> {
    let segments: Vec<&str> = path.split(FIELD_SEPARATOR).collect();
    if segments.iter().any(|s| s.is_empty()) {
        log::error!("Invalid path '{}'", path);
        return Err(GeoStoreError::new(
            &format!("Invalid path '{}': empty segment", path),
            ErrorKind::ValidationError,
        ));
    }

    let (last, parents) = match segments.split_last() {
        Some(split) => split,
        None => {
            return Err(GeoStoreError::new("Path cannot be empty", ErrorKind::ValidationError))
        }
    };

    let mut current = root;
    for segment in parents {
        current = match current {
            Value::Object(map) => map
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new())),
            Value::Array(items) => {
                let index = parse_index(path, segment, items.len())?;
                &mut items[index]
            }
            _ => return Err(scalar_error(path, segment)),
        };
    }

    match current {
        Value::Object(map) => {
            map.insert(last.to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            let index = parse_index(path, last, items.len() + 1)?;
            if index == items.len() {
                items.push(value);
            } else {
                items[index] = value;
            }
            Ok(())
        }
        _ => Err(scalar_error(path, last)),
    }
}

fn parse_index(path: &str, segment: &str, bound: usize) -> GeoStoreResult<usize> {
    match segment.parse::<usize>() {
        Ok(index) if index < bound => Ok(index),
        Ok(index) => {
            log::error!("Index {} out of range in path '{}'", index, path);
            Err(GeoStoreError::new(
                &format!("Index {} out of range in path '{}'", index, path),
                ErrorKind::ValidationError,
            ))
        }
        Err(_) => {
            log::error!("Invalid array index '{}' in path '{}'", segment, path);
            Err(GeoStoreError::new(
                &format!("Invalid array index '{}' in path '{}'", segment, path),
                ErrorKind::ValidationError,
            ))
        }
    }
}

fn scalar_error(path: &str, segment: &str) -> GeoStoreError {
    log::error!("Cannot set '{}' on a scalar value in path '{}'", segment, path);
    GeoStoreError::new(
        &format!("Cannot set '{}' on a scalar value in path '{}'", segment, path),
        ErrorKind::ValidationError,
    )
}
