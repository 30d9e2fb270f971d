use serde_json::{Map, Value};

use super::{and, field, Filter};
use crate::errors::{ErrorKind, GeoStoreError, GeoStoreResult};

/// Field name to literal pairs that must all hold on one node.
pub type MatchSpec = Map<String, Value>;

/// Builds a [`MatchSpec`] from a JSON object.
///
/// # Errors
///
/// `FilterError` if `value` is not an object.
pub fn match_spec(value: Value) -> GeoStoreResult<MatchSpec> {
    match value {
        Value::Object(map) => Ok(map),
        other => {
            log::error!("Match specification must be an object, found {}", other);
            Err(GeoStoreError::new(
                "Match specification must be an object",
                ErrorKind::FilterError,
            ))
        }
    }
}

/// Builds the predicate for a match specification: one equality per
/// field, all of which must hold on the same node.
///
/// # Errors
///
/// `FilterError` for an empty specification or an empty field name.
pub fn build_predicate(spec: &MatchSpec) -> GeoStoreResult<Filter> {
    if spec.is_empty() {
        log::error!("Cannot build a predicate from an empty match specification");
        return Err(GeoStoreError::new(
            "Match specification cannot be empty",
            ErrorKind::FilterError,
        ));
    }

    let mut filters = Vec::with_capacity(spec.len());
    for (name, literal) in spec {
        if name.is_empty() {
            log::error!("Match specification contains an empty field name");
            return Err(GeoStoreError::new(
                "Match specification contains an empty field name",
                ErrorKind::FilterError,
            ));
        }
        filters.push(field(name).eq(literal.clone()));
    }
    Ok(and(filters))
}
