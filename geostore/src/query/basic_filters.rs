use std::fmt::Display;

use serde_json::Value;

use super::FilterProvider;
use crate::common::get_value;
use crate::errors::GeoStoreResult;

/// A filter that matches every node.
pub struct AllFilter;

impl FilterProvider for AllFilter {
    fn apply(&self, _node: &Value) -> GeoStoreResult<bool> {
        Ok(true)
    }
}

impl Display for AllFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AllFilter")
    }
}

/// A filter that matches nodes whose field equals a literal.
///
/// Equality is typed: a string never equals a number, and numbers compare
/// by value so `1` equals `1.0`. A missing field never matches, not even a
/// `null` literal.
pub struct EqualsFilter {
    field_name: String,
    field_value: Value,
}

impl EqualsFilter {
    #[inline]
    pub fn new(field_name: String, field_value: Value) -> Self {
        EqualsFilter {
            field_name,
            field_value,
        }
    }
}

impl Display for EqualsFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(@.{} == {})", self.field_name, self.field_value)
    }
}

impl FilterProvider for EqualsFilter {
    #[inline]
    fn apply(&self, node: &Value) -> GeoStoreResult<bool> {
        Ok(get_value(node, &self.field_name).is_some_and(|v| values_equal(v, &self.field_value)))
    }
}

/// Typed JSON equality with numeric comparison by value.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            match (x.as_i64(), y.as_i64(), x.as_u64(), y.as_u64()) {
                (Some(x), Some(y), _, _) => x == y,
                (_, _, Some(x), Some(y)) => x == y,
                _ => x.as_f64() == y.as_f64(),
            }
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter().all(|(k, v)| y.get(k).is_some_and(|w| values_equal(v, w)))
        }
        _ => a == b,
    }
}
