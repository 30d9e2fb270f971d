use std::fmt::Display;
use std::ops::Deref;
use std::sync::Arc;

use serde_json::Value;

use super::{AllFilter, AndFilter, EqualsFilter};
use crate::errors::GeoStoreResult;

/// Trait for implementing filters over JSON nodes.
///
/// A `FilterProvider` decides whether a single node of a document tree
/// matches. Tree walking is done by [`Filter::select`] and
/// [`Filter::matches_within`], so providers only look at one node.
pub trait FilterProvider: Send + Sync + Display {
    /// Applies the filter to one node.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the node matches, `Ok(false)` otherwise
    fn apply(&self, node: &Value) -> GeoStoreResult<bool>;
}

/// A predicate over the nodes of a JSON tree.
///
/// `Filter` wraps a [`FilterProvider`] and adds the tree-walking queries
/// used by the store: which nodes below a root match, and whether anything
/// inside a value matches.
///
/// # Examples
///
/// ```rust
/// use geostore::query::{and, field};
/// use serde_json::json;
///
/// let doc = json!({"features": [
///     {"properties": {"iso": "BRA", "kind": "country"}},
///     {"properties": {"iso": "ARG", "kind": "country"}}
/// ]});
/// let filter = and(vec![field("iso").eq("BRA"), field("kind").eq("country")]);
/// let hits = filter.select(&doc).unwrap();
/// assert_eq!(hits, vec![&json!({"iso": "BRA", "kind": "country"})]);
/// ```
#[derive(Clone)]
pub struct Filter {
    inner: Arc<dyn FilterProvider>,
}

impl Filter {
    pub fn new<T: FilterProvider + 'static>(inner: T) -> Self {
        Filter { inner: Arc::new(inner) }
    }

    /// Combines this filter with another using logical AND.
    pub fn and(&self, filter: Filter) -> Self {
        Filter::new(AndFilter::new(vec![self.clone(), filter]))
    }

    /// Every object node strictly below `root` that the filter accepts, in
    /// document order (pre-order, members before later siblings).
    pub fn select<'a>(&self, root: &'a Value) -> GeoStoreResult<Vec<&'a Value>> {
        let mut hits = Vec::new();
        for child in children(root) {
            self.collect(child, &mut hits)?;
        }
        Ok(hits)
    }

    /// Whether `value` itself or any object node below it matches.
    pub fn matches_within(&self, value: &Value) -> GeoStoreResult<bool> {
        if value.is_object() && self.apply(value)? {
            return Ok(true);
        }
        for child in children(value) {
            if self.matches_within(child)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn collect<'a>(&self, node: &'a Value, hits: &mut Vec<&'a Value>) -> GeoStoreResult<()> {
        if node.is_object() && self.apply(node)? {
            hits.push(node);
        }
        for child in children(node) {
            self.collect(child, hits)?;
        }
        Ok(())
    }
}

fn children(value: &Value) -> Box<dyn Iterator<Item = &Value> + '_> {
    match value {
        Value::Object(map) => Box::new(map.values()),
        Value::Array(items) => Box::new(items.iter()),
        _ => Box::new(std::iter::empty()),
    }
}

impl Display for Filter {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Filter({})", self.inner)
    }
}

impl Deref for Filter {
    type Target = Arc<dyn FilterProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Creates a filter that matches every node.
pub fn all() -> Filter {
    Filter::new(AllFilter)
}

/// Combines multiple filters using logical AND.
pub fn and(filters: Vec<Filter>) -> Filter {
    Filter::new(AndFilter::new(filters))
}

/// Creates a filter builder for a field of the node under test.
///
/// The field name may be a dotted path into nested members.
pub fn field(field_name: &str) -> FluentFilter {
    FluentFilter {
        field_name: field_name.to_string(),
    }
}

/// Fluent builder returned by [`field`].
pub struct FluentFilter {
    field_name: String,
}

impl FluentFilter {
    /// Matches nodes whose field equals `value`.
    #[inline]
    pub fn eq<T: Into<Value>>(self, value: T) -> Filter {
        Filter::new(EqualsFilter::new(self.field_name, value.into()))
    }
}
