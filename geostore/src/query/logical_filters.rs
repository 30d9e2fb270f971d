use std::fmt::Display;

use serde_json::Value;

use super::{Filter, FilterProvider};
use crate::errors::GeoStoreResult;

/// A filter that applies logical AND over multiple filters.
///
/// Evaluation stops at the first filter that does not match.
pub struct AndFilter {
    filters: Vec<Filter>,
}

impl AndFilter {
    pub fn new(filters: Vec<Filter>) -> Self {
        AndFilter { filters }
    }
}

impl Display for AndFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let filters: Vec<String> = self.filters.iter().map(|f| f.to_string()).collect();
        write!(f, "({})", filters.join(" && "))
    }
}

impl FilterProvider for AndFilter {
    #[inline]
    fn apply(&self, node: &Value) -> GeoStoreResult<bool> {
        for filter in &self.filters {
            if !filter.apply(node)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
