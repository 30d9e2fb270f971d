//! Predicate queries over JSON trees.
//!
//! A query is a [`Filter`] evaluated on every object node of a tree. The
//! store builds its filters from a [`MatchSpec`] with [`build_predicate`],
//! but filters can be composed directly too:
//!
//! ```rust
//! use geostore::query::{and, field};
//!
//! let filter = and(vec![field("iso").eq("BRA"), field("kind").eq("country")]);
//! assert_eq!(filter.to_string(), "((@.iso == \"BRA\") && (@.kind == \"country\"))");
//! ```

mod filter;
mod predicate;

mod basic_filters;
mod logical_filters;

pub use basic_filters::*;
pub use filter::*;
pub use logical_filters::*;
pub use predicate::*;
