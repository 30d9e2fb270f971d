//! The store handle and its operations.
//!
//! Operations are grouped by concern:
//!
//! - **Store**: open, reload and persist the root index ([`GeoStore`])
//! - **Collections**: create, load and update collection entries
//! - **Records**: write records and import GeoJSON documents
//! - **Reads**: load record and geometry files
//! - **Queries**: match lookup entries against a [`crate::query::MatchSpec`]

mod collection_operations;
mod geo_store;
mod query_operations;
mod read_operations;
mod record_writer;

pub use geo_store::*;
pub use query_operations::*;
pub use record_writer::*;
