//! # GeoStore - Directory-backed geospatial document store
//!
//! GeoStore organizes geospatial vector data (points, lines, polygons and
//! their attributes) in a plain directory tree. Records are grouped in named
//! collections, each record is stored as two small JSON documents (its
//! attributes and its geometry), and a single index document keeps a compact
//! lookup entry per record so that queries never have to open every record.
//!
//! ## Key Features
//!
//! - **Plain files**: one index document plus one file per record and geometry
//! - **Fingerprints**: every record carries SHA-256 fingerprints of its
//!   attributes (`prop_hash`) and of its normalized geometry (`geom_hash`)
//! - **Canonical geometry**: coordinates are rounded to a fixed precision and
//!   rings are rewound before anything is hashed or written
//! - **Predicate queries**: exact-match queries over the lookup entries
//! - **Pluggable persistence**: local filesystem by default, in-memory for tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use geostore::model::Attributes;
//! use geostore::query::match_spec;
//! use geostore::{GeoStore, RecordOptions};
//! use geostore_spatial::Geometry;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = GeoStore::open("./fstore")?;
//! store.create_collection("countries", None, vec![])?;
//!
//! let mut attributes = Attributes::new();
//! attributes.insert("iso".into(), json!("BRA"));
//! let polygon = Geometry::from_value(&json!({
//!     "type": "Polygon",
//!     "coordinates": [[[-74, -34], [-34, -34], [-34, 5], [-74, 5], [-74, -34]]]
//! }))?;
//! let entry = store.create_record("countries", attributes, Some(polygon), &RecordOptions::new())?;
//!
//! let hits = store.query_lookup("countries", &match_spec(json!({"iso": "BRA"}))?)?;
//! # let _ = (entry, hits);
//! # Ok(())
//! # }
//! ```
//!
//! ## Layout
//!
//! ```text
//! <root>/.store_index
//! <root>/<collection_id>/records/<fid>.doc
//! <root>/<collection_id>/geometries/<fid>.doc
//! ```

pub mod common;
pub mod errors;
pub mod geo_store_builder;
pub mod geo_store_config;
pub mod io;
pub mod model;
pub mod query;
pub mod store;

pub use common::*;
pub use geo_store_builder::GeoStoreBuilder;
pub use geo_store_config::GeoStoreConfig;
pub use store::{GeoStore, QueryHit, QueryOptions, RecordOptions};
