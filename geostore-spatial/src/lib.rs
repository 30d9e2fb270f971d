//! # GeoStore Spatial - Geometry handling for GeoStore
//!
//! This crate owns everything GeoStore does to a geometry before it is
//! written to disk:
//!
//! - **Validation**: [`Geometry::from_value`] checks the structural shape of a
//!   GeoJSON geometry and rejects anything malformed
//! - **Precision**: [`round_coordinates`] trims every ordinate to a fixed
//!   number of decimal places
//! - **Winding**: [`rewind`] orients exterior rings clockwise and holes
//!   counter-clockwise
//! - **Extent**: [`BoundingBox::of`] computes the `bbox` stored with a record
//!
//! ## Quick Start
//!
//! ```rust
//! use geostore_spatial::{normalize, BoundingBox, Geometry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let raw = Geometry::from_json(
//!     r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1],[0,0]]]}"#,
//! )?;
//! let stored = normalize(raw, 6)?;
//! let bbox = BoundingBox::of(&stored);
//! assert_eq!(bbox.map(|b| b.to_array()), Some([0.0, 0.0, 1.0, 1.0]));
//! # Ok(())
//! # }
//! ```

pub mod bounding_box;
pub mod error;
pub mod geometry;
pub mod normalize;
pub mod precision;
pub mod winding;

pub use bounding_box::BoundingBox;
pub use error::{SpatialError, SpatialResult};
pub use geometry::{is_geometry_type, Geometry, Position, GEOMETRY_TYPES};
pub use normalize::{normalize, DEFAULT_PRECISION};
pub use precision::{round_coordinates, round_ordinate, MAX_PRECISION};
pub use winding::{rewind, ring_orientation, Orientation};
