//! Canonical form of a stored geometry.

use crate::error::SpatialResult;
use crate::geometry::Geometry;
use crate::precision::round_coordinates;
use crate::winding::rewind;

/// Default number of decimal places kept on every ordinate.
pub const DEFAULT_PRECISION: u32 = 6;

/// Brings a geometry into the form the store persists and fingerprints.
///
/// Coordinates are rounded to `precision` decimal places first, then ring
/// orientation is fixed (exterior clockwise, holes counter-clockwise). Rounding
/// runs first because it can change the orientation of tiny rings.
pub fn normalize(mut geometry: Geometry, precision: u32) -> SpatialResult<Geometry> {
    round_coordinates(&mut geometry, precision)?;
    rewind(&mut geometry);
    Ok(geometry)
}
