//! Coordinate precision reduction.

use crate::error::{SpatialError, SpatialResult};
use crate::geometry::Geometry;

/// Largest number of decimal places that still round-trips through `f64`.
pub const MAX_PRECISION: u32 = 15;

/// Rounds a single ordinate to `precision` decimal places.
///
/// Rounding an already-rounded value returns the same value. Values too
/// large to scale by `10^precision` have no fractional digits left and are
/// returned unchanged.
#[inline]
pub fn round_ordinate(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    let rounded = scaled.round() / factor;
    // normalize negative zero so fingerprints do not depend on the sign of 0
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Rounds every ordinate of the geometry, in place, to `precision` decimal places.
///
/// # Errors
///
/// Returns [`SpatialError::InvalidGeometry`] when `precision` exceeds [`MAX_PRECISION`].
pub fn round_coordinates(geometry: &mut Geometry, precision: u32) -> SpatialResult<()> {
    if precision > MAX_PRECISION {
        log::error!("Coordinate precision {} exceeds {}", precision, MAX_PRECISION);
        return Err(SpatialError::InvalidGeometry(format!(
            "coordinate precision {} exceeds the maximum of {}",
            precision, MAX_PRECISION
        )));
    }

    geometry.for_each_position_mut(&mut |position| {
        for ordinate in position.iter_mut() {
            *ordinate = round_ordinate(*ordinate, precision);
        }
    });
    Ok(())
}
