//! Polygon ring orientation.
//!
//! The store winds every exterior ring clockwise and every hole
//! counter-clockwise. This is the opposite of the RFC 7946 right-hand rule
//! and must stay that way: stored geometries and their fingerprints depend
//! on it.

use crate::geometry::{Geometry, Position};

/// Orientation of a linear ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
    /// The ring encloses no area.
    Degenerate,
}

/// Twice the signed area of the ring, positive for clockwise rings.
///
/// Uses `Σ (xᵢ − xᵢ₋₁)(yᵢ₋₁ + yᵢ)` over consecutive vertex pairs.
/// Positions with fewer than two ordinates do not take part.
pub fn ring_area_sign(ring: &[Position]) -> f64 {
    let points: Vec<(f64, f64)> = ring
        .iter()
        .filter_map(|p| match p.as_slice() {
            [x, y, ..] => Some((*x, *y)),
            _ => None,
        })
        .collect();
    let n = points.len();
    if n < 2 {
        return 0.0;
    }

    let mut area = 0.0;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = points[i];
        let (xj, yj) = points[j];
        area += (xi - xj) * (yj + yi);
        j = i;
    }
    area
}

/// Returns the orientation of a ring.
pub fn ring_orientation(ring: &[Position]) -> Orientation {
    let area = ring_area_sign(ring);
    if area > 0.0 {
        Orientation::Clockwise
    } else if area < 0.0 {
        Orientation::CounterClockwise
    } else {
        Orientation::Degenerate
    }
}

fn wind_ring(ring: &mut [Position], want: Orientation) {
    let current = ring_orientation(ring);
    if current != Orientation::Degenerate && current != want {
        ring.reverse();
    }
}

fn wind_polygon(rings: &mut [Vec<Position>]) {
    if let Some((exterior, holes)) = rings.split_first_mut() {
        wind_ring(exterior, Orientation::Clockwise);
        for hole in holes {
            wind_ring(hole, Orientation::CounterClockwise);
        }
    }
}

/// Applies the store's winding convention to every polygon in the geometry.
///
/// Points and line strings are left untouched. Rings without area keep their
/// vertex order, so applying the rule twice gives the same result as once.
pub fn rewind(geometry: &mut Geometry) {
    match geometry {
        Geometry::Polygon(rings) => wind_polygon(rings),
        Geometry::MultiPolygon(polygons) => {
            for rings in polygons.iter_mut() {
                wind_polygon(rings);
            }
        }
        Geometry::GeometryCollection(members) => {
            for member in members.iter_mut() {
                rewind(member);
            }
        }
        Geometry::Point(_)
        | Geometry::MultiPoint(_)
        | Geometry::LineString(_)
        | Geometry::MultiLineString(_) => {}
    }
}
