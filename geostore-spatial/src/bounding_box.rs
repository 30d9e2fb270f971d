use crate::error::{SpatialError, SpatialResult};
use crate::geometry::Geometry;

/// A 2D bounding box represented by minimum and maximum coordinates.
///
/// `BoundingBox` is the axis-aligned extent of a geometry's x/y ordinates.
/// Record files store it as the GeoJSON `bbox` array `[min_x, min_y, max_x, max_y]`.
///
/// # Examples
///
/// ```rust
/// use geostore_spatial::{BoundingBox, Geometry};
///
/// let line = Geometry::LineString(vec![vec![0.0, 5.0], vec![10.0, -5.0]]);
/// let bbox = BoundingBox::of(&line).unwrap();
/// assert_eq!(bbox.to_array(), [0.0, -5.0, 10.0, 5.0]);
/// ```
#[derive(Clone, PartialEq, Default, Debug, serde::Deserialize, serde::Serialize)]
#[serde(into = "[f64; 4]", try_from = "Vec<f64>")]
pub struct BoundingBox {
    /// Minimum X coordinate
    pub min_x: f64,
    /// Minimum Y coordinate
    pub min_y: f64,
    /// Maximum X coordinate
    pub max_x: f64,
    /// Maximum Y coordinate
    pub max_y: f64,
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BoundingBox({}, {}, {}, {})", self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        bbox.to_array()
    }
}

impl TryFrom<Vec<f64>> for BoundingBox {
    type Error = SpatialError;

    fn try_from(values: Vec<f64>) -> SpatialResult<Self> {
        BoundingBox::from_slice(&values)
    }
}

impl BoundingBox {
    /// Creates a new bounding box with the specified coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> BoundingBox {
        BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Computes the extent of a geometry.
    ///
    /// Only the first two ordinates of each position take part, and positions
    /// with fewer than two are skipped. Returns `None` for a geometry without
    /// usable positions.
    pub fn of(geometry: &Geometry) -> Option<BoundingBox> {
        let mut bbox: Option<BoundingBox> = None;
        geometry.for_each_position(&mut |p| {
            let (x, y) = match (p.first(), p.get(1)) {
                (Some(x), Some(y)) => (*x, *y),
                _ => return,
            };
            bbox = Some(match bbox.take() {
                None => BoundingBox::new(x, y, x, y),
                Some(b) => BoundingBox::new(
                    b.min_x.min(x),
                    b.min_y.min(y),
                    b.max_x.max(x),
                    b.max_y.max(y),
                ),
            });
        });
        bbox
    }

    /// Builds a bounding box from a `[min_x, min_y, max_x, max_y]` slice.
    pub fn from_slice(values: &[f64]) -> SpatialResult<BoundingBox> {
        match values {
            [min_x, min_y, max_x, max_y] => {
                let bbox = BoundingBox::new(*min_x, *min_y, *max_x, *max_y);
                if bbox.is_valid() {
                    Ok(bbox)
                } else {
                    Err(SpatialError::InvalidGeometry(format!("invalid bbox {}", bbox)))
                }
            }
            _ => Err(SpatialError::InvalidGeometry(format!(
                "bbox must have 4 values, found {}",
                values.len()
            ))),
        }
    }

    /// Returns the box as `[min_x, min_y, max_x, max_y]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }

    /// Checks if this bounding box is valid (min <= max).
    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }
}
