//! GeoJSON geometry model.
//!
//! [`Geometry::from_value`] checks the structural shape of a document: the
//! geometry type, the nesting depth of `coordinates`, the arity of every
//! position, minimum vertex counts and ring closure. Anything that does not
//! fit is rejected with [`SpatialError::InvalidGeometry`] instead of being
//! silently dropped. A geometry assembled from its variants is checked
//! against the same rules by [`Geometry::validate`].
//!
//! Serialization always emits the canonical members `type` and
//! `coordinates` (or `geometries` for a collection). A foreign `bbox` member
//! on input is accepted and discarded since the store recomputes it.

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use serde_json::{json, Map, Value};
use std::fmt::{self, Display};

use crate::error::{SpatialError, SpatialResult};

/// A single coordinate tuple: `[x, y]` or `[x, y, z]`.
pub type Position = Vec<f64>;

/// Geometry type names understood by the store.
pub const GEOMETRY_TYPES: [&str; 7] = [
    "Point",
    "MultiPoint",
    "LineString",
    "MultiLineString",
    "Polygon",
    "MultiPolygon",
    "GeometryCollection",
];

/// Returns true when `type_name` is one of the GeoJSON geometry types.
pub fn is_geometry_type(type_name: &str) -> bool {
    GEOMETRY_TYPES.contains(&type_name)
}

/// A validated GeoJSON geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    /// Exterior ring first, followed by holes.
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    /// Parses and validates a geometry from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::UnsupportedType`] for an unknown `type` and
    /// [`SpatialError::InvalidGeometry`] for any structural problem.
    pub fn from_value(value: &Value) -> SpatialResult<Geometry> {
        let obj = value.as_object().ok_or_else(|| {
            SpatialError::InvalidGeometry("geometry must be a JSON object".to_string())
        })?;

        let type_name = obj.get("type").and_then(Value::as_str).ok_or_else(|| {
            SpatialError::InvalidGeometry("geometry has no string 'type' member".to_string())
        })?;

        if !is_geometry_type(type_name) {
            log::error!("Unsupported geometry type {}", type_name);
            return Err(SpatialError::UnsupportedType(type_name.to_string()));
        }

        let payload_key = if type_name == "GeometryCollection" {
            "geometries"
        } else {
            "coordinates"
        };
        check_members(obj, payload_key)?;

        let payload = obj.get(payload_key).ok_or_else(|| {
            SpatialError::InvalidGeometry(format!("{} has no '{}' member", type_name, payload_key))
        })?;

        match type_name {
            "Point" => Ok(Geometry::Point(parse_position(payload)?)),
            "MultiPoint" => Ok(Geometry::MultiPoint(parse_positions(payload)?)),
            "LineString" => Ok(Geometry::LineString(parse_line(payload)?)),
            "MultiLineString" => Ok(Geometry::MultiLineString(
                as_array(payload, "MultiLineString")?
                    .iter()
                    .map(parse_line)
                    .collect::<SpatialResult<_>>()?,
            )),
            "Polygon" => Ok(Geometry::Polygon(parse_polygon(payload)?)),
            "MultiPolygon" => Ok(Geometry::MultiPolygon(
                as_array(payload, "MultiPolygon")?
                    .iter()
                    .map(parse_polygon)
                    .collect::<SpatialResult<_>>()?,
            )),
            _ => Ok(Geometry::GeometryCollection(
                as_array(payload, "GeometryCollection")?
                    .iter()
                    .map(Geometry::from_value)
                    .collect::<SpatialResult<_>>()?,
            )),
        }
    }

    /// Parses and validates a geometry from JSON text.
    pub fn from_json(json: &str) -> SpatialResult<Geometry> {
        let value: Value = serde_json::from_str(json)?;
        Geometry::from_value(&value)
    }

    /// Checks the structural rules of [`Geometry::from_value`] on a geometry
    /// that was built directly from its variants.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidGeometry`] for a position without 2 or
    /// 3 finite ordinates, a line string shorter than 2 positions, or a
    /// linear ring that is shorter than 4 positions or not closed.
    pub fn validate(&self) -> SpatialResult<()> {
        match self {
            Geometry::Point(p) => check_position(p),
            Geometry::MultiPoint(c) => check_positions(c),
            Geometry::LineString(c) => check_line(c),
            Geometry::MultiLineString(lines) => lines.iter().try_for_each(|l| check_line(l)),
            Geometry::Polygon(rings) => check_polygon(rings),
            Geometry::MultiPolygon(polygons) => polygons.iter().try_for_each(|p| check_polygon(p)),
            Geometry::GeometryCollection(members) => members.iter().try_for_each(Geometry::validate),
        }
    }

    /// The GeoJSON `type` name of this geometry.
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::LineString(_) => "LineString",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
            Geometry::GeometryCollection(_) => "GeometryCollection",
        }
    }

    /// Converts the geometry into its canonical JSON form.
    pub fn to_value(&self) -> Value {
        match self {
            Geometry::Point(p) => json!({ "type": self.type_name(), "coordinates": p }),
            Geometry::MultiPoint(c) | Geometry::LineString(c) => {
                json!({ "type": self.type_name(), "coordinates": c })
            }
            Geometry::MultiLineString(c) | Geometry::Polygon(c) => {
                json!({ "type": self.type_name(), "coordinates": c })
            }
            Geometry::MultiPolygon(c) => json!({ "type": self.type_name(), "coordinates": c }),
            Geometry::GeometryCollection(members) => {
                let geometries: Vec<Value> = members.iter().map(Geometry::to_value).collect();
                json!({ "type": self.type_name(), "geometries": geometries })
            }
        }
    }

    /// Visits every position of the geometry in document order.
    pub fn for_each_position<F: FnMut(&Position)>(&self, f: &mut F) {
        match self {
            Geometry::Point(p) => f(p),
            Geometry::MultiPoint(c) | Geometry::LineString(c) => {
                for p in c {
                    f(p);
                }
            }
            Geometry::MultiLineString(c) | Geometry::Polygon(c) => {
                for p in c.iter().flatten() {
                    f(p);
                }
            }
            Geometry::MultiPolygon(c) => {
                for p in c.iter().flatten().flatten() {
                    f(p);
                }
            }
            Geometry::GeometryCollection(members) => {
                for member in members {
                    member.for_each_position(f);
                }
            }
        }
    }

    /// Visits every position mutably.
    pub fn for_each_position_mut<F: FnMut(&mut Position)>(&mut self, f: &mut F) {
        match self {
            Geometry::Point(p) => f(p),
            Geometry::MultiPoint(c) | Geometry::LineString(c) => {
                for p in c {
                    f(p);
                }
            }
            Geometry::MultiLineString(c) | Geometry::Polygon(c) => {
                for p in c.iter_mut().flatten() {
                    f(p);
                }
            }
            Geometry::MultiPolygon(c) => {
                for p in c.iter_mut().flatten().flatten() {
                    f(p);
                }
            }
            Geometry::GeometryCollection(members) => {
                for member in members {
                    member.for_each_position_mut(f);
                }
            }
        }
    }

    /// Number of positions in the geometry.
    pub fn num_positions(&self) -> usize {
        let mut count = 0;
        self.for_each_position(&mut |_| count += 1);
        count
    }

    /// True when the geometry holds no positions at all.
    pub fn is_empty(&self) -> bool {
        self.num_positions() == 0
    }
}

impl Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({} positions)", self.type_name(), self.num_positions())
    }
}

impl Serialize for Geometry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Geometry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Geometry::from_value(&value).map_err(de::Error::custom)
    }
}

impl TryFrom<&Value> for Geometry {
    type Error = SpatialError;

    fn try_from(value: &Value) -> SpatialResult<Self> {
        Geometry::from_value(value)
    }
}

fn check_members(obj: &Map<String, Value>, payload_key: &str) -> SpatialResult<()> {
    for key in obj.keys() {
        if key != "type" && key != "bbox" && key != payload_key {
            log::error!("Unexpected geometry member {}", key);
            return Err(SpatialError::InvalidGeometry(format!(
                "unexpected member '{}'",
                key
            )));
        }
    }
    Ok(())
}

fn as_array<'a>(value: &'a Value, context: &str) -> SpatialResult<&'a Vec<Value>> {
    value.as_array().ok_or_else(|| {
        SpatialError::InvalidGeometry(format!("{} coordinates must be an array", context))
    })
}

fn parse_position(value: &Value) -> SpatialResult<Position> {
    let position = as_array(value, "position")?
        .iter()
        .map(|v| {
            v.as_f64().ok_or_else(|| {
                SpatialError::InvalidGeometry(format!("ordinate {} is not a finite number", v))
            })
        })
        .collect::<SpatialResult<Position>>()?;
    check_position(&position)?;
    Ok(position)
}

fn parse_positions(value: &Value) -> SpatialResult<Vec<Position>> {
    as_array(value, "position list")?
        .iter()
        .map(parse_position)
        .collect()
}

fn parse_line(value: &Value) -> SpatialResult<Vec<Position>> {
    let line = parse_positions(value)?;
    check_line(&line)?;
    Ok(line)
}

fn parse_ring(value: &Value) -> SpatialResult<Vec<Position>> {
    let ring = parse_positions(value)?;
    check_ring(&ring)?;
    Ok(ring)
}

fn parse_polygon(value: &Value) -> SpatialResult<Vec<Vec<Position>>> {
    as_array(value, "Polygon")?.iter().map(parse_ring).collect()
}

fn check_position(position: &Position) -> SpatialResult<()> {
    if position.len() < 2 || position.len() > 3 {
        return Err(SpatialError::InvalidGeometry(format!(
            "position must have 2 or 3 ordinates, found {}",
            position.len()
        )));
    }
    if let Some(bad) = position.iter().find(|o| !o.is_finite()) {
        return Err(SpatialError::InvalidGeometry(format!(
            "ordinate {} is not a finite number",
            bad
        )));
    }
    Ok(())
}

fn check_positions(positions: &[Position]) -> SpatialResult<()> {
    positions.iter().try_for_each(check_position)
}

fn check_line(line: &[Position]) -> SpatialResult<()> {
    check_positions(line)?;
    if line.len() < 2 {
        return Err(SpatialError::InvalidGeometry(
            "line string must have at least 2 positions".to_string(),
        ));
    }
    Ok(())
}

fn check_ring(ring: &[Position]) -> SpatialResult<()> {
    check_positions(ring)?;
    if ring.len() < 4 {
        return Err(SpatialError::InvalidGeometry(
            "linear ring must have at least 4 positions".to_string(),
        ));
    }
    if ring.first() != ring.last() {
        return Err(SpatialError::InvalidGeometry(
            "linear ring is not closed".to_string(),
        ));
    }
    Ok(())
}

fn check_polygon(rings: &[Vec<Position>]) -> SpatialResult<()> {
    rings.iter().try_for_each(|ring| check_ring(ring))
}
