use geostore_spatial::{is_geometry_type, Geometry};
use serde_json::Value;

use super::Attributes;
use crate::common::{FEATURE, FEATURE_COLLECTION};
use crate::errors::{ErrorKind, GeoStoreError, GeoStoreResult};

const FEATURE_MEMBERS: [&str; 5] = ["type", "id", "properties", "geometry", "bbox"];
const COLLECTION_MEMBERS: [&str; 5] = ["type", "features", "bbox", "name", "crs"];

/// An input record: attributes with an optional geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub properties: Attributes,
    pub geometry: Option<Geometry>,
}

/// A GeoJSON document accepted for import.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoDocument {
    /// A bare geometry, imported as one record without attributes
    Geometry(Geometry),
    Feature(Feature),
    FeatureCollection(Vec<Feature>),
}

impl GeoDocument {
    /// Parses a document, dispatching on its `type`.
    ///
    /// # Errors
    ///
    /// `ValidationError` for an unknown type, a malformed geometry, a
    /// non-object `properties`, or an unexpected member.
    pub fn from_value(value: &Value) -> GeoStoreResult<GeoDocument> {
        let kind = value.get("type").and_then(Value::as_str).ok_or_else(|| {
            log::error!("Document has no type");
            GeoStoreError::new("Document has no type", ErrorKind::ValidationError)
        })?;

        match kind {
            FEATURE => Ok(GeoDocument::Feature(parse_feature(value)?)),
            FEATURE_COLLECTION => {
                check_members(value, &COLLECTION_MEMBERS)?;
                let features = value
                    .get("features")
                    .and_then(Value::as_array)
                    .ok_or_else(|| {
                        log::error!("FeatureCollection has no features array");
                        GeoStoreError::new(
                            "FeatureCollection has no features array",
                            ErrorKind::ValidationError,
                        )
                    })?;
                let features = features
                    .iter()
                    .map(parse_feature)
                    .collect::<GeoStoreResult<Vec<Feature>>>()?;
                Ok(GeoDocument::FeatureCollection(features))
            }
            t if is_geometry_type(t) => Ok(GeoDocument::Geometry(Geometry::from_value(value)?)),
            other => {
                log::error!("Unsupported document type {}", other);
                Err(GeoStoreError::new(
                    &format!("Unsupported document type '{}'", other),
                    ErrorKind::ValidationError,
                ))
            }
        }
    }

    pub fn from_json(json: &str) -> GeoStoreResult<GeoDocument> {
        let value: Value = serde_json::from_str(json)?;
        GeoDocument::from_value(&value)
    }

    /// Number of records the document will produce.
    pub fn len(&self) -> usize {
        match self {
            GeoDocument::FeatureCollection(features) => features.len(),
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattens the document into the records it describes, in order.
    pub fn into_features(self) -> Vec<Feature> {
        match self {
            GeoDocument::Geometry(geometry) => vec![Feature {
                properties: Attributes::new(),
                geometry: Some(geometry),
            }],
            GeoDocument::Feature(feature) => vec![feature],
            GeoDocument::FeatureCollection(features) => features,
        }
    }
}

fn parse_feature(value: &Value) -> GeoStoreResult<Feature> {
    if value.get("type").and_then(Value::as_str) != Some(FEATURE) {
        log::error!("Expected a Feature but found {}", value.get("type").unwrap_or(&Value::Null));
        return Err(GeoStoreError::new(
            "Expected a document of type 'Feature'",
            ErrorKind::ValidationError,
        ));
    }
    check_members(value, &FEATURE_MEMBERS)?;

    let properties = match value.get("properties") {
        None | Some(Value::Null) => Attributes::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => {
            log::error!("Feature properties must be an object");
            return Err(GeoStoreError::new(
                "Feature properties must be an object",
                ErrorKind::ValidationError,
            ));
        }
    };
    let geometry = match value.get("geometry") {
        None | Some(Value::Null) => None,
        Some(g) => Some(Geometry::from_value(g)?),
    };

    Ok(Feature {
        properties,
        geometry,
    })
}

fn check_members(value: &Value, allowed: &[&str]) -> GeoStoreResult<()> {
    if let Some(obj) = value.as_object() {
        if let Some(unknown) = obj.keys().find(|k| !allowed.contains(&k.as_str())) {
            log::error!("Unexpected member '{}' in document", unknown);
            return Err(GeoStoreError::new(
                &format!("Unexpected member '{}' in document", unknown),
                ErrorKind::ValidationError,
            ));
        }
    }
    Ok(())
}
