use geostore_spatial::{BoundingBox, Geometry};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::{FEATURE, FID, GEOM_HASH, PROP_HASH};
use crate::errors::{ErrorKind, GeoStoreError, GeoStoreResult};

/// Attribute map of a record.
pub type Attributes = Map<String, Value>;

/// A stored record: attributes plus the extent of its geometry.
///
/// The geometry itself lives in its own file; in the record file the
/// `geometry` member is always `null`. [`Record::geometry`] is only filled
/// when a reader asks for the geometry to be attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Record {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(rename = "properties")]
    pub attributes: Attributes,
    #[serde(rename = "bbox", default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

impl Record {
    pub fn fid(&self) -> Option<&str> {
        self.attributes.get(FID).and_then(Value::as_str)
    }

    pub fn prop_hash(&self) -> Option<&str> {
        self.attributes.get(PROP_HASH).and_then(Value::as_str)
    }

    pub fn geom_hash(&self) -> Option<&str> {
        self.attributes.get(GEOM_HASH).and_then(Value::as_str)
    }

    pub fn validate(&self) -> GeoStoreResult<()> {
        validate_feature_header(&self.kind, &self.id, &self.attributes)?;
        if self.bounding_box.is_some() && self.geom_hash().is_none() {
            log::error!("Record {} has a bbox but no geom_hash", self.id);
            return Err(GeoStoreError::new(
                &format!("Record {} has a bbox but no geom_hash", self.id),
                ErrorKind::ValidationError,
            ));
        }
        Ok(())
    }
}

/// Index-resident projection of a record.
///
/// Holds `type`, `id` and a subset of the attributes that always includes
/// `fid` and `prop_hash`, plus `geom_hash` when the record has a geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LookupEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    #[serde(rename = "properties")]
    pub attributes: Attributes,
}

impl LookupEntry {
    /// Projects a record onto the mandatory attributes plus `index_fields`.
    ///
    /// Index fields the record does not have are skipped.
    pub fn project(record: &Record, index_fields: Option<&[String]>) -> LookupEntry {
        let mut attributes = Attributes::new();
        let mandatory = [FID, PROP_HASH, GEOM_HASH];
        let extra = index_fields.unwrap_or_default().iter().map(String::as_str);
        for key in mandatory.into_iter().chain(extra) {
            if let Some(value) = record.attributes.get(key) {
                attributes.insert(key.to_string(), value.clone());
            }
        }

        LookupEntry {
            kind: record.kind.clone(),
            id: record.id.clone(),
            attributes,
        }
    }

    pub fn fid(&self) -> Option<&str> {
        self.attributes.get(FID).and_then(Value::as_str)
    }

    pub fn prop_hash(&self) -> Option<&str> {
        self.attributes.get(PROP_HASH).and_then(Value::as_str)
    }

    pub fn geom_hash(&self) -> Option<&str> {
        self.attributes.get(GEOM_HASH).and_then(Value::as_str)
    }

    pub fn validate(&self) -> GeoStoreResult<()> {
        validate_feature_header(&self.kind, &self.id, &self.attributes)
    }
}

fn validate_feature_header(kind: &str, id: &str, attributes: &Attributes) -> GeoStoreResult<()> {
    if kind != FEATURE {
        log::error!("Expected type {} but found {}", FEATURE, kind);
        return Err(GeoStoreError::new(
            &format!("Expected type '{}' but found '{}'", FEATURE, kind),
            ErrorKind::ValidationError,
        ));
    }
    if attributes.get(FID).and_then(Value::as_str) != Some(id) {
        log::error!("Record {} does not carry a matching fid", id);
        return Err(GeoStoreError::new(
            &format!("Record {} does not carry a matching fid", id),
            ErrorKind::ValidationError,
        ));
    }
    if !attributes.get(PROP_HASH).is_some_and(Value::is_string) {
        log::error!("Record {} has no prop_hash", id);
        return Err(GeoStoreError::new(
            &format!("Record {} has no prop_hash", id),
            ErrorKind::ValidationError,
        ));
    }
    if attributes.get(GEOM_HASH).is_some_and(|v| !v.is_string()) {
        log::error!("Record {} has a non-string geom_hash", id);
        return Err(GeoStoreError::new(
            &format!("Record {} has a non-string geom_hash", id),
            ErrorKind::ValidationError,
        ));
    }
    Ok(())
}
