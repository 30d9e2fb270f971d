use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::{FID, GEOM_HASH, PROP_HASH};
use crate::errors::{ErrorKind, GeoStoreError, GeoStoreResult};

/// Data types an attribute descriptor may declare.
pub const DATA_TYPES: [&str; 7] = [
    "string", "number", "integer", "boolean", "object", "array", "null",
];

/// Describes one attribute (property) field of the records in a collection.
///
/// Names follow the CF conventions loosely: `short_name` is the key used in
/// record attributes, `standard_name` a descriptive identifier, `units` a
/// UDUNITS-style unit string (`"1"` when unitless).
///
/// # Examples
///
/// ```rust
/// use geostore::model::AttributeDescriptor;
///
/// let iso = AttributeDescriptor::new("iso", "string")
///     .long_name("ISO 3166 alpha-3 code")
///     .units("1");
/// assert!(iso.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeDescriptor {
    pub short_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub missing_value: Value,
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl AttributeDescriptor {
    pub fn new(short_name: &str, data_type: &str) -> Self {
        AttributeDescriptor {
            short_name: short_name.to_string(),
            standard_name: None,
            units: None,
            long_name: None,
            description: None,
            missing_value: Value::Null,
            data_type: data_type.to_string(),
            url: None,
        }
    }

    pub fn standard_name(mut self, standard_name: &str) -> Self {
        self.standard_name = Some(standard_name.to_string());
        self
    }

    pub fn units(mut self, units: &str) -> Self {
        self.units = Some(units.to_string());
        self
    }

    pub fn long_name(mut self, long_name: &str) -> Self {
        self.long_name = Some(long_name.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn missing_value<T: Into<Value>>(mut self, missing_value: T) -> Self {
        self.missing_value = missing_value.into();
        self
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn validate(&self) -> GeoStoreResult<()> {
        if self.short_name.trim().is_empty() {
            log::error!("Attribute descriptor has an empty short_name");
            return Err(GeoStoreError::new(
                "Attribute descriptor short_name cannot be empty",
                ErrorKind::ValidationError,
            ));
        }
        if !DATA_TYPES.contains(&self.data_type.as_str()) {
            log::error!(
                "Attribute descriptor {} has unknown data_type {}",
                self.short_name,
                self.data_type
            );
            return Err(GeoStoreError::new(
                &format!(
                    "Attribute descriptor {} has unknown data_type '{}', expected one of {:?}",
                    self.short_name, self.data_type, DATA_TYPES
                ),
                ErrorKind::ValidationError,
            ));
        }
        Ok(())
    }
}

/// The descriptors every collection starts with, in order: `fid`,
/// `prop_hash`, `geom_hash`.
pub fn mandatory_descriptors() -> Vec<AttributeDescriptor> {
    vec![
        AttributeDescriptor::new(FID, "string")
            .standard_name("unique_identifier_of_record")
            .units("1")
            .long_name("Record identifier")
            .description("The universally unique identifier (UUID) of the record and its geometry")
            .url("https://en.wikipedia.org/wiki/Universally_unique_identifier"),
        AttributeDescriptor::new(PROP_HASH, "string")
            .standard_name("sha256_hash_of_attributes")
            .units("1")
            .long_name("Attributes SHA-256 hash")
            .description("A SHA-256 fingerprint of the caller-supplied record attributes")
            .url("https://en.wikipedia.org/wiki/SHA-2"),
        AttributeDescriptor::new(GEOM_HASH, "string")
            .standard_name("sha256_hash_of_geometry")
            .units("1")
            .long_name("Geometry SHA-256 hash")
            .description("A SHA-256 fingerprint of the normalized record geometry")
            .url("https://en.wikipedia.org/wiki/SHA-2"),
    ]
}

/// Prepends the mandatory descriptors to `extra` after validating it.
///
/// Extra descriptors may not repeat each other or a mandatory one.
pub fn with_mandatory(extra: Vec<AttributeDescriptor>) -> GeoStoreResult<Vec<AttributeDescriptor>> {
    let mut descriptors = mandatory_descriptors();
    for descriptor in extra {
        descriptor.validate()?;
        if descriptors.iter().any(|d| d.short_name == descriptor.short_name) {
            log::error!("Duplicate attribute descriptor {}", descriptor.short_name);
            return Err(GeoStoreError::new(
                &format!("Duplicate attribute descriptor {}", descriptor.short_name),
                ErrorKind::ValidationError,
            ));
        }
        descriptors.push(descriptor);
    }
    Ok(descriptors)
}
