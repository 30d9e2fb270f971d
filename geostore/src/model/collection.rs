use serde::{Deserialize, Serialize};

use std::collections::HashSet;

use super::{AttributeDescriptor, LookupEntry};
use crate::common::MANDATORY_ATTRIBUTES;
use crate::errors::{ErrorKind, GeoStoreError, GeoStoreResult};

/// Descriptive metadata of a collection. Only `name` is required.
///
/// Keys are camelCase on disk, e.g. `altName` and `spatialCoverage`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CollectionMetadata {
    /// Display name
    pub name: String,
    /// License text or URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Preferably a semantic version such as `1.0.0`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Main language, e.g. `en`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
    /// e.g. `Global land`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial_coverage: Option<String>,
    /// e.g. `approx. 2018`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporal_coverage: Option<String>,
    /// Short statements describing the processing history
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_lineage: Option<Vec<String>>,
}

impl CollectionMetadata {
    pub fn new(name: &str) -> Self {
        CollectionMetadata {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> GeoStoreResult<()> {
        if self.name.trim().is_empty() {
            log::error!("Collection metadata name cannot be empty");
            return Err(GeoStoreError::new(
                "Collection metadata name cannot be empty",
                ErrorKind::ValidationError,
            ));
        }
        Ok(())
    }
}

/// One collection as recorded in the store index.
///
/// Serialized as `{id, collection_metadata, property_attributes, features}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionIndexEntry {
    pub id: String,
    #[serde(rename = "collection_metadata", default)]
    pub metadata: Option<CollectionMetadata>,
    #[serde(rename = "property_attributes")]
    pub attribute_descriptors: Vec<AttributeDescriptor>,
    #[serde(rename = "features")]
    pub lookup_entries: Vec<LookupEntry>,
}

impl CollectionIndexEntry {
    pub fn new(
        id: &str,
        metadata: Option<CollectionMetadata>,
        attribute_descriptors: Vec<AttributeDescriptor>,
    ) -> Self {
        CollectionIndexEntry {
            id: id.to_string(),
            metadata,
            attribute_descriptors,
            lookup_entries: Vec::new(),
        }
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.lookup_entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup_entries.is_empty()
    }

    /// Checks the entry as a whole.
    ///
    /// The descriptors must start with `fid`, `prop_hash` and `geom_hash` in
    /// that order, and neither descriptor short names nor lookup entry ids may
    /// repeat.
    pub fn validate(&self) -> GeoStoreResult<()> {
        validate_collection_id(&self.id)?;
        if let Some(metadata) = &self.metadata {
            metadata.validate()?;
        }

        let leading: Vec<&str> = self
            .attribute_descriptors
            .iter()
            .take(MANDATORY_ATTRIBUTES.len())
            .map(|d| d.short_name.as_str())
            .collect();
        if leading != MANDATORY_ATTRIBUTES {
            log::error!(
                "Collection {} must start with the attributes {:?}, found {:?}",
                self.id,
                MANDATORY_ATTRIBUTES,
                leading
            );
            return Err(GeoStoreError::new(
                &format!(
                    "Collection {} must start with the attributes {:?}",
                    self.id, MANDATORY_ATTRIBUTES
                ),
                ErrorKind::ValidationError,
            ));
        }

        let mut short_names = HashSet::new();
        for descriptor in &self.attribute_descriptors {
            descriptor.validate()?;
            if !short_names.insert(descriptor.short_name.as_str()) {
                log::error!(
                    "Duplicate attribute {} in collection {}",
                    descriptor.short_name,
                    self.id
                );
                return Err(GeoStoreError::new(
                    &format!(
                        "Duplicate attribute {} in collection {}",
                        descriptor.short_name, self.id
                    ),
                    ErrorKind::ValidationError,
                ));
            }
        }

        let mut ids = HashSet::new();
        for entry in &self.lookup_entries {
            entry.validate()?;
            if !ids.insert(entry.id.as_str()) {
                log::error!("Duplicate record {} in collection {}", entry.id, self.id);
                return Err(GeoStoreError::new(
                    &format!("Duplicate record {} in collection {}", entry.id, self.id),
                    ErrorKind::ValidationError,
                ));
            }
        }
        Ok(())
    }
}

/// Collection ids become directory names, so they must be a single
/// non-empty path component.
pub fn validate_collection_id(id: &str) -> GeoStoreResult<()> {
    let valid = !id.trim().is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\'])
        && !id.starts_with('.');
    if !valid {
        log::error!("Invalid collection id '{}'", id);
        return Err(GeoStoreError::new(
            &format!("Invalid collection id '{}'", id),
            ErrorKind::ValidationError,
        ));
    }
    Ok(())
}
