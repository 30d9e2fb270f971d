use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use super::CollectionIndexEntry;
use crate::errors::{ErrorKind, GeoStoreError, GeoStoreResult};

/// Location information stored at the top of the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreInfo {
    pub root_path: String,
}

/// The root index document of a store, persisted as `<root>/.store_index`.
///
/// The index is the authority on which collections and records exist. It is
/// always reloaded from disk before being modified and written back in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreIndex {
    pub store: StoreInfo,
    pub collections: Vec<CollectionIndexEntry>,
}

impl StoreIndex {
    /// An index with no collections.
    pub fn empty(root_path: &str) -> Self {
        StoreIndex {
            store: StoreInfo {
                root_path: root_path.to_string(),
            },
            collections: Vec::new(),
        }
    }

    pub fn root_path(&self) -> &str {
        &self.store.root_path
    }

    pub fn collection(&self, id: &str) -> Option<&CollectionIndexEntry> {
        self.collections.iter().find(|c| c.id == id)
    }

    pub fn collection_mut(&mut self, id: &str) -> Option<&mut CollectionIndexEntry> {
        self.collections.iter_mut().find(|c| c.id == id)
    }

    pub fn has_collection(&self, id: &str) -> bool {
        self.collection(id).is_some()
    }

    pub fn collection_ids(&self) -> Vec<&str> {
        self.collections.iter().map(|c| c.id.as_str()).collect()
    }

    pub fn validate(&self) -> GeoStoreResult<()> {
        for (i, collection) in self.collections.iter().enumerate() {
            collection.validate()?;
            if self.collections[..i].iter().any(|c| c.id == collection.id) {
                log::error!("Duplicate collection id {} in store index", collection.id);
                return Err(GeoStoreError::new(
                    &format!("Duplicate collection id {} in store index", collection.id),
                    ErrorKind::ValidationError,
                ));
            }
        }
        Ok(())
    }
}

impl Display for StoreIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GeoStore at {} ({} collections)",
            self.store.root_path,
            self.collections.len()
        )?;
        for collection in &self.collections {
            let name = collection
                .metadata
                .as_ref()
                .map(|m| m.name.as_str())
                .unwrap_or("-");
            write!(
                f,
                "\n  {} [{}]: {} records, {} attributes",
                collection.id,
                name,
                collection.len(),
                collection.attribute_descriptors.len()
            )?;
        }
        Ok(())
    }
}
