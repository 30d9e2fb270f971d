use serde_json::Value;

use super::GeoStore;
use crate::common::set_value;
use crate::errors::{ErrorKind, GeoStoreError, GeoStoreResult};
use crate::model::{
    validate_collection_id, with_mandatory, AttributeDescriptor, CollectionIndexEntry,
    CollectionMetadata, StoreIndex,
};

impl GeoStore {
    /// Creates a collection and its `records` and `geometries` directories.
    ///
    /// The attribute descriptors of the new collection are the mandatory
    /// `fid`, `prop_hash` and `geom_hash` descriptors followed by `extra`.
    /// Creating a collection that already exists is a no-op which returns
    /// the current index unchanged.
    ///
    /// # Errors
    ///
    /// `ValidationError` for an invalid id, metadata or descriptor, and any
    /// I/O error of the backend.
    pub fn create_collection(
        &self,
        collection_id: &str,
        metadata: Option<CollectionMetadata>,
        extra: Vec<AttributeDescriptor>,
    ) -> GeoStoreResult<StoreIndex> {
        validate_collection_id(collection_id)?;
        if let Some(metadata) = &metadata {
            metadata.validate()?;
        }
        let descriptors = with_mandatory(extra)?;

        let _guard = self.root_lock().write();
        let mut index = self.load_index()?;
        if index.has_collection(collection_id) {
            log::info!(
                "Collection {} already exists in {}, returning the existing store",
                collection_id,
                self.root().display()
            );
            return Ok(index);
        }

        log::info!("Creating collection {} in {}", collection_id, self.root().display());
        self.io().create_dir_all(&self.records_dir(collection_id))?;
        self.io().create_dir_all(&self.geometries_dir(collection_id))?;

        index
            .collections
            .push(CollectionIndexEntry::new(collection_id, metadata, descriptors));
        self.write_index(&index)?;
        log::debug!("{}", index);
        Ok(index)
    }

    /// Reloads the index and returns the entry of one collection.
    ///
    /// # Errors
    ///
    /// `CollectionNotFound` if the index has no such collection.
    pub fn load_collection(&self, collection_id: &str) -> GeoStoreResult<CollectionIndexEntry> {
        let index = self.index()?;
        find_collection(index, collection_id)
    }

    /// Sets the value at a dotted `path` inside a collection entry.
    ///
    /// The path is relative to the entry as stored in the index, e.g.
    /// `collection_metadata.version` or `property_attributes.3.units`. The
    /// modified entry is validated again before the index is persisted; the
    /// collection id cannot be changed.
    pub fn update_collection(
        &self,
        collection_id: &str,
        path: &str,
        value: Value,
    ) -> GeoStoreResult<StoreIndex> {
        let _guard = self.root_lock().write();
        let mut index = self.load_index()?;
        let position = index
            .collections
            .iter()
            .position(|c| c.id == collection_id)
            .ok_or_else(|| not_found(collection_id))?;

        let mut entry = serde_json::to_value(&index.collections[position])?;
        set_value(&mut entry, path, value)?;
        let updated: CollectionIndexEntry = serde_json::from_value(entry)?;
        updated.validate()?;
        if updated.id != collection_id {
            log::error!("Cannot change the id of collection {}", collection_id);
            return Err(GeoStoreError::new(
                &format!("Cannot change the id of collection {}", collection_id),
                ErrorKind::ValidationError,
            ));
        }

        log::info!("Updating {} of collection {}", path, collection_id);
        index.collections[position] = updated;
        self.write_index(&index)?;
        Ok(index)
    }
}

pub(crate) fn find_collection(
    index: StoreIndex,
    collection_id: &str,
) -> GeoStoreResult<CollectionIndexEntry> {
    index
        .collections
        .into_iter()
        .find(|c| c.id == collection_id)
        .ok_or_else(|| not_found(collection_id))
}

pub(crate) fn not_found(collection_id: &str) -> GeoStoreError {
    log::error!("Collection {} not found", collection_id);
    GeoStoreError::new(
        &format!("Collection {} not found", collection_id),
        ErrorKind::CollectionNotFound,
    )
}
