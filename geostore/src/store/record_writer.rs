use std::time::Instant;

use geostore_spatial::{normalize, BoundingBox, Geometry};
use serde_json::Value;

use super::collection_operations::not_found;
use super::GeoStore;
use crate::common::{fingerprint, fingerprint_of, generate_fid, FEATURE, FID, GEOM_HASH, PROP_HASH};
use crate::errors::{ErrorKind, GeoStoreError, GeoStoreResult};
use crate::geo_store_config::validate_precision;
use crate::model::{validate_collection_id, Attributes, GeoDocument, LookupEntry, Record, StoreIndex};

/// Per-record options of [`GeoStore::create_record`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordOptions {
    /// Attributes copied into the lookup entry besides the mandatory ones.
    pub index_fields: Option<Vec<String>>,
    /// Overrides the store's coordinate precision.
    pub coordinate_precision: Option<u32>,
}

impl RecordOptions {
    pub fn new() -> Self {
        RecordOptions::default()
    }

    pub fn index_fields<S: AsRef<str>>(mut self, fields: &[S]) -> Self {
        self.index_fields = Some(fields.iter().map(|f| f.as_ref().to_string()).collect());
        self
    }

    pub fn coordinate_precision(mut self, precision: u32) -> Self {
        self.coordinate_precision = Some(precision);
        self
    }
}

impl GeoStore {
    /// Writes one record and returns its lookup entry.
    ///
    /// The attribute fingerprint `prop_hash` is taken over `attributes` as
    /// given, before `fid`, `prop_hash` or `geom_hash` are added. A geometry
    /// is rounded to the coordinate precision and rewound (exterior rings
    /// clockwise, holes counter-clockwise) before its fingerprint
    /// `geom_hash` and bbox are computed, and is written to its own file
    /// ahead of the record file.
    ///
    /// The returned entry is not added to the index; see
    /// [`GeoStore::create_records_from_document`] for that.
    ///
    /// # Errors
    ///
    /// * `CollectionNotFound` if the collection directory does not exist
    /// * `InvalidOperation` for a coordinate precision above 15
    /// * `ValidationError` for a malformed geometry, such as a position
    ///   without two ordinates or a ring that is not closed
    /// * any I/O error of the backend, after which an orphaned geometry
    ///   file may remain
    pub fn create_record(
        &self,
        collection_id: &str,
        attributes: Attributes,
        geometry: Option<Geometry>,
        options: &RecordOptions,
    ) -> GeoStoreResult<LookupEntry> {
        validate_collection_id(collection_id)?;
        if !self.io().exists(&self.records_dir(collection_id))? {
            return Err(not_found(collection_id));
        }
        let precision = options
            .coordinate_precision
            .unwrap_or_else(|| self.config().coordinate_precision());
        validate_precision(precision)?;

        let fid = generate_fid();
        let prop_hash = fingerprint(&Value::Object(attributes.clone()))?;

        let mut stored = attributes;
        if geometry.is_none() && stored.remove(GEOM_HASH).is_some() {
            log::warn!("Dropping caller-supplied {} of record {} without geometry", GEOM_HASH, fid);
        }
        stored.insert(PROP_HASH.to_string(), Value::String(prop_hash));
        stored.insert(FID.to_string(), Value::String(fid.clone()));

        let mut bounding_box = None;
        if let Some(geometry) = geometry {
            geometry.validate().map_err(|e| {
                log::error!("Invalid geometry for record {}: {}", fid, e);
                GeoStoreError::from(e)
            })?;
            let normalized = normalize(geometry, precision)?;
            stored.insert(GEOM_HASH.to_string(), Value::String(fingerprint_of(&normalized)?));
            bounding_box = BoundingBox::of(&normalized);
            self.write_document(
                &self.geometry_path(collection_id, &fid),
                &normalized.to_value(),
            )?;
        }

        let record = Record {
            kind: FEATURE.to_string(),
            id: fid.clone(),
            geometry: None,
            attributes: stored,
            bounding_box,
        };
        record.validate()?;
        self.write_document(
            &self.record_path(collection_id, &fid),
            &serde_json::to_value(&record)?,
        )?;
        log::debug!("Created record {} in {}", fid, collection_id);

        Ok(LookupEntry::project(&record, options.index_fields.as_deref()))
    }

    /// Imports every record of a document and appends their lookup entries
    /// to the collection, in document order.
    ///
    /// A bare geometry becomes one record without attributes, a feature one
    /// record, and a feature collection one record per feature. Records are
    /// written first; the index is then reloaded, extended and persisted.
    ///
    /// # Errors
    ///
    /// `CollectionNotFound` if the collection was not created first, plus
    /// the errors of [`GeoStore::create_record`]. Records written before a
    /// failure stay on disk without being indexed.
    pub fn create_records_from_document(
        &self,
        collection_id: &str,
        document: &GeoDocument,
        index_fields: Option<&[String]>,
    ) -> GeoStoreResult<StoreIndex> {
        // fail before writing anything if the collection is unknown
        self.load_collection(collection_id)?;

        let started = Instant::now();
        let total = document.len();
        let interval = self.config().progress_interval();
        let options = RecordOptions {
            index_fields: index_fields.map(|f| f.to_vec()),
            coordinate_precision: None,
        };
        log::info!("Adding {} records to collection {}", total, collection_id);

        let mut entries = Vec::with_capacity(total);
        for (i, feature) in document.clone().into_features().into_iter().enumerate() {
            let entry = self.create_record(collection_id, feature.properties, feature.geometry, &options)?;
            entries.push(entry);
            if (i + 1) % interval == 0 {
                log::info!("{}/{} records written to {}", i + 1, total, collection_id);
            }
        }

        let _guard = self.root_lock().write();
        let mut index = self.load_index()?;
        let collection = index.collection_mut(collection_id).ok_or_else(|| {
            GeoStoreError::new_with_cause(
                &format!("Collection {} disappeared during import", collection_id),
                ErrorKind::CollectionNotFound,
                not_found(collection_id),
            )
        })?;
        collection.lookup_entries.extend(entries);
        self.write_index(&index)?;

        log::info!(
            "Added {} records to collection {} in {:?}",
            total,
            collection_id,
            started.elapsed()
        );
        log::debug!("{}", index);
        Ok(index)
    }
}
