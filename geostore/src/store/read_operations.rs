use std::path::Path;

use geostore_spatial::Geometry;

use super::GeoStore;
use crate::errors::{ErrorKind, GeoStoreError, GeoStoreResult};
use crate::model::{validate_collection_id, LookupEntry, Record};

impl GeoStore {
    /// Reads a record file, optionally attaching its geometry.
    ///
    /// # Errors
    ///
    /// `NotFound` if the record (or the requested geometry) does not exist.
    pub fn read_record(
        &self,
        collection_id: &str,
        fid: &str,
        include_geometry: bool,
    ) -> GeoStoreResult<Record> {
        validate_collection_id(collection_id)?;
        validate_fid(fid)?;

        let value = self.read_existing(&self.record_path(collection_id, fid), "Record", fid)?;
        let mut record: Record = serde_json::from_value(value)?;
        record.validate()?;

        if include_geometry && record.geom_hash().is_some() {
            record.geometry = Some(self.read_geometry(collection_id, fid)?);
        }
        Ok(record)
    }

    /// Reads the normalized geometry of a record.
    pub fn read_geometry(&self, collection_id: &str, fid: &str) -> GeoStoreResult<Geometry> {
        validate_collection_id(collection_id)?;
        validate_fid(fid)?;

        let value = self.read_existing(&self.geometry_path(collection_id, fid), "Geometry", fid)?;
        Ok(Geometry::from_value(&value)?)
    }

    /// Reads the records behind a list of lookup entries, in order.
    pub fn read_records(
        &self,
        collection_id: &str,
        entries: &[LookupEntry],
        include_geometry: bool,
    ) -> GeoStoreResult<Vec<Record>> {
        entries
            .iter()
            .map(|entry| self.read_record(collection_id, entry_fid(entry), include_geometry))
            .collect()
    }

    /// Reads the geometries behind a list of lookup entries, in order.
    pub fn read_geometries(
        &self,
        collection_id: &str,
        entries: &[LookupEntry],
    ) -> GeoStoreResult<Vec<Geometry>> {
        entries
            .iter()
            .map(|entry| self.read_geometry(collection_id, entry_fid(entry)))
            .collect()
    }

    fn read_existing(&self, path: &Path, what: &str, fid: &str) -> GeoStoreResult<serde_json::Value> {
        self.io().read_document(path).map_err(|e| {
            if e.kind().is_not_found() {
                GeoStoreError::new_with_cause(
                    &format!("{} {} not found", what, fid),
                    ErrorKind::NotFound,
                    e,
                )
            } else {
                e
            }
        })
    }
}

pub(crate) fn entry_fid(entry: &LookupEntry) -> &str {
    entry.fid().unwrap_or(&entry.id)
}

fn validate_fid(fid: &str) -> GeoStoreResult<()> {
    if fid.is_empty() || fid.starts_with('.') || fid.contains(['/', '\\']) {
        log::error!("Invalid record id '{}'", fid);
        return Err(GeoStoreError::new(
            &format!("Invalid record id '{}'", fid),
            ErrorKind::InvalidFieldName,
        ));
    }
    Ok(())
}
