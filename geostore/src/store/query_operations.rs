use geostore_spatial::Geometry;

use super::read_operations::entry_fid;
use super::GeoStore;
use crate::errors::GeoStoreResult;
use crate::model::{LookupEntry, Record};
use crate::query::{build_predicate, MatchSpec};

/// What [`GeoStore::query_records`] reads for each match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Read the record file of each match.
    pub include_record: bool,
    /// Read the geometry file of each match.
    pub include_geometry: bool,
}

impl QueryOptions {
    pub fn new() -> Self {
        QueryOptions::default()
    }

    pub fn include_record(mut self, include_record: bool) -> Self {
        self.include_record = include_record;
        self
    }

    pub fn include_geometry(mut self, include_geometry: bool) -> Self {
        self.include_geometry = include_geometry;
        self
    }
}

/// One match of [`GeoStore::query_records`].
#[derive(Debug, Clone, PartialEq)]
pub struct QueryHit {
    pub entry: LookupEntry,
    pub record: Option<Record>,
    pub geometry: Option<Geometry>,
}

impl GeoStore {
    /// Returns the lookup entries of a collection that match `spec`.
    ///
    /// An entry matches when the entry itself or any object nested in it,
    /// typically its `properties`, has every field of `spec` equal to the
    /// given literal. Equality is typed: `"1"` does not match `1`. No
    /// record file is read.
    ///
    /// # Errors
    ///
    /// `FilterError` for an empty spec, `CollectionNotFound` for an unknown
    /// collection. No match is an empty vector, not an error.
    pub fn query_lookup(
        &self,
        collection_id: &str,
        spec: &MatchSpec,
    ) -> GeoStoreResult<Vec<LookupEntry>> {
        let predicate = build_predicate(spec)?;
        let collection = self.load_collection(collection_id)?;
        log::debug!("Querying {} with {}", collection_id, predicate);

        let mut hits = Vec::new();
        for entry in collection.lookup_entries {
            let node = serde_json::to_value(&entry)?;
            if predicate.matches_within(&node)? {
                hits.push(entry);
            }
        }
        log::info!("Query {} on {} matched {} records", predicate, collection_id, hits.len());
        Ok(hits)
    }

    /// Like [`GeoStore::query_lookup`], then reads the record and/or
    /// geometry file of every match, one after the other.
    ///
    /// Matches without a geometry get `None` even when geometries are
    /// requested.
    pub fn query_records(
        &self,
        collection_id: &str,
        spec: &MatchSpec,
        options: &QueryOptions,
    ) -> GeoStoreResult<Vec<QueryHit>> {
        let entries = self.query_lookup(collection_id, spec)?;

        let mut hits = Vec::with_capacity(entries.len());
        for entry in entries {
            let fid = entry_fid(&entry);
            let record = if options.include_record {
                Some(self.read_record(collection_id, fid, false)?)
            } else {
                None
            };
            let geometry = if options.include_geometry && entry.geom_hash().is_some() {
                Some(self.read_geometry(collection_id, fid)?)
            } else {
                None
            };
            hits.push(QueryHit {
                entry,
                record,
                geometry,
            });
        }
        Ok(hits)
    }
}
