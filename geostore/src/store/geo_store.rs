use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::common::{
    store_locks, RootLock, DOCUMENT_EXTENSION, GEOMETRIES_DIR, RECORDS_DIR, STORE_INDEX_FILE,
};
use crate::errors::{ErrorKind, GeoStoreError, GeoStoreResult};
use crate::geo_store_builder::GeoStoreBuilder;
use crate::geo_store_config::GeoStoreConfig;
use crate::io::DocumentIo;
use crate::model::StoreIndex;

/// Handle to a directory-backed geospatial document store.
///
/// A store is a root directory holding the index document `.store_index`
/// and one directory per collection:
///
/// ```text
/// <root>/.store_index
/// <root>/<collection_id>/records/<fid>.doc
/// <root>/<collection_id>/geometries/<fid>.doc
/// ```
///
/// The handle never caches the index. Every operation reads it from disk,
/// and every mutating operation reloads, modifies and persists it while
/// holding the root's write lock, so handles on the same root within one
/// process never lose each other's updates.
///
/// Cloning is cheap and clones share configuration and lock.
///
/// # Examples
///
/// ```rust,no_run
/// use geostore::GeoStore;
/// use geostore::query::match_spec;
/// use serde_json::json;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = GeoStore::open("./fstore")?;
/// store.create_collection("countries", None, vec![])?;
/// let hits = store.query_lookup("countries", &match_spec(json!({"iso": "BRA"}))?)?;
/// println!("{} matches", hits.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GeoStore {
    inner: Arc<GeoStoreInner>,
}

struct GeoStoreInner {
    root: PathBuf,
    config: GeoStoreConfig,
    io: DocumentIo,
    lock: RootLock,
}

impl std::fmt::Debug for GeoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoStore")
            .field("root", &self.inner.root)
            .finish_non_exhaustive()
    }
}

impl GeoStore {
    /// Opens the store at `path` with default settings, creating it if
    /// needed.
    pub fn open<P: AsRef<Path>>(path: P) -> GeoStoreResult<GeoStore> {
        GeoStore::builder().open(path)
    }

    pub fn builder() -> GeoStoreBuilder {
        GeoStoreBuilder::new()
    }

    /// Loads the index at `root`, or creates the directory and an empty
    /// index. Calling it again on an existing store changes nothing.
    pub(crate) fn open_with_config(root: &Path, config: GeoStoreConfig) -> GeoStoreResult<GeoStore> {
        let io = config.document_io();
        let store = GeoStore {
            inner: Arc::new(GeoStoreInner {
                root: root.to_path_buf(),
                lock: store_locks().get_lock(root),
                config,
                io,
            }),
        };

        let lock = store.inner.lock.clone();
        let _guard = lock.write();
        if store.inner.io.exists(&store.index_path())? {
            let index = store.load_index()?;
            log::info!(
                "Opened existing store at {} with {} collections",
                root.display(),
                index.collections.len()
            );
        } else {
            log::info!("Creating store at {}", root.display());
            store.inner.io.create_dir_all(root)?;
            let index = StoreIndex::empty(&root.to_string_lossy());
            store.write_index(&index)?;
        }
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    pub fn config(&self) -> GeoStoreConfig {
        self.inner.config.clone()
    }

    /// Reloads the index from disk.
    pub fn index(&self) -> GeoStoreResult<StoreIndex> {
        let _guard = self.inner.lock.read();
        self.load_index()
    }

    /// Validates `index` and overwrites the index document with it.
    pub fn persist(&self, index: &StoreIndex) -> GeoStoreResult<()> {
        let _guard = self.inner.lock.write();
        self.write_index(index)
    }

    /// Logs a summary of the store at info level.
    pub fn summarise(&self) -> GeoStoreResult<()> {
        let index = self.index()?;
        log::info!("{}", index);
        Ok(())
    }

    pub(crate) fn io(&self) -> &DocumentIo {
        &self.inner.io
    }

    pub(crate) fn root_lock(&self) -> &RootLock {
        &self.inner.lock
    }

    pub(crate) fn index_path(&self) -> PathBuf {
        self.inner.root.join(STORE_INDEX_FILE)
    }

    pub(crate) fn collection_dir(&self, collection_id: &str) -> PathBuf {
        self.inner.root.join(collection_id)
    }

    pub(crate) fn records_dir(&self, collection_id: &str) -> PathBuf {
        self.collection_dir(collection_id).join(RECORDS_DIR)
    }

    pub(crate) fn geometries_dir(&self, collection_id: &str) -> PathBuf {
        self.collection_dir(collection_id).join(GEOMETRIES_DIR)
    }

    pub(crate) fn record_path(&self, collection_id: &str, fid: &str) -> PathBuf {
        self.records_dir(collection_id)
            .join(format!("{}.{}", fid, DOCUMENT_EXTENSION))
    }

    pub(crate) fn geometry_path(&self, collection_id: &str, fid: &str) -> PathBuf {
        self.geometries_dir(collection_id)
            .join(format!("{}.{}", fid, DOCUMENT_EXTENSION))
    }

    /// Reads the index without taking the lock.
    pub(crate) fn load_index(&self) -> GeoStoreResult<StoreIndex> {
        let path = self.index_path();
        let value = self.inner.io.read_document(&path).map_err(|e| {
            if e.kind().is_not_found() {
                GeoStoreError::new_with_cause(
                    &format!("No store index at {}", self.inner.root.display()),
                    ErrorKind::NotFound,
                    e,
                )
            } else {
                e
            }
        })?;
        let index: StoreIndex = serde_json::from_value(value)?;
        index.validate()?;
        Ok(index)
    }

    /// Writes the index without taking the lock.
    pub(crate) fn write_index(&self, index: &StoreIndex) -> GeoStoreResult<()> {
        index.validate()?;
        let value = serde_json::to_value(index)?;
        self.write_document(&self.index_path(), &value)
    }

    pub(crate) fn write_document(&self, path: &Path, value: &Value) -> GeoStoreResult<()> {
        let config = &self.inner.config;
        self.inner
            .io
            .write_document(path, value, config.pretty_print(), config.sync_on_write())
    }
}
