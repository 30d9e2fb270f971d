use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use super::{decode, encode, DocumentIoProvider};
use crate::errors::{ErrorKind, GeoStoreError, GeoStoreResult};

/// Keeps documents in memory.
///
/// Clones share the same contents. Directories are tracked so that writes
/// into a directory that was never created fail the way they would on disk.
/// [`InMemoryIo::fail_writes`] makes every subsequent write fail.
#[derive(Clone, Default)]
pub struct InMemoryIo {
    inner: Arc<InMemoryIoInner>,
}

#[derive(Default)]
struct InMemoryIoInner {
    documents: RwLock<HashMap<PathBuf, Vec<u8>>>,
    directories: RwLock<HashSet<PathBuf>>,
    failing_writes: AtomicBool,
}

impl InMemoryIo {
    pub fn new() -> Self {
        InMemoryIo::default()
    }

    /// Toggles write fault injection.
    pub fn fail_writes(&self, fail: bool) {
        self.inner.failing_writes.store(fail, Ordering::Relaxed);
    }

    /// Number of documents currently held.
    pub fn document_count(&self) -> usize {
        self.inner.documents.read().len()
    }

    /// Paths of all documents under `prefix`, sorted.
    pub fn documents_under(&self, prefix: &Path) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .inner
            .documents
            .read()
            .keys()
            .filter(|p| p.starts_with(prefix))
            .cloned()
            .collect();
        paths.sort();
        paths
    }

    fn is_directory(&self, path: &Path) -> bool {
        path.as_os_str().is_empty()
            || path.parent().is_none()
            || self.inner.directories.read().contains(path)
    }
}

impl DocumentIoProvider for InMemoryIo {
    fn exists(&self, path: &Path) -> GeoStoreResult<bool> {
        Ok(self.inner.documents.read().contains_key(path)
            || self.inner.directories.read().contains(path))
    }

    fn create_dir_all(&self, path: &Path) -> GeoStoreResult<()> {
        if self.inner.documents.read().contains_key(path) {
            log::error!("Cannot create directory {}: a document exists there", path.display());
            return Err(GeoStoreError::new(
                &format!("Cannot create directory {}: a document exists there", path.display()),
                ErrorKind::IOError,
            ));
        }

        let mut directories = self.inner.directories.write();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            directories.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn read_document(&self, path: &Path) -> GeoStoreResult<Value> {
        let documents = self.inner.documents.read();
        match documents.get(path) {
            Some(bytes) => decode(path, bytes),
            None => {
                log::error!("Document {} does not exist", path.display());
                Err(GeoStoreError::new(
                    &format!("Document {} does not exist", path.display()),
                    ErrorKind::FileNotFound,
                ))
            }
        }
    }

    fn write_document(
        &self,
        path: &Path,
        value: &Value,
        pretty: bool,
        _sync: bool,
    ) -> GeoStoreResult<()> {
        if self.inner.failing_writes.load(Ordering::Relaxed) {
            log::error!("Write to {} failed", path.display());
            return Err(GeoStoreError::new(
                &format!("Write to {} failed", path.display()),
                ErrorKind::IOError,
            ));
        }

        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        if !self.is_directory(parent) {
            log::error!("Directory {} does not exist", parent.display());
            return Err(GeoStoreError::new(
                &format!("Directory {} does not exist", parent.display()),
                ErrorKind::FileNotFound,
            ));
        }

        let bytes = encode(value, pretty)?;
        self.inner.documents.write().insert(path.to_path_buf(), bytes);
        Ok(())
    }
}
