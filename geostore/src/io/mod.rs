//! Document persistence.
//!
//! The store never touches the filesystem directly. Every read, write,
//! existence check and directory creation goes through a [`DocumentIo`],
//! which wraps a [`DocumentIoProvider`] implementation:
//!
//! - [`LocalFileIo`]: documents are JSON files on the local filesystem,
//!   written atomically through a temp file and rename
//! - [`InMemoryIo`]: documents live in a map; used by tests

mod local;
mod memory;

pub use local::*;
pub use memory::*;

use crate::errors::GeoStoreResult;
use serde_json::Value;
use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;

/// Low-level contract for reading and writing JSON documents at paths of a
/// hierarchical namespace.
///
/// # Thread Safety
/// Implementers must be `Send + Sync`; one backend is shared by every
/// clone of a store handle.
pub trait DocumentIoProvider: Send + Sync {
    /// Whether a document or directory exists at `path`.
    fn exists(&self, path: &Path) -> GeoStoreResult<bool>;

    /// Creates `path` and all missing parents. Existing directories are fine.
    fn create_dir_all(&self, path: &Path) -> GeoStoreResult<()>;

    /// Reads and parses the document at `path`.
    ///
    /// # Errors
    /// * `FileNotFound` if there is no document at `path`
    /// * `EncodingError` if the document is not valid JSON
    fn read_document(&self, path: &Path) -> GeoStoreResult<Value>;

    /// Replaces the document at `path` with `value`.
    ///
    /// The write must be all-or-nothing: after a failure the previous
    /// document, if any, is still intact.
    fn write_document(&self, path: &Path, value: &Value, pretty: bool, sync: bool)
        -> GeoStoreResult<()>;
}

/// Cheaply cloneable handle over a [`DocumentIoProvider`].
#[derive(Clone)]
pub struct DocumentIo {
    inner: Arc<dyn DocumentIoProvider>,
}

impl DocumentIo {
    pub fn new<T: DocumentIoProvider + 'static>(inner: T) -> Self {
        DocumentIo { inner: Arc::new(inner) }
    }
}

impl Default for DocumentIo {
    fn default() -> Self {
        DocumentIo::new(LocalFileIo::new())
    }
}

impl Deref for DocumentIo {
    type Target = Arc<dyn DocumentIoProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

pub(crate) fn encode(value: &Value, pretty: bool) -> GeoStoreResult<Vec<u8>> {
    let bytes = if pretty {
        serde_json::to_vec_pretty(value)?
    } else {
        serde_json::to_vec(value)?
    };
    Ok(bytes)
}

pub(crate) fn decode(path: &Path, bytes: &[u8]) -> GeoStoreResult<Value> {
    serde_json::from_slice(bytes).map_err(|e| {
        log::error!("Failed to parse document {}: {}", path.display(), e);
        crate::errors::GeoStoreError::new(
            &format!("Failed to parse document {}: {}", path.display(), e),
            crate::errors::ErrorKind::EncodingError,
        )
    })
}
