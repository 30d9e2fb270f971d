use std::fs;
use std::io::Write;
use std::path::Path;

use serde_json::Value;
use tempfile::NamedTempFile;

use super::{decode, encode, DocumentIoProvider};
use crate::errors::{ErrorKind, GeoStoreError, GeoStoreResult};

/// Stores documents as JSON files on the local filesystem.
///
/// Writes go to a temporary file in the destination directory which is then
/// renamed over the target, so readers never observe a half-written file.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileIo;

impl LocalFileIo {
    pub fn new() -> Self {
        LocalFileIo
    }
}

impl DocumentIoProvider for LocalFileIo {
    fn exists(&self, path: &Path) -> GeoStoreResult<bool> {
        Ok(path.try_exists()?)
    }

    fn create_dir_all(&self, path: &Path) -> GeoStoreResult<()> {
        fs::create_dir_all(path).map_err(|e| {
            log::error!("Failed to create directory {}: {}", path.display(), e);
            GeoStoreError::from(e)
        })
    }

    fn read_document(&self, path: &Path) -> GeoStoreResult<Value> {
        match fs::read(path) {
            Ok(bytes) => decode(path, &bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::error!("Document {} does not exist", path.display());
                Err(GeoStoreError::new(
                    &format!("Document {} does not exist", path.display()),
                    ErrorKind::FileNotFound,
                ))
            }
            Err(e) => {
                log::error!("Failed to read document {}: {}", path.display(), e);
                Err(e.into())
            }
        }
    }

    fn write_document(
        &self,
        path: &Path,
        value: &Value,
        pretty: bool,
        sync: bool,
    ) -> GeoStoreResult<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let bytes = encode(value, pretty)?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| {
            log::error!("Failed to create temp file in {}: {}", dir.display(), e);
            GeoStoreError::from(e)
        })?;
        tmp.write_all(&bytes)?;
        if sync {
            tmp.as_file().sync_all()?;
        }
        tmp.persist(path).map_err(|e| {
            log::error!("Failed to persist document {}: {}", path.display(), e.error);
            GeoStoreError::from(e)
        })?;
        Ok(())
    }
}
