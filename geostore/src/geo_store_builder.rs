use std::path::Path;

use crate::errors::{GeoStoreError, GeoStoreResult};
use crate::geo_store_config::GeoStoreConfig;
use crate::io::{DocumentIo, DocumentIoProvider};
use crate::store::GeoStore;

/// Builder for opening a GeoStore.
///
/// Setters capture the first configuration error, which is then returned by
/// [`GeoStoreBuilder::open`].
///
/// # Examples
///
/// ```rust,ignore
/// use geostore::GeoStore;
///
/// let store = GeoStore::builder()
///     .coordinate_precision(5)
///     .progress_interval(500)
///     .open("./fstore")?;
/// ```
#[derive(Default)]
pub struct GeoStoreBuilder {
    error: Option<GeoStoreError>,
    config: GeoStoreConfig,
}

impl GeoStoreBuilder {
    pub fn new() -> Self {
        GeoStoreBuilder {
            error: None,
            config: GeoStoreConfig::new(),
        }
    }

    /// Sets the default number of decimal places kept on coordinates.
    ///
    /// Values above 15 are rejected when opening.
    pub fn coordinate_precision(mut self, precision: u32) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_coordinate_precision(precision) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Writes documents indented instead of compact.
    pub fn pretty_print(mut self, pretty_print: bool) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_pretty_print(pretty_print) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Flushes every document to disk before it replaces the old one.
    pub fn sync_on_write(mut self, sync_on_write: bool) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_sync_on_write(sync_on_write) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Sets how many records a batch import processes between progress logs.
    pub fn progress_interval(mut self, interval: usize) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_progress_interval(interval) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Replaces the local filesystem backend.
    pub fn document_io<T: DocumentIoProvider + 'static>(mut self, provider: T) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_document_io(DocumentIo::new(provider)) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Reuses a backend handle, typically the one of an already open store.
    pub fn document_io_handle(mut self, document_io: DocumentIo) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_document_io(document_io) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Opens the store at `path`, creating it if it does not exist.
    ///
    /// # Returns
    ///
    /// `Ok(GeoStore)` if the store opened, or the first configuration error
    /// captured by the builder.
    pub fn open<P: AsRef<Path>>(self, path: P) -> GeoStoreResult<GeoStore> {
        if let Some(error) = self.error {
            return Err(error);
        }
        self.config.mark_configured();
        GeoStore::open_with_config(path.as_ref(), self.config)
    }
}
