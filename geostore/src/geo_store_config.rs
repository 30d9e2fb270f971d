//! Configuration management for GeoStore.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use geostore_spatial::{DEFAULT_PRECISION, MAX_PRECISION};
use parking_lot::RwLock;

use crate::common::DEFAULT_PROGRESS_INTERVAL;
use crate::errors::{ErrorKind, GeoStoreError, GeoStoreResult};
use crate::io::DocumentIo;

/// Configuration of a GeoStore handle.
///
/// Cloning is cheap; clones share the same settings. Settings can only be
/// changed until the store is opened.
///
/// # Examples
///
/// ```rust,ignore
/// use geostore::GeoStore;
///
/// let store = GeoStore::builder()
///     .coordinate_precision(4)
///     .pretty_print(true)
///     .open("./fstore")?;
/// assert_eq!(store.config().coordinate_precision(), 4);
/// ```
#[derive(Clone)]
pub struct GeoStoreConfig {
    /// The pointer to implementation. Uses Arc for cheap cloning and thread safety.
    inner: Arc<GeoStoreConfigInner>,
}

impl Default for GeoStoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoStoreConfig {
    /// Creates a new configuration instance with default values.
    pub fn new() -> Self {
        GeoStoreConfig {
            inner: Arc::new(GeoStoreConfigInner::new()),
        }
    }

    /// Decimal places kept on geometry coordinates when a record does not
    /// ask for its own precision.
    pub fn coordinate_precision(&self) -> u32 {
        self.inner.coordinate_precision.load(Ordering::Relaxed)
    }

    /// # Errors
    ///
    /// Returns error if already configured or if `precision` exceeds the
    /// supported maximum.
    pub fn set_coordinate_precision(&self, precision: u32) -> GeoStoreResult<()> {
        self.inner.ensure_not_configured("coordinate precision")?;
        validate_precision(precision)?;
        self.inner.coordinate_precision.store(precision, Ordering::Relaxed);
        Ok(())
    }

    /// Whether documents are written indented.
    pub fn pretty_print(&self) -> bool {
        self.inner.pretty_print.load(Ordering::Relaxed)
    }

    pub fn set_pretty_print(&self, pretty_print: bool) -> GeoStoreResult<()> {
        self.inner.ensure_not_configured("pretty print")?;
        self.inner.pretty_print.store(pretty_print, Ordering::Relaxed);
        Ok(())
    }

    /// Whether every write is flushed to disk before it is renamed into place.
    pub fn sync_on_write(&self) -> bool {
        self.inner.sync_on_write.load(Ordering::Relaxed)
    }

    pub fn set_sync_on_write(&self, sync_on_write: bool) -> GeoStoreResult<()> {
        self.inner.ensure_not_configured("sync on write")?;
        self.inner.sync_on_write.store(sync_on_write, Ordering::Relaxed);
        Ok(())
    }

    /// Number of records between two progress messages of a batch import.
    pub fn progress_interval(&self) -> usize {
        self.inner.progress_interval.load(Ordering::Relaxed)
    }

    pub fn set_progress_interval(&self, interval: usize) -> GeoStoreResult<()> {
        self.inner.ensure_not_configured("progress interval")?;
        if interval == 0 {
            log::error!("Progress interval must be greater than zero");
            return Err(GeoStoreError::new(
                "Progress interval must be greater than zero",
                ErrorKind::InvalidOperation,
            ));
        }
        self.inner.progress_interval.store(interval, Ordering::Relaxed);
        Ok(())
    }

    /// The persistence backend.
    pub fn document_io(&self) -> DocumentIo {
        self.inner.document_io.read().clone()
    }

    pub fn set_document_io(&self, document_io: DocumentIo) -> GeoStoreResult<()> {
        self.inner.ensure_not_configured("document io")?;
        *self.inner.document_io.write() = document_io;
        Ok(())
    }

    /// Freezes the configuration.
    pub(crate) fn mark_configured(&self) {
        self.inner.configured.store(true, Ordering::Relaxed);
    }

    pub fn is_configured(&self) -> bool {
        self.inner.configured.load(Ordering::Relaxed)
    }
}

/// Checks a coordinate precision against the supported range.
pub(crate) fn validate_precision(precision: u32) -> GeoStoreResult<()> {
    if precision > MAX_PRECISION {
        log::error!(
            "Coordinate precision {} exceeds the maximum of {}",
            precision,
            MAX_PRECISION
        );
        return Err(GeoStoreError::new(
            &format!(
                "Coordinate precision {} exceeds the maximum of {}",
                precision, MAX_PRECISION
            ),
            ErrorKind::InvalidOperation,
        ));
    }
    Ok(())
}

/// Private implementation of GeoStore configuration.
struct GeoStoreConfigInner {
    /// Set once the store is opened
    configured: AtomicBool,
    coordinate_precision: AtomicU32,
    pretty_print: AtomicBool,
    sync_on_write: AtomicBool,
    progress_interval: AtomicUsize,
    document_io: RwLock<DocumentIo>,
}

impl GeoStoreConfigInner {
    fn new() -> Self {
        GeoStoreConfigInner {
            configured: AtomicBool::new(false),
            coordinate_precision: AtomicU32::new(DEFAULT_PRECISION),
            pretty_print: AtomicBool::new(false),
            sync_on_write: AtomicBool::new(false),
            progress_interval: AtomicUsize::new(DEFAULT_PROGRESS_INTERVAL),
            document_io: RwLock::new(DocumentIo::default()),
        }
    }

    fn ensure_not_configured(&self, setting: &str) -> GeoStoreResult<()> {
        if self.configured.load(Ordering::Relaxed) {
            log::error!("Cannot change {} after the store is opened", setting);
            return Err(GeoStoreError::new(
                &format!("Cannot change {} after the store is opened", setting),
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }
}
