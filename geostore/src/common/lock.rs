use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// A shared read-write lock guarding one store root.
#[derive(Clone)]
pub struct RootLock {
    lock: Arc<RwLock<()>>,
}

impl RootLock {
    /// Acquires the lock for a read-only index access.
    pub fn read(&self) -> RwLockReadGuard<'_, ()> {
        self.lock.read()
    }

    /// Acquires the lock for a reload, mutate and persist sequence.
    pub fn write(&self) -> RwLockWriteGuard<'_, ()> {
        self.lock.write()
    }
}

/// Registry of per-root locks.
///
/// Every `GeoStore` handle opened on the same root within one process gets
/// the same [`RootLock`], so their index updates are serialized instead of
/// silently overwriting each other. Nothing here coordinates separate
/// processes.
///
/// # Examples
///
/// ```
/// use geostore::common::LockRegistry;
/// let registry = LockRegistry::new();
/// let lock = registry.get_lock("/data/fstore".as_ref());
/// {
///     let _guard = lock.write();
/// } // released here
/// assert_eq!(registry.lock_count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct LockRegistry {
    locks: Arc<RwLock<HashMap<PathBuf, RootLock>>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        LockRegistry {
            locks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Gets the lock for a store root, creating it on first use.
    ///
    /// Relative roots are resolved against the current directory so that
    /// `fstore` and `./fstore` share one lock.
    pub fn get_lock(&self, root: &Path) -> RootLock {
        let key = lock_key(root);
        if let Some(lock) = self.locks.read().get(&key) {
            return lock.clone();
        }

        let mut locks = self.locks.write();
        locks
            .entry(key)
            .or_insert_with(|| RootLock {
                lock: Arc::new(RwLock::new(())),
            })
            .clone()
    }

    pub fn lock_count(&self) -> usize {
        self.locks.read().len()
    }
}

/// The process-wide registry shared by all store handles.
pub fn store_locks() -> &'static LockRegistry {
    static REGISTRY: OnceLock<LockRegistry> = OnceLock::new();
    REGISTRY.get_or_init(LockRegistry::new)
}

fn lock_key(root: &Path) -> PathBuf {
    std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf())
}
