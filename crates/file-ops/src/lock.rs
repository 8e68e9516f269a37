//! Process-wide mutual exclusion per game folder.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

type LockTable = Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>;

static LOCKS: OnceLock<LockTable> = OnceLock::new();

fn table() -> MutexGuard<'static, HashMap<PathBuf, Arc<Mutex<()>>>> {
    LOCKS
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

fn folder_lock(key: &Path) -> Arc<Mutex<()>> {
    Arc::clone(table().entry(key.to_path_buf()).or_default())
}

/// Drops the table entry for `key` once no other caller holds its lock.
fn release(key: &Path, lock: Arc<Mutex<()>>) {
    let mut table = table();
    // Only the table and `lock` itself remain.
    if Arc::strong_count(&lock) == 2 {
        table.remove(key);
    }
}

/// Runs `f` while holding the lock for `key`.
///
/// A poisoned lock is taken over: the filesystem, not the guarded value, is
/// the state being protected.
pub(crate) fn with_folder_lock<T>(key: &Path, f: impl FnOnce() -> T) -> T {
    let lock = folder_lock(key);
    let result = {
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    };
    release(key, lock);
    result
}
