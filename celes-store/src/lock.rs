//! Advisory exclusive lock over the store tree.

use std::fs::{self, File, OpenOptions};
use std::path::Path;

use celes_core::ScrapError;

const LOCK_FILE: &str = "store.lock";

/// Guard over the single root-level lock file.
///
/// Acquisition blocks until the OS grants an exclusive advisory lock.
/// The lock only serializes other lock-aware participants; it does not
/// block arbitrary I/O against the store tree. Coarse-grained on
/// purpose: one lock for the whole tree, not per game or platform.
/// Released when the guard drops, on every exit path.
pub struct StoreLock {
    file: File,
}

impl StoreLock {
    /// Block until the store lock is acquired, creating parent
    /// directories and the lock file as needed.
    pub fn acquire(root: &Path) -> Result<StoreLock, ScrapError> {
        let dir = root.join("celes");
        fs::create_dir_all(&dir)?;
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(dir.join(LOCK_FILE))?;
        file.lock()?;
        Ok(StoreLock { file })
    }

    /// Release explicitly. Dropping the guard does the same.
    pub fn unlock(self) {}
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            log::warn!("failed to release store lock: {e}");
        }
    }
}
