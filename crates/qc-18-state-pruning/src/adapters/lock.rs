//! # Data Directory Lock
//!
//! Exclusive process-level lock on a node's data directory, using `fs2`
//! (flock on Unix, LockFile on Windows).
//!
//! A prune must not run while a node (or another prune) holds the database,
//! so acquisition is a single non-blocking attempt.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::domain::StoreError;

/// Held for as long as the database is open; released on drop.
#[derive(Debug)]
pub struct DataDirLock {
    file: File,
    path: PathBuf,
}

impl DataDirLock {
    pub const LOCK_FILE: &'static str = "LOCK";

    /// Try once to lock `data_dir`.
    pub fn acquire(data_dir: &Path) -> Result<Self, StoreError> {
        let path = data_dir.join(Self::LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| StoreError::io(&path, e))?;

        if file.try_lock_exclusive().is_err() {
            let holder = std::fs::read_to_string(&path)
                .ok()
                .and_then(|s| s.trim().parse::<u32>().ok());
            return Err(StoreError::Locked(match holder {
                Some(pid) => format!("{} is held by process {}", path.display(), pid),
                None => format!("{} is held by another process", path.display()),
            }));
        }

        let mut locked = file;
        locked
            .set_len(0)
            .and_then(|_| writeln!(locked, "{}", std::process::id()))
            .map_err(|e| StoreError::io(&path, e))?;
        debug!(path = %path.display(), "Data directory locked");

        Ok(Self { file: locked, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DataDirLock {
    fn drop(&mut self) {
        #[allow(clippy::incompatible_msrv)]
        let _ = self.file.unlock();
    }
}
