//! # File-Backed Database
//!
//! Single-file database under `<home>/data/application.db` holding a bincode
//! encoded [`MemoryMultiStore`], guarded by [`DataDirLock`].
//!
//! Writes go to a temporary file first and are renamed into place, so a failed
//! prune leaves the previous history intact.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::lock::DataDirLock;
use super::memory::MemoryMultiStore;
use crate::domain::{resolve_policy, PruningConfig, RetentionPolicy, StoreError};
use crate::ports::outbound::{
    DatabaseOpener, HistoryPruner, MultiVersionStore, PruneOutcome, StoreProvider,
};

/// Directory under the home directory holding the database.
pub const DATA_DIR: &str = "data";

/// Database file name.
pub const DB_FILE: &str = "application.db";

/// Backend names this adapter answers to.
pub const SUPPORTED_BACKENDS: &[&str] = &["file"];

// =============================================================================
// DATABASE
// =============================================================================

/// An open, locked database file.
#[derive(Debug)]
pub struct FileDatabase {
    path: PathBuf,
    _lock: DataDirLock,
}

impl FileDatabase {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted store, `None` when nothing was written yet.
    pub fn load(&self) -> Result<Option<MemoryMultiStore>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        let mut store: MemoryMultiStore =
            bincode::deserialize(&bytes).map_err(|e| StoreError::Corrupted(e.to_string()))?;
        store.reset_working();
        Ok(Some(store))
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("db.tmp")
    }

    /// Atomically replace the persisted store.
    pub fn persist(&self, store: &MemoryMultiStore) -> Result<(), StoreError> {
        let bytes = bincode::serialize(store).map_err(|e| StoreError::Corrupted(e.to_string()))?;
        let tmp = self.temp_path();
        let mut file = File::create(&tmp).map_err(|e| StoreError::io(&tmp, e))?;
        file.write_all(&bytes).map_err(|e| StoreError::io(&tmp, e))?;
        // contents must be on disk before the rename makes them visible
        file.sync_all().map_err(|e| StoreError::io(&tmp, e))?;
        drop(file);
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "Store persisted");
        Ok(())
    }
}

/// Opens `<home>/data/application.db`, creating the directory if needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDatabaseOpener;

impl DatabaseOpener for FsDatabaseOpener {
    type Database = FileDatabase;

    fn open(&self, home: &Path, backend: Option<&str>) -> Result<FileDatabase, StoreError> {
        if home.as_os_str().is_empty() {
            return Err(StoreError::MissingHome);
        }
        if let Some(name) = backend.filter(|name| !name.is_empty()) {
            if !SUPPORTED_BACKENDS.contains(&name) {
                return Err(StoreError::UnsupportedBackend(name.to_string()));
            }
        }

        let data_dir = home.join(DATA_DIR);
        fs::create_dir_all(&data_dir).map_err(|e| StoreError::io(&data_dir, e))?;
        let lock = DataDirLock::acquire(&data_dir)?;

        let path = data_dir.join(DB_FILE);
        info!(path = %path.display(), "Opened database");
        Ok(FileDatabase { path, _lock: lock })
    }
}

// =============================================================================
// STORE PROVIDER
// =============================================================================

/// Loads the persisted multi-store from a [`FileDatabase`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStoreProvider {
    apply_config_policy: bool,
}

impl FileStoreProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the config-derived policy on every store handed out.
    pub fn with_config_policy(mut self) -> Self {
        self.apply_config_policy = true;
        self
    }
}

impl StoreProvider for FileStoreProvider {
    type Database = FileDatabase;

    fn provide(
        &self,
        db: FileDatabase,
        config: &PruningConfig,
    ) -> Result<Box<dyn MultiVersionStore>, StoreError> {
        let mut store = db.load()?.unwrap_or_default();
        if self.apply_config_policy {
            let policy = resolve_policy(config).map_err(|e| StoreError::Policy(Box::new(e)))?;
            store.set_pruning_policy(policy);
        }
        Ok(Box::new(PersistentMultiStore { store, db }))
    }
}

/// A [`MemoryMultiStore`] written back to its database after each prune.
#[derive(Debug)]
pub struct PersistentMultiStore {
    store: MemoryMultiStore,
    db: FileDatabase,
}

impl PersistentMultiStore {
    pub fn new(store: MemoryMultiStore, db: FileDatabase) -> Self {
        Self { store, db }
    }

    pub fn inner(&self) -> &MemoryMultiStore {
        &self.store
    }

    pub fn inner_mut(&mut self) -> &mut MemoryMultiStore {
        &mut self.store
    }

    /// Write the current state to disk.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.persist(&self.store)
    }
}

impl MultiVersionStore for PersistentMultiStore {
    fn store_kind(&self) -> &'static str {
        "file-multistore"
    }

    fn pruning_policy(&self) -> Option<RetentionPolicy> {
        self.store.pruning_policy()
    }

    fn set_pruning_policy(&mut self, policy: RetentionPolicy) {
        self.store.set_pruning_policy(policy);
    }

    fn latest_version(&self) -> u64 {
        self.store.latest_version()
    }

    fn history_pruner(&mut self) -> Option<&mut dyn HistoryPruner> {
        Some(self)
    }
}

impl HistoryPruner for PersistentMultiStore {
    fn prune_history_versions(&mut self) -> Result<PruneOutcome, StoreError> {
        // prune a copy so a failed write leaves memory and disk in agreement
        let mut pruned = self.store.clone();
        let outcome = pruned.prune_history_versions()?;
        self.db.persist(&pruned)?;
        self.store = pruned;
        Ok(outcome)
    }
}
