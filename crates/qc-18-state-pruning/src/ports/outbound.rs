//! # Outbound Ports (Driven Ports)
//!
//! Collaborators the pruning service depends on. None of them are owned by
//! this crate; adapters in `crate::adapters` provide reference versions.

use std::path::Path;

use serde::Serialize;

use crate::domain::{PruningConfig, RetentionPolicy};

pub use crate::domain::errors::StoreError;

/// Opens the database living under a node home directory.
pub trait DatabaseOpener {
    type Database;

    /// `backend` is the `app-db-backend` hint, passed through untouched.
    fn open(&self, home: &Path, backend: Option<&str>) -> Result<Self::Database, StoreError>;
}

/// Builds a multi-version store on top of an open database.
///
/// Providers are expected to install the configured pruning policy
/// themselves; the orchestrator covers the ones that do not.
pub trait StoreProvider {
    type Database;

    fn provide(
        &self,
        db: Self::Database,
        config: &PruningConfig,
    ) -> Result<Box<dyn MultiVersionStore>, StoreError>;
}

/// A store keeping historical versions of its state.
pub trait MultiVersionStore: Send {
    /// Short type label for diagnostics.
    fn store_kind(&self) -> &'static str;

    /// The embedded policy, `None` when none was ever installed.
    fn pruning_policy(&self) -> Option<RetentionPolicy>;

    fn set_pruning_policy(&mut self, policy: RetentionPolicy);

    /// Latest committed version, 0 when nothing was committed.
    fn latest_version(&self) -> u64;

    /// Opt-in history compaction capability.
    fn history_pruner(&mut self) -> Option<&mut dyn HistoryPruner> {
        None
    }
}

/// Capability: delete historical versions according to the embedded policy.
pub trait HistoryPruner {
    fn prune_history_versions(&mut self) -> Result<PruneOutcome, StoreError>;
}

/// Result of one compaction pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PruneOutcome {
    /// Policy the pass was run with.
    pub policy: RetentionPolicy,
    pub latest_version: u64,
    /// Versions deleted by this pass, ascending.
    pub pruned_versions: Vec<u64>,
    /// Number of versions still on disk.
    pub retained_versions: usize,
}

impl PruneOutcome {
    pub fn pruned_count(&self) -> usize {
        self.pruned_versions.len()
    }
}
