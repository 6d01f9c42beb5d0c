//! # In-Memory Multi-Version Store
//!
//! Reference store used by tests and by the file-backed adapter.
//!
//! ## Model
//!
//! - A multi-store holds named sub-stores (`"bank"`, `"staking"`, ...).
//! - Writes are staged, then `commit()` snapshots every sub-store as a new
//!   version. Versions start at 1.
//! - With an installed policy whose interval is N > 0, every commit landing on
//!   a multiple of N runs a pruning pass.
//!
//! ## Retention
//!
//! A version `v` below the latest one is kept when any of these hold:
//! - `keep_every == 1` (archive)
//! - `latest - v < keep_recent`
//! - `keep_every > 1 && v % keep_every == 0`
//!
//! The latest version is never pruned.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{RetentionPolicy, StoreError};
use crate::ports::outbound::{HistoryPruner, MultiVersionStore, PruneOutcome};

/// Contents of one sub-store.
pub type KvMap = BTreeMap<Vec<u8>, Vec<u8>>;

/// State of every sub-store at one version.
pub type Snapshot = BTreeMap<String, KvMap>;

/// Versioned multi-store keeping full snapshots in memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryMultiStore {
    versions: BTreeMap<u64, Snapshot>,
    policy: Option<RetentionPolicy>,
    latest: u64,
    #[serde(skip)]
    working: Snapshot,
}

impl MemoryMultiStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with a policy already installed.
    pub fn with_policy(policy: RetentionPolicy) -> Self {
        Self {
            policy: Some(policy),
            ..Self::default()
        }
    }

    /// Stage a write in `store`.
    pub fn set(&mut self, store: &str, key: &[u8], value: &[u8]) {
        self.working
            .entry(store.to_string())
            .or_default()
            .insert(key.to_vec(), value.to_vec());
    }

    /// Stage a delete in `store`.
    pub fn delete(&mut self, store: &str, key: &[u8]) {
        if let Some(kv) = self.working.get_mut(store) {
            kv.remove(key);
        }
    }

    /// Snapshot the working state as a new version.
    ///
    /// Runs a pruning pass when the installed interval divides the new version.
    pub fn commit(&mut self) -> Result<u64, StoreError> {
        self.latest += 1;
        self.versions.insert(self.latest, self.working.clone());

        if let Some(policy) = self.policy {
            if policy.interval() > 0 && self.latest % policy.interval() == 0 {
                self.prune_with(policy);
            }
        }
        Ok(self.latest)
    }

    /// Value of `key` in `store` as of `version`.
    pub fn get_at(&self, version: u64, store: &str, key: &[u8]) -> Option<&[u8]> {
        self.versions
            .get(&version)?
            .get(store)?
            .get(key)
            .map(Vec::as_slice)
    }

    pub fn has_version(&self, version: u64) -> bool {
        self.versions.contains_key(&version)
    }

    /// Retained versions, ascending.
    pub fn versions(&self) -> Vec<u64> {
        self.versions.keys().copied().collect()
    }

    /// Restore the working state from the latest version (after loading).
    pub(crate) fn reset_working(&mut self) {
        self.working = self
            .versions
            .get(&self.latest)
            .cloned()
            .unwrap_or_default();
    }

    fn is_retained(policy: &RetentionPolicy, version: u64, latest: u64) -> bool {
        if version >= latest || policy.keeps_everything() {
            return true;
        }
        if latest - version < policy.keep_recent() {
            return true;
        }
        policy.keep_every() > 1 && version % policy.keep_every() == 0
    }

    fn prune_with(&mut self, policy: RetentionPolicy) -> PruneOutcome {
        let latest = self.latest;
        let pruned: Vec<u64> = self
            .versions
            .keys()
            .copied()
            .filter(|v| !Self::is_retained(&policy, *v, latest))
            .collect();

        for version in &pruned {
            self.versions.remove(version);
        }
        debug!(latest, pruned = pruned.len(), "Pruned in-memory versions");

        PruneOutcome {
            policy,
            latest_version: latest,
            pruned_versions: pruned,
            retained_versions: self.versions.len(),
        }
    }
}

impl MultiVersionStore for MemoryMultiStore {
    fn store_kind(&self) -> &'static str {
        "memory-multistore"
    }

    fn pruning_policy(&self) -> Option<RetentionPolicy> {
        self.policy
    }

    fn set_pruning_policy(&mut self, policy: RetentionPolicy) {
        self.policy = Some(policy);
    }

    fn latest_version(&self) -> u64 {
        self.latest
    }

    fn history_pruner(&mut self) -> Option<&mut dyn HistoryPruner> {
        Some(self)
    }
}

impl HistoryPruner for MemoryMultiStore {
    fn prune_history_versions(&mut self) -> Result<PruneOutcome, StoreError> {
        let policy = self.policy.ok_or(StoreError::PolicyNotSet)?;
        Ok(self.prune_with(policy))
    }
}

// =============================================================================
// READ-ONLY VIEW
// =============================================================================

/// Read-only view over a store's history. Does not offer history pruning.
#[derive(Debug, Clone)]
pub struct ReadOnlyMultiStore {
    inner: MemoryMultiStore,
}

impl ReadOnlyMultiStore {
    pub fn new(inner: MemoryMultiStore) -> Self {
        Self { inner }
    }

    pub fn versions(&self) -> Vec<u64> {
        self.inner.versions()
    }

    pub fn get_at(&self, version: u64, store: &str, key: &[u8]) -> Option<&[u8]> {
        self.inner.get_at(version, store, key)
    }
}

impl MultiVersionStore for ReadOnlyMultiStore {
    fn store_kind(&self) -> &'static str {
        "read-only-multistore"
    }

    fn pruning_policy(&self) -> Option<RetentionPolicy> {
        self.inner.pruning_policy()
    }

    fn set_pruning_policy(&mut self, policy: RetentionPolicy) {
        self.inner.set_pruning_policy(policy);
    }

    fn latest_version(&self) -> u64 {
        self.inner.latest_version()
    }
}
