//! # Prune Orchestrator
//!
//! Runs one pruning pass over an existing multi-version store.
//!
//! ## Steps
//!
//! ```text
//! 1. Pre-validate   resolve_policy(config)          -> InvalidPolicy / UnknownStrategy
//! 2. Acquire        opener.open + provider.provide  -> StoreAcquisition
//!                   history_pruner() capability     -> UnsupportedStoreType
//! 3. Reconcile      install policy if store has none
//! 4. Compact        prune_history_versions()        -> Compaction
//! ```
//!
//! No step retries. The first error ends the run and is returned as is.

use tracing::{debug, info, warn};

use crate::domain::{resolve_policy, PruningConfig, PruningError, RetentionPolicy};
use crate::ports::inbound::StatePruningApi;
use crate::ports::outbound::{DatabaseOpener, MultiVersionStore, PruneOutcome, StoreProvider};


/// Sequences policy resolution, store acquisition, reconciliation and
/// history compaction.
pub struct PruneOrchestrator<O, P> {
    opener: O,
    provider: P,
}

impl<O, P> PruneOrchestrator<O, P>
where
    O: DatabaseOpener,
    P: StoreProvider<Database = O::Database>,
{
    pub fn new(opener: O, provider: P) -> Self {
        Self { opener, provider }
    }

    /// Run all four steps against the store named by `config`.
    pub fn run(&self, config: &PruningConfig) -> Result<PruneOutcome, PruningError> {
        // Step 1: catch misconfiguration before any I/O
        let policy = resolve_policy(config)?;
        debug!(%policy, "Pruning configuration validated");

        // Step 2: acquire the store
        let mut store = self.acquire(config)?;
        info!(
            store = store.store_kind(),
            latest_version = store.latest_version(),
            "Acquired multi-version store"
        );

        if store.history_pruner().is_none() {
            return Err(PruningError::UnsupportedStoreType {
                store: store.store_kind().to_string(),
            });
        }

        // Step 3: cover providers that forgot to apply the policy
        let effective = Self::reconcile(&mut *store, config)?;

        // Step 4: compact
        let store_kind = store.store_kind();
        let pruner = store
            .history_pruner()
            .ok_or_else(|| PruningError::UnsupportedStoreType {
                store: store_kind.to_string(),
            })?;
        let outcome = pruner
            .prune_history_versions()
            .map_err(PruningError::Compaction)?;

        info!(
            policy = %effective,
            latest_version = outcome.latest_version,
            pruned = outcome.pruned_count(),
            retained = outcome.retained_versions,
            "History versions pruned"
        );
        Ok(outcome)
    }

    fn acquire(&self, config: &PruningConfig) -> Result<Box<dyn MultiVersionStore>, PruningError> {
        let db = self
            .opener
            .open(&config.home, config.app_db_backend.as_deref())
            .map_err(PruningError::StoreAcquisition)?;
        self.provider
            .provide(db, config)
            .map_err(PruningError::StoreAcquisition)
    }

    /// Returns the policy the store will prune with.
    fn reconcile(
        store: &mut dyn MultiVersionStore,
        config: &PruningConfig,
    ) -> Result<RetentionPolicy, PruningError> {
        match store.pruning_policy() {
            Some(existing) => {
                debug!(policy = %existing, "Keeping pruning policy embedded in store");
                Ok(existing)
            }
            None => {
                let policy = resolve_policy(config)?;
                warn!(%policy, "Store has no pruning policy, installing configured one");
                store.set_pruning_policy(policy);
                Ok(policy)
            }
        }
    }
}

impl<O, P> StatePruningApi for PruneOrchestrator<O, P>
where
    O: DatabaseOpener,
    P: StoreProvider<Database = O::Database>,
{
    fn check(&self, config: &PruningConfig) -> Result<RetentionPolicy, PruningError> {
        resolve_policy(config)
    }

    fn prune(&self, config: &PruningConfig) -> Result<PruneOutcome, PruningError> {
        self.run(config)
    }
}
