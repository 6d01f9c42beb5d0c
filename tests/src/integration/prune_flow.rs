//! # Prune Flow
//!
//! Drives `PruneOrchestrator` over the file-backed database the way the
//! `qc-prune` tool does, then reopens the database to check what survived.
//!
//! ## Flow Tested:
//!
//! 1. Seed `<home>/data/application.db` with committed versions
//! 2. Run a prune with a given config
//! 3. Reopen and compare the retained versions

#[cfg(test)]
mod tests {
    use std::path::Path;

    use qc_18_state_pruning::{
        DatabaseOpener, FileStoreProvider, FsDatabaseOpener, MemoryMultiStore, MultiVersionStore,
        PruneOrchestrator, PruningConfig, PruningError, RetentionPolicy, StoreError,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Commit `versions` heights of bank and staking state.
    fn seed_chain(home: &Path, policy: Option<RetentionPolicy>, versions: u64) {
        let db = FsDatabaseOpener.open(home, None).unwrap();
        let mut store = MemoryMultiStore::new();
        for height in 1..=versions {
            store.set("bank", b"supply", &(height * 1_000).to_be_bytes());
            store.set("staking", b"validators", &height.to_be_bytes());
            store.commit().unwrap();
        }
        if let Some(policy) = policy {
            store.set_pruning_policy(policy);
        }
        db.persist(&store).unwrap();
    }

    fn reopen(home: &Path) -> MemoryMultiStore {
        FsDatabaseOpener
            .open(home, None)
            .unwrap()
            .load()
            .unwrap()
            .expect("database should exist")
    }

    fn orchestrator() -> PruneOrchestrator<FsDatabaseOpener, FileStoreProvider> {
        PruneOrchestrator::new(FsDatabaseOpener, FileStoreProvider::new())
    }

    // =============================================================================
    // TESTS
    // =============================================================================

    #[test]
    fn test_custom_policy_prunes_and_persists() {
        let home = tempfile::tempdir().unwrap();
        seed_chain(home.path(), None, 100);

        let config = PruningConfig::custom(10, 25, 10).home(home.path());
        let outcome = orchestrator().run(&config).unwrap();

        let store = reopen(home.path());
        let mut expected: Vec<u64> = vec![25, 50, 75];
        expected.extend(91..=100);
        assert_eq!(store.versions(), expected);
        assert_eq!(outcome.retained_versions, expected.len());
        assert_eq!(outcome.pruned_count(), 100 - expected.len());

        // surviving versions keep their state
        assert_eq!(
            store.get_at(50, "bank", b"supply"),
            Some(&50_000u64.to_be_bytes()[..])
        );
        assert_eq!(store.pruning_policy(), Some(RetentionPolicy::custom(10, 25, 10).unwrap()));
    }

    #[test]
    fn test_everything_keeps_two_latest() {
        let home = tempfile::tempdir().unwrap();
        seed_chain(home.path(), None, 30);

        let config = PruningConfig::with_strategy("Everything").home(home.path());
        orchestrator().run(&config).unwrap();

        assert_eq!(reopen(home.path()).versions(), vec![29, 30]);
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let home = tempfile::tempdir().unwrap();
        seed_chain(home.path(), None, 40);
        let config = PruningConfig::custom(5, 0, 10).home(home.path());

        let first = orchestrator().run(&config).unwrap();
        let second = orchestrator().run(&config).unwrap();

        assert_eq!(first.pruned_count(), 35);
        assert!(second.pruned_versions.is_empty());
        assert_eq!(second.retained_versions, 5);
    }

    #[test]
    fn test_embedded_policy_kept_when_provider_skips_config() {
        let home = tempfile::tempdir().unwrap();
        seed_chain(home.path(), Some(RetentionPolicy::custom(20, 0, 10).unwrap()), 50);

        let config = PruningConfig::with_strategy("everything").home(home.path());
        let outcome = orchestrator().run(&config).unwrap();

        assert_eq!(outcome.retained_versions, 20);
        assert_eq!(reopen(home.path()).versions(), (31..=50).collect::<Vec<_>>());
    }

    #[test]
    fn test_invalid_policy_leaves_database_untouched() {
        let home = tempfile::tempdir().unwrap();
        seed_chain(home.path(), None, 10);

        let config = PruningConfig::custom(1, 7, 0).home(home.path());
        assert!(matches!(
            orchestrator().run(&config),
            Err(PruningError::InvalidPolicy(_))
        ));
        assert_eq!(reopen(home.path()).versions().len(), 10);
    }

    #[test]
    fn test_locked_database_is_acquisition_failure() {
        let home = tempfile::tempdir().unwrap();
        seed_chain(home.path(), None, 3);
        let _node = FsDatabaseOpener.open(home.path(), None).unwrap();

        let config = PruningConfig::default().home(home.path());
        assert!(matches!(
            orchestrator().run(&config),
            Err(PruningError::StoreAcquisition(StoreError::Locked(_)))
        ));
    }

    #[test]
    fn test_empty_database_prunes_nothing() {
        let home = tempfile::tempdir().unwrap();

        let config = PruningConfig::default().home(home.path());
        let outcome = orchestrator().run(&config).unwrap();

        assert_eq!(outcome.latest_version, 0);
        assert!(outcome.pruned_versions.is_empty());
    }
}
