//! # Config Layering Flow
//!
//! `qc-prune` reads flags, then `QC_*` environment variables, then
//! `<home>/config/app.toml`. These tests run the tool's entry point
//! against a real home directory.

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use qc_18_state_pruning::{
        DatabaseOpener, EnvConfigSource, FsDatabaseOpener, MemoryMultiStore, MultiVersionStore,
        PruningStrategy, RetentionPolicy,
    };
    use qc_prune::{run_prune, PruneArgs, Report};

    fn write_app_toml(home: &Path, body: &str) {
        let dir = home.join("config");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("app.toml"), body).unwrap();
    }

    fn seed(home: &Path, versions: u64) {
        let db = FsDatabaseOpener.open(home, None).unwrap();
        let mut store = MemoryMultiStore::new();
        for _ in 0..versions {
            store.commit().unwrap();
        }
        db.persist(&store).unwrap();
    }

    fn args(home: &Path) -> PruneArgs {
        PruneArgs {
            home: Some(home.to_path_buf()),
            ..Default::default()
        }
    }

    #[test]
    fn test_app_toml_drives_custom_prune() {
        let home = tempfile::tempdir().unwrap();
        write_app_toml(
            home.path(),
            "pruning = \"custom\"\npruning-keep-recent = \"4\"\npruning-keep-every = \"0\"\npruning-interval = \"10\"\n",
        );
        seed(home.path(), 12);

        match run_prune(&args(home.path()), EnvConfigSource::default()).unwrap() {
            Report::Pruned(outcome) => {
                assert_eq!(outcome.pruned_versions, (1..=8).collect::<Vec<_>>());
            }
            other => panic!("Expected Pruned, got {:?}", other),
        }
    }

    #[test]
    fn test_each_run_applies_current_config() {
        let home = tempfile::tempdir().unwrap();
        seed(home.path(), 50);

        let mut archive = args(home.path());
        archive.pruning = Some("nothing".to_string());
        match run_prune(&archive, EnvConfigSource::default()).unwrap() {
            Report::Pruned(outcome) => {
                assert_eq!(outcome.policy, RetentionPolicy::nothing());
                assert!(outcome.pruned_versions.is_empty());
            }
            other => panic!("Expected Pruned, got {:?}", other),
        }

        // the policy persisted by the first run must not win over new flags
        let mut aggressive = args(home.path());
        aggressive.pruning = Some("everything".to_string());
        match run_prune(&aggressive, EnvConfigSource::default()).unwrap() {
            Report::Pruned(outcome) => {
                assert_eq!(outcome.policy.strategy(), PruningStrategy::Everything);
                assert_eq!(outcome.pruned_versions, (1..=48).collect::<Vec<_>>());
            }
            other => panic!("Expected Pruned, got {:?}", other),
        }

        let store = FsDatabaseOpener
            .open(home.path(), None)
            .unwrap()
            .load()
            .unwrap()
            .unwrap();
        assert_eq!(store.versions(), vec![49, 50]);
        assert_eq!(store.pruning_policy(), Some(RetentionPolicy::everything()));
    }

    #[test]
    fn test_env_overrides_app_toml() {
        let home = tempfile::tempdir().unwrap();
        write_app_toml(home.path(), "pruning = \"custom\"\npruning-interval = \"0\"\n");
        seed(home.path(), 5);

        // app.toml alone is invalid (keep-every 0 with interval 0)
        assert!(run_prune(&args(home.path()), EnvConfigSource::default()).is_err());

        let env = EnvConfigSource::from_vars([("QC_PRUNING", "nothing")]);
        match run_prune(&args(home.path()), env).unwrap() {
            Report::Pruned(outcome) => assert!(outcome.pruned_versions.is_empty()),
            other => panic!("Expected Pruned, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_app_toml_is_reported() {
        let home = tempfile::tempdir().unwrap();
        write_app_toml(home.path(), "pruning = ");

        let err = run_prune(&args(home.path()), EnvConfigSource::default()).unwrap_err();
        assert!(err.to_string().contains("app.toml"));
    }

    #[test]
    fn test_unsupported_backend_is_reported() {
        let home = tempfile::tempdir().unwrap();
        let mut args = args(home.path());
        args.app_db_backend = Some("goleveldb".to_string());

        let err = run_prune(&args, EnvConfigSource::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("unsupported database backend 'goleveldb'"));
    }
}
