//! # State Pruning (qc-18)
//!
//! Turns operator configuration into a validated retention policy and applies
//! it to the version history of an existing multi-version store.
//!
//! ## Flow
//!
//! ```text
//! flags / env / app.toml ──→ PruningConfig ──→ resolve_policy ──→ RetentionPolicy
//!                                                                      │
//!                         DatabaseOpener ──→ StoreProvider ──→ MultiVersionStore
//!                                                                      │
//!                                 reconcile policy ──→ HistoryPruner::prune_history_versions
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Closed strategies | Only default, nothing, everything, custom |
//! | 2 | Fixed presets | Presets ignore numeric overrides |
//! | 3 | Validated custom | Custom policies pass interval/keep-every rules |
//! | 4 | Explicit unset | A store without a policy reports `None`, never an all-zero policy |
//! | 5 | Opt-in compaction | Only stores exposing `HistoryPruner` can be pruned |
//! | 6 | Fail fast | The first error ends a run, nothing is retried |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Policy, configuration, resolution, errors
//! - `ports/` - Inbound API and outbound collaborator traits
//! - `service/` - PruneOrchestrator
//! - `adapters/` - In-memory and file-backed stores, config sources
//!
//! ## Usage
//!
//! ```ignore
//! use qc_18_state_pruning::{FileStoreProvider, FsDatabaseOpener, PruneOrchestrator, PruningConfig};
//!
//! let config = PruningConfig::custom(100, 0, 10).home("/var/lib/qc");
//! let orchestrator = PruneOrchestrator::new(FsDatabaseOpener, FileStoreProvider::new());
//! let outcome = orchestrator.run(&config)?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export key types for convenience
pub use domain::config::{
    ConfigSource, ConfigValue, LayeredSource, MapSource, PruningConfig, CONFIG_KEYS,
};
pub use domain::errors::{PruningError, StoreError};
pub use domain::policy::{PolicyViolation, PruningStrategy, RetentionPolicy};
pub use domain::resolver::resolve_policy;
pub use ports::inbound::StatePruningApi;
pub use ports::outbound::{
    DatabaseOpener, HistoryPruner, MultiVersionStore, PruneOutcome, StoreProvider,
};
pub use service::PruneOrchestrator;

pub use adapters::{EnvConfigSource, MemoryMultiStore, ReadOnlyMultiStore};

#[cfg(feature = "file-store")]
pub use adapters::{FileDatabase, FileStoreProvider, FsDatabaseOpener, PersistentMultiStore};

#[cfg(feature = "toml-config")]
pub use adapters::{app_config_path, TomlConfigSource};
