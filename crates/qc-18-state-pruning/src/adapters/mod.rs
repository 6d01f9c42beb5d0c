//! # Adapters Layer
//!
//! Reference implementations of the outbound ports and the configuration
//! sources used by the `qc-prune` tool.
//!
//! - `memory` - In-memory multi-version store (always available)
//! - `env` - `QC_*` environment variables as a config source
//! - `file` - bincode database file + store provider (feature `file-store`)
//! - `lock` - fs2 data directory lock (feature `file-store`)
//! - `toml_config` - app.toml config source (feature `toml-config`)

pub mod env;
pub mod memory;

#[cfg(feature = "file-store")]
pub mod file;
#[cfg(feature = "file-store")]
pub mod lock;

#[cfg(feature = "toml-config")]
pub mod toml_config;

pub use env::EnvConfigSource;
pub use memory::{MemoryMultiStore, ReadOnlyMultiStore};

#[cfg(feature = "file-store")]
pub use file::{FileDatabase, FileStoreProvider, FsDatabaseOpener, PersistentMultiStore};
#[cfg(feature = "file-store")]
pub use lock::DataDirLock;

#[cfg(feature = "toml-config")]
pub use toml_config::{app_config_path, TomlConfigSource};
