//! # TOML Configuration Source
//!
//! Reads the pruning keys from a node's `<home>/config/app.toml`. Only
//! top-level keys are consulted:
//!
//! ```toml
//! pruning = "custom"
//! pruning-keep-recent = "100"
//! pruning-keep-every = "0"
//! pruning-interval = "10"
//! app-db-backend = ""
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::{ConfigSource, ConfigValue, PruningError};

/// Location of app.toml relative to the home directory.
pub fn app_config_path(home: &Path) -> PathBuf {
    home.join("config").join("app.toml")
}

/// Top-level scalar keys of a TOML document.
#[derive(Debug, Clone, Default)]
pub struct TomlConfigSource {
    table: toml::Table,
}

impl TomlConfigSource {
    /// Load a file; a missing file yields an empty source.
    pub fn load(path: &Path) -> Result<Self, PruningError> {
        if !path.exists() {
            debug!(path = %path.display(), "No app config file, skipping");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| PruningError::ConfigLoad {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&content).map_err(|e| match e {
            PruningError::ConfigLoad { message, .. } => PruningError::ConfigLoad {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Load `<home>/config/app.toml`.
    pub fn load_from_home(home: &Path) -> Result<Self, PruningError> {
        Self::load(&app_config_path(home))
    }

    /// Parse TOML text.
    pub fn parse(content: &str) -> Result<Self, PruningError> {
        let table = content
            .parse::<toml::Table>()
            .map_err(|e| PruningError::ConfigLoad {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { table })
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl ConfigSource for TomlConfigSource {
    fn get(&self, key: &str) -> Option<ConfigValue> {
        match self.table.get(key)? {
            toml::Value::String(s) => Some(ConfigValue::Str(s.clone())),
            toml::Value::Integer(i) => Some(ConfigValue::Int(*i)),
            toml::Value::Boolean(b) => Some(ConfigValue::Str(b.to_string())),
            toml::Value::Float(f) => Some(ConfigValue::Str(f.to_string())),
            _ => None,
        }
    }

    fn name(&self) -> &str {
        "app.toml"
    }
}
