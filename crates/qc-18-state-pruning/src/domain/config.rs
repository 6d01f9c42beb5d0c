//! # Pruning Configuration
//!
//! Typed configuration for a pruning run, built once from loosely typed
//! key/value sources (flags, environment, app.toml).
//!
//! ## Keys
//!
//! | Key                   | Type   | Used by            |
//! |-----------------------|--------|--------------------|
//! | `home`                | string | database opener    |
//! | `pruning`             | string | strategy selection |
//! | `pruning-keep-recent` | uint   | custom only        |
//! | `pruning-keep-every`  | uint   | custom only        |
//! | `pruning-interval`    | uint   | custom only        |
//! | `app-db-backend`      | string | database opener    |

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::errors::PruningError;
use super::policy::{PolicyViolation, PruningStrategy};

pub const KEY_HOME: &str = "home";
pub const KEY_PRUNING: &str = "pruning";
pub const KEY_PRUNING_KEEP_RECENT: &str = "pruning-keep-recent";
pub const KEY_PRUNING_KEEP_EVERY: &str = "pruning-keep-every";
pub const KEY_PRUNING_INTERVAL: &str = "pruning-interval";
pub const KEY_APP_DB_BACKEND: &str = "app-db-backend";

/// Every key a pruning run reads.
pub const CONFIG_KEYS: &[&str] = &[
    KEY_HOME,
    KEY_PRUNING,
    KEY_PRUNING_KEEP_RECENT,
    KEY_PRUNING_KEEP_EVERY,
    KEY_PRUNING_INTERVAL,
    KEY_APP_DB_BACKEND,
];

// =============================================================================
// LOOSE SOURCES
// =============================================================================

/// A raw configuration value before coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Str(String),
    Int(i64),
    Uint(u64),
}

impl ConfigValue {
    /// Render as a string (numbers are formatted in decimal).
    pub fn to_text(&self) -> String {
        match self {
            ConfigValue::Str(s) => s.trim().to_string(),
            ConfigValue::Int(i) => i.to_string(),
            ConfigValue::Uint(u) => u.to_string(),
        }
    }

    /// Coerce to a non-negative integer.
    ///
    /// An empty string reads as 0, matching an unset flag.
    pub fn to_u64(&self, key: &str) -> Result<u64, PolicyViolation> {
        let malformed = || PolicyViolation::MalformedValue {
            key: key.to_string(),
            value: self.to_text(),
        };
        match self {
            ConfigValue::Uint(u) => Ok(*u),
            ConfigValue::Int(i) => u64::try_from(*i).map_err(|_| malformed()),
            ConfigValue::Str(s) if s.trim().is_empty() => Ok(0),
            ConfigValue::Str(s) => s.trim().parse::<u64>().map_err(|_| malformed()),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::Str(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::Str(s)
    }
}

impl From<u64> for ConfigValue {
    fn from(u: u64) -> Self {
        ConfigValue::Uint(u)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Int(i)
    }
}

/// Key/value lookup with permissive typing.
pub trait ConfigSource {
    fn get(&self, key: &str) -> Option<ConfigValue>;

    /// Short label used in log lines.
    fn name(&self) -> &str {
        "config"
    }
}

/// In-memory source, used for command-line flags and tests.
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    name: String,
    values: BTreeMap<String, ConfigValue>,
}

impl MapSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<ConfigValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<ConfigValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConfigSource for MapSource {
    fn get(&self, key: &str) -> Option<ConfigValue> {
        self.values.get(key).cloned()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Stack of sources; the first one holding a key wins.
#[derive(Default)]
pub struct LayeredSource {
    layers: Vec<Box<dyn ConfigSource>>,
}

impl LayeredSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer with lower precedence than the existing ones.
    pub fn push(mut self, source: impl ConfigSource + 'static) -> Self {
        self.layers.push(Box::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl ConfigSource for LayeredSource {
    fn get(&self, key: &str) -> Option<ConfigValue> {
        self.layers.iter().find_map(|layer| {
            let value = layer.get(key)?;
            tracing::trace!(key, source = layer.name(), "config value resolved");
            Some(value)
        })
    }

    fn name(&self) -> &str {
        "layered"
    }
}

// =============================================================================
// TYPED CONFIG
// =============================================================================

/// Configuration for one pruning run.
///
/// Numeric settings are only meaningful for the `custom` strategy and are
/// left at 0 otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PruningConfig {
    /// Node home directory; the database lives under `<home>/data`.
    pub home: PathBuf,
    /// Raw strategy name, resolved by [`resolve_policy`](super::resolver::resolve_policy).
    pub pruning: String,
    pub pruning_keep_recent: u64,
    pub pruning_keep_every: u64,
    pub pruning_interval: u64,
    /// Backend hint, passed through to the database opener.
    pub app_db_backend: Option<String>,
}

impl Default for PruningConfig {
    fn default() -> Self {
        Self {
            home: PathBuf::new(),
            pruning: PruningStrategy::Default.as_str().to_string(),
            pruning_keep_recent: 0,
            pruning_keep_every: 0,
            pruning_interval: 0,
            app_db_backend: None,
        }
    }
}

impl PruningConfig {
    /// Custom configuration with the given values.
    pub fn custom(keep_recent: u64, keep_every: u64, interval: u64) -> Self {
        Self {
            pruning: PruningStrategy::Custom.as_str().to_string(),
            pruning_keep_recent: keep_recent,
            pruning_keep_every: keep_every,
            pruning_interval: interval,
            ..Self::default()
        }
    }

    /// Configuration naming a strategy, numeric settings unset.
    pub fn with_strategy(strategy: impl Into<String>) -> Self {
        Self {
            pruning: strategy.into(),
            ..Self::default()
        }
    }

    pub fn home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = home.into();
        self
    }

    /// Build the typed config from a loose source.
    ///
    /// Numeric keys are coerced only when the strategy is `custom`; for
    /// any other strategy they are ignored, malformed or not.
    pub fn from_source(source: &dyn ConfigSource) -> Result<Self, PruningError> {
        let mut config = Self::default();

        if let Some(home) = source.get(KEY_HOME) {
            config.home = PathBuf::from(home.to_text());
        }
        // an explicit empty value is kept so resolution rejects it
        if let Some(strategy) = source.get(KEY_PRUNING) {
            config.pruning = strategy.to_text();
        }
        config.app_db_backend = source
            .get(KEY_APP_DB_BACKEND)
            .map(|backend| backend.to_text())
            .filter(|backend| !backend.is_empty());

        if config.is_custom() {
            let read = |key: &str| -> Result<u64, PruningError> {
                match source.get(key) {
                    Some(value) => Ok(value.to_u64(key)?),
                    None => Ok(0),
                }
            };
            config.pruning_keep_recent = read(KEY_PRUNING_KEEP_RECENT)?;
            config.pruning_keep_every = read(KEY_PRUNING_KEEP_EVERY)?;
            config.pruning_interval = read(KEY_PRUNING_INTERVAL)?;
        }

        Ok(config)
    }

    /// True when the strategy string names `custom` (any casing).
    pub fn is_custom(&self) -> bool {
        self.pruning.trim().eq_ignore_ascii_case(PruningStrategy::Custom.as_str())
    }
}
