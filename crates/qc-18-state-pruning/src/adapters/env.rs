//! # Environment Configuration Source
//!
//! Maps config keys to `QC_`-prefixed environment variables:
//! `pruning-keep-recent` is read from `QC_PRUNING_KEEP_RECENT`.

use std::collections::HashMap;

use crate::domain::{ConfigSource, ConfigValue};

pub const ENV_PREFIX: &str = "QC";

/// Snapshot of the relevant environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvConfigSource {
    vars: HashMap<String, String>,
}

impl EnvConfigSource {
    /// Capture the current process environment.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Build from explicit variables; non-prefixed names are dropped.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let prefix = format!("{}_", ENV_PREFIX);
        let vars = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| k.starts_with(&prefix))
            .collect();
        Self { vars }
    }

    /// Environment variable name for a config key.
    pub fn var_name(key: &str) -> String {
        format!("{}_{}", ENV_PREFIX, key.to_uppercase().replace('-', "_"))
    }
}

impl ConfigSource for EnvConfigSource {
    fn get(&self, key: &str) -> Option<ConfigValue> {
        self.vars
            .get(&Self::var_name(key))
            .map(|v| ConfigValue::Str(v.clone()))
    }

    fn name(&self) -> &str {
        "env"
    }
}
