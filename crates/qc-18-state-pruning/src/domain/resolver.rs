//! # Policy Resolution
//!
//! Maps a [`PruningConfig`] to a validated [`RetentionPolicy`]. Pure: no I/O,
//! no hidden state, the same config always yields the same policy.

use super::config::PruningConfig;
use super::errors::PruningError;
use super::policy::{PruningStrategy, RetentionPolicy};

/// Resolve the retention policy named by `config`.
///
/// Presets ignore the numeric settings. `custom` builds a policy from them
/// and fails with [`PruningError::InvalidPolicy`] when it does not validate.
pub fn resolve_policy(config: &PruningConfig) -> Result<RetentionPolicy, PruningError> {
    let strategy: PruningStrategy = config.pruning.parse()?;

    match RetentionPolicy::preset(strategy) {
        Some(policy) => Ok(policy),
        None => Ok(RetentionPolicy::custom(
            config.pruning_keep_recent,
            config.pruning_keep_every,
            config.pruning_interval,
        )?),
    }
}
