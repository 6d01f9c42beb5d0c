//! # Retention Policy
//!
//! The validated description of which historical versions a multi-version
//! store keeps, and how often it compacts the rest.
//!
//! ## Presets
//!
//! | Strategy     | keep_recent | keep_every | interval |
//! |--------------|-------------|------------|----------|
//! | `default`    | 362880      | 0          | 10       |
//! | `everything` | 2           | 0          | 10       |
//! | `nothing`    | 0           | 1          | 0        |
//!
//! `custom` takes its three values from configuration and must pass
//! [`RetentionPolicy::validate`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::errors::PruningError;

/// Versions kept by the `default` preset (21 days of 5s blocks).
pub const DEFAULT_KEEP_RECENT: u64 = 362_880;

/// Versions kept by the `everything` preset.
pub const EVERYTHING_KEEP_RECENT: u64 = 2;

/// Pruning interval shared by the `default` and `everything` presets.
pub const DEFAULT_PRUNING_INTERVAL: u64 = 10;

// =============================================================================
// STRATEGY
// =============================================================================

/// Named pruning strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PruningStrategy {
    /// Keep a long recent window, compact every 10 versions.
    Default,
    /// Archive node: never delete anything.
    Nothing,
    /// Keep only the two latest versions.
    Everything,
    /// Operator-supplied values.
    Custom,
}

impl PruningStrategy {
    /// All strategies, in flag-help order.
    pub const ALL: [PruningStrategy; 4] = [
        PruningStrategy::Default,
        PruningStrategy::Nothing,
        PruningStrategy::Everything,
        PruningStrategy::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PruningStrategy::Default => "default",
            PruningStrategy::Nothing => "nothing",
            PruningStrategy::Everything => "everything",
            PruningStrategy::Custom => "custom",
        }
    }

    /// Returns true for the strategies with hard-coded values.
    pub fn is_preset(&self) -> bool {
        !matches!(self, PruningStrategy::Custom)
    }
}

impl fmt::Display for PruningStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PruningStrategy {
    type Err = PruningError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        PruningStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == normalized)
            .ok_or(PruningError::UnknownStrategy { strategy: normalized })
    }
}

// =============================================================================
// POLICY VIOLATIONS
// =============================================================================

/// The invariant a candidate policy broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    /// keep_every = 0 deletes everything outside the recent window, which
    /// needs a pruning interval.
    #[error("invalid 'interval' when pruning everything: {interval}")]
    PruneEverythingWithoutInterval { interval: u64 },

    /// keep_every = 1 keeps every version, so an interval has nothing to do.
    #[error("invalid 'interval' when pruning nothing: {interval}")]
    PruneNothingWithInterval { interval: u64 },

    #[error("invalid 'interval' when keeping every {keep_every}th version: {interval}")]
    MissingInterval { keep_every: u64, interval: u64 },

    /// A numeric setting could not be read as a non-negative integer.
    #[error("'{key}' must be a non-negative integer, got '{value}'")]
    MalformedValue { key: String, value: String },

    /// A preset strategy paired with values other than its fixed ones.
    #[error("'{strategy}' policy must use its preset values, got keep-recent={keep_recent}, keep-every={keep_every}, interval={interval}")]
    PresetMismatch {
        strategy: PruningStrategy,
        keep_recent: u64,
        keep_every: u64,
        interval: u64,
    },
}

// =============================================================================
// RETENTION POLICY
// =============================================================================

/// Immutable retention policy.
///
/// Construct through [`RetentionPolicy::preset`] or [`RetentionPolicy::custom`];
/// both guarantee the value satisfies [`RetentionPolicy::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PolicyRecord", into = "PolicyRecord")]
pub struct RetentionPolicy {
    strategy: PruningStrategy,
    keep_recent: u64,
    keep_every: u64,
    interval: u64,
}

impl RetentionPolicy {
    /// Fixed policy for a named strategy, `None` for `Custom`.
    pub fn preset(strategy: PruningStrategy) -> Option<Self> {
        match strategy {
            PruningStrategy::Default => Some(Self::default_policy()),
            PruningStrategy::Nothing => Some(Self::nothing()),
            PruningStrategy::Everything => Some(Self::everything()),
            PruningStrategy::Custom => None,
        }
    }

    /// Build and validate an operator-supplied policy.
    pub fn custom(keep_recent: u64, keep_every: u64, interval: u64) -> Result<Self, PolicyViolation> {
        let candidate = Self {
            strategy: PruningStrategy::Custom,
            keep_recent,
            keep_every,
            interval,
        };
        candidate.validate()?;
        Ok(candidate)
    }

    pub fn default_policy() -> Self {
        Self::fixed(PruningStrategy::Default, DEFAULT_KEEP_RECENT, 0, DEFAULT_PRUNING_INTERVAL)
    }

    pub fn nothing() -> Self {
        Self::fixed(PruningStrategy::Nothing, 0, 1, 0)
    }

    pub fn everything() -> Self {
        Self::fixed(PruningStrategy::Everything, EVERYTHING_KEEP_RECENT, 0, DEFAULT_PRUNING_INTERVAL)
    }

    const fn fixed(strategy: PruningStrategy, keep_recent: u64, keep_every: u64, interval: u64) -> Self {
        Self {
            strategy,
            keep_recent,
            keep_every,
            interval,
        }
    }

    /// Check the interval/keep_every combination.
    pub fn validate(&self) -> Result<(), PolicyViolation> {
        let interval = self.interval;
        match self.keep_every {
            0 if interval == 0 => Err(PolicyViolation::PruneEverythingWithoutInterval { interval }),
            1 if interval != 0 => Err(PolicyViolation::PruneNothingWithInterval { interval }),
            keep_every if keep_every > 1 && interval == 0 => {
                Err(PolicyViolation::MissingInterval { keep_every, interval })
            }
            _ => Ok(()),
        }
    }

    pub fn strategy(&self) -> PruningStrategy {
        self.strategy
    }

    pub fn keep_recent(&self) -> u64 {
        self.keep_recent
    }

    pub fn keep_every(&self) -> u64 {
        self.keep_every
    }

    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// True when the policy never deletes a version.
    pub fn keeps_everything(&self) -> bool {
        self.keep_every == 1
    }
}

impl fmt::Display for RetentionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (keep-recent={}, keep-every={}, interval={})",
            self.strategy, self.keep_recent, self.keep_every, self.interval
        )
    }
}

/// Serialized form; converting back re-runs validation and pins presets to
/// their fixed values.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PolicyRecord {
    strategy: PruningStrategy,
    keep_recent: u64,
    keep_every: u64,
    interval: u64,
}

impl From<RetentionPolicy> for PolicyRecord {
    fn from(policy: RetentionPolicy) -> Self {
        Self {
            strategy: policy.strategy,
            keep_recent: policy.keep_recent,
            keep_every: policy.keep_every,
            interval: policy.interval,
        }
    }
}

impl TryFrom<PolicyRecord> for RetentionPolicy {
    type Error = PolicyViolation;

    fn try_from(record: PolicyRecord) -> Result<Self, Self::Error> {
        let policy = Self {
            strategy: record.strategy,
            keep_recent: record.keep_recent,
            keep_every: record.keep_every,
            interval: record.interval,
        };
        if let Some(preset) = Self::preset(policy.strategy) {
            if preset != policy {
                return Err(PolicyViolation::PresetMismatch {
                    strategy: policy.strategy,
                    keep_recent: policy.keep_recent,
                    keep_every: policy.keep_every,
                    interval: policy.interval,
                });
            }
        }
        policy.validate()?;
        Ok(policy)
    }
}
