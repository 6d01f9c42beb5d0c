//! # Inbound Port (Driving Port)
//!
//! The operation offered to command-line tools.

use crate::domain::{PruningConfig, PruningError, RetentionPolicy};
use crate::ports::outbound::PruneOutcome;

/// Prune the history of a node's multi-version store.
pub trait StatePruningApi {
    /// Resolve and validate the policy without touching any store.
    fn check(&self, config: &PruningConfig) -> Result<RetentionPolicy, PruningError>;

    /// Open the store named by `config` and compact its history.
    fn prune(&self, config: &PruningConfig) -> Result<PruneOutcome, PruningError>;
}
