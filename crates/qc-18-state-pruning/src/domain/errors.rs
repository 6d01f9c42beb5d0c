//! # Domain Errors
//!
//! Error types for the State Pruning subsystem.
//!
//! Every step of a pruning run fails fast; collaborator errors are kept as the
//! `source` of the variant that reports them and are not repeated in its
//! message, so `{:#}` chains print each cause once.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::policy::PolicyViolation;

/// Errors raised while resolving a policy or running a prune.
#[derive(Debug, Error)]
pub enum PruningError {
    #[error("unknown pruning strategy {strategy}")]
    UnknownStrategy { strategy: String },

    #[error("invalid custom pruning options: {0}")]
    InvalidPolicy(#[from] PolicyViolation),

    #[error("failed to acquire multi-version store")]
    StoreAcquisition(#[source] StoreError),

    #[error("currently only stores with history pruning support can be pruned, got {store}")]
    UnsupportedStoreType { store: String },

    #[error("history compaction failed")]
    Compaction(#[source] StoreError),

    #[error("failed to load configuration from {path}: {message}")]
    ConfigLoad { path: String, message: String },
}

impl PruningError {
    /// The violated invariant, for `InvalidPolicy` errors.
    pub fn violation(&self) -> Option<&PolicyViolation> {
        match self {
            PruningError::InvalidPolicy(violation) => Some(violation),
            _ => None,
        }
    }
}

/// Errors reported by store collaborators (database opener, provider, store).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("database locked: {0}")]
    Locked(String),

    #[error("corrupted store data: {0}")]
    Corrupted(String),

    #[error("unsupported database backend '{0}'")]
    UnsupportedBackend(String),

    #[error("database home directory is not set")]
    MissingHome,

    #[error("no pruning policy installed on the store")]
    PolicyNotSet,

    /// The provider could not resolve the configured policy.
    #[error("pruning configuration rejected by store provider")]
    Policy(#[source] Box<PruningError>),

    #[error("{0}")]
    Backend(String),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
