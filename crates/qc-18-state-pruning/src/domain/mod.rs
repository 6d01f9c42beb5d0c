//! # Domain Layer
//!
//! Pure domain logic for the State Pruning subsystem: no I/O, no store access.
//!
//! ## Modules
//!
//! - `policy` - PruningStrategy, RetentionPolicy and its validation rules
//! - `config` - Typed PruningConfig and the loose ConfigSource layer
//! - `resolver` - Config to policy resolution
//! - `errors` - Domain and collaborator error types

pub mod config;
pub mod errors;
pub mod policy;
pub mod resolver;

pub use config::*;
pub use errors::{PruningError, StoreError};
pub use policy::*;
pub use resolver::resolve_policy;
