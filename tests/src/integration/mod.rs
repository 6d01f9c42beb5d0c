//! # Integration Flows
//!
//! End-to-end pruning runs against the file-backed database.

pub mod config_layers;
pub mod prune_flow;
