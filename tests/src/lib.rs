//! # Quantum-Chain Test Suite
//!
//! Unified test crate for the state pruning subsystem.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── pruning_benchmarks.rs   # Compaction pass cost
//! └── src/
//!     └── integration/            # qc-18 + qc-prune end to end
//!         ├── prune_flow.rs
//!         └── config_layers.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p qc-tests
//!
//! # Benchmarks
//! cargo bench -p qc-tests
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
