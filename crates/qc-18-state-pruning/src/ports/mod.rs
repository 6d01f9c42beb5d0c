//! # Ports Layer
//!
//! Defines the port traits for the State Pruning subsystem.
//!
//! ## Hexagonal Architecture
//!
//! - `inbound.rs` - Driving port (the prune operation exposed to tools)
//! - `outbound.rs` - Driven ports (database opener, store provider, stores)

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
