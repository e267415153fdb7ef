//! # Ports Module
//!
//! Hexagonal architecture ports: the query API offered to callers (inbound)
//! and the node transport the client depends on (outbound).

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
