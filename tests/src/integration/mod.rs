//! # Integration Tests
//!
//! Flows that cross the client and telemetry crates.

pub mod flows;
pub mod telemetry;
