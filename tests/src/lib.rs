//! # BCHD Client Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Criterion benchmarks of the domain mapper
//! └── src/integration/  # Cross-crate flows
//!     ├── flows.rs      # Query and subscription flows through BchdClient
//!     └── telemetry.rs  # Client activity observed through bchd-telemetry
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p bchd-tests
//!
//! # By category
//! cargo test -p bchd-tests integration::flows::
//! cargo test -p bchd-tests integration::telemetry::
//!
//! # Benchmarks
//! cargo bench -p bchd-tests
//! ```

#![allow(dead_code)]

pub mod integration;
