//! # Social-Chain Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── benchmarks/       # Throughput of the validation driver
//! │   └── sc_01_social_consensus.rs
//! │
//! ├── fixtures.rs       # Repository and transaction builders
//! │
//! └── integration/      # Driver-level behaviour
//!     ├── properties.rs # Consensus invariants
//!     └── scenarios.rs  # End-to-end account lifecycles
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p sc-tests
//!
//! # By category
//! cargo test -p sc-tests integration::properties::
//! cargo test -p sc-tests integration::scenarios::
//!
//! # Benchmarks
//! cargo bench -p sc-tests
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod benchmarks;
pub mod fixtures;
pub mod integration;
