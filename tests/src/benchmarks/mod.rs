//! # Social-Chain Benchmarks
//!
//! Throughput of mempool admission and candidate block validation.

pub mod sc_01_social_consensus;
