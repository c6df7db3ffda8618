//! # Social Consensus Metrics
//!
//! Prometheus metrics for monitoring social transaction validation.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! sc-01-social-consensus = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `social_consensus_accepted_total` - Counter of accepted transactions (by type)
//! - `social_consensus_rejected_total` - Counter of rejected transactions (by type and reason)
//! - `social_consensus_grandfathered_total` - Counter of violations waived by the allow-list
//! - `social_consensus_validation_latency_seconds` - Histogram of validation times

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_counter_vec, register_histogram, register_int_counter, CounterVec, Histogram,
    IntCounter,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Accepted transactions, labeled by transaction type
    pub static ref TX_ACCEPTED: CounterVec = register_counter_vec!(
        "social_consensus_accepted_total",
        "Total number of social transactions accepted",
        &["tx_type"]
    )
    .expect("Failed to create TX_ACCEPTED metric");

    /// Rejected transactions, labeled by transaction type and reason
    pub static ref TX_REJECTED: CounterVec = register_counter_vec!(
        "social_consensus_rejected_total",
        "Total number of social transactions rejected",
        &["tx_type", "reason"]
    )
    .expect("Failed to create TX_REJECTED metric");

    pub static ref GRANDFATHERED: IntCounter = register_int_counter!(
        "social_consensus_grandfathered_total",
        "Total number of historical violations waived by the allow-list"
    )
    .expect("Failed to create GRANDFATHERED metric");

    /// Histogram of per-transaction validation latency
    pub static ref VALIDATION_LATENCY: Histogram = register_histogram!(
        "social_consensus_validation_latency_seconds",
        "Time taken to validate a social transaction in seconds",
        vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to create VALIDATION_LATENCY metric");
}

/// Record an accepted transaction
#[cfg(feature = "metrics")]
pub fn record_accepted(tx_type: &str) {
    TX_ACCEPTED.with_label_values(&[tx_type]).inc();
}

/// Record a rejected transaction with reason
#[cfg(feature = "metrics")]
pub fn record_rejected(tx_type: &str, reason: &str) {
    TX_REJECTED.with_label_values(&[tx_type, reason]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_grandfathered() {
    GRANDFATHERED.inc();
}

/// Record validation latency
#[cfg(feature = "metrics")]
pub fn record_validation_latency(seconds: f64) {
    VALIDATION_LATENCY.observe(seconds);
}

// No-op implementations when metrics feature is disabled
#[cfg(not(feature = "metrics"))]
pub fn record_accepted(_tx_type: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_rejected(_tx_type: &str, _reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_grandfathered() {}

#[cfg(not(feature = "metrics"))]
pub fn record_validation_latency(_seconds: f64) {}
