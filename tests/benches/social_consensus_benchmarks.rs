//! # Social-Chain Consensus Benchmarks
//!
//! | Path | Claim | Target |
//! |------|-------|--------|
//! | Mempool admission | single post / score / subscribe | < 100µs |
//! | Block validation | 1,000 independent posts | < 100ms |

use criterion::{criterion_group, criterion_main, Criterion};
use sc_tests::benchmarks::sc_01_social_consensus::register_benchmarks;
use social_telemetry::{init_tracing, TelemetryConfig};

fn bench_social_consensus(c: &mut Criterion) {
    // RUST_LOG=debug shows per-transaction verdicts while benchmarking.
    if let Err(e) = init_tracing(&TelemetryConfig::for_component("01", "social-consensus")) {
        eprintln!("tracing disabled: {e}");
    }
    register_benchmarks(c);
}

criterion_group!(benches, bench_social_consensus);
criterion_main!(benches);
