//! # SC-01 Social Consensus Benchmarks
//!
//! Performance claims to validate:
//! - Mempool admission: one repository pass per transaction
//! - Block validation: linear in block size for independent senders
//! - Prefix scans: quadratic only in the transactions of one sender
//!
//! Brutal conditions:
//! - Thousands of registered accounts
//! - Full rolling windows of confirmed history
//! - Blocks where one sender sits at its rate limit

use crate::fixtures::*;
use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use sc_01_social_consensus::{ConsensusLimit, SocialConsensusApi};
use shared_types::TxType;
use std::time::Duration;

/// Node with `accounts` registered users and a few confirmed posts each.
fn populated_node(accounts: usize) -> Node {
    let node = Node::mainnet();
    for i in 0..accounts {
        let address = format!("user{i}");
        node.repo.insert_confirmed(registration(&address), 1);
        node.confirm_posts(&address, &format!("{address}-p"), 3, MODERN - 100);
    }
    node
}

/// One post per sender, each from a different account.
fn independent_block(accounts: usize, size: usize) -> Vec<shared_types::SocialTransaction> {
    let mut rng = rand::thread_rng();
    (0..size)
        .map(|i| {
            let sender = format!("user{}", rng.gen_range(0..accounts));
            post(&format!("blk-{i}"), &sender, 1_000)
        })
        .collect()
}

pub fn brutal_mempool_admission(c: &mut Criterion) {
    let mut group = c.benchmark_group("sc-01/brutal/mempool_admission");
    group.measurement_time(Duration::from_secs(10));

    let node = populated_node(1_000);
    let tx = post("candidate", "user7", 1_000);
    group.bench_function("validate_post", |b| {
        b.iter(|| black_box(node.service.validate(&tx, None, MODERN)))
    });

    let score_tx = score("score", "user8", "user7-p0", 5);
    group.bench_function("validate_score", |b| {
        b.iter(|| black_box(node.service.validate(&score_tx, None, MODERN)))
    });

    let subscribe = relation("sub", TxType::Subscribe, "user9", "user10");
    group.bench_function("validate_subscribe", |b| {
        b.iter(|| black_box(node.service.validate(&subscribe, None, MODERN)))
    });

    group.finish();
}

pub fn brutal_block_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("sc-01/brutal/block_validation");
    group.measurement_time(Duration::from_secs(10));

    let accounts = 1_000;
    let node = populated_node(accounts);

    for size in [10, 100, 1_000] {
        let block = independent_block(accounts, size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("independent_senders", size), &block, |b, block| {
            b.iter(|| black_box(node.service.validate_block(block, MODERN)))
        });
    }

    // One sender filling its cap: every post rescans the whole prefix.
    let cap = node.service.limits().get(ConsensusLimit::FullPost, MODERN) as usize;
    node.repo.set_reputation("user0", 1_000_000);
    let block: Vec<_> = (0..cap - 3)
        .map(|i| post(&format!("own-{i}"), "user0", 1_000))
        .collect();
    group.throughput(Throughput::Elements(block.len() as u64));
    group.bench_function("single_sender_at_cap", |b| {
        b.iter(|| black_box(node.service.validate_block(&block, MODERN)))
    });

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    brutal_mempool_admission(c);
    brutal_block_validation(c);
}
