//! Shared builders for integration tests and benchmarks.

use sc_01_social_consensus::{
    InMemoryConsensusRepository, Network, SocialConsensusConfig, SocialConsensusDependencies,
    SocialConsensusService,
};
use shared_types::{Height, Payload, SocialTransaction, TxType};
use std::sync::Arc;

pub type Service = SocialConsensusService<InMemoryConsensusRepository>;

/// A height where every mainnet checkpoint is active.
pub const MODERN: Height = 2_000_000;

/// Repository plus a driver reading from it.
pub struct Node {
    pub repo: Arc<InMemoryConsensusRepository>,
    pub service: Service,
}

impl Node {
    pub fn new(network: Network) -> Self {
        let repo = Arc::new(InMemoryConsensusRepository::new());
        let service = SocialConsensusService::new(SocialConsensusDependencies {
            repository: repo.clone(),
            config: SocialConsensusConfig::for_network(network),
        })
        .expect("built-in tables are valid");

        Self { repo, service }
    }

    pub fn mainnet() -> Self {
        Self::new(Network::Main)
    }

    /// Confirmed `AccountUser` registrations at height 1.
    pub fn with_accounts(self, addresses: &[&str]) -> Self {
        for address in addresses {
            self.repo.insert_confirmed(registration(address), 1);
        }
        self
    }

    /// `count` confirmed posts by `address`, all at `height`.
    pub fn confirm_posts(&self, address: &str, prefix: &str, count: usize, height: Height) {
        for i in 0..count {
            self.repo
                .insert_confirmed(post(&format!("{prefix}{i}"), address, 1_000), height);
        }
    }
}

pub fn registration(address: &str) -> SocialTransaction {
    SocialTransaction::new(format!("reg-{address}"), TxType::AccountUser, address, 0).with_payload(Payload {
        name: Some(address.to_string()),
        ..Default::default()
    })
}

pub fn post(hash: &str, address: &str, time: i64) -> SocialTransaction {
    SocialTransaction::new(hash, TxType::ContentPost, address, time).with_payload(Payload {
        message: Some(format!("post {hash}")),
        ..Default::default()
    })
}

pub fn edit(hash: &str, address: &str, root: &str, time: i64) -> SocialTransaction {
    post(hash, address, time).with_root(root)
}

pub fn comment(hash: &str, address: &str, post_hash: &str, time: i64) -> SocialTransaction {
    SocialTransaction::new(hash, TxType::ContentComment, address, time)
        .with_post(post_hash)
        .with_payload(Payload {
            message: Some("nice%20post".into()),
            ..Default::default()
        })
}

pub fn score(hash: &str, address: &str, content: &str, value: i64) -> SocialTransaction {
    SocialTransaction::new(hash, TxType::ScoreContent, address, 2_000)
        .with_content(content)
        .with_value(value)
}

pub fn relation(hash: &str, tx_type: TxType, address: &str, to: &str) -> SocialTransaction {
    SocialTransaction::new(hash, tx_type, address, 2_000).with_address_to(to)
}
