//! # sc-01-social-consensus
//!
//! Social consensus engine for Social-Chain.
//!
//! ## Architecture
//!
//! Every social transaction (post, comment, score, subscription, complaint,
//! moderation flag, profile) is judged twice: once on mempool admission and
//! once as a member of a candidate block. The rules that apply changed many
//! times over the life of the chain, so each rule family is a behaviour
//! record resolved per height from a checkpoint registry.
//!
//! ```text
//! caller ──tx, block?, height──→ [SocialConsensusService]
//!                                        │
//!                     RuleRegistries::rule_for(type, height)
//!                                        │
//!                              check ──→ validate
//!                                        │
//!                         [ConsensusRepository] (read-only)
//! ```
//!
//! ### Rejections are values
//!
//! A rejected transaction yields `Verdict::Rejected(reason)`. Only repository
//! failures surface as `Err`, and the caller must then abort the whole
//! mempool admission or block connection.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sc_01_social_consensus::{
//!     SocialConsensusApi, SocialConsensusConfig, SocialConsensusDependencies,
//!     SocialConsensusService,
//! };
//!
//! let service = SocialConsensusService::new(SocialConsensusDependencies {
//!     repository,
//!     config: SocialConsensusConfig::from_env()?,
//! })?;
//!
//! let verdict = service.validate(&tx, None, height)?;
//! ```

pub mod adapters;
pub mod domain;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-export main types
pub use adapters::InMemoryConsensusRepository;
pub use domain::{
    AccountInfo, AccountMode, BlockVerdict, ConsensusError, ConsensusLimit, ConsensusResult,
    LimitTable, Network, ReasonCode, SocialCheckpoints, SocialConsensusConfig, Verdict,
};
pub use ports::{ConsensusRepository, CountWindow, OneToOneScoreQuery, SocialConsensusApi};
pub use service::{SocialConsensusDependencies, SocialConsensusService};
