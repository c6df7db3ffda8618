//! Ports layer (Hexagonal Architecture)
//!
//! - Inbound: [`SocialConsensusApi`], called by mempool acceptance and block connection
//! - Outbound: [`ConsensusRepository`], the read-only view of chain and mempool state

mod inbound;
mod outbound;

pub use inbound::*;
pub use outbound::*;
