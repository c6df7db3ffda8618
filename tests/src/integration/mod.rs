//! # Integration Tests
//!
//! Drive `SocialConsensusService` end to end against the in-memory
//! repository: consensus invariants that must hold at every height, and
//! multi-step account lifecycles across mempool admission and block
//! validation.

pub mod properties;
pub mod scenarios;
