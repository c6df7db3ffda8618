//! # Shared Types Crate
//!
//! Entities exchanged between the social consensus engine and the node
//! components around it (mempool acceptance, block connection, storage).
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: the social transaction shape is defined once
//!   here and consumed read-only by every rule family.
//! - **Flat model**: one `SocialTransaction` carries every type-specific
//!   reference field as an `Option`; the rule family decides which are required.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
