//! Domain layer for the social consensus engine
//!
//! - limits: height-versioned numeric limits
//! - checkpoints: height-indexed behaviour records per rule family
//! - reputation: account modes and reputation gates
//! - window: counting windows and candidate-block scanning
//! - rules: one family per social transaction type
//! - social_checkpoints: grandfathered historical violations

mod checkpoints;
mod config;
mod error;
mod limits;
mod reputation;
mod rules;
mod social_checkpoints;
mod verdict;
mod window;

pub use checkpoints::*;
pub use config::*;
pub use error::*;
pub use limits::*;
pub use reputation::*;
pub use rules::*;
pub use social_checkpoints::*;
pub use verdict::*;
pub use window::*;
