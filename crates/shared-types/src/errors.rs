//! # Error Types
//!
//! Errors raised by the storage layer behind the consensus repository.

use thiserror::Error;

/// Failures of the read path the consensus engine queries.
///
/// These are never consensus rejections: a rule that hits one aborts the
/// whole block or mempool operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The underlying store could not serve the read.
    #[error("Storage read failed: {0}")]
    Storage(String),

    /// A persisted record could not be decoded.
    #[error("Corrupted record {hash}: {reason}")]
    Corrupted { hash: String, reason: String },

    /// No consistent snapshot exists for the requested height.
    #[error("Snapshot unavailable at height {0}")]
    SnapshotUnavailable(i64),
}
