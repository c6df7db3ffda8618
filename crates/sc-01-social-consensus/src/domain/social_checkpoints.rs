//! Grandfathered historical violations
//!
//! A small set of early-chain transactions were accepted under rules that
//! later reject them. Re-validating those blocks must still succeed, so each
//! such transaction is recorded as `(hash, tx_type, reason)` and a rejection
//! that matches a record exactly is suppressed.

use super::error::{ConsensusError, ConsensusResult, ReasonCode};
use serde::{Deserialize, Serialize};
use shared_types::{TxHash, TxType};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One allow-list record as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialCheckpointEntry {
    pub hash: TxHash,
    pub tx_type: TxType,
    pub reason: ReasonCode,
}

/// Lookup table keyed by transaction hash.
#[derive(Debug, Clone, Default)]
pub struct SocialCheckpoints {
    entries: HashMap<TxHash, Vec<(TxType, ReasonCode)>>,
}

impl SocialCheckpoints {
    /// Empty allow-list.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = SocialCheckpointEntry>) -> Self {
        let mut checkpoints = Self::new();
        for entry in entries {
            checkpoints.insert(entry.hash, entry.tx_type, entry.reason);
        }
        checkpoints
    }

    /// Load a JSON array of [`SocialCheckpointEntry`] records.
    pub fn load(path: &Path) -> ConsensusResult<Self> {
        let to_error = |reason: String| ConsensusError::SocialCheckpoints {
            path: path.display().to_string(),
            reason,
        };

        let raw = fs::read_to_string(path).map_err(|e| to_error(e.to_string()))?;
        let entries: Vec<SocialCheckpointEntry> =
            serde_json::from_str(&raw).map_err(|e| to_error(e.to_string()))?;

        Ok(Self::from_entries(entries))
    }

    pub fn insert(&mut self, hash: impl Into<TxHash>, tx_type: TxType, reason: ReasonCode) {
        let slot = self.entries.entry(hash.into()).or_default();
        if !slot.contains(&(tx_type, reason)) {
            slot.push((tx_type, reason));
        }
    }

    /// True when this exact rejection was grandfathered.
    pub fn is_checkpoint(&self, hash: &str, tx_type: TxType, reason: ReasonCode) -> bool {
        self.entries
            .get(hash)
            .is_some_and(|records| records.contains(&(tx_type, reason)))
    }

    /// Number of grandfathered records.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
