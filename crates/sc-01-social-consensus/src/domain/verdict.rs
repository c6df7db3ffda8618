//! Validation outcomes returned across the inbound port

use super::error::{ReasonCode, RuleError, RuleResult};
use serde::{Deserialize, Serialize};
use shared_types::{RepositoryError, TxHash};

/// Outcome of `check` / `validate` for one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Accepted,
    Rejected(ReasonCode),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    /// Rejection reason, `None` when accepted.
    pub fn reason(&self) -> Option<ReasonCode> {
        match self {
            Verdict::Accepted => None,
            Verdict::Rejected(reason) => Some(*reason),
        }
    }

    /// Split a rule outcome into a verdict or a hard failure.
    pub(crate) fn from_rule(result: RuleResult) -> Result<Self, RepositoryError> {
        match result {
            Ok(()) => Ok(Verdict::Accepted),
            Err(RuleError::Rejected(reason)) => Ok(Verdict::Rejected(reason)),
            Err(RuleError::Repository(err)) => Err(err),
        }
    }
}

/// Outcome of validating a whole candidate block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockVerdict {
    Accepted,
    /// First offending transaction; the whole block is invalid.
    Rejected {
        index: usize,
        tx_hash: TxHash,
        reason: ReasonCode,
    },
}

impl BlockVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, BlockVerdict::Accepted)
    }
}
