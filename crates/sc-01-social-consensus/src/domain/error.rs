//! Error types for the social consensus engine
//!
//! Two layers:
//! - [`ReasonCode`]: the closed set of consensus rejections. A rejection is an
//!   expected outcome, not a failure of the node.
//! - [`ConsensusError`]: hard failures (repository I/O, startup configuration)
//!   that abort the enclosing block or mempool operation.

use super::limits::ConsensusLimit;
use serde::{Deserialize, Serialize};
use shared_types::RepositoryError;

/// Why a social transaction was rejected.
///
/// Codes are stable and appear in logs, metrics and grandfather allow-lists.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, thiserror::Error,
)]
pub enum ReasonCode {
    // Structural
    #[error("required field missing or malformed")]
    Failed,
    #[error("payload size out of bounds")]
    Size,

    // Registration / referential
    #[error("address is not registered")]
    NotRegistered,
    #[error("referenced transaction not found")]
    NotFound,
    #[error("reposted content not found")]
    RelayContentNotFound,

    // Authorization
    #[error("only the author may edit this content")]
    ContentEditUnauthorized,
    #[error("only the author may delete this content")]
    ContentDeleteUnauthorized,

    // Double actions
    #[error("content already edited in this block or mempool")]
    DoubleContentEdit,
    #[error("comment already edited in this block or mempool")]
    DoubleCommentEdit,
    #[error("comment already deleted")]
    DoubleCommentDelete,
    #[error("content already deleted")]
    ContentDeleteDouble,
    #[error("content already complained about")]
    DoubleComplain,
    #[error("content already scored")]
    DoubleScore,
    #[error("comment already scored")]
    DoubleCommentScore,
    #[error("already subscribed")]
    DoubleSubscribe,
    #[error("already blocking")]
    DoubleBlocking,
    #[error("another transaction for the same relation is pending")]
    ManyTransactions,
    #[error("duplicate action")]
    Duplicate,

    // Self actions
    #[error("cannot complain about own content")]
    SelfComplain,
    #[error("cannot block self")]
    SelfBlocking,
    #[error("cannot subscribe to self")]
    SelfSubscribe,
    #[error("cannot score own content")]
    SelfScore,
    #[error("cannot score own comment")]
    SelfCommentScore,
    #[error("cannot refer self")]
    ReferrerSelf,

    // Windows and sizes
    #[error("content edit window or edit count exceeded")]
    ContentEditLimit,
    #[error("comment edit window or edit count exceeded")]
    CommentEditLimit,
    #[error("payload exceeds the size limit")]
    ContentSizeLimit,
    #[error("profile changed too recently")]
    ChangeInfoLimit,
    #[error("profile already changed in this block or mempool")]
    ChangeInfoDoubleInBlock,

    // Rate limits
    #[error("content limit reached")]
    ContentLimit,
    #[error("comment limit reached")]
    CommentLimit,
    #[error("score limit reached")]
    ScoreLimit,
    #[error("comment score limit reached")]
    CommentScoreLimit,
    #[error("complain limit reached")]
    ComplainLimit,
    #[error("limit exceeded")]
    ExceededLimit,

    // State-dependent
    #[error("reputation too low")]
    LowReputation,
    #[error("blocked by the content author")]
    Blocking,
    #[error("no active subscription to cancel")]
    InvalidSubscribe,
    #[error("no active blocking to cancel")]
    InvalidBlocking,
    #[error("parent comment not found")]
    InvalidParentComment,
    #[error("answered comment not found")]
    InvalidAnswerComment,
    #[error("cannot edit a deleted comment")]
    CommentDeletedEdit,
    #[error("cannot comment deleted content")]
    CommentDeletedContent,
    #[error("cannot score deleted content")]
    ScoreDeletedContent,
    #[error("cannot complain about deleted content")]
    ComplainDeletedContent,
    #[error("nickname already taken")]
    NicknameDouble,
    #[error("nickname too long")]
    NicknameLong,

    #[error("action not allowed")]
    NotAllowed,
}

impl ReasonCode {
    /// Stable numeric code.
    pub const fn code(self) -> u16 {
        match self {
            ReasonCode::Failed => 1,
            ReasonCode::NotRegistered => 2,
            ReasonCode::ContentLimit => 3,
            ReasonCode::ScoreLimit => 4,
            ReasonCode::DoubleScore => 5,
            ReasonCode::SelfScore => 6,
            ReasonCode::ChangeInfoLimit => 7,
            ReasonCode::InvalidParentComment => 8,
            ReasonCode::InvalidAnswerComment => 9,
            ReasonCode::DoubleSubscribe => 10,
            ReasonCode::SelfSubscribe => 11,
            ReasonCode::InvalidSubscribe => 12,
            ReasonCode::ComplainLimit => 13,
            ReasonCode::DoubleComplain => 14,
            ReasonCode::SelfComplain => 15,
            ReasonCode::LowReputation => 16,
            ReasonCode::NotFound => 17,
            ReasonCode::CommentLimit => 18,
            ReasonCode::CommentScoreLimit => 19,
            ReasonCode::DoubleCommentScore => 20,
            ReasonCode::SelfCommentScore => 21,
            ReasonCode::Size => 22,
            ReasonCode::ContentEditLimit => 23,
            ReasonCode::ContentEditUnauthorized => 24,
            ReasonCode::DoubleContentEdit => 25,
            ReasonCode::CommentEditLimit => 26,
            ReasonCode::DoubleCommentEdit => 27,
            ReasonCode::CommentDeletedEdit => 28,
            ReasonCode::DoubleCommentDelete => 29,
            ReasonCode::CommentDeletedContent => 30,
            ReasonCode::ContentDeleteUnauthorized => 31,
            ReasonCode::ContentDeleteDouble => 32,
            ReasonCode::SelfBlocking => 33,
            ReasonCode::DoubleBlocking => 34,
            ReasonCode::InvalidBlocking => 35,
            ReasonCode::Blocking => 36,
            ReasonCode::ScoreDeletedContent => 37,
            ReasonCode::ComplainDeletedContent => 38,
            ReasonCode::RelayContentNotFound => 39,
            ReasonCode::ContentSizeLimit => 40,
            ReasonCode::NicknameDouble => 41,
            ReasonCode::NicknameLong => 42,
            ReasonCode::ReferrerSelf => 43,
            ReasonCode::ChangeInfoDoubleInBlock => 44,
            ReasonCode::ManyTransactions => 45,
            ReasonCode::Duplicate => 46,
            ReasonCode::ExceededLimit => 47,
            ReasonCode::NotAllowed => 48,
        }
    }

    /// Variant name, used as a metrics label.
    pub fn label(self) -> String {
        format!("{:?}", self)
    }
}

/// Error flowing through rule methods.
///
/// `?` carries both outcomes upward; the driver turns `Rejected` into a
/// verdict and surfaces `Repository` as a hard failure.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("rejected: {0}")]
    Rejected(ReasonCode),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<ReasonCode> for RuleError {
    fn from(reason: ReasonCode) -> Self {
        RuleError::Rejected(reason)
    }
}

/// Result type for rule methods
pub type RuleResult<T = ()> = Result<T, RuleError>;

/// Reject with `reason` unless `condition` holds.
pub fn ensure(condition: bool, reason: ReasonCode) -> RuleResult {
    if condition {
        Ok(())
    } else {
        Err(RuleError::Rejected(reason))
    }
}

/// Hard failures of the consensus engine
#[derive(Debug, thiserror::Error)]
pub enum ConsensusError {
    #[error("Repository failure: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Consensus limit {0:?} has no height-0 default")]
    MissingLimitDefault(ConsensusLimit),

    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    #[error("Failed to load social checkpoints from {path}: {reason}")]
    SocialCheckpoints { path: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for consensus operations
pub type ConsensusResult<T> = Result<T, ConsensusError>;
