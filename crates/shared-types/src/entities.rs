//! # Social Entities
//!
//! Defines the social transaction model consumed by the consensus engine.
//!
//! ## Clusters
//!
//! - **Identity**: `TxHash`, `Address`, `Height`
//! - **Classification**: `TxType` with its stable numeric wire codes
//! - **Transaction**: `SocialTransaction`, `Payload`

use serde::{Deserialize, Serialize};
use std::fmt;

/// Content-derived transaction identifier (hex string).
pub type TxHash = String;

/// Account identifier derived from a public key.
pub type Address = String;

/// Block height. Signed so that window arithmetic (`height - depth`) never wraps.
pub type Height = i64;

// =============================================================================
// TRANSACTION TYPES
// =============================================================================

/// Social transaction types with their on-chain numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum TxType {
    AccountUser,
    BarteronAccount,
    ContentPost,
    ContentVideo,
    ContentArticle,
    ContentComment,
    ContentCommentEdit,
    ContentCommentDelete,
    ContentDelete,
    ScoreContent,
    ScoreComment,
    Subscribe,
    SubscribePrivate,
    SubscribeCancel,
    Blocking,
    BlockingCancel,
    Complain,
    ModerationFlag,
}

impl TxType {
    /// Every social type, in code order.
    pub const ALL: [TxType; 18] = [
        TxType::AccountUser,
        TxType::BarteronAccount,
        TxType::ContentPost,
        TxType::ContentVideo,
        TxType::ContentArticle,
        TxType::ContentComment,
        TxType::ContentCommentEdit,
        TxType::ContentCommentDelete,
        TxType::ContentDelete,
        TxType::ScoreContent,
        TxType::ScoreComment,
        TxType::Subscribe,
        TxType::SubscribePrivate,
        TxType::SubscribeCancel,
        TxType::Blocking,
        TxType::BlockingCancel,
        TxType::Complain,
        TxType::ModerationFlag,
    ];

    /// Top-level content kinds that can be reposted, commented, scored and deleted.
    pub const CONTENT: [TxType; 3] = [
        TxType::ContentPost,
        TxType::ContentVideo,
        TxType::ContentArticle,
    ];

    /// Content kinds plus the delete marker, used when resolving the last
    /// version of a content chain.
    pub const CONTENT_WITH_DELETE: [TxType; 4] = [
        TxType::ContentPost,
        TxType::ContentVideo,
        TxType::ContentArticle,
        TxType::ContentDelete,
    ];

    /// Every version kind of a comment chain.
    pub const COMMENT_CHAIN: [TxType; 3] = [
        TxType::ContentComment,
        TxType::ContentCommentEdit,
        TxType::ContentCommentDelete,
    ];

    /// Numeric wire code.
    pub const fn code(self) -> u16 {
        match self {
            TxType::AccountUser => 100,
            TxType::BarteronAccount => 104,
            TxType::ContentPost => 200,
            TxType::ContentVideo => 201,
            TxType::ContentArticle => 202,
            TxType::ContentComment => 204,
            TxType::ContentCommentEdit => 205,
            TxType::ContentCommentDelete => 206,
            TxType::ContentDelete => 207,
            TxType::ScoreContent => 300,
            TxType::ScoreComment => 301,
            TxType::Subscribe => 302,
            TxType::SubscribePrivate => 303,
            TxType::SubscribeCancel => 304,
            TxType::Blocking => 305,
            TxType::BlockingCancel => 306,
            TxType::Complain => 307,
            TxType::ModerationFlag => 410,
        }
    }

    /// Resolve a wire code, `None` for codes outside the social range.
    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.code() == code)
    }

    /// True for posts, videos and articles.
    pub fn is_content(self) -> bool {
        Self::CONTENT.contains(&self)
    }

    /// True for the subscribe family.
    pub fn is_subscribe(self) -> bool {
        matches!(
            self,
            TxType::Subscribe | TxType::SubscribePrivate | TxType::SubscribeCancel
        )
    }

    /// True for the blocking family.
    pub fn is_blocking(self) -> bool {
        matches!(self, TxType::Blocking | TxType::BlockingCancel)
    }
}

impl TryFrom<u16> for TxType {
    type Error = String;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| format!("unknown social transaction type {code}"))
    }
}

impl From<TxType> for u16 {
    fn from(tx_type: TxType) -> Self {
        tx_type.code()
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}

// =============================================================================
// TRANSACTION
// =============================================================================

/// Variable-length, type-specific payload fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub lang: Option<String>,
    pub name: Option<String>,
    pub message: Option<String>,
    pub caption: Option<String>,
    pub url: Option<String>,
    pub settings: Option<String>,
    pub avatar: Option<String>,
    pub about: Option<String>,
    pub donations: Option<String>,
    pub pubkey: Option<String>,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    /// Raw JSON list of tag ids to add (barteron accounts).
    pub tags_add: Option<String>,
    /// Raw JSON list of tag ids to remove (barteron accounts).
    pub tags_del: Option<String>,
}

impl Payload {
    /// Cumulative byte size of every string field, lists included.
    pub fn strings_size(&self) -> usize {
        let scalars = [
            &self.lang,
            &self.name,
            &self.message,
            &self.caption,
            &self.url,
            &self.settings,
            &self.avatar,
            &self.about,
            &self.donations,
            &self.pubkey,
            &self.tags_add,
            &self.tags_del,
        ];

        scalars.iter().map(|s| opt_len(s)).sum::<usize>()
            + self.tags.iter().map(String::len).sum::<usize>()
            + self.images.iter().map(String::len).sum::<usize>()
    }
}

/// One social action embedded in a transaction.
///
/// `height` is `None` while the transaction sits in the mempool and is set
/// once it is mined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialTransaction {
    pub hash: TxHash,
    pub tx_type: TxType,
    pub address: Address,
    pub time: i64,
    pub height: Option<Height>,
    /// Original content of an edit or delete chain.
    pub root_tx_hash: Option<TxHash>,
    pub relay_tx_hash: Option<TxHash>,
    pub post_tx_hash: Option<TxHash>,
    pub parent_tx_hash: Option<TxHash>,
    pub answer_tx_hash: Option<TxHash>,
    /// Scored or flagged content.
    pub content_tx_hash: Option<TxHash>,
    pub address_to: Option<Address>,
    pub referrer: Option<Address>,
    pub value: Option<i64>,
    pub reason: Option<i64>,
    pub payload: Option<Payload>,
}

impl SocialTransaction {
    pub fn new(hash: impl Into<TxHash>, tx_type: TxType, address: impl Into<Address>, time: i64) -> Self {
        Self {
            hash: hash.into(),
            tx_type,
            address: address.into(),
            time,
            height: None,
            root_tx_hash: None,
            relay_tx_hash: None,
            post_tx_hash: None,
            parent_tx_hash: None,
            answer_tx_hash: None,
            content_tx_hash: None,
            address_to: None,
            referrer: None,
            value: None,
            reason: None,
            payload: None,
        }
    }

    pub fn with_height(mut self, height: Height) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_root(mut self, root: impl Into<TxHash>) -> Self {
        self.root_tx_hash = Some(root.into());
        self
    }

    pub fn with_relay(mut self, relay: impl Into<TxHash>) -> Self {
        self.relay_tx_hash = Some(relay.into());
        self
    }

    pub fn with_post(mut self, post: impl Into<TxHash>) -> Self {
        self.post_tx_hash = Some(post.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<TxHash>) -> Self {
        self.parent_tx_hash = Some(parent.into());
        self
    }

    pub fn with_answer(mut self, answer: impl Into<TxHash>) -> Self {
        self.answer_tx_hash = Some(answer.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<TxHash>) -> Self {
        self.content_tx_hash = Some(content.into());
        self
    }

    pub fn with_address_to(mut self, address_to: impl Into<Address>) -> Self {
        self.address_to = Some(address_to.into());
        self
    }

    pub fn with_referrer(mut self, referrer: impl Into<Address>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    pub fn with_value(mut self, value: i64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_reason(mut self, reason: i64) -> Self {
        self.reason = Some(reason);
        self
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// An edit (or delete) references a root other than itself.
    pub fn is_edit(&self) -> bool {
        matches!(&self.root_tx_hash, Some(root) if !root.is_empty() && *root != self.hash)
    }

    /// Root of the chain this transaction belongs to; its own hash for originals.
    pub fn root_hash(&self) -> &str {
        match &self.root_tx_hash {
            Some(root) if !root.is_empty() => root,
            _ => &self.hash,
        }
    }

    /// True once the transaction has been mined.
    pub fn is_confirmed(&self) -> bool {
        self.height.is_some()
    }

    /// Payload message, if any.
    pub fn message(&self) -> Option<&str> {
        self.payload.as_ref().and_then(|p| p.message.as_deref())
    }

    /// Payload name, if any.
    pub fn name(&self) -> Option<&str> {
        self.payload.as_ref().and_then(|p| p.name.as_deref())
    }
}

/// Length of an optional string, zero when absent.
pub fn opt_len(value: &Option<String>) -> usize {
    value.as_ref().map_or(0, String::len)
}

/// True when an optional string field is absent or empty.
pub fn is_empty(value: &Option<String>) -> bool {
    value.as_ref().map_or(true, String::is_empty)
}
