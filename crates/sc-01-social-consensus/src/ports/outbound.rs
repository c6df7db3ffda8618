//! Driven ports (Outbound dependencies)
//!
//! The engine never writes. Every query below is answered from one
//! consistent snapshot: confirmed chain state up to the validation height,
//! plus the current mempool where a method says so.

use shared_types::{Height, RepositoryError, SocialTransaction, TxType};

/// Result type for repository reads
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Lower bound of a chain counting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountWindow {
    /// Transactions with `time >= since`.
    Time(i64),
    /// Transactions with `height >= since`.
    Height(Height),
}

/// Scores from one address on content authored by another.
///
/// Matches confirmed scores with `since_time <= time < until_time`,
/// `height <= max_height` and `value` in `values`, excluding `exclude_hash`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneToOneScoreQuery<'a> {
    pub scorer: &'a str,
    pub author: &'a str,
    /// `ScoreContent` or `ScoreComment`
    pub score_type: TxType,
    pub values: &'a [i64],
    pub since_time: i64,
    pub until_time: i64,
    pub max_height: Height,
    pub exclude_hash: &'a str,
}

/// Consensus repository facade
///
/// Counting methods take an `exclude_hash` so that re-validating an already
/// persisted transaction never counts the transaction itself.
pub trait ConsensusRepository: Send + Sync {
    // === EXISTENCE ===

    /// Transaction known in chain or mempool.
    fn exists(&self, hash: &str) -> RepositoryResult<bool>;

    /// Transaction confirmed in chain.
    fn exists_in_chain(&self, hash: &str) -> RepositoryResult<bool>;

    /// Transaction of one of `types` exists, optionally confirmed only.
    fn exists_content(&self, hash: &str, types: &[TxType], chain_only: bool)
        -> RepositoryResult<bool>;

    /// Address has an `AccountUser` registration.
    fn exists_user_registration(&self, address: &str, include_mempool: bool)
        -> RepositoryResult<bool>;

    /// Address already scored the content (any version of its chain).
    fn exists_score(
        &self,
        address: &str,
        content_hash: &str,
        score_type: TxType,
        include_mempool: bool,
        exclude_hash: &str,
    ) -> RepositoryResult<bool>;

    /// Address already complained about the post, in chain or also in the
    /// mempool when `include_mempool` is set.
    fn exists_complain(
        &self,
        exclude_hash: &str,
        post_hash: &str,
        address: &str,
        include_mempool: bool,
    ) -> RepositoryResult<bool>;

    /// Some other address currently holds `name`.
    fn exists_another_by_name(&self, address: &str, name: &str) -> RepositoryResult<bool>;

    // === CONTENT CHAINS ===

    /// Original transaction of a content chain.
    fn get_first_content(&self, root_hash: &str) -> RepositoryResult<Option<SocialTransaction>>;

    /// Latest confirmed version of a content chain, when its type is in `types`.
    fn get_last_content(
        &self,
        root_hash: &str,
        types: &[TxType],
    ) -> RepositoryResult<Option<SocialTransaction>>;

    fn get_transaction_height(&self, hash: &str) -> RepositoryResult<Option<Height>>;

    // === RELATIONS ===

    /// `Blocking` or `BlockingCancel`, whichever `address` sent last to `address_to`.
    fn get_last_blocking_type(&self, address: &str, address_to: &str)
        -> RepositoryResult<Option<TxType>>;

    /// Last subscribe-family type `address` sent to `address_to`.
    fn get_last_subscribe_type(&self, address: &str, address_to: &str)
        -> RepositoryResult<Option<TxType>>;

    // === ACCOUNT STATE ===

    fn get_user_reputation(&self, address: &str, height: Height) -> RepositoryResult<i64>;

    fn get_user_balance(&self, address: &str) -> RepositoryResult<i64>;

    fn get_user_likers_count(&self, address: &str, height: Height) -> RepositoryResult<i64>;

    // === COUNTING ===

    /// Confirmed originals (non-edits) of `types` sent by `address` inside `window`.
    fn count_chain_actions(
        &self,
        types: &[TxType],
        address: &str,
        window: CountWindow,
        exclude_hash: &str,
    ) -> RepositoryResult<i64>;

    /// Pending originals (non-edits) of `types` sent by `address`.
    fn count_mempool_actions(&self, types: &[TxType], address: &str, exclude_hash: &str)
        -> RepositoryResult<i64>;

    /// Confirmed edits of `types` by `address` referencing `root_hash`.
    fn count_chain_edits(
        &self,
        types: &[TxType],
        address: &str,
        root_hash: &str,
        exclude_hash: &str,
    ) -> RepositoryResult<i64>;

    /// Pending edits (and deletes) of `types` by `address` referencing `root_hash`.
    fn count_mempool_edits(
        &self,
        types: &[TxType],
        address: &str,
        root_hash: &str,
        exclude_hash: &str,
    ) -> RepositoryResult<i64>;

    /// Pending transactions of `types` from `address` to `address_to`.
    fn count_mempool_relations(
        &self,
        types: &[TxType],
        address: &str,
        address_to: &str,
        exclude_hash: &str,
    ) -> RepositoryResult<i64>;

    /// Flags sent by `address` (optionally to `address_to`) at or after `since_height`.
    fn count_moderation_flags(
        &self,
        address: &str,
        address_to: Option<&str>,
        since_height: Height,
        include_mempool: bool,
        exclude_hash: &str,
    ) -> RepositoryResult<i64>;

    fn count_scores_one_to_one(&self, query: &OneToOneScoreQuery<'_>) -> RepositoryResult<i64>;
}
