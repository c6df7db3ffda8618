//! Social rule families
//!
//! Each transaction type maps to one family. A family is a behaviour record
//! (plain data) resolved per height from its [`CheckpointRegistry`], plus a
//! short-lived rule object that evaluates one transaction against a
//! [`RuleContext`].
//!
//! ## Two-phase contract
//!
//! - `check`: structural, touches no state
//! - `validate`: semantic, reads the repository; when a candidate block is
//!   supplied only the transactions before `tx` are scanned, otherwise the
//!   mempool is queried

mod account;
mod barteron;
mod comment;
mod complain;
mod content;
mod content_delete;
mod moderation;
mod relation;
mod score;

pub use account::AccountUserRules;
pub use barteron::BarteronAccountRules;
pub use comment::{CommentDeleteRules, CommentEditRules, CommentRules};
pub use complain::ComplainRules;
pub use content::ContentRules;
pub use content_delete::ContentDeleteRules;
pub use moderation::ModerationFlagRules;
pub use relation::RelationRules;
pub use score::ScoreRules;

use super::checkpoints::CheckpointRegistry;
use super::config::Network;
use super::error::{ensure, ReasonCode, RuleError, RuleResult};
use super::limits::{ConsensusLimit, LimitTable};
use super::reputation::{AccountInfo, ReputationRules};
use super::social_checkpoints::SocialCheckpoints;
use super::window::{block_prefix, ModeLimits, WindowMode};
use crate::metrics;
use crate::ports::{ConsensusRepository, CountWindow};
use shared_types::{Height, SocialTransaction, TxType};
use tracing::info;

/// Two-phase validation of one social transaction.
pub trait SocialRule {
    /// Structural validation. Never reads chain or mempool state.
    fn check(&self, tx: &SocialTransaction) -> RuleResult;

    /// Semantic validation against the repository and, when given, the
    /// candidate block.
    fn validate(&self, tx: &SocialTransaction, block: Option<&[SocialTransaction]>) -> RuleResult;
}

/// Everything a rule object reads while validating at one height.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    pub height: Height,
    pub repo: &'a dyn ConsensusRepository,
    pub limits: &'a LimitTable,
    pub social_checkpoints: &'a SocialCheckpoints,
}

impl<'a> RuleContext<'a> {
    pub fn limit(&self, limit: ConsensusLimit) -> i64 {
        self.limits.get(limit, self.height)
    }

    pub fn reputation(&self) -> ReputationRules<'a> {
        ReputationRules::new(self.repo, self.limits, self.height)
    }

    pub fn account_mode(&self, address: &str) -> RuleResult<AccountInfo> {
        Ok(self.reputation().account_mode(address)?)
    }

    /// Reject with `reason` unless this exact violation is grandfathered.
    pub fn reject_unless_grandfathered(&self, tx: &SocialTransaction, reason: ReasonCode) -> RuleResult {
        if self.social_checkpoints.is_checkpoint(&tx.hash, tx.tx_type, reason) {
            info!(
                tx_hash = %tx.hash,
                tx_type = %tx.tx_type,
                height = self.height,
                reason = ?reason,
                "Grandfathered historical violation"
            );
            metrics::record_grandfathered();
            return Ok(());
        }

        Err(RuleError::Rejected(reason))
    }

    /// Reject with `reason` when `count` reaches `limit`, subject to the allow-list.
    pub fn ensure_below(&self, tx: &SocialTransaction, count: i64, limit: i64, reason: ReasonCode) -> RuleResult {
        if count >= limit {
            return self.reject_unless_grandfathered(tx, reason);
        }
        Ok(())
    }

    /// Rate limit for the sender's account mode.
    pub fn ensure_mode_limit(
        &self,
        tx: &SocialTransaction,
        count: i64,
        mode_limits: &ModeLimits,
        reason: ReasonCode,
    ) -> RuleResult {
        let info = self.account_mode(&tx.address)?;
        let limit = mode_limits.value(self.limits, info.mode, self.height);
        self.ensure_below(tx, count, limit, reason)
    }

    /// Every address must hold an `AccountUser` registration.
    ///
    /// Mempool path: chain or mempool. Block path: chain, or an earlier
    /// registration in the candidate block.
    pub fn check_registration(
        &self,
        addresses: &[&str],
        tx: &SocialTransaction,
        block: Option<&[SocialTransaction]>,
    ) -> RuleResult {
        for address in addresses {
            let registered = match block {
                None => self.repo.exists_user_registration(address, true)?,
                Some(block) => {
                    self.repo.exists_user_registration(address, false)?
                        || block_prefix(block, tx)
                            .iter()
                            .any(|b| b.tx_type == TxType::AccountUser && b.address == *address)
                }
            };
            ensure(registered, ReasonCode::NotRegistered)?;
        }
        Ok(())
    }

    /// Chain counting window of `depth` in `mode`.
    pub fn window(&self, mode: WindowMode, tx: &SocialTransaction, depth: ConsensusLimit) -> CountWindow {
        mode.since(tx, self.height, self.limit(depth))
    }

    /// `author` currently blocks `actor`.
    pub fn is_blocked(&self, author: &str, actor: &str) -> RuleResult<bool> {
        Ok(self.repo.get_last_blocking_type(author, actor)? == Some(TxType::Blocking))
    }
}

/// Required string field present and non-empty.
pub(crate) fn require(value: &Option<String>) -> RuleResult {
    ensure(!shared_types::is_empty(value), ReasonCode::Failed)
}

/// Height-indexed behaviour records of every family on one network.
pub struct RuleRegistries {
    post: CheckpointRegistry<ContentRules>,
    video: CheckpointRegistry<ContentRules>,
    article: CheckpointRegistry<ContentRules>,
    comment: CheckpointRegistry<CommentRules>,
    comment_edit: CheckpointRegistry<CommentEditRules>,
    comment_delete: CheckpointRegistry<CommentDeleteRules>,
    content_delete: CheckpointRegistry<ContentDeleteRules>,
    score_content: CheckpointRegistry<ScoreRules>,
    score_comment: CheckpointRegistry<ScoreRules>,
    relation: CheckpointRegistry<RelationRules>,
    complain: CheckpointRegistry<ComplainRules>,
    moderation_flag: CheckpointRegistry<ModerationFlagRules>,
    account_user: CheckpointRegistry<AccountUserRules>,
    barteron_account: CheckpointRegistry<BarteronAccountRules>,
}

impl RuleRegistries {
    pub fn new(network: Network) -> Self {
        Self {
            post: content::post_registry(network),
            video: content::video_registry(network),
            article: content::article_registry(network),
            comment: comment::comment_registry(network),
            comment_edit: comment::comment_edit_registry(network),
            comment_delete: comment::comment_delete_registry(network),
            content_delete: content_delete::registry(network),
            score_content: score::score_content_registry(network),
            score_comment: score::score_comment_registry(network),
            relation: relation::registry(network),
            complain: complain::registry(network),
            moderation_flag: moderation::registry(network),
            account_user: account::registry(network),
            barteron_account: barteron::registry(network),
        }
    }

    /// Rule object for `tx_type` at `ctx.height`.
    pub fn rule_for<'a>(&'a self, tx_type: TxType, ctx: RuleContext<'a>) -> Box<dyn SocialRule + 'a> {
        let h = ctx.height;
        match tx_type {
            TxType::ContentPost => Box::new(self.post.resolve(h).bind(ctx)),
            TxType::ContentVideo => Box::new(self.video.resolve(h).bind(ctx)),
            TxType::ContentArticle => Box::new(self.article.resolve(h).bind(ctx)),
            TxType::ContentComment => Box::new(self.comment.resolve(h).bind(ctx)),
            TxType::ContentCommentEdit => Box::new(self.comment_edit.resolve(h).bind(ctx)),
            TxType::ContentCommentDelete => Box::new(self.comment_delete.resolve(h).bind(ctx)),
            TxType::ContentDelete => Box::new(self.content_delete.resolve(h).bind(ctx)),
            TxType::ScoreContent => Box::new(self.score_content.resolve(h).bind(ctx)),
            TxType::ScoreComment => Box::new(self.score_comment.resolve(h).bind(ctx)),
            TxType::Subscribe
            | TxType::SubscribePrivate
            | TxType::SubscribeCancel
            | TxType::Blocking
            | TxType::BlockingCancel => Box::new(self.relation.resolve(h).bind(ctx)),
            TxType::Complain => Box::new(self.complain.resolve(h).bind(ctx)),
            TxType::ModerationFlag => Box::new(self.moderation_flag.resolve(h).bind(ctx)),
            TxType::AccountUser => Box::new(self.account_user.resolve(h).bind(ctx)),
            TxType::BarteronAccount => Box::new(self.barteron_account.resolve(h).bind(ctx)),
        }
    }

    /// Name of the checkpoint governing `tx_type` at `height`.
    pub fn active_checkpoint(&self, tx_type: TxType, height: Height) -> &'static str {
        match tx_type {
            TxType::ContentPost => self.post.active_checkpoint(height),
            TxType::ContentVideo => self.video.active_checkpoint(height),
            TxType::ContentArticle => self.article.active_checkpoint(height),
            TxType::ContentComment => self.comment.active_checkpoint(height),
            TxType::ContentCommentEdit => self.comment_edit.active_checkpoint(height),
            TxType::ContentCommentDelete => self.comment_delete.active_checkpoint(height),
            TxType::ContentDelete => self.content_delete.active_checkpoint(height),
            TxType::ScoreContent => self.score_content.active_checkpoint(height),
            TxType::ScoreComment => self.score_comment.active_checkpoint(height),
            TxType::Subscribe
            | TxType::SubscribePrivate
            | TxType::SubscribeCancel
            | TxType::Blocking
            | TxType::BlockingCancel => self.relation.active_checkpoint(height),
            TxType::Complain => self.complain.active_checkpoint(height),
            TxType::ModerationFlag => self.moderation_flag.active_checkpoint(height),
            TxType::AccountUser => self.account_user.active_checkpoint(height),
            TxType::BarteronAccount => self.barteron_account.active_checkpoint(height),
        }
    }
}
