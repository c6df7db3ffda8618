//! Comments, comment edits and comment deletes
//!
//! A comment chain is rooted at its first `ContentComment`; edits and the
//! delete marker reference that root. Parent and answer references must
//! resolve to live comments, and an edit may not move a comment to another
//! parent or answer.

use super::{require, RuleContext, SocialRule};
use crate::domain::checkpoints::{ActivationHeight, Checkpoint, CheckpointRegistry};
use crate::domain::config::Network;
use crate::domain::error::{ensure, ReasonCode, RuleResult};
use crate::domain::limits::ConsensusLimit;
use crate::domain::window::{block_prefix, BlockWindow, ModeLimits, WindowMode};
use shared_types::{SocialTransaction, TxType};

const LIVE_COMMENT: [TxType; 2] = [TxType::ContentComment, TxType::ContentCommentEdit];

/// Message length after URL decoding; the raw length when decoding fails.
pub(crate) fn decoded_message_len(tx: &SocialTransaction) -> usize {
    tx.message().map_or(0, |m| {
        urlencoding::decode(m).map(|d| d.len()).unwrap_or(m.len())
    })
}

/// Structural checks shared by comments and comment edits.
fn check_message(ctx: &RuleContext<'_>, tx: &SocialTransaction) -> RuleResult {
    ensure(!tx.address.is_empty(), ReasonCode::Failed)?;
    require(&tx.post_tx_hash)?;

    let has_message = tx.message().is_some_and(|m| !m.is_empty());
    ensure(has_message, ReasonCode::Size)?;
    ensure(
        decoded_message_len(tx) as i64 <= ctx.limit(ConsensusLimit::MaxCommentSize),
        ReasonCode::Size,
    )
}

fn validate_size(ctx: &RuleContext<'_>, tx: &SocialTransaction) -> RuleResult {
    ensure(
        decoded_message_len(tx) as i64 <= ctx.limit(ConsensusLimit::MaxCommentSize),
        ReasonCode::ContentSizeLimit,
    )
}

/// The commented content exists, is not deleted, and its author does not block the sender.
fn validate_commented_content(ctx: &RuleContext<'_>, tx: &SocialTransaction, check_blocking: bool) -> RuleResult {
    let post = tx.post_tx_hash.as_deref().unwrap_or_default();
    let Some(content) = ctx.repo.get_last_content(post, &TxType::CONTENT_WITH_DELETE)? else {
        return Err(ReasonCode::NotFound.into());
    };

    ensure(content.tx_type != TxType::ContentDelete, ReasonCode::CommentDeletedContent)?;
    if check_blocking {
        ensure(!ctx.is_blocked(&content.address, &tx.address)?, ReasonCode::Blocking)?;
    }
    Ok(())
}

/// A non-empty reference must resolve to a live comment.
fn validate_reference(ctx: &RuleContext<'_>, reference: Option<&str>, reason: ReasonCode) -> RuleResult {
    match reference.filter(|r| !r.is_empty()) {
        Some(hash) => ensure(
            ctx.repo.get_last_content(hash, &LIVE_COMMENT)?.is_some(),
            reason,
        ),
        None => Ok(()),
    }
}

// =============================================================================
// COMMENT
// =============================================================================

#[derive(Debug, Clone)]
pub struct CommentRules {
    pub block_window: BlockWindow,
    pub count_window: WindowMode,
    pub check_blocking: bool,
    pub mode_limits: ModeLimits,
}

impl CommentRules {
    pub(crate) fn bind<'a>(&'a self, ctx: RuleContext<'a>) -> CommentRule<'a> {
        CommentRule { rules: self, ctx }
    }
}

pub(crate) fn comment_registry(network: Network) -> CheckpointRegistry<CommentRules> {
    CheckpointRegistry::new(
        network,
        CommentRules {
            block_window: BlockWindow::TimeOrdered,
            count_window: WindowMode::Time,
            check_blocking: false,
            mode_limits: ModeLimits::new(ConsensusLimit::TrialComment, ConsensusLimit::FullComment),
        },
        &[
            Checkpoint::new("block_window_all", ActivationHeight::mainnet(1_124_000), |r: &mut CommentRules| {
                r.block_window = BlockWindow::All
            }),
            Checkpoint::new("height_windows", ActivationHeight::mainnet(1_180_000), |r: &mut CommentRules| {
                r.count_window = WindowMode::Height
            }),
            Checkpoint::new(
                "disable_for_blocked",
                ActivationHeight::new(Some(1_757_000), Some(953_000), Some(0)),
                |r: &mut CommentRules| r.check_blocking = true,
            ),
        ],
    )
}

pub(crate) struct CommentRule<'a> {
    rules: &'a CommentRules,
    ctx: RuleContext<'a>,
}

impl SocialRule for CommentRule<'_> {
    fn check(&self, tx: &SocialTransaction) -> RuleResult {
        check_message(&self.ctx, tx)
    }

    fn validate(&self, tx: &SocialTransaction, block: Option<&[SocialTransaction]>) -> RuleResult {
        let ctx = &self.ctx;

        validate_size(ctx, tx)?;
        validate_commented_content(ctx, tx, self.rules.check_blocking)?;
        validate_reference(ctx, tx.parent_tx_hash.as_deref(), ReasonCode::InvalidParentComment)?;
        validate_reference(ctx, tx.answer_tx_hash.as_deref(), ReasonCode::InvalidAnswerComment)?;

        ctx.check_registration(&[&tx.address], tx, block)?;

        let window = ctx.window(self.rules.count_window, tx, ConsensusLimit::Depth);
        let mut count =
            ctx.repo
                .count_chain_actions(&[TxType::ContentComment], &tx.address, window, &tx.hash)?;

        count += match block {
            Some(block) => block_prefix(block, tx)
                .iter()
                .filter(|b| {
                    b.tx_type == TxType::ContentComment
                        && b.address == tx.address
                        && !b.is_edit()
                        && b.hash != tx.hash
                        && self.rules.block_window.counts(b, tx)
                })
                .count() as i64,
            None => ctx
                .repo
                .count_mempool_actions(&[TxType::ContentComment], &tx.address, &tx.hash)?,
        };

        ctx.ensure_mode_limit(tx, count, &self.rules.mode_limits, ReasonCode::CommentLimit)
    }
}

// =============================================================================
// COMMENT EDIT
// =============================================================================

#[derive(Debug, Clone)]
pub struct CommentEditRules {
    pub edit_window: WindowMode,
    /// Only the original author may edit.
    pub check_author: bool,
}

impl CommentEditRules {
    pub(crate) fn bind<'a>(&'a self, ctx: RuleContext<'a>) -> CommentEditRule<'a> {
        CommentEditRule { rules: self, ctx }
    }
}

pub(crate) fn comment_edit_registry(network: Network) -> CheckpointRegistry<CommentEditRules> {
    CheckpointRegistry::new(
        network,
        CommentEditRules {
            edit_window: WindowMode::Time,
            check_author: false,
        },
        &[
            Checkpoint::new(
                "height_windows",
                ActivationHeight::mainnet(1_180_000),
                |r: &mut CommentEditRules| r.edit_window = WindowMode::Height,
            ),
            Checkpoint::new(
                "check_author",
                ActivationHeight::new(Some(1_873_500), Some(1_155_000), Some(0)),
                |r: &mut CommentEditRules| r.check_author = true,
            ),
        ],
    )
}

pub(crate) struct CommentEditRule<'a> {
    rules: &'a CommentEditRules,
    ctx: RuleContext<'a>,
}

impl CommentEditRule<'_> {
    /// Edits keep the original's parent and answer, and both must still resolve.
    fn validate_references(&self, tx: &SocialTransaction, original: &SocialTransaction) -> RuleResult {
        let pairs = [
            (&tx.parent_tx_hash, &original.parent_tx_hash, ReasonCode::InvalidParentComment),
            (&tx.answer_tx_hash, &original.answer_tx_hash, ReasonCode::InvalidAnswerComment),
        ];

        for (current, expected, reason) in pairs {
            let current = current.as_deref().unwrap_or_default();
            let expected = expected.as_deref().unwrap_or_default();
            ensure(current == expected, reason)?;
            validate_reference(&self.ctx, Some(expected), reason)?;
        }
        Ok(())
    }
}

impl SocialRule for CommentEditRule<'_> {
    fn check(&self, tx: &SocialTransaction) -> RuleResult {
        require(&tx.root_tx_hash)?;
        check_message(&self.ctx, tx)
    }

    fn validate(&self, tx: &SocialTransaction, block: Option<&[SocialTransaction]>) -> RuleResult {
        let ctx = &self.ctx;
        let root = tx.root_hash();

        match ctx.repo.get_last_content(root, &TxType::COMMENT_CHAIN)? {
            Some(last) if last.tx_type != TxType::ContentCommentDelete => {}
            _ => return Err(ReasonCode::CommentDeletedEdit.into()),
        }

        let Some(original) = ctx.repo.get_first_content(root)? else {
            return Err(ReasonCode::NotFound.into());
        };

        if self.rules.check_author {
            ensure(original.address == tx.address, ReasonCode::ContentEditUnauthorized)?;
        }

        self.validate_references(tx, &original)?;

        let depth = ctx.limit(ConsensusLimit::EditCommentDepth);
        let within = match ctx.repo.get_transaction_height(&original.hash)? {
            Some(original_height) => {
                self.rules
                    .edit_window
                    .within(&original, original_height, tx, ctx.height, depth)
            }
            None => false,
        };
        ensure(within, ReasonCode::CommentEditLimit)?;

        validate_commented_content(ctx, tx, true)?;
        validate_size(ctx, tx)?;

        let edits = ctx
            .repo
            .count_chain_edits(&[TxType::ContentCommentEdit], &tx.address, root, &tx.hash)?;
        ensure(
            edits < ctx.limit(ConsensusLimit::CommentEditCount),
            ReasonCode::CommentEditLimit,
        )?;

        ctx.check_registration(&[&tx.address], tx, block)?;

        let double = match block {
            Some(block) => block_prefix(block, tx).iter().any(|b| {
                TxType::COMMENT_CHAIN.contains(&b.tx_type) && b.hash != tx.hash && b.root_hash() == root
            }),
            None => {
                ctx.repo
                    .count_mempool_edits(&TxType::COMMENT_CHAIN, &tx.address, root, &tx.hash)?
                    > 0
            }
        };
        ensure(!double, ReasonCode::DoubleCommentEdit)
    }
}

// =============================================================================
// COMMENT DELETE
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct CommentDeleteRules;

impl CommentDeleteRules {
    pub(crate) fn bind<'a>(&'a self, ctx: RuleContext<'a>) -> CommentDeleteRule<'a> {
        CommentDeleteRule { ctx }
    }
}

pub(crate) fn comment_delete_registry(network: Network) -> CheckpointRegistry<CommentDeleteRules> {
    CheckpointRegistry::new(network, CommentDeleteRules, &[])
}

pub(crate) struct CommentDeleteRule<'a> {
    ctx: RuleContext<'a>,
}

impl SocialRule for CommentDeleteRule<'_> {
    fn check(&self, tx: &SocialTransaction) -> RuleResult {
        ensure(!tx.address.is_empty(), ReasonCode::Failed)?;
        require(&tx.post_tx_hash)?;
        require(&tx.root_tx_hash)
    }

    fn validate(&self, tx: &SocialTransaction, block: Option<&[SocialTransaction]>) -> RuleResult {
        let ctx = &self.ctx;
        let root = tx.root_hash();

        let Some(last) = ctx.repo.get_last_content(root, &TxType::COMMENT_CHAIN)? else {
            return Err(ReasonCode::NotFound.into());
        };
        ensure(last.tx_type != TxType::ContentCommentDelete, ReasonCode::DoubleCommentDelete)?;

        let Some(original) = ctx.repo.get_first_content(root)? else {
            return Err(ReasonCode::NotFound.into());
        };
        ensure(original.address == tx.address, ReasonCode::ContentDeleteUnauthorized)?;

        ctx.check_registration(&[&tx.address], tx, block)?;

        let double = match block {
            Some(block) => block_prefix(block, tx).iter().any(|b| {
                TxType::COMMENT_CHAIN.contains(&b.tx_type) && b.hash != tx.hash && b.root_hash() == root
            }),
            None => {
                ctx.repo
                    .count_mempool_edits(&TxType::COMMENT_CHAIN, &tx.address, root, &tx.hash)?
                    > 0
            }
        };
        ensure(!double, ReasonCode::DoubleCommentDelete)
    }
}
