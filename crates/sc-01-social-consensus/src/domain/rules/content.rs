//! Posts, videos and articles
//!
//! New content is rate limited per account mode over a rolling window.
//! Edits reference the root of their chain: same type, same author, inside
//! the edit window and under the per-root edit cap. Reposts must point at
//! live content.

use super::{RuleContext, SocialRule};
use crate::domain::checkpoints::{ActivationHeight, Checkpoint, CheckpointRegistry};
use crate::domain::config::Network;
use crate::domain::error::{ensure, ReasonCode, RuleResult};
use crate::domain::limits::ConsensusLimit;
use crate::domain::window::{block_prefix, BlockWindow, ModeLimits, WindowMode};
use shared_types::{opt_len, SocialTransaction, TxType};

/// Behaviour record for one content type.
#[derive(Debug, Clone)]
pub struct ContentRules {
    pub tx_type: TxType,
    /// Reposts permitted at all.
    pub allow_relay: bool,
    pub block_window: BlockWindow,
    pub count_window: WindowMode,
    pub depth_limit: ConsensusLimit,
    pub edit_window: WindowMode,
    pub edit_depth_limit: ConsensusLimit,
    pub edit_count_limit: ConsensusLimit,
    pub mode_limits: ModeLimits,
    /// Reject reposts of content whose author blocks the sender.
    pub relay_blocking: bool,
    pub max_size: Option<ConsensusLimit>,
}

impl ContentRules {
    fn post() -> Self {
        Self {
            tx_type: TxType::ContentPost,
            allow_relay: true,
            block_window: BlockWindow::TimeOrdered,
            count_window: WindowMode::Time,
            depth_limit: ConsensusLimit::Depth,
            edit_window: WindowMode::Time,
            edit_depth_limit: ConsensusLimit::EditPostDepth,
            edit_count_limit: ConsensusLimit::PostEditCount,
            mode_limits: ModeLimits::new(ConsensusLimit::TrialPost, ConsensusLimit::FullPost),
            relay_blocking: false,
            max_size: Some(ConsensusLimit::MaxPostSize),
        }
    }

    fn article() -> Self {
        Self {
            tx_type: TxType::ContentArticle,
            block_window: BlockWindow::All,
            ..Self::post()
        }
    }

    fn video() -> Self {
        Self {
            tx_type: TxType::ContentVideo,
            allow_relay: false,
            block_window: BlockWindow::All,
            count_window: WindowMode::Height,
            depth_limit: ConsensusLimit::VideoDepth,
            edit_window: WindowMode::Height,
            edit_depth_limit: ConsensusLimit::EditVideoDepth,
            edit_count_limit: ConsensusLimit::VideoEditCount,
            mode_limits: ModeLimits::new(ConsensusLimit::TrialVideo, ConsensusLimit::FullVideo)
                .with_pro(ConsensusLimit::ProVideo),
            relay_blocking: false,
            max_size: None,
        }
    }

    pub(crate) fn bind<'a>(&'a self, ctx: RuleContext<'a>) -> ContentRule<'a> {
        ContentRule { rules: self, ctx }
    }
}

pub(crate) fn post_registry(network: Network) -> CheckpointRegistry<ContentRules> {
    CheckpointRegistry::new(
        network,
        ContentRules::post(),
        &[
            Checkpoint::new("block_window_all", ActivationHeight::mainnet(1_124_000), |r: &mut ContentRules| {
                r.block_window = BlockWindow::All
            }),
            Checkpoint::new("height_windows", ActivationHeight::mainnet(1_180_000), |r: &mut ContentRules| {
                r.count_window = WindowMode::Height;
                r.edit_window = WindowMode::Height;
            }),
            Checkpoint::new(
                "disable_for_blocked",
                ActivationHeight::new(Some(1_757_000), Some(953_000), Some(0)),
                |r: &mut ContentRules| r.relay_blocking = true,
            ),
        ],
    )
}

pub(crate) fn article_registry(network: Network) -> CheckpointRegistry<ContentRules> {
    CheckpointRegistry::new(
        network,
        ContentRules::article(),
        &[Checkpoint::new("height_windows", ActivationHeight::mainnet(1_180_000), |r: &mut ContentRules| {
            r.count_window = WindowMode::Height;
            r.edit_window = WindowMode::Height;
        })],
    )
}

pub(crate) fn video_registry(network: Network) -> CheckpointRegistry<ContentRules> {
    // The trial video cap change at 1324655 lives in the limit table.
    CheckpointRegistry::new(network, ContentRules::video(), &[])
}

/// Payload bytes counted against the size limit.
pub(crate) fn payload_size(tx: &SocialTransaction) -> usize {
    let mut size = opt_len(&tx.relay_tx_hash);
    if tx.is_edit() {
        size += tx.root_hash().len();
    }

    if let Some(payload) = &tx.payload {
        size += opt_len(&payload.url)
            + opt_len(&payload.caption)
            + opt_len(&payload.message)
            + opt_len(&payload.settings)
            + opt_len(&payload.lang)
            + payload.tags.iter().map(String::len).sum::<usize>()
            + payload.images.iter().map(String::len).sum::<usize>();
    }

    size
}

pub(crate) struct ContentRule<'a> {
    rules: &'a ContentRules,
    ctx: RuleContext<'a>,
}

impl ContentRule<'_> {
    fn validate_relay(&self, tx: &SocialTransaction) -> RuleResult {
        let Some(relay) = tx.relay_tx_hash.as_deref().filter(|r| !r.is_empty()) else {
            return Ok(());
        };

        match self.ctx.repo.get_last_content(relay, &TxType::CONTENT_WITH_DELETE)? {
            None => self.ctx.reject_unless_grandfathered(tx, ReasonCode::RelayContentNotFound),
            Some(last) => {
                ensure(last.tx_type != TxType::ContentDelete, ReasonCode::NotAllowed)?;
                if self.rules.relay_blocking {
                    ensure(!self.ctx.is_blocked(&last.address, &tx.address)?, ReasonCode::Blocking)?;
                }
                Ok(())
            }
        }
    }

    fn validate_size(&self, tx: &SocialTransaction) -> RuleResult {
        match self.rules.max_size {
            Some(limit) => ensure(
                payload_size(tx) as i64 <= self.ctx.limit(limit),
                ReasonCode::ContentSizeLimit,
            ),
            None => Ok(()),
        }
    }

    fn validate_edit(&self, tx: &SocialTransaction) -> RuleResult {
        let root = tx.root_hash();
        let repo = self.ctx.repo;

        let last = repo.get_last_content(root, &TxType::CONTENT_WITH_DELETE)?;
        if let Some(last) = &last {
            // Deleted, or a different content type.
            ensure(last.tx_type == tx.tx_type, ReasonCode::NotAllowed)?;
        }

        let first = repo.get_first_content(root)?;
        let (Some(_), Some(original)) = (last, first) else {
            return Err(ReasonCode::NotFound.into());
        };

        ensure(original.tx_type == tx.tx_type, ReasonCode::NotAllowed)?;
        ensure(original.address == tx.address, ReasonCode::ContentEditUnauthorized)?;

        let Some(original_height) = repo.get_transaction_height(&original.hash)? else {
            return Err(ReasonCode::ContentEditLimit.into());
        };
        let depth = self.ctx.limit(self.rules.edit_depth_limit);
        ensure(
            self.rules
                .edit_window
                .within(&original, original_height, tx, self.ctx.height, depth),
            ReasonCode::ContentEditLimit,
        )?;

        let edits = repo.count_chain_edits(&[tx.tx_type], &tx.address, root, &tx.hash)?;
        ensure(
            edits < self.ctx.limit(self.rules.edit_count_limit),
            ReasonCode::ContentEditLimit,
        )
    }

    fn validate_edit_pending(&self, tx: &SocialTransaction, block: Option<&[SocialTransaction]>) -> RuleResult {
        let root = tx.root_hash();
        let double = match block {
            Some(block) => block_prefix(block, tx).iter().any(|b| {
                (b.tx_type == tx.tx_type || b.tx_type == TxType::ContentDelete)
                    && b.hash != tx.hash
                    && b.root_hash() == root
            }),
            None => {
                self.ctx
                    .repo
                    .count_mempool_edits(&[tx.tx_type], &tx.address, root, &tx.hash)?
                    > 0
            }
        };
        ensure(!double, ReasonCode::DoubleContentEdit)
    }

    fn validate_new(&self, tx: &SocialTransaction, block: Option<&[SocialTransaction]>) -> RuleResult {
        let window = self
            .ctx
            .window(self.rules.count_window, tx, self.rules.depth_limit);
        let mut count = self
            .ctx
            .repo
            .count_chain_actions(&[tx.tx_type], &tx.address, window, &tx.hash)?;

        count += match block {
            Some(block) => block_prefix(block, tx)
                .iter()
                .filter(|b| {
                    b.tx_type == tx.tx_type
                        && b.address == tx.address
                        && !b.is_edit()
                        && b.hash != tx.hash
                        && self.rules.block_window.counts(b, tx)
                })
                .count() as i64,
            None => self
                .ctx
                .repo
                .count_mempool_actions(&[tx.tx_type], &tx.address, &tx.hash)?,
        };

        self.ctx
            .ensure_mode_limit(tx, count, &self.rules.mode_limits, ReasonCode::ContentLimit)
    }
}

impl SocialRule for ContentRule<'_> {
    fn check(&self, tx: &SocialTransaction) -> RuleResult {
        ensure(!tx.address.is_empty(), ReasonCode::Failed)?;
        if !self.rules.allow_relay {
            ensure(tx.relay_tx_hash.is_none(), ReasonCode::NotAllowed)?;
        }
        Ok(())
    }

    fn validate(&self, tx: &SocialTransaction, block: Option<&[SocialTransaction]>) -> RuleResult {
        self.validate_relay(tx)?;
        self.validate_size(tx)?;

        if tx.is_edit() {
            self.validate_edit(tx)?;
        }

        self.ctx.check_registration(&[&tx.address], tx, block)?;

        if tx.is_edit() {
            self.validate_edit_pending(tx, block)
        } else {
            self.validate_new(tx, block)
        }
    }
}
