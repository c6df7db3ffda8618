//! Scores on content and on comments
//!
//! Both share one shape: value domain, target lookup, self-score, blocking
//! gate, double-score suppression, then a per-mode cap over a rolling
//! window. They differ in the target chain, value domain, reasons and in
//! how a deleted target is treated.

use super::{require, RuleContext, SocialRule};
use crate::domain::checkpoints::{ActivationHeight, Checkpoint, CheckpointRegistry};
use crate::domain::config::Network;
use crate::domain::error::{ensure, ReasonCode, RuleResult};
use crate::domain::limits::ConsensusLimit;
use crate::domain::window::{block_prefix, BlockWindow, ModeLimits, WindowMode};
use shared_types::{SocialTransaction, TxType};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct ScoreRules {
    pub tx_type: TxType,
    /// Types resolved when looking up the last version of the target.
    pub target_types: &'static [TxType],
    /// Marker type of a deleted target.
    pub deleted_type: TxType,
    pub allowed_values: &'static [i64],
    pub check_blocking: bool,
    /// Deleted targets are rejected with `deleted_reason`; otherwise only logged.
    pub reject_deleted_target: bool,
    pub deleted_reason: ReasonCode,
    pub self_reason: ReasonCode,
    pub double_reason: ReasonCode,
    pub limit_reason: ReasonCode,
    pub block_window: BlockWindow,
    pub count_window: WindowMode,
    pub mode_limits: ModeLimits,
}

impl ScoreRules {
    fn content() -> Self {
        Self {
            tx_type: TxType::ScoreContent,
            target_types: &TxType::CONTENT_WITH_DELETE,
            deleted_type: TxType::ContentDelete,
            allowed_values: &[1, 2, 3, 4, 5],
            check_blocking: false,
            reject_deleted_target: true,
            deleted_reason: ReasonCode::ScoreDeletedContent,
            self_reason: ReasonCode::SelfScore,
            double_reason: ReasonCode::DoubleScore,
            limit_reason: ReasonCode::ScoreLimit,
            block_window: BlockWindow::TimeOrdered,
            count_window: WindowMode::Time,
            mode_limits: ModeLimits::new(ConsensusLimit::TrialScore, ConsensusLimit::FullScore),
        }
    }

    fn comment() -> Self {
        Self {
            tx_type: TxType::ScoreComment,
            target_types: &TxType::COMMENT_CHAIN,
            deleted_type: TxType::ContentCommentDelete,
            allowed_values: &[-1, 1],
            reject_deleted_target: false,
            deleted_reason: ReasonCode::NotFound,
            self_reason: ReasonCode::SelfCommentScore,
            double_reason: ReasonCode::DoubleCommentScore,
            limit_reason: ReasonCode::CommentScoreLimit,
            mode_limits: ModeLimits::new(
                ConsensusLimit::TrialCommentScore,
                ConsensusLimit::FullCommentScore,
            ),
            ..Self::content()
        }
    }

    pub(crate) fn bind<'a>(&'a self, ctx: RuleContext<'a>) -> ScoreRule<'a> {
        ScoreRule { rules: self, ctx }
    }
}

fn common_checkpoints() -> [Checkpoint<ScoreRules>; 4] {
    [
        Checkpoint::new("blocking_enabled", ActivationHeight::mainnet(430_000), |r: &mut ScoreRules| {
            r.check_blocking = true
        }),
        Checkpoint::new("blocking_disabled", ActivationHeight::mainnet(514_184), |r: &mut ScoreRules| {
            r.check_blocking = false
        }),
        Checkpoint::new("block_window_all", ActivationHeight::mainnet(1_124_000), |r: &mut ScoreRules| {
            r.block_window = BlockWindow::All
        }),
        Checkpoint::new("height_windows", ActivationHeight::mainnet(1_180_000), |r: &mut ScoreRules| {
            r.count_window = WindowMode::Height
        }),
    ]
}

pub(crate) fn score_content_registry(network: Network) -> CheckpointRegistry<ScoreRules> {
    let [a, b, c, d] = common_checkpoints();
    CheckpointRegistry::new(
        network,
        ScoreRules::content(),
        &[
            a,
            b,
            c,
            d,
            Checkpoint::new(
                "disable_for_blocked",
                ActivationHeight::new(Some(1_757_000), Some(953_000), Some(0)),
                |r: &mut ScoreRules| r.check_blocking = true,
            ),
        ],
    )
}

pub(crate) fn score_comment_registry(network: Network) -> CheckpointRegistry<ScoreRules> {
    CheckpointRegistry::new(network, ScoreRules::comment(), &common_checkpoints())
}

pub(crate) struct ScoreRule<'a> {
    rules: &'a ScoreRules,
    ctx: RuleContext<'a>,
}

impl ScoreRule<'_> {
    fn validate_target(&self, tx: &SocialTransaction, target_hash: &str) -> RuleResult {
        let ctx = &self.ctx;
        let rules = self.rules;

        let Some(target) = ctx.repo.get_last_content(target_hash, rules.target_types)? else {
            return Err(ReasonCode::NotFound.into());
        };

        if target.tx_type == rules.deleted_type {
            if rules.reject_deleted_target {
                ctx.reject_unless_grandfathered(tx, rules.deleted_reason)?;
            } else if !ctx
                .social_checkpoints
                .is_checkpoint(&tx.hash, tx.tx_type, rules.deleted_reason)
            {
                warn!(
                    tx_hash = %tx.hash,
                    tx_type = %tx.tx_type,
                    height = ctx.height,
                    target = %target_hash,
                    "Score on a deleted target accepted"
                );
            }
        }

        ensure(target.address != tx.address, rules.self_reason)?;

        if rules.check_blocking {
            ensure(!ctx.is_blocked(&target.address, &tx.address)?, ReasonCode::Blocking)?;
        }

        let scored = ctx
            .repo
            .exists_score(&tx.address, target_hash, rules.tx_type, false, &tx.hash)?;
        ensure(!scored, rules.double_reason)
    }
}

impl SocialRule for ScoreRule<'_> {
    fn check(&self, tx: &SocialTransaction) -> RuleResult {
        ensure(!tx.address.is_empty(), ReasonCode::Failed)?;
        require(&tx.content_tx_hash)?;
        let valid = tx
            .value
            .is_some_and(|v| self.rules.allowed_values.contains(&v));
        ensure(valid, ReasonCode::Failed)
    }

    fn validate(&self, tx: &SocialTransaction, block: Option<&[SocialTransaction]>) -> RuleResult {
        let ctx = &self.ctx;
        let rules = self.rules;
        let target_hash = tx.content_tx_hash.as_deref().unwrap_or_default();

        self.validate_target(tx, target_hash)?;
        ctx.check_registration(&[&tx.address], tx, block)?;

        let window = ctx.window(rules.count_window, tx, ConsensusLimit::Depth);
        let mut count = ctx
            .repo
            .count_chain_actions(&[rules.tx_type], &tx.address, window, &tx.hash)?;

        match block {
            Some(block) => {
                for b in block_prefix(block, tx) {
                    if b.tx_type != rules.tx_type || b.address != tx.address || b.hash == tx.hash {
                        continue;
                    }
                    ensure(
                        b.content_tx_hash.as_deref() != Some(target_hash),
                        rules.double_reason,
                    )?;
                    if rules.block_window.counts(b, tx) {
                        count += 1;
                    }
                }
            }
            None => {
                let pending = ctx
                    .repo
                    .exists_score(&tx.address, target_hash, rules.tx_type, true, &tx.hash)?;
                ensure(!pending, rules.double_reason)?;
                count += ctx
                    .repo
                    .count_mempool_actions(&[rules.tx_type], &tx.address, &tx.hash)?;
            }
        }

        ctx.ensure_mode_limit(tx, count, &rules.mode_limits, rules.limit_reason)
    }
}
