//! Moderation flags raised by high-reputation accounts

use super::{require, RuleContext, SocialRule};
use crate::domain::checkpoints::{ActivationHeight, Checkpoint, CheckpointRegistry};
use crate::domain::config::Network;
use crate::domain::error::{ensure, ReasonCode, RuleResult};
use crate::domain::limits::ConsensusLimit;
use crate::domain::window::block_prefix;
use shared_types::{SocialTransaction, TxType};

/// Content kinds a flag may target.
const FLAGGABLE: [TxType; 5] = [
    TxType::ContentPost,
    TxType::ContentArticle,
    TxType::ContentVideo,
    TxType::ContentComment,
    TxType::ContentCommentEdit,
];

/// Valid flag reasons.
const REASONS: std::ops::RangeInclusive<i64> = 1..=4;

#[derive(Debug, Clone, Default)]
pub struct ModerationFlagRules {
    pub enabled: bool,
}

impl ModerationFlagRules {
    pub(crate) fn bind<'a>(&'a self, ctx: RuleContext<'a>) -> ModerationFlagRule<'a> {
        ModerationFlagRule { rules: self, ctx }
    }
}

pub(crate) fn registry(network: Network) -> CheckpointRegistry<ModerationFlagRules> {
    CheckpointRegistry::new(
        network,
        ModerationFlagRules::default(),
        &[Checkpoint::new(
            "enable",
            ActivationHeight::new(None, Some(1), Some(0)),
            |r: &mut ModerationFlagRules| r.enabled = true,
        )],
    )
}

pub(crate) struct ModerationFlagRule<'a> {
    rules: &'a ModerationFlagRules,
    ctx: RuleContext<'a>,
}

impl SocialRule for ModerationFlagRule<'_> {
    fn check(&self, tx: &SocialTransaction) -> RuleResult {
        ensure(self.rules.enabled, ReasonCode::NotAllowed)?;

        ensure(!tx.address.is_empty(), ReasonCode::Failed)?;
        require(&tx.content_tx_hash)?;
        require(&tx.address_to)?;
        ensure(
            tx.reason.is_some_and(|r| REASONS.contains(&r)),
            ReasonCode::Failed,
        )
    }

    fn validate(&self, tx: &SocialTransaction, block: Option<&[SocialTransaction]>) -> RuleResult {
        let ctx = &self.ctx;
        let content = tx.content_tx_hash.as_deref().unwrap_or_default();
        let author = tx.address_to.as_deref().unwrap_or_default();

        ctx.check_registration(&[&tx.address, author], tx, block)?;

        let include_mempool = block.is_none();
        let one_to_one_since = ctx.height.saturating_sub(ctx.limit(ConsensusLimit::ModerationFlagOneToOneDepth));
        let repeats = ctx.repo.count_moderation_flags(
            &tx.address,
            Some(author),
            one_to_one_since,
            include_mempool,
            &tx.hash,
        )?;
        ensure(repeats <= 1, ReasonCode::Duplicate)?;

        let since = ctx.height.saturating_sub(ctx.limit(ConsensusLimit::Depth));
        let mut count =
            ctx.repo
                .count_moderation_flags(&tx.address, None, since, include_mempool, &tx.hash)?;

        if let Some(block) = block {
            for b in block_prefix(block, tx) {
                if b.tx_type != TxType::ModerationFlag || b.hash == tx.hash || b.address != tx.address {
                    continue;
                }
                ensure(b.content_tx_hash.as_deref() != Some(content), ReasonCode::Duplicate)?;
                count += 1;
            }
        }

        ensure(
            count < ctx.limit(ConsensusLimit::ModerationFlagCount),
            ReasonCode::ExceededLimit,
        )?;

        ensure(ctx.reputation().is_shark(&tx.address)?, ReasonCode::LowReputation)?;

        let exists = ctx.repo.exists_content(content, &FLAGGABLE, true)?;
        ensure(exists, ReasonCode::NotFound)
    }
}
