//! Complaints against content

use super::{require, RuleContext, SocialRule};
use crate::domain::checkpoints::{ActivationHeight, Checkpoint, CheckpointRegistry};
use crate::domain::config::Network;
use crate::domain::error::{ensure, ReasonCode, RuleResult};
use crate::domain::limits::ConsensusLimit;
use crate::domain::window::{block_prefix, BlockWindow, ModeLimits, WindowMode};
use shared_types::{SocialTransaction, TxType};

#[derive(Debug, Clone)]
pub struct ComplainRules {
    pub block_window: BlockWindow,
    pub count_window: WindowMode,
    pub mode_limits: ModeLimits,
}

impl Default for ComplainRules {
    fn default() -> Self {
        Self {
            block_window: BlockWindow::TimeOrdered,
            count_window: WindowMode::Time,
            mode_limits: ModeLimits::new(ConsensusLimit::TrialComplain, ConsensusLimit::FullComplain),
        }
    }
}

impl ComplainRules {
    pub(crate) fn bind<'a>(&'a self, ctx: RuleContext<'a>) -> ComplainRule<'a> {
        ComplainRule { rules: self, ctx }
    }
}

pub(crate) fn registry(network: Network) -> CheckpointRegistry<ComplainRules> {
    CheckpointRegistry::new(
        network,
        ComplainRules::default(),
        &[
            Checkpoint::new("block_window_all", ActivationHeight::mainnet(1_124_000), |r: &mut ComplainRules| {
                r.block_window = BlockWindow::All
            }),
            Checkpoint::new("height_windows", ActivationHeight::mainnet(1_180_000), |r: &mut ComplainRules| {
                r.count_window = WindowMode::Height
            }),
        ],
    )
}

pub(crate) struct ComplainRule<'a> {
    rules: &'a ComplainRules,
    ctx: RuleContext<'a>,
}

impl ComplainRule<'_> {
    fn validate_limit(&self, tx: &SocialTransaction, count: i64) -> RuleResult {
        let ctx = &self.ctx;
        ctx.ensure_mode_limit(tx, count, &self.rules.mode_limits, ReasonCode::ComplainLimit)?;

        let info = ctx.account_mode(&tx.address)?;
        ensure(
            info.reputation >= ctx.limit(ConsensusLimit::ThresholdReputation),
            ReasonCode::LowReputation,
        )
    }
}

impl SocialRule for ComplainRule<'_> {
    fn check(&self, tx: &SocialTransaction) -> RuleResult {
        ensure(!tx.address.is_empty(), ReasonCode::Failed)?;
        require(&tx.post_tx_hash)?;
        ensure(tx.reason.is_some(), ReasonCode::Failed)
    }

    fn validate(&self, tx: &SocialTransaction, block: Option<&[SocialTransaction]>) -> RuleResult {
        let ctx = &self.ctx;
        let post = tx.post_tx_hash.as_deref().unwrap_or_default();

        ctx.check_registration(&[&tx.address], tx, block)?;

        let window = ctx.window(self.rules.count_window, tx, ConsensusLimit::Depth);
        let mut count = ctx
            .repo
            .count_chain_actions(&[TxType::Complain], &tx.address, window, &tx.hash)?;

        match block {
            Some(block) => {
                for b in block_prefix(block, tx) {
                    if b.tx_type != TxType::Complain || b.address != tx.address || b.hash == tx.hash {
                        continue;
                    }
                    if self.rules.block_window.counts(b, tx) {
                        count += 1;
                    }
                    if b.post_tx_hash.as_deref() == Some(post) {
                        ctx.reject_unless_grandfathered(tx, ReasonCode::DoubleComplain)?;
                    }
                }
            }
            None => {
                count += ctx
                    .repo
                    .count_mempool_actions(&[TxType::Complain], &tx.address, &tx.hash)?;
            }
        }
        self.validate_limit(tx, count)?;

        let Some(content) = ctx.repo.get_last_content(post, &TxType::CONTENT_WITH_DELETE)? else {
            return Err(ReasonCode::NotFound.into());
        };
        ensure(content.address != tx.address, ReasonCode::SelfComplain)?;
        ensure(
            content.tx_type != TxType::ContentDelete,
            ReasonCode::ComplainDeletedContent,
        )?;

        // Pending complaints only count on mempool admission; a block sees its own prefix.
        let complained = ctx
            .repo
            .exists_complain(&tx.hash, post, &tx.address, block.is_none())?;
        ensure(!complained, ReasonCode::DoubleComplain)
    }
}
