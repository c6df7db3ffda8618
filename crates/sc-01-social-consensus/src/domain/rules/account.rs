//! Account registration and profile changes
//!
//! The first `AccountUser` of an address registers it; later ones change the
//! profile. Registration is what every other family checks, so this family
//! does not require one itself.

use super::{RuleContext, SocialRule};
use crate::domain::checkpoints::{ActivationHeight, Checkpoint, CheckpointRegistry};
use crate::domain::config::Network;
use crate::domain::error::{ensure, ReasonCode, RuleResult};
use crate::domain::limits::ConsensusLimit;
use crate::domain::window::{block_prefix, WindowMode};
use shared_types::{SocialTransaction, TxType};

#[derive(Debug, Clone)]
pub struct AccountUserRules {
    /// Unit of the `change_info_depth` window.
    pub change_window: WindowMode,
}

impl Default for AccountUserRules {
    fn default() -> Self {
        Self {
            change_window: WindowMode::Time,
        }
    }
}

impl AccountUserRules {
    pub(crate) fn bind<'a>(&'a self, ctx: RuleContext<'a>) -> AccountUserRule<'a> {
        AccountUserRule { rules: self, ctx }
    }
}

pub(crate) fn registry(network: Network) -> CheckpointRegistry<AccountUserRules> {
    CheckpointRegistry::new(
        network,
        AccountUserRules::default(),
        &[Checkpoint::new(
            "height_windows",
            ActivationHeight::mainnet(1_180_000),
            |r: &mut AccountUserRules| r.change_window = WindowMode::Height,
        )],
    )
}

pub(crate) struct AccountUserRule<'a> {
    rules: &'a AccountUserRules,
    ctx: RuleContext<'a>,
}

impl SocialRule for AccountUserRule<'_> {
    fn check(&self, tx: &SocialTransaction) -> RuleResult {
        ensure(!tx.address.is_empty(), ReasonCode::Failed)?;

        let name = tx.name().unwrap_or_default();
        ensure(!name.is_empty(), ReasonCode::Failed)?;
        ensure(
            name.chars().count() as i64 <= self.ctx.limit(ConsensusLimit::MaxNicknameLength),
            ReasonCode::NicknameLong,
        )?;

        ensure(
            tx.referrer.as_deref() != Some(tx.address.as_str()),
            ReasonCode::ReferrerSelf,
        )
    }

    fn validate(&self, tx: &SocialTransaction, block: Option<&[SocialTransaction]>) -> RuleResult {
        let ctx = &self.ctx;
        let name = tx.name().unwrap_or_default();

        let taken = ctx.repo.exists_another_by_name(&tx.address, name)?
            || block.is_some_and(|block| {
                block_prefix(block, tx).iter().any(|b| {
                    b.tx_type == TxType::AccountUser && b.address != tx.address && b.name() == Some(name)
                })
            });
        ensure(!taken, ReasonCode::NicknameDouble)?;

        let size = tx.payload.as_ref().map_or(0, |p| p.strings_size()) as i64;
        ensure(
            size <= ctx.limit(ConsensusLimit::MaxUserSize),
            ReasonCode::ContentSizeLimit,
        )?;

        let pending = match block {
            Some(block) => block_prefix(block, tx).iter().any(|b| {
                b.tx_type == TxType::AccountUser && b.hash != tx.hash && b.address == tx.address
            }),
            None => {
                ctx.repo
                    .count_mempool_actions(&[TxType::AccountUser], &tx.address, &tx.hash)?
                    > 0
            }
        };
        ensure(!pending, ReasonCode::ChangeInfoDoubleInBlock)?;

        let window = ctx.window(self.rules.change_window, tx, ConsensusLimit::ChangeInfoDepth);
        let recent = ctx
            .repo
            .count_chain_actions(&[TxType::AccountUser], &tx.address, window, &tx.hash)?;
        ctx.ensure_below(tx, recent, 1, ReasonCode::ChangeInfoLimit)
    }
}
