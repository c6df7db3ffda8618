//! Barteron marketplace account
//!
//! The payload carries two raw JSON lists of tag ids. They are bounded by
//! their own limit, so the generic payload size leaves them out.

use super::{RuleContext, SocialRule};
use crate::domain::checkpoints::{ActivationHeight, Checkpoint, CheckpointRegistry};
use crate::domain::config::Network;
use crate::domain::error::{ensure, ReasonCode, RuleError, RuleResult};
use crate::domain::limits::ConsensusLimit;
use crate::domain::window::block_prefix;
use shared_types::{opt_len, Payload, SocialTransaction, TxType};

#[derive(Debug, Clone, Default)]
pub struct BarteronAccountRules {
    pub enabled: bool,
}

impl BarteronAccountRules {
    pub(crate) fn bind<'a>(&'a self, ctx: RuleContext<'a>) -> BarteronAccountRule<'a> {
        BarteronAccountRule { rules: self, ctx }
    }
}

pub(crate) fn registry(network: Network) -> CheckpointRegistry<BarteronAccountRules> {
    CheckpointRegistry::new(
        network,
        BarteronAccountRules::default(),
        &[Checkpoint::new(
            "enable",
            ActivationHeight::new(None, None, Some(0)),
            |r: &mut BarteronAccountRules| r.enabled = true,
        )],
    )
}

/// Parse one raw tag list; absent or empty means no list.
fn parse_tags(raw: &Option<String>) -> RuleResult<Option<Vec<i64>>> {
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(json) => serde_json::from_str::<Vec<i64>>(json)
            .map(Some)
            .map_err(|_| RuleError::Rejected(ReasonCode::Failed)),
    }
}

fn payload_size(payload: &Payload) -> usize {
    payload.strings_size() - opt_len(&payload.tags_add) - opt_len(&payload.tags_del)
}

pub(crate) struct BarteronAccountRule<'a> {
    rules: &'a BarteronAccountRules,
    ctx: RuleContext<'a>,
}

impl SocialRule for BarteronAccountRule<'_> {
    fn check(&self, tx: &SocialTransaction) -> RuleResult {
        ensure(self.rules.enabled, ReasonCode::NotAllowed)?;
        ensure(!tx.address.is_empty(), ReasonCode::Failed)?;

        let Some(payload) = &tx.payload else {
            return Err(ReasonCode::Failed.into());
        };
        let add = parse_tags(&payload.tags_add)?;
        let del = parse_tags(&payload.tags_del)?;
        ensure(add.is_some() || del.is_some(), ReasonCode::Failed)
    }

    fn validate(&self, tx: &SocialTransaction, block: Option<&[SocialTransaction]>) -> RuleResult {
        let ctx = &self.ctx;
        let payload = tx.payload.clone().unwrap_or_default();

        let size = payload_size(&payload) as i64;
        ensure(
            size <= ctx.limit(ConsensusLimit::MaxBarteronAccountSize),
            ReasonCode::ContentSizeLimit,
        )?;

        let max_list = ctx.limit(ConsensusLimit::BarteronListMaxSize);
        for raw in [&payload.tags_add, &payload.tags_del] {
            let len = parse_tags(raw)?.map_or(0, |tags| tags.len()) as i64;
            ensure(len <= max_list, ReasonCode::ExceededLimit)?;
        }

        ctx.check_registration(&[&tx.address], tx, block)?;

        let pending = match block {
            Some(block) => block_prefix(block, tx).iter().any(|b| {
                b.tx_type == TxType::BarteronAccount && b.hash != tx.hash && b.address == tx.address
            }),
            None => {
                ctx.repo
                    .count_mempool_actions(&[TxType::BarteronAccount], &tx.address, &tx.hash)?
                    > 0
            }
        };
        ensure(!pending, ReasonCode::ManyTransactions)
    }
}
