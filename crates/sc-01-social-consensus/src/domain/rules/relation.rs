//! Subscriptions and blocking between two accounts
//!
//! Only one pending change per `(address, address_to)` pair of a relation
//! kind may exist, whether in the mempool or earlier in the candidate block.

use super::{RuleContext, SocialRule};
use crate::domain::checkpoints::CheckpointRegistry;
use crate::domain::config::Network;
use crate::domain::error::{ensure, ReasonCode, RuleResult};
use crate::domain::window::block_prefix;
use shared_types::{SocialTransaction, TxType};

const SUBSCRIBE_FAMILY: [TxType; 3] = [TxType::Subscribe, TxType::SubscribePrivate, TxType::SubscribeCancel];
const BLOCKING_FAMILY: [TxType; 2] = [TxType::Blocking, TxType::BlockingCancel];

/// Relation kind of a transaction type.
fn family(tx_type: TxType) -> &'static [TxType] {
    if tx_type.is_blocking() {
        &BLOCKING_FAMILY
    } else {
        &SUBSCRIBE_FAMILY
    }
}

#[derive(Debug, Clone, Default)]
pub struct RelationRules;

impl RelationRules {
    pub(crate) fn bind<'a>(&'a self, ctx: RuleContext<'a>) -> RelationRule<'a> {
        RelationRule { ctx }
    }
}

pub(crate) fn registry(network: Network) -> CheckpointRegistry<RelationRules> {
    CheckpointRegistry::new(network, RelationRules, &[])
}

pub(crate) struct RelationRule<'a> {
    ctx: RuleContext<'a>,
}

impl RelationRule<'_> {
    fn validate_state(&self, tx: &SocialTransaction, address_to: &str) -> RuleResult {
        let ctx = &self.ctx;

        match tx.tx_type {
            TxType::Blocking | TxType::BlockingCancel => {
                let last = ctx.repo.get_last_blocking_type(&tx.address, address_to)?;
                let blocking = last == Some(TxType::Blocking);
                if tx.tx_type == TxType::Blocking && blocking {
                    ctx.reject_unless_grandfathered(tx, ReasonCode::DoubleBlocking)?;
                }
                if tx.tx_type == TxType::BlockingCancel && !blocking {
                    ctx.reject_unless_grandfathered(tx, ReasonCode::InvalidBlocking)?;
                }
            }
            _ => {
                let last = ctx.repo.get_last_subscribe_type(&tx.address, address_to)?;
                match tx.tx_type {
                    TxType::SubscribeCancel => {
                        let subscribed =
                            matches!(last, Some(TxType::Subscribe | TxType::SubscribePrivate));
                        if !subscribed {
                            ctx.reject_unless_grandfathered(tx, ReasonCode::InvalidSubscribe)?;
                        }
                    }
                    // Switching between public and private is allowed.
                    _ => {
                        if last == Some(tx.tx_type) {
                            ctx.reject_unless_grandfathered(tx, ReasonCode::DoubleSubscribe)?;
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

impl SocialRule for RelationRule<'_> {
    fn check(&self, tx: &SocialTransaction) -> RuleResult {
        ensure(!tx.address.is_empty(), ReasonCode::Failed)?;
        let address_to = tx.address_to.as_deref().unwrap_or_default();
        ensure(!address_to.is_empty(), ReasonCode::Failed)?;

        let self_reason = if tx.tx_type.is_blocking() {
            ReasonCode::SelfBlocking
        } else {
            ReasonCode::SelfSubscribe
        };
        ensure(tx.address != address_to, self_reason)
    }

    fn validate(&self, tx: &SocialTransaction, block: Option<&[SocialTransaction]>) -> RuleResult {
        let ctx = &self.ctx;
        let address_to = tx.address_to.as_deref().unwrap_or_default();
        let types = family(tx.tx_type);

        ctx.check_registration(&[&tx.address, address_to], tx, block)?;

        let pending = match block {
            Some(block) => block_prefix(block, tx).iter().any(|b| {
                types.contains(&b.tx_type)
                    && b.hash != tx.hash
                    && b.address == tx.address
                    && b.address_to.as_deref() == Some(address_to)
            }),
            None => {
                ctx.repo
                    .count_mempool_relations(types, &tx.address, address_to, &tx.hash)?
                    > 0
            }
        };
        ensure(!pending, ReasonCode::ManyTransactions)?;

        self.validate_state(tx, address_to)
    }
}
