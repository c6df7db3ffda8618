//! Content delete marker
//!
//! Deleting is idempotent only in the sense that a second delete fails with
//! `ContentDeleteDouble`, wherever the first one sits (chain, mempool or
//! earlier in the same block).
//!
//! A root with no confirmed version is `NotFound`; a delete never targets
//! content that is only pending.

use super::{require, RuleContext, SocialRule};
use crate::domain::checkpoints::CheckpointRegistry;
use crate::domain::config::Network;
use crate::domain::error::{ensure, ReasonCode, RuleResult};
use crate::domain::window::block_prefix;
use shared_types::{SocialTransaction, TxType};

#[derive(Debug, Clone, Default)]
pub struct ContentDeleteRules;

impl ContentDeleteRules {
    pub(crate) fn bind<'a>(&'a self, ctx: RuleContext<'a>) -> ContentDeleteRule<'a> {
        ContentDeleteRule { ctx }
    }
}

pub(crate) fn registry(network: Network) -> CheckpointRegistry<ContentDeleteRules> {
    CheckpointRegistry::new(network, ContentDeleteRules, &[])
}

pub(crate) struct ContentDeleteRule<'a> {
    ctx: RuleContext<'a>,
}

impl SocialRule for ContentDeleteRule<'_> {
    fn check(&self, tx: &SocialTransaction) -> RuleResult {
        ensure(!tx.address.is_empty(), ReasonCode::Failed)?;
        require(&tx.root_tx_hash)
    }

    fn validate(&self, tx: &SocialTransaction, block: Option<&[SocialTransaction]>) -> RuleResult {
        let ctx = &self.ctx;
        let root = tx.root_hash();

        ctx.check_registration(&[&tx.address], tx, block)?;

        let double = match block {
            Some(block) => block_prefix(block, tx).iter().any(|b| {
                b.tx_type == TxType::ContentDelete && b.hash != tx.hash && b.root_hash() == root
            }),
            None => {
                ctx.repo
                    .count_mempool_edits(&[TxType::ContentDelete], &tx.address, root, &tx.hash)?
                    > 0
            }
        };
        ensure(!double, ReasonCode::ContentDeleteDouble)?;

        let Some(last) = ctx.repo.get_last_content(root, &TxType::CONTENT_WITH_DELETE)? else {
            return Err(ReasonCode::NotFound.into());
        };
        ensure(last.tx_type != TxType::ContentDelete, ReasonCode::ContentDeleteDouble)?;

        let Some(original) = ctx.repo.get_first_content(root)? else {
            return Err(ReasonCode::NotFound.into());
        };
        ensure(original.address == tx.address, ReasonCode::ContentDeleteUnauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    const H: i64 = 2_000_000;

    fn delete(hash: &str, address: &str, root: &str) -> SocialTransaction {
        SocialTransaction::new(hash, TxType::ContentDelete, address, 5_000).with_root(root)
    }

    fn fixture_with_post() -> Fixture {
        let fixture = Fixture::mainnet();
        fixture
            .repo
            .insert_confirmed(SocialTransaction::new("p0", TxType::ContentPost, ALICE, 100), 10);
        fixture
    }

    #[test]
    fn test_root_required() {
        let fixture = fixture_with_post();
        let tx = SocialTransaction::new("d1", TxType::ContentDelete, ALICE, 0);
        assert_eq!(fixture.run(&tx, None, H), Err(ReasonCode::Failed));
    }

    #[test]
    fn test_only_author_deletes() {
        let fixture = fixture_with_post();
        assert_eq!(
            fixture.run(&delete("d1", BOB, "p0"), None, H),
            Err(ReasonCode::ContentDeleteUnauthorized)
        );
        assert_eq!(fixture.run(&delete("d1", ALICE, "p0"), None, H), Ok(()));
    }

    #[test]
    fn test_missing_content() {
        let fixture = fixture_with_post();
        assert_eq!(
            fixture.run(&delete("d1", ALICE, "nothing"), None, H),
            Err(ReasonCode::NotFound)
        );

        fixture
            .repo
            .insert_mempool(SocialTransaction::new("p9", TxType::ContentPost, ALICE, 100));
        assert_eq!(
            fixture.run(&delete("d2", ALICE, "p9"), None, H),
            Err(ReasonCode::NotFound)
        );
    }

    #[test]
    fn test_second_delete_fails_everywhere() {
        let fixture = fixture_with_post();

        let first = delete("d1", ALICE, "p0");
        let second = delete("d2", ALICE, "p0");
        let block = vec![first.clone(), second.clone()];
        assert_eq!(fixture.run(&first, Some(&block), H), Ok(()));
        assert_eq!(
            fixture.run(&second, Some(&block), H),
            Err(ReasonCode::ContentDeleteDouble)
        );

        fixture.repo.insert_mempool(first);
        assert_eq!(
            fixture.run(&second, None, H),
            Err(ReasonCode::ContentDeleteDouble)
        );

        fixture.repo.confirm("d1", H - 1);
        assert_eq!(
            fixture.run(&second, None, H),
            Err(ReasonCode::ContentDeleteDouble)
        );
    }
}
