//! # End-to-End Scenarios
//!
//! Account lifecycles driven through both entry points of the engine:
//!
//! 1. **Trial limit**: a Trial account fills its post cap inside one candidate
//!    block, then gains reputation and the same block becomes valid
//! 2. **Mempool to block**: pending posts are admitted one at a time, mined,
//!    and then count as chain state inside the rolling window
//! 3. **Social graph**: registration, comments, scores and relations between
//!    two accounts, including the blocking gate across its checkpoints
//! 4. **Deletion**: every family that references content reacts to a delete

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use sc_01_social_consensus::{
        AccountMode, BlockVerdict, ConsensusLimit, Network, ReasonCode, SocialConsensusApi, Verdict,
    };
    use shared_types::{SocialTransaction, TxType};
    use social_telemetry::init_test_tracing;

    const ALICE: &str = "alice";
    const BOB: &str = "bob";

    // =============================================================================
    // TRIAL LIMIT
    // =============================================================================

    #[test]
    fn test_trial_limit_lifted_by_reputation() {
        init_test_tracing();

        let height = 100;
        let node = Node::mainnet().with_accounts(&[ALICE]);
        let limits = node.service.limits();
        let trial = limits.get(ConsensusLimit::TrialPost, height) as usize;

        assert_eq!(
            node.service.account_mode(ALICE, height).unwrap().mode,
            AccountMode::Trial
        );

        let block: Vec<_> = (1..=trial + 1)
            .map(|i| post(&format!("P{i}"), ALICE, 1_000))
            .collect();
        assert_eq!(
            node.service.validate_block(&block, height).unwrap(),
            BlockVerdict::Rejected {
                index: trial,
                tx_hash: format!("P{}", trial + 1),
                reason: ReasonCode::ContentLimit,
            }
        );

        let threshold = limits.get(ConsensusLimit::ThresholdReputation, height);
        node.repo.set_reputation(ALICE, threshold);
        assert_eq!(
            node.service.account_mode(ALICE, height).unwrap().mode,
            AccountMode::Full
        );
        assert_eq!(
            node.service.validate_block(&block, height).unwrap(),
            BlockVerdict::Accepted
        );
    }

    #[test]
    fn test_trial_limit_against_confirmed_posts() {
        let height = 100;
        let node = Node::mainnet().with_accounts(&[ALICE]);
        let trial = node.service.limits().get(ConsensusLimit::TrialPost, height) as usize;
        node.confirm_posts(ALICE, "P", trial, height);

        let next = post("next", ALICE, 1_000);
        assert_eq!(
            node.service.validate(&next, None, height).unwrap(),
            Verdict::Rejected(ReasonCode::ContentLimit)
        );

        let threshold = node.service.limits().get(ConsensusLimit::ThresholdReputation, height);
        node.repo.set_reputation(ALICE, threshold);
        assert_eq!(node.service.validate(&next, None, height).unwrap(), Verdict::Accepted);
    }

    #[test]
    fn test_time_ordered_block_window_before_checkpoint() {
        // Until block_window_all, a later-stamped post in the block is not "earlier".
        let height = 1_000_000;
        let node = Node::mainnet().with_accounts(&[ALICE]);
        let trial = node.service.limits().get(ConsensusLimit::TrialPost, height) as usize;

        let mut block: Vec<_> = (0..trial)
            .map(|i| post(&format!("late{i}"), ALICE, 5_000))
            .collect();
        block.push(post("early", ALICE, 1_000));
        assert!(node.service.validate_block(&block, height).unwrap().is_accepted());

        assert!(matches!(
            node.service.validate_block(&block, 1_124_000).unwrap(),
            BlockVerdict::Rejected { reason: ReasonCode::ContentLimit, .. }
        ));
    }

    // =============================================================================
    // MEMPOOL TO BLOCK
    // =============================================================================

    #[test]
    fn test_mempool_admission_then_block() {
        let node = Node::mainnet().with_accounts(&[ALICE]);
        let trial = node.service.limits().get(ConsensusLimit::TrialPost, MODERN) as usize;

        let mut admitted = Vec::new();
        for i in 0..=trial {
            let tx = post(&format!("m{i}"), ALICE, 1_000);
            match node.service.validate(&tx, None, MODERN).unwrap() {
                Verdict::Accepted => {
                    node.repo.insert_mempool(tx.clone());
                    admitted.push(tx);
                }
                Verdict::Rejected(reason) => {
                    assert_eq!(i, trial);
                    assert_eq!(reason, ReasonCode::ContentLimit);
                }
            }
        }
        assert_eq!(admitted.len(), trial);

        // A miner packs exactly what the mempool admitted.
        assert!(node.service.validate_block(&admitted, MODERN).unwrap().is_accepted());
        for tx in &admitted {
            assert!(node.repo.confirm(&tx.hash, MODERN));
        }

        let next = post("next", ALICE, 1_000);
        assert_eq!(
            node.service.validate(&next, None, MODERN + 1).unwrap(),
            Verdict::Rejected(ReasonCode::ContentLimit)
        );

        // The height window rolls past the mined block.
        let depth = node.service.limits().get(ConsensusLimit::Depth, MODERN);
        assert_eq!(
            node.service.validate(&next, None, MODERN + depth + 1).unwrap(),
            Verdict::Accepted
        );
    }

    // =============================================================================
    // SOCIAL GRAPH
    // =============================================================================

    #[test]
    fn test_registration_and_first_post_in_one_block() {
        let node = Node::mainnet().with_accounts(&[ALICE]);

        let block = vec![registration(BOB), post("bob-1", BOB, 1_000)];
        assert!(node.service.validate_block(&block, MODERN).unwrap().is_accepted());

        let reversed = vec![block[1].clone(), block[0].clone()];
        assert_eq!(
            node.service.validate_block(&reversed, MODERN).unwrap(),
            BlockVerdict::Rejected {
                index: 0,
                tx_hash: "bob-1".into(),
                reason: ReasonCode::NotRegistered,
            }
        );
    }

    #[test]
    fn test_interactions_between_accounts() {
        let node = Node::mainnet().with_accounts(&[ALICE, BOB]);
        node.repo.insert_confirmed(post("bob-1", BOB, 1_000), MODERN - 5);

        let block = vec![
            comment("c1", ALICE, "bob-1", 2_000),
            score("s1", ALICE, "bob-1", 5),
            relation("r1", TxType::Subscribe, ALICE, BOB),
        ];
        assert!(node.service.validate_block(&block, MODERN).unwrap().is_accepted());

        let doubled = vec![
            score("s1", ALICE, "bob-1", 5),
            score("s2", ALICE, "bob-1", 4),
        ];
        assert_eq!(
            node.service.validate_block(&doubled, MODERN).unwrap(),
            BlockVerdict::Rejected {
                index: 1,
                tx_hash: "s2".into(),
                reason: ReasonCode::DoubleScore,
            }
        );

        let pending_pair = vec![
            relation("r1", TxType::Subscribe, ALICE, BOB),
            relation("r2", TxType::SubscribeCancel, ALICE, BOB),
        ];
        assert!(matches!(
            node.service.validate_block(&pending_pair, MODERN).unwrap(),
            BlockVerdict::Rejected { index: 1, reason: ReasonCode::ManyTransactions, .. }
        ));

        // Once mined, the same actions are doubles.
        for tx in &block {
            node.repo.insert_confirmed(tx.clone(), MODERN);
        }
        assert_eq!(
            node.service.validate(&score("s3", ALICE, "bob-1", 3), None, MODERN + 1).unwrap(),
            Verdict::Rejected(ReasonCode::DoubleScore)
        );
        assert_eq!(
            node.service
                .validate(&relation("r3", TxType::Subscribe, ALICE, BOB), None, MODERN + 1)
                .unwrap(),
            Verdict::Rejected(ReasonCode::DoubleSubscribe)
        );
        assert_eq!(
            node.service
                .validate(&relation("r4", TxType::SubscribeCancel, ALICE, BOB), None, MODERN + 1)
                .unwrap(),
            Verdict::Accepted
        );
    }

    #[test]
    fn test_blocking_gate_follows_checkpoints() {
        let node = Node::mainnet().with_accounts(&[ALICE, BOB]);
        node.repo.insert_confirmed(post("bob-1", BOB, 1_000), 400_000);
        node.repo
            .insert_confirmed(relation("b1", TxType::Blocking, BOB, ALICE), 400_001);

        let tx = score("s1", ALICE, "bob-1", 5);
        let expectations = [
            (429_999, Verdict::Accepted),
            (430_000, Verdict::Rejected(ReasonCode::Blocking)),
            (514_184, Verdict::Accepted),
            (1_600_000, Verdict::Accepted),
            (MODERN, Verdict::Rejected(ReasonCode::Blocking)),
        ];
        for (height, expected) in expectations {
            assert_eq!(node.service.validate(&tx, None, height).unwrap(), expected, "height {height}");
        }

        assert_eq!(
            node.service.validate(&comment("c1", ALICE, "bob-1", 2_000), None, MODERN).unwrap(),
            Verdict::Rejected(ReasonCode::Blocking)
        );

        node.repo
            .insert_confirmed(relation("u1", TxType::BlockingCancel, BOB, ALICE), MODERN - 1);
        assert_eq!(node.service.validate(&tx, None, MODERN).unwrap(), Verdict::Accepted);
    }

    // =============================================================================
    // DELETION
    // =============================================================================

    #[test]
    fn test_deleted_content_is_unreachable() {
        let node = Node::mainnet().with_accounts(&[ALICE, BOB]);
        node.repo.insert_confirmed(post("p1", ALICE, 1_000), MODERN - 10);

        let delete = SocialTransaction::new("d1", TxType::ContentDelete, ALICE, 2_000).with_root("p1");
        let foreign = SocialTransaction::new("d2", TxType::ContentDelete, BOB, 2_000).with_root("p1");
        assert_eq!(node.service.validate(&delete, None, MODERN).unwrap(), Verdict::Accepted);
        assert_eq!(
            node.service.validate(&foreign, None, MODERN).unwrap(),
            Verdict::Rejected(ReasonCode::ContentDeleteUnauthorized)
        );

        node.repo.insert_confirmed(delete, MODERN - 5);

        let again = SocialTransaction::new("d3", TxType::ContentDelete, ALICE, 3_000).with_root("p1");
        let repost = post("rp1", BOB, 3_000).with_relay("p1");
        let cases = [
            (again, ReasonCode::ContentDeleteDouble),
            (score("s1", BOB, "p1", 5), ReasonCode::ScoreDeletedContent),
            (comment("c1", BOB, "p1", 3_000), ReasonCode::CommentDeletedContent),
            (edit("e1", ALICE, "p1", 3_000), ReasonCode::NotAllowed),
            (repost, ReasonCode::NotAllowed),
        ];
        for (tx, reason) in cases {
            assert_eq!(
                node.service.validate(&tx, None, MODERN).unwrap(),
                Verdict::Rejected(reason),
                "{}",
                tx.hash
            );
        }
    }

    // =============================================================================
    // NETWORKS
    // =============================================================================

    #[test]
    fn test_moderation_flags_disabled_on_mainnet() {
        let flag = SocialTransaction::new("f1", TxType::ModerationFlag, ALICE, 2_000)
            .with_content("p1")
            .with_address_to(BOB)
            .with_reason(1);

        let main = Node::mainnet().with_accounts(&[ALICE, BOB]);
        assert_eq!(
            main.service.check(&flag, MODERN).unwrap(),
            Verdict::Rejected(ReasonCode::NotAllowed)
        );

        let regtest = Node::new(Network::Regtest).with_accounts(&[ALICE, BOB]);
        assert_eq!(regtest.service.check(&flag, 0).unwrap(), Verdict::Accepted);
    }
}
