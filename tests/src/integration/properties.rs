//! # Consensus Invariants
//!
//! Properties of the validation driver that must hold regardless of the
//! account, the height, or the order transactions arrive in.
//!
//! ## Covered
//!
//! 1. Limits only change at an activation height
//! 2. A persisted transaction never counts against itself
//! 3. Only the author may edit content
//! 4. The height edit window is inclusive at `original + depth`
//! 5. Two edits of one root in a block reject the second
//! 6. Scoring your own content or comment always fails
//! 7. The grandfather allow-list suppresses exactly the listed violation
//! 8. Rate limits accept at `N - 1` prior actions and reject at `N`

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use rand::Rng;
    use sc_01_social_consensus::{
        BlockVerdict, ConsensusError, ConsensusLimit, LimitTable, Network, ReasonCode,
        SocialCheckpoints, SocialConsensusApi, Verdict,
    };
    use shared_types::{SocialTransaction, TxType};

    const ALICE: &str = "alice";
    const BOB: &str = "bob";

    fn rejected(reason: ReasonCode) -> Verdict {
        Verdict::Rejected(reason)
    }

    // =============================================================================
    // LIMIT TABLE
    // =============================================================================

    #[test]
    fn test_limits_constant_between_activation_heights() {
        let mut rng = rand::thread_rng();

        for network in [Network::Main, Network::Test, Network::Regtest] {
            let table = LimitTable::new(network).unwrap();

            for limit in ConsensusLimit::ALL {
                let heights = table.activation_heights(limit);
                assert_eq!(heights.first(), Some(&0), "{limit:?} lacks a genesis value");

                for pair in heights.windows(2) {
                    let (start, end) = (pair[0], pair[1]);
                    if start == end {
                        continue;
                    }

                    let value = table.get(limit, start);
                    assert_eq!(table.get(limit, end - 1), value, "{limit:?} before {end}");
                    for _ in 0..16 {
                        let h = rng.gen_range(start..end);
                        assert_eq!(table.get(limit, h), value, "{limit:?} at {h}");
                    }
                }

                let last = *heights.last().unwrap();
                let value = table.get(limit, last);
                for _ in 0..16 {
                    let h = rng.gen_range(last..last + 10_000_000);
                    assert_eq!(table.get(limit, h), value, "{limit:?} at {h}");
                }
            }
        }
    }

    #[test]
    fn test_checkpoint_changes_only_at_activation() {
        let node = Node::mainnet();
        let service = &node.service;

        assert_eq!(service.active_checkpoint(TxType::ContentPost, 1_123_999), "genesis");
        assert_eq!(service.active_checkpoint(TxType::ContentPost, 1_124_000), "block_window_all");
        assert_eq!(service.active_checkpoint(TxType::ContentPost, 1_179_999), "block_window_all");
        assert_eq!(service.active_checkpoint(TxType::ContentPost, 1_180_000), "height_windows");
    }

    // =============================================================================
    // NO SELF-COUNT
    // =============================================================================

    #[test]
    fn test_persisted_tx_not_counted_against_itself() {
        let node = Node::mainnet().with_accounts(&[ALICE]);
        let limit = node.service.limits().get(ConsensusLimit::TrialPost, MODERN) as usize;
        node.confirm_posts(ALICE, "p", limit, MODERN - 1);

        // The last persisted post sees only the other limit - 1.
        let persisted = post(&format!("p{}", limit - 1), ALICE, 1_000);
        for _ in 0..3 {
            assert_eq!(
                node.service.validate(&persisted, None, MODERN).unwrap(),
                Verdict::Accepted
            );
        }
        assert!(node
            .service
            .validate_block(std::slice::from_ref(&persisted), MODERN)
            .unwrap()
            .is_accepted());

        assert_eq!(
            node.service.validate(&post("fresh", ALICE, 1_000), None, MODERN).unwrap(),
            rejected(ReasonCode::ContentLimit)
        );
    }

    #[test]
    fn test_pending_tx_not_counted_against_itself() {
        let node = Node::mainnet().with_accounts(&[ALICE]);
        let limit = node.service.limits().get(ConsensusLimit::TrialPost, MODERN);
        for i in 0..limit {
            node.repo.insert_mempool(post(&format!("m{i}"), ALICE, 1_000));
        }

        assert!(node.service.validate(&post("m0", ALICE, 1_000), None, MODERN).unwrap().is_accepted());
        assert_eq!(
            node.service.validate(&post("m-new", ALICE, 1_000), None, MODERN).unwrap(),
            rejected(ReasonCode::ContentLimit)
        );
    }

    // =============================================================================
    // EDITS
    // =============================================================================

    #[test]
    fn test_only_author_edits() {
        let mut rng = rand::thread_rng();
        let node = Node::mainnet().with_accounts(&[ALICE, BOB]);
        node.repo.insert_confirmed(post("p1", ALICE, 1_000), 1_200_000);

        for _ in 0..32 {
            let height = rng.gen_range(1_200_000..3_000_000);
            assert_eq!(
                node.service.validate(&edit("e1", BOB, "p1", 2_000), None, height).unwrap(),
                rejected(ReasonCode::ContentEditUnauthorized),
                "height {height}"
            );
        }
    }

    #[test]
    fn test_height_edit_window_boundary() {
        let node = Node::mainnet().with_accounts(&[ALICE]);
        node.repo.insert_confirmed(post("p1", ALICE, 1_000), MODERN);

        let depth = node.service.limits().get(ConsensusLimit::EditPostDepth, MODERN);
        let tx = edit("e1", ALICE, "p1", 2_000);

        assert_eq!(
            node.service.validate(&tx, None, MODERN + depth).unwrap(),
            Verdict::Accepted
        );
        assert_eq!(
            node.service.validate(&tx, None, MODERN + depth + 1).unwrap(),
            rejected(ReasonCode::ContentEditLimit)
        );
    }

    #[test]
    fn test_time_edit_window_boundary() {
        // Before the height_windows checkpoint the window is wall-clock time.
        let height = 1_000_000;
        let node = Node::mainnet().with_accounts(&[ALICE]);
        node.repo.insert_confirmed(post("p1", ALICE, 1_000), height);

        let depth = node.service.limits().get(ConsensusLimit::EditPostDepth, height);
        assert_eq!(
            node.service
                .validate(&edit("e1", ALICE, "p1", 1_000 + depth), None, height + 5)
                .unwrap(),
            Verdict::Accepted
        );
        assert_eq!(
            node.service
                .validate(&edit("e1", ALICE, "p1", 1_000 + depth + 1), None, height + 5)
                .unwrap(),
            rejected(ReasonCode::ContentEditLimit)
        );
    }

    #[test]
    fn test_double_edit_in_block_rejects_second_in_any_order() {
        let node = Node::mainnet().with_accounts(&[ALICE]);
        node.repo.insert_confirmed(post("p1", ALICE, 1_000), MODERN - 10);

        let first = edit("e1", ALICE, "p1", 2_000);
        let second = edit("e2", ALICE, "p1", 2_001);

        for block in [vec![first.clone(), second.clone()], vec![second.clone(), first.clone()]] {
            let expected_hash = block[1].hash.clone();
            assert_eq!(
                node.service.validate_block(&block, MODERN).unwrap(),
                BlockVerdict::Rejected {
                    index: 1,
                    tx_hash: expected_hash,
                    reason: ReasonCode::DoubleContentEdit,
                }
            );
        }

        node.repo.insert_mempool(first);
        assert_eq!(
            node.service.validate(&second, None, MODERN).unwrap(),
            rejected(ReasonCode::DoubleContentEdit)
        );
    }

    // =============================================================================
    // SELF-SCORE
    // =============================================================================

    #[test]
    fn test_self_score_rejected_at_any_height_and_reputation() {
        let node = Node::mainnet().with_accounts(&[ALICE]);
        node.repo.insert_confirmed(post("p1", ALICE, 1_000), 10);
        node.repo.insert_confirmed(comment("c1", ALICE, "p1", 1_100), 10);

        let comment_score = SocialTransaction::new("sc1", TxType::ScoreComment, ALICE, 2_000)
            .with_content("c1")
            .with_value(1);

        for reputation in [0, 1_000, 100_000] {
            node.repo.set_reputation(ALICE, reputation);
            for height in [300_000, 500_000, 1_200_000, MODERN] {
                assert_eq!(
                    node.service.validate(&score("s1", ALICE, "p1", 5), None, height).unwrap(),
                    rejected(ReasonCode::SelfScore),
                    "reputation {reputation} height {height}"
                );
                assert_eq!(
                    node.service.validate(&comment_score, None, height).unwrap(),
                    rejected(ReasonCode::SelfCommentScore),
                    "reputation {reputation} height {height}"
                );
            }
        }
    }

    // =============================================================================
    // GRANDFATHER ALLOW-LIST
    // =============================================================================

    #[test]
    fn test_allow_list_suppresses_only_listed_violation() {
        let node = Node::mainnet().with_accounts(&[ALICE]);
        let limit = node.service.limits().get(ConsensusLimit::TrialPost, MODERN) as usize;
        node.confirm_posts(ALICE, "p", limit, MODERN - 1);

        let mut checkpoints = SocialCheckpoints::new();
        checkpoints.insert("grandfathered", TxType::ContentPost, ReasonCode::ContentLimit);
        checkpoints.insert("wrong-reason", TxType::ContentPost, ReasonCode::NotAllowed);
        checkpoints.insert("wrong-type", TxType::ContentArticle, ReasonCode::ContentLimit);
        let service = node.service.with_social_checkpoints(checkpoints);

        for _ in 0..2 {
            assert_eq!(
                service.validate(&post("grandfathered", ALICE, 1_000), None, MODERN).unwrap(),
                Verdict::Accepted
            );
        }
        for hash in ["other", "wrong-reason", "wrong-type"] {
            assert_eq!(
                service.validate(&post(hash, ALICE, 1_000), None, MODERN).unwrap(),
                rejected(ReasonCode::ContentLimit),
                "{hash}"
            );
        }
    }

    // =============================================================================
    // RATE LIMIT BOUNDARY
    // =============================================================================

    #[test]
    fn test_trial_post_limit_boundary() {
        let node = Node::mainnet().with_accounts(&[ALICE]);
        let limit = node.service.limits().get(ConsensusLimit::TrialPost, MODERN) as usize;
        node.confirm_posts(ALICE, "p", limit - 1, MODERN - 1);

        let next = post("next", ALICE, 1_000);
        assert_eq!(node.service.validate(&next, None, MODERN).unwrap(), Verdict::Accepted);
        assert!(node
            .service
            .validate_block(std::slice::from_ref(&next), MODERN)
            .unwrap()
            .is_accepted());

        // The block prefix completes the count for the second post.
        let block = vec![next.clone(), post("over", ALICE, 1_000)];
        assert_eq!(
            node.service.validate_block(&block, MODERN).unwrap(),
            BlockVerdict::Rejected {
                index: 1,
                tx_hash: "over".into(),
                reason: ReasonCode::ContentLimit,
            }
        );

        node.repo.insert_confirmed(next, MODERN - 1);
        assert_eq!(
            node.service.validate(&post("over", ALICE, 1_000), None, MODERN).unwrap(),
            rejected(ReasonCode::ContentLimit)
        );
    }

    // =============================================================================
    // BLOCK ORDERING
    // =============================================================================

    #[test]
    fn test_block_scan_sees_only_earlier_transactions() {
        let node = Node::mainnet().with_accounts(&[ALICE]);

        // Registration after the post does not count for it.
        let late = vec![post("p1", "carol", 1_000), registration("carol")];
        assert_eq!(
            node.service.validate_block(&late, MODERN).unwrap(),
            BlockVerdict::Rejected {
                index: 0,
                tx_hash: "p1".into(),
                reason: ReasonCode::NotRegistered,
            }
        );

        let early = vec![registration("carol"), post("p1", "carol", 1_000)];
        assert!(node.service.validate_block(&early, MODERN).unwrap().is_accepted());
    }

    #[test]
    fn test_validation_is_deterministic() {
        let node = Node::mainnet().with_accounts(&[ALICE, BOB]);
        let limit = node.service.limits().get(ConsensusLimit::TrialPost, MODERN) as usize;
        let block: Vec<_> = (0..=limit)
            .map(|i| post(&format!("b{i}"), ALICE, 1_000))
            .chain(std::iter::once(post("bob-1", BOB, 1_000)))
            .collect();

        let first = node.service.validate_block(&block, MODERN).unwrap();
        for _ in 0..5 {
            assert_eq!(node.service.validate_block(&block, MODERN).unwrap(), first);
        }
        assert!(matches!(first, BlockVerdict::Rejected { index, .. } if index == limit));
    }

    #[test]
    fn test_repository_failure_aborts_block() {
        let node = Node::mainnet().with_accounts(&[ALICE]);
        node.repo.fail_reads(Some("disk unavailable".into()));

        let result = node.service.validate_block(&[post("p1", ALICE, 1_000)], MODERN);
        assert!(matches!(result, Err(ConsensusError::Repository(_))));
    }
}
