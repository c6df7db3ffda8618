//! Consensus limit table
//!
//! Every numeric consensus parameter (windows, caps, depths, thresholds) is a
//! schedule of `(activation height, value)` pairs. A lookup returns the value
//! of the latest entry whose height is `<= height`. Every limit carries a
//! height-0 default, checked once at construction.
//!
//! Testnet and regtest start from the final mainnet value of each limit at
//! height 0, then apply their own overrides.

use super::config::Network;
use super::error::{ConsensusError, ConsensusResult};
use shared_types::Height;
use std::collections::HashMap;

const COIN: i64 = 100_000_000;
const DAY: i64 = 86_400;

/// Named consensus parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConsensusLimit {
    // Account mode thresholds
    ThresholdReputation,
    ThresholdReputationScore,
    ThresholdBalance,
    ThresholdBalancePro,
    ThresholdLikersCount,
    ThresholdSharkReputation,
    ThresholdSharkLikers,

    // Windows (seconds before 1180000 on mainnet, blocks after)
    Depth,
    EditPostDepth,
    EditCommentDepth,
    ChangeInfoDepth,

    // Content
    PostEditCount,
    CommentEditCount,
    TrialPost,
    FullPost,
    VideoDepth,
    EditVideoDepth,
    TrialVideo,
    FullVideo,
    ProVideo,
    VideoEditCount,

    // Actions
    TrialScore,
    FullScore,
    TrialComment,
    FullComment,
    TrialCommentScore,
    FullCommentScore,
    TrialComplain,
    FullComplain,

    // Sizes
    MaxPostSize,
    MaxCommentSize,
    MaxUserSize,
    MaxBarteronAccountSize,
    MaxNicknameLength,

    // Reputation one-to-one
    ScoresOneToOne,
    ScoresOneToOneOverComment,
    ScoresOneToOneDepth,

    // Moderation
    ModerationFlagCount,
    ModerationFlagOneToOneDepth,

    // Barteron
    BarteronListMaxSize,
}

impl ConsensusLimit {
    pub const ALL: [ConsensusLimit; 40] = [
        ConsensusLimit::ThresholdReputation,
        ConsensusLimit::ThresholdReputationScore,
        ConsensusLimit::ThresholdBalance,
        ConsensusLimit::ThresholdBalancePro,
        ConsensusLimit::ThresholdLikersCount,
        ConsensusLimit::ThresholdSharkReputation,
        ConsensusLimit::ThresholdSharkLikers,
        ConsensusLimit::Depth,
        ConsensusLimit::EditPostDepth,
        ConsensusLimit::EditCommentDepth,
        ConsensusLimit::ChangeInfoDepth,
        ConsensusLimit::PostEditCount,
        ConsensusLimit::CommentEditCount,
        ConsensusLimit::TrialPost,
        ConsensusLimit::FullPost,
        ConsensusLimit::VideoDepth,
        ConsensusLimit::EditVideoDepth,
        ConsensusLimit::TrialVideo,
        ConsensusLimit::FullVideo,
        ConsensusLimit::ProVideo,
        ConsensusLimit::VideoEditCount,
        ConsensusLimit::TrialScore,
        ConsensusLimit::FullScore,
        ConsensusLimit::TrialComment,
        ConsensusLimit::FullComment,
        ConsensusLimit::TrialCommentScore,
        ConsensusLimit::FullCommentScore,
        ConsensusLimit::TrialComplain,
        ConsensusLimit::FullComplain,
        ConsensusLimit::MaxPostSize,
        ConsensusLimit::MaxCommentSize,
        ConsensusLimit::MaxUserSize,
        ConsensusLimit::MaxBarteronAccountSize,
        ConsensusLimit::MaxNicknameLength,
        ConsensusLimit::ScoresOneToOne,
        ConsensusLimit::ScoresOneToOneOverComment,
        ConsensusLimit::ScoresOneToOneDepth,
        ConsensusLimit::ModerationFlagCount,
        ConsensusLimit::ModerationFlagOneToOneDepth,
        ConsensusLimit::BarteronListMaxSize,
    ];
}

type Schedule = &'static [(Height, i64)];

const MAINNET: &[(ConsensusLimit, Schedule)] = &[
    (ConsensusLimit::ThresholdReputation, &[(0, 500), (292_800, 1_000)]),
    (ConsensusLimit::ThresholdReputationScore, &[(0, -10_000), (108_300, 500), (292_800, 1_000)]),
    (ConsensusLimit::ThresholdBalance, &[(0, 50 * COIN)]),
    (ConsensusLimit::ThresholdBalancePro, &[(0, i64::MAX), (1_757_000, 250 * COIN)]),
    (ConsensusLimit::ThresholdLikersCount, &[(0, 0), (1_124_000, 100)]),
    (ConsensusLimit::ThresholdSharkReputation, &[(0, 2_100)]),
    (ConsensusLimit::ThresholdSharkLikers, &[(0, 450)]),
    (ConsensusLimit::Depth, &[(0, DAY), (1_180_000, 1_440)]),
    (ConsensusLimit::EditPostDepth, &[(0, DAY), (1_180_000, 1_440)]),
    (ConsensusLimit::EditCommentDepth, &[(0, DAY), (1_180_000, 1_440)]),
    (ConsensusLimit::ChangeInfoDepth, &[(0, 3_600), (1_180_000, 60)]),
    (ConsensusLimit::PostEditCount, &[(0, 5)]),
    (ConsensusLimit::CommentEditCount, &[(0, 4)]),
    (ConsensusLimit::TrialPost, &[(0, 15)]),
    (ConsensusLimit::FullPost, &[(0, 30)]),
    (ConsensusLimit::VideoDepth, &[(0, 1_440)]),
    (ConsensusLimit::EditVideoDepth, &[(0, 1_440)]),
    (ConsensusLimit::TrialVideo, &[(0, 15), (1_324_655, 5)]),
    (ConsensusLimit::FullVideo, &[(0, 30)]),
    (ConsensusLimit::ProVideo, &[(0, 100)]),
    (ConsensusLimit::VideoEditCount, &[(0, 5)]),
    (ConsensusLimit::TrialScore, &[(0, 45), (175_600, 100)]),
    (ConsensusLimit::FullScore, &[(0, 90), (175_600, 200)]),
    (ConsensusLimit::TrialComment, &[(0, 150)]),
    (ConsensusLimit::FullComment, &[(0, 300)]),
    (ConsensusLimit::TrialCommentScore, &[(0, 300)]),
    (ConsensusLimit::FullCommentScore, &[(0, 600)]),
    (ConsensusLimit::TrialComplain, &[(0, 6)]),
    (ConsensusLimit::FullComplain, &[(0, 12)]),
    (ConsensusLimit::MaxPostSize, &[(0, 60_000)]),
    (ConsensusLimit::MaxCommentSize, &[(0, 2_000)]),
    (ConsensusLimit::MaxUserSize, &[(0, 2_000)]),
    (ConsensusLimit::MaxBarteronAccountSize, &[(0, 2_000)]),
    (ConsensusLimit::MaxNicknameLength, &[(0, 35)]),
    (ConsensusLimit::ScoresOneToOne, &[(0, 99_999), (225_000, 2)]),
    (ConsensusLimit::ScoresOneToOneOverComment, &[(0, 20)]),
    (
        ConsensusLimit::ScoresOneToOneDepth,
        &[(0, 336 * DAY), (225_000, DAY), (292_800, 7 * DAY), (322_700, 2 * DAY)],
    ),
    (ConsensusLimit::ModerationFlagCount, &[(0, 30)]),
    (ConsensusLimit::ModerationFlagOneToOneDepth, &[(0, 43_200)]),
    (ConsensusLimit::BarteronListMaxSize, &[(0, 1_000)]),
];

const TESTNET: &[(ConsensusLimit, Schedule)] = &[
    (ConsensusLimit::ThresholdReputation, &[(0, 100)]),
    (ConsensusLimit::ThresholdBalance, &[(0, 5 * COIN)]),
    (ConsensusLimit::ThresholdSharkReputation, &[(0, 100)]),
    (ConsensusLimit::ThresholdSharkLikers, &[(0, 10)]),
    (ConsensusLimit::BarteronListMaxSize, &[(0, 300)]),
];

const REGTEST: &[(ConsensusLimit, Schedule)] = &[
    (ConsensusLimit::ThresholdReputation, &[(0, 100)]),
    (ConsensusLimit::ThresholdLikersCount, &[(0, 0)]),
    (ConsensusLimit::ThresholdSharkReputation, &[(0, 100)]),
    (ConsensusLimit::ThresholdSharkLikers, &[(0, 0)]),
    (ConsensusLimit::BarteronListMaxSize, &[(0, 15)]),
];

/// Height-versioned consensus parameters for one network.
#[derive(Debug, Clone)]
pub struct LimitTable {
    network: Network,
    schedules: HashMap<ConsensusLimit, Vec<(Height, i64)>>,
}

impl LimitTable {
    /// Built-in table for `network`.
    pub fn new(network: Network) -> ConsensusResult<Self> {
        let mut schedules = HashMap::new();

        match network {
            Network::Main => {
                for (limit, schedule) in MAINNET {
                    schedules.insert(*limit, schedule.to_vec());
                }
            }
            Network::Test | Network::Regtest => {
                for (limit, schedule) in MAINNET {
                    if let Some(&(_, value)) = schedule.last() {
                        schedules.insert(*limit, vec![(0, value)]);
                    }
                }

                let overrides = if network == Network::Test { TESTNET } else { REGTEST };
                for (limit, schedule) in overrides {
                    schedules.insert(*limit, schedule.to_vec());
                }
            }
        }

        Self::from_schedules(network, schedules)
    }

    /// Table from explicit schedules.
    ///
    /// # Errors
    ///
    /// [`ConsensusError::MissingLimitDefault`] when any limit lacks a height-0 entry.
    pub fn from_schedules(
        network: Network,
        schedules: impl IntoIterator<Item = (ConsensusLimit, Vec<(Height, i64)>)>,
    ) -> ConsensusResult<Self> {
        let mut table = Self {
            network,
            schedules: schedules.into_iter().collect(),
        };

        for schedule in table.schedules.values_mut() {
            // Stable: entries sharing a height keep registration order.
            schedule.sort_by_key(|(height, _)| *height);
        }

        for limit in ConsensusLimit::ALL {
            let has_default = table
                .schedules
                .get(&limit)
                .and_then(|s| s.first())
                .is_some_and(|(height, _)| *height == 0);

            if !has_default {
                return Err(ConsensusError::MissingLimitDefault(limit));
            }
        }

        Ok(table)
    }

    /// Add an entry. An entry at an already-registered height wins over the
    /// earlier one.
    pub fn register(&mut self, limit: ConsensusLimit, height: Height, value: i64) {
        let schedule = self.schedules.entry(limit).or_default();
        schedule.push((height, value));
        schedule.sort_by_key(|(h, _)| *h);
    }

    /// Value of `limit` in force at `height`.
    ///
    /// # Panics
    ///
    /// Only if `limit` has no schedule, which construction rules out.
    pub fn get(&self, limit: ConsensusLimit, height: Height) -> i64 {
        let Some(schedule) = self.schedules.get(&limit) else {
            panic!("consensus limit {limit:?} has no schedule");
        };

        let idx = schedule.partition_point(|(h, _)| *h <= height);
        schedule[idx.saturating_sub(1)].1
    }

    /// Heights at which `limit` changes value (including the default at 0).
    pub fn activation_heights(&self, limit: ConsensusLimit) -> Vec<Height> {
        self.schedules
            .get(&limit)
            .map(|s| s.iter().map(|(h, _)| *h).collect())
            .unwrap_or_default()
    }

    pub fn network(&self) -> Network {
        self.network
    }
}
