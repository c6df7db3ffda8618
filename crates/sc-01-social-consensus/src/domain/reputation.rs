//! Account mode and reputation gates
//!
//! Reputation and balance thresholds are height-versioned limits, so every
//! decision here is taken against the [`LimitTable`] at one height.

use super::limits::{ConsensusLimit, LimitTable};
use crate::ports::{ConsensusRepository, OneToOneScoreQuery, RepositoryResult};
use serde::{Deserialize, Serialize};
use shared_types::{Height, SocialTransaction, TxType};

/// Rate-limit class of an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccountMode {
    Trial,
    Full,
    Pro,
}

/// Resolved mode with the inputs it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub mode: AccountMode,
    pub reputation: i64,
    pub balance: i64,
}

impl AccountInfo {
    /// Unregistered addresses: Trial with nothing accumulated.
    pub const UNREGISTERED: Self = Self {
        mode: AccountMode::Trial,
        reputation: 0,
        balance: 0,
    };
}

/// Reputation queries evaluated at one height.
#[derive(Clone, Copy)]
pub struct ReputationRules<'a> {
    repo: &'a dyn ConsensusRepository,
    limits: &'a LimitTable,
    height: Height,
}

impl<'a> ReputationRules<'a> {
    pub fn new(repo: &'a dyn ConsensusRepository, limits: &'a LimitTable, height: Height) -> Self {
        Self {
            repo,
            limits,
            height,
        }
    }

    fn limit(&self, limit: ConsensusLimit) -> i64 {
        self.limits.get(limit, self.height)
    }

    /// Classify `address`. Never fails for unregistered addresses.
    pub fn account_mode(&self, address: &str) -> RepositoryResult<AccountInfo> {
        if !self.repo.exists_user_registration(address, true)? {
            return Ok(AccountInfo::UNREGISTERED);
        }

        let reputation = self.repo.get_user_reputation(address, self.height)?;
        let balance = self.repo.get_user_balance(address)?;

        Ok(AccountInfo {
            mode: self.classify(reputation, balance),
            reputation,
            balance,
        })
    }

    pub fn classify(&self, reputation: i64, balance: i64) -> AccountMode {
        if balance >= self.limit(ConsensusLimit::ThresholdBalancePro) {
            AccountMode::Pro
        } else if reputation >= self.limit(ConsensusLimit::ThresholdReputation)
            || balance >= self.limit(ConsensusLimit::ThresholdBalance)
        {
            AccountMode::Full
        } else {
            AccountMode::Trial
        }
    }

    /// High-reputation accounts allowed to moderate.
    pub fn is_shark(&self, address: &str) -> RepositoryResult<bool> {
        let reputation = self.repo.get_user_reputation(address, self.height)?;
        if reputation < self.limit(ConsensusLimit::ThresholdSharkReputation) {
            return Ok(false);
        }

        let likers = self.repo.get_user_likers_count(address, self.height)?;
        Ok(likers >= self.limit(ConsensusLimit::ThresholdSharkLikers))
    }

    /// Whether scores from `address` move the author's reputation at all.
    pub fn allow_modify_reputation(&self, address: &str) -> RepositoryResult<bool> {
        let reputation = self.repo.get_user_reputation(address, self.height)?;
        if reputation < self.limit(ConsensusLimit::ThresholdReputationScore) {
            return Ok(false);
        }

        let likers = self.repo.get_user_likers_count(address, self.height)?;
        Ok(likers >= self.limit(ConsensusLimit::ThresholdLikersCount))
    }

    /// Score on content: also caps repeated scores between the same pair.
    pub fn allow_modify_reputation_over_content(
        &self,
        scorer: &str,
        author: &str,
        tx: &SocialTransaction,
        lottery: bool,
    ) -> RepositoryResult<bool> {
        let values: &[i64] = if lottery { &[4, 5] } else { &[1, 2, 3, 4, 5] };
        self.allow_one_to_one(
            scorer,
            author,
            tx,
            lottery,
            TxType::ScoreContent,
            values,
            ConsensusLimit::ScoresOneToOne,
        )
    }

    /// Score on a comment: same shape with the comment cap.
    pub fn allow_modify_reputation_over_comment(
        &self,
        scorer: &str,
        author: &str,
        tx: &SocialTransaction,
        lottery: bool,
    ) -> RepositoryResult<bool> {
        let values: &[i64] = if lottery { &[1] } else { &[-1, 1] };
        self.allow_one_to_one(
            scorer,
            author,
            tx,
            lottery,
            TxType::ScoreComment,
            values,
            ConsensusLimit::ScoresOneToOneOverComment,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn allow_one_to_one(
        &self,
        scorer: &str,
        author: &str,
        tx: &SocialTransaction,
        lottery: bool,
        score_type: TxType,
        values: &[i64],
        cap: ConsensusLimit,
    ) -> RepositoryResult<bool> {
        if !self.allow_modify_reputation(scorer)? {
            return Ok(false);
        }

        // Reindexing the lottery must not see the block being connected.
        let max_height = self.height.saturating_add(if lottery { 0 } else { 1 });

        let count = self.repo.count_scores_one_to_one(&OneToOneScoreQuery {
            scorer,
            author,
            score_type,
            values,
            since_time: tx.time.saturating_sub(self.limit(ConsensusLimit::ScoresOneToOneDepth)),
            until_time: tx.time,
            max_height,
            exclude_hash: &tx.hash,
        })?;

        Ok(count < self.limit(cap))
    }
}
