//! In-memory consensus repository
//!
//! Implements the ConsensusRepository port over a flat transaction list.
//! Used by tests and benchmarks; a node wires its own storage behind the
//! same trait.

use crate::ports::{ConsensusRepository, CountWindow, OneToOneScoreQuery, RepositoryResult};
use parking_lot::RwLock;
use shared_types::{Height, RepositoryError, SocialTransaction, TxType};
use std::collections::HashMap;

const BLOCKING_TYPES: [TxType; 2] = [TxType::Blocking, TxType::BlockingCancel];
const SUBSCRIBE_TYPES: [TxType; 3] = [TxType::Subscribe, TxType::SubscribePrivate, TxType::SubscribeCancel];

#[derive(Default)]
struct State {
    /// Insertion order breaks ties between versions confirmed at one height.
    txs: Vec<SocialTransaction>,
    index: HashMap<String, usize>,
    reputation: HashMap<String, i64>,
    balance: HashMap<String, i64>,
    likers: HashMap<String, i64>,
    failure: Option<String>,
}

impl State {
    fn get(&self, hash: &str) -> Option<&SocialTransaction> {
        self.index.get(hash).map(|&i| &self.txs[i])
    }

    fn confirmed(&self) -> impl Iterator<Item = &SocialTransaction> {
        self.txs.iter().filter(|tx| tx.is_confirmed())
    }

    fn pending(&self) -> impl Iterator<Item = &SocialTransaction> {
        self.txs.iter().filter(|tx| !tx.is_confirmed())
    }

    /// Latest confirmed transaction matching `filter`, by height then insertion.
    fn last_confirmed<F>(&self, filter: F) -> Option<&SocialTransaction>
    where
        F: Fn(&SocialTransaction) -> bool,
    {
        self.txs
            .iter()
            .enumerate()
            .filter(|(_, tx)| tx.is_confirmed() && filter(tx))
            .max_by_key(|(i, tx)| (tx.height, *i))
            .map(|(_, tx)| tx)
    }

    fn check(&self) -> RepositoryResult<()> {
        match &self.failure {
            Some(reason) => Err(RepositoryError::Storage(reason.clone())),
            None => Ok(()),
        }
    }
}

/// In-memory repository adapter for testing
pub struct InMemoryConsensusRepository {
    state: RwLock<State>,
}

impl InMemoryConsensusRepository {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
        }
    }

    fn upsert(&self, tx: SocialTransaction) {
        let mut state = self.state.write();
        match state.index.get(&tx.hash).copied() {
            Some(i) => state.txs[i] = tx,
            None => {
                let i = state.txs.len();
                state.index.insert(tx.hash.clone(), i);
                state.txs.push(tx);
            }
        }
    }

    /// Store `tx` as mined at `height`.
    pub fn insert_confirmed(&self, tx: SocialTransaction, height: Height) {
        self.upsert(tx.with_height(height));
    }

    /// Store `tx` as pending in the mempool.
    pub fn insert_mempool(&self, mut tx: SocialTransaction) {
        tx.height = None;
        self.upsert(tx);
    }

    /// Confirmation event: a pending transaction gets its height.
    pub fn confirm(&self, hash: &str, height: Height) -> bool {
        let mut state = self.state.write();
        match state.index.get(hash).copied() {
            Some(i) => {
                state.txs[i].height = Some(height);
                true
            }
            None => false,
        }
    }

    pub fn set_reputation(&self, address: &str, reputation: i64) {
        self.state.write().reputation.insert(address.to_string(), reputation);
    }

    pub fn set_balance(&self, address: &str, balance: i64) {
        self.state.write().balance.insert(address.to_string(), balance);
    }

    pub fn set_likers_count(&self, address: &str, likers: i64) {
        self.state.write().likers.insert(address.to_string(), likers);
    }

    /// Make every read fail with `reason` until cleared with `None`.
    pub fn fail_reads(&self, reason: Option<String>) {
        self.state.write().failure = reason;
    }

    pub fn len(&self) -> usize {
        self.state.read().txs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryConsensusRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsensusRepository for InMemoryConsensusRepository {
    fn exists(&self, hash: &str) -> RepositoryResult<bool> {
        let state = self.state.read();
        state.check()?;
        Ok(state.get(hash).is_some())
    }

    fn exists_in_chain(&self, hash: &str) -> RepositoryResult<bool> {
        let state = self.state.read();
        state.check()?;
        Ok(state.get(hash).is_some_and(SocialTransaction::is_confirmed))
    }

    fn exists_content(&self, hash: &str, types: &[TxType], chain_only: bool) -> RepositoryResult<bool> {
        let state = self.state.read();
        state.check()?;
        Ok(state
            .get(hash)
            .is_some_and(|tx| types.contains(&tx.tx_type) && (!chain_only || tx.is_confirmed())))
    }

    fn exists_user_registration(&self, address: &str, include_mempool: bool) -> RepositoryResult<bool> {
        let state = self.state.read();
        state.check()?;
        Ok(state.txs.iter().any(|tx| {
            tx.tx_type == TxType::AccountUser
                && tx.address == address
                && (include_mempool || tx.is_confirmed())
        }))
    }

    fn exists_score(
        &self,
        address: &str,
        content_hash: &str,
        score_type: TxType,
        include_mempool: bool,
        exclude_hash: &str,
    ) -> RepositoryResult<bool> {
        let state = self.state.read();
        state.check()?;
        Ok(state.txs.iter().any(|tx| {
            tx.tx_type == score_type
                && tx.address == address
                && tx.hash != exclude_hash
                && tx.content_tx_hash.as_deref() == Some(content_hash)
                && (include_mempool || tx.is_confirmed())
        }))
    }

    fn exists_complain(
        &self,
        exclude_hash: &str,
        post_hash: &str,
        address: &str,
        include_mempool: bool,
    ) -> RepositoryResult<bool> {
        let state = self.state.read();
        state.check()?;
        let found = state.txs.iter().any(|tx| {
            tx.tx_type == TxType::Complain
                && tx.address == address
                && tx.hash != exclude_hash
                && tx.post_tx_hash.as_deref() == Some(post_hash)
                && (include_mempool || tx.is_confirmed())
        });
        Ok(found)
    }

    fn exists_another_by_name(&self, address: &str, name: &str) -> RepositoryResult<bool> {
        let state = self.state.read();
        state.check()?;

        // Current profile of every address.
        let mut profiles: HashMap<&str, (Option<Height>, usize, Option<&str>)> = HashMap::new();
        for (i, tx) in state.txs.iter().enumerate() {
            if tx.tx_type != TxType::AccountUser || !tx.is_confirmed() {
                continue;
            }
            let entry = (tx.height, i, tx.name());
            profiles
                .entry(tx.address.as_str())
                .and_modify(|current| {
                    if (entry.0, entry.1) > (current.0, current.1) {
                        *current = entry;
                    }
                })
                .or_insert(entry);
        }

        Ok(profiles
            .iter()
            .any(|(owner, (_, _, held))| *owner != address && *held == Some(name)))
    }

    fn get_first_content(&self, root_hash: &str) -> RepositoryResult<Option<SocialTransaction>> {
        let state = self.state.read();
        state.check()?;
        Ok(state.get(root_hash).filter(|tx| tx.is_confirmed()).cloned())
    }

    fn get_last_content(&self, root_hash: &str, types: &[TxType]) -> RepositoryResult<Option<SocialTransaction>> {
        let state = self.state.read();
        state.check()?;
        Ok(state
            .last_confirmed(|tx| tx.root_hash() == root_hash)
            .filter(|tx| types.contains(&tx.tx_type))
            .cloned())
    }

    fn get_transaction_height(&self, hash: &str) -> RepositoryResult<Option<Height>> {
        let state = self.state.read();
        state.check()?;
        Ok(state.get(hash).and_then(|tx| tx.height))
    }

    fn get_last_blocking_type(&self, address: &str, address_to: &str) -> RepositoryResult<Option<TxType>> {
        let state = self.state.read();
        state.check()?;
        Ok(state
            .last_confirmed(|tx| {
                BLOCKING_TYPES.contains(&tx.tx_type)
                    && tx.address == address
                    && tx.address_to.as_deref() == Some(address_to)
            })
            .map(|tx| tx.tx_type))
    }

    fn get_last_subscribe_type(&self, address: &str, address_to: &str) -> RepositoryResult<Option<TxType>> {
        let state = self.state.read();
        state.check()?;
        Ok(state
            .last_confirmed(|tx| {
                SUBSCRIBE_TYPES.contains(&tx.tx_type)
                    && tx.address == address
                    && tx.address_to.as_deref() == Some(address_to)
            })
            .map(|tx| tx.tx_type))
    }

    fn get_user_reputation(&self, address: &str, _height: Height) -> RepositoryResult<i64> {
        let state = self.state.read();
        state.check()?;
        Ok(state.reputation.get(address).copied().unwrap_or(0))
    }

    fn get_user_balance(&self, address: &str) -> RepositoryResult<i64> {
        let state = self.state.read();
        state.check()?;
        Ok(state.balance.get(address).copied().unwrap_or(0))
    }

    fn get_user_likers_count(&self, address: &str, _height: Height) -> RepositoryResult<i64> {
        let state = self.state.read();
        state.check()?;
        Ok(state.likers.get(address).copied().unwrap_or(0))
    }

    fn count_chain_actions(
        &self,
        types: &[TxType],
        address: &str,
        window: CountWindow,
        exclude_hash: &str,
    ) -> RepositoryResult<i64> {
        let state = self.state.read();
        state.check()?;
        let count = state
            .confirmed()
            .filter(|tx| {
                types.contains(&tx.tx_type)
                    && tx.address == address
                    && tx.hash != exclude_hash
                    && !tx.is_edit()
            })
            .filter(|tx| match window {
                CountWindow::Time(since) => tx.time >= since,
                CountWindow::Height(since) => tx.height.is_some_and(|h| h >= since),
            })
            .count();
        Ok(count as i64)
    }

    fn count_mempool_actions(&self, types: &[TxType], address: &str, exclude_hash: &str) -> RepositoryResult<i64> {
        let state = self.state.read();
        state.check()?;
        let count = state
            .pending()
            .filter(|tx| {
                types.contains(&tx.tx_type)
                    && tx.address == address
                    && tx.hash != exclude_hash
                    && !tx.is_edit()
            })
            .count();
        Ok(count as i64)
    }

    fn count_chain_edits(
        &self,
        types: &[TxType],
        address: &str,
        root_hash: &str,
        exclude_hash: &str,
    ) -> RepositoryResult<i64> {
        let state = self.state.read();
        state.check()?;
        let count = state
            .confirmed()
            .filter(|tx| {
                types.contains(&tx.tx_type)
                    && tx.address == address
                    && tx.hash != exclude_hash
                    && tx.is_edit()
                    && tx.root_hash() == root_hash
            })
            .count();
        Ok(count as i64)
    }

    fn count_mempool_edits(
        &self,
        types: &[TxType],
        address: &str,
        root_hash: &str,
        exclude_hash: &str,
    ) -> RepositoryResult<i64> {
        let state = self.state.read();
        state.check()?;
        let count = state
            .pending()
            .filter(|tx| {
                types.contains(&tx.tx_type)
                    && tx.address == address
                    && tx.hash != exclude_hash
                    && tx.is_edit()
                    && tx.root_hash() == root_hash
            })
            .count();
        Ok(count as i64)
    }

    fn count_mempool_relations(
        &self,
        types: &[TxType],
        address: &str,
        address_to: &str,
        exclude_hash: &str,
    ) -> RepositoryResult<i64> {
        let state = self.state.read();
        state.check()?;
        let count = state
            .pending()
            .filter(|tx| {
                types.contains(&tx.tx_type)
                    && tx.address == address
                    && tx.hash != exclude_hash
                    && tx.address_to.as_deref() == Some(address_to)
            })
            .count();
        Ok(count as i64)
    }

    fn count_moderation_flags(
        &self,
        address: &str,
        address_to: Option<&str>,
        since_height: Height,
        include_mempool: bool,
        exclude_hash: &str,
    ) -> RepositoryResult<i64> {
        let state = self.state.read();
        state.check()?;
        let count = state
            .txs
            .iter()
            .filter(|tx| {
                tx.tx_type == TxType::ModerationFlag
                    && tx.address == address
                    && tx.hash != exclude_hash
                    && address_to.map_or(true, |to| tx.address_to.as_deref() == Some(to))
            })
            .filter(|tx| match tx.height {
                Some(h) => h >= since_height,
                None => include_mempool,
            })
            .count();
        Ok(count as i64)
    }

    fn count_scores_one_to_one(&self, query: &OneToOneScoreQuery<'_>) -> RepositoryResult<i64> {
        let state = self.state.read();
        state.check()?;
        let count = state
            .confirmed()
            .filter(|tx| {
                tx.tx_type == query.score_type
                    && tx.address == query.scorer
                    && tx.hash != query.exclude_hash
                    && tx.time >= query.since_time
                    && tx.time < query.until_time
                    && tx.height.is_some_and(|h| h <= query.max_height)
                    && tx.value.is_some_and(|v| query.values.contains(&v))
            })
            .filter(|tx| {
                tx.content_tx_hash
                    .as_deref()
                    .and_then(|hash| state.get(hash))
                    .is_some_and(|content| content.address == query.author)
            })
            .count();
        Ok(count as i64)
    }
}
