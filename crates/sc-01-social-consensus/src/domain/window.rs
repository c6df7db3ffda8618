//! Counting windows and candidate-block scanning
//!
//! Rate limits count prior actions in two places: confirmed chain state
//! inside a rolling window, and transactions placed earlier in the candidate
//! block. Both halves changed semantics at fixed heights, so each family
//! carries the mode it resolved for the current height.

use super::limits::{ConsensusLimit, LimitTable};
use super::reputation::AccountMode;
use crate::ports::CountWindow;
use shared_types::{Height, SocialTransaction};

/// Which earlier block transactions a rate-limit scan counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockWindow {
    /// Only those whose `time` does not exceed the evaluated transaction's.
    TimeOrdered,
    /// Every earlier transaction.
    All,
}

impl BlockWindow {
    pub fn counts(self, earlier: &SocialTransaction, tx: &SocialTransaction) -> bool {
        match self {
            BlockWindow::TimeOrdered => earlier.time <= tx.time,
            BlockWindow::All => true,
        }
    }
}

/// Unit of a chain counting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    /// `depth` is seconds back from the transaction time.
    Time,
    /// `depth` is blocks back from the validation height.
    Height,
}

impl WindowMode {
    /// Lower bound of the window ending at `tx` / `height`.
    ///
    /// Times come straight from the wire, so the bound saturates at `i64::MIN`.
    pub fn since(self, tx: &SocialTransaction, height: Height, depth: i64) -> CountWindow {
        match self {
            WindowMode::Time => CountWindow::Time(tx.time.saturating_sub(depth)),
            WindowMode::Height => CountWindow::Height(height.saturating_sub(depth)),
        }
    }

    /// Whether an edit made now is still inside the window opened by `original`.
    ///
    /// Height windows are inclusive at `original + depth`.
    pub fn within(
        self,
        original: &SocialTransaction,
        original_height: Height,
        tx: &SocialTransaction,
        height: Height,
        depth: i64,
    ) -> bool {
        match self {
            WindowMode::Time => tx.time.saturating_sub(original.time) <= depth,
            WindowMode::Height => height.saturating_sub(original_height) <= depth,
        }
    }
}

/// Transactions placed before `tx` in `block`.
///
/// When `tx` is not part of `block` the whole block counts as earlier.
pub fn block_prefix<'b>(block: &'b [SocialTransaction], tx: &SocialTransaction) -> &'b [SocialTransaction] {
    match block.iter().position(|b| b.hash == tx.hash) {
        Some(idx) => &block[..idx],
        None => block,
    }
}

/// Per-mode cap for one action kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeLimits {
    pub trial: ConsensusLimit,
    pub full: ConsensusLimit,
    /// Falls back to `full` when the family has no Pro tier.
    pub pro: Option<ConsensusLimit>,
}

impl ModeLimits {
    pub const fn new(trial: ConsensusLimit, full: ConsensusLimit) -> Self {
        Self {
            trial,
            full,
            pro: None,
        }
    }

    pub const fn with_pro(mut self, pro: ConsensusLimit) -> Self {
        self.pro = Some(pro);
        self
    }

    pub fn resolve(&self, mode: AccountMode) -> ConsensusLimit {
        match mode {
            AccountMode::Trial => self.trial,
            AccountMode::Full => self.full,
            AccountMode::Pro => self.pro.unwrap_or(self.full),
        }
    }

    pub fn value(&self, limits: &LimitTable, mode: AccountMode, height: Height) -> i64 {
        limits.get(self.resolve(mode), height)
    }
}
