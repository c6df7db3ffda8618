//! Driving ports (Inbound API)

use crate::domain::{AccountInfo, BlockVerdict, ConsensusResult, Verdict};
use shared_types::{Height, SocialTransaction};

/// Primary social consensus API
///
/// Callers are the mempool acceptance path and the block assembler /
/// connector. A rejection is an `Ok` verdict; `Err` means the repository
/// could not answer and the whole operation must be aborted.
pub trait SocialConsensusApi: Send + Sync {
    /// Structural checks only, as they apply at `height`.
    fn check(&self, tx: &SocialTransaction, height: Height) -> ConsensusResult<Verdict>;

    /// Check then validate one transaction.
    ///
    /// With `block`, the transaction is judged as a member of that candidate
    /// block; without, against the current mempool.
    fn validate(
        &self,
        tx: &SocialTransaction,
        block: Option<&[SocialTransaction]>,
        height: Height,
    ) -> ConsensusResult<Verdict>;

    /// Validate every transaction of a candidate block, stopping at the first
    /// rejection.
    fn validate_block(&self, block: &[SocialTransaction], height: Height)
        -> ConsensusResult<BlockVerdict>;

    /// Account mode of `address` as of `height`.
    fn account_mode(&self, address: &str, height: Height) -> ConsensusResult<AccountInfo>;
}
