//! Social Consensus Service - validation driver
//!
//! Resolves the rule object for a transaction at a height, runs `check`
//! then `validate`, and turns the outcome into a [`Verdict`]. Repository
//! failures surface as [`ConsensusError`] and never as a rejection.

use crate::domain::{
    AccountInfo, BlockVerdict, ConsensusError, ConsensusResult, LimitTable, ReputationRules,
    RuleContext, RuleRegistries, RuleResult, SocialCheckpoints, SocialConsensusConfig, Verdict,
};
use crate::metrics;
use crate::ports::{ConsensusRepository, SocialConsensusApi};
use rayon::prelude::*;
use shared_types::{Height, SocialTransaction, TxType};
use social_telemetry::{log_block_event, log_event, log_tx_event};
use std::sync::Arc;
use std::time::Instant;

const COMPONENT: &str = "social-consensus";

/// Social Consensus Service
pub struct SocialConsensusService<R>
where
    R: ConsensusRepository,
{
    repository: Arc<R>,
    limits: LimitTable,
    registries: RuleRegistries,
    social_checkpoints: SocialCheckpoints,
    config: SocialConsensusConfig,
}

/// Dependencies for SocialConsensusService
pub struct SocialConsensusDependencies<R> {
    pub repository: Arc<R>,
    pub config: SocialConsensusConfig,
}

impl<R> SocialConsensusService<R>
where
    R: ConsensusRepository,
{
    /// Create a new SocialConsensusService
    ///
    /// Loads the grandfather allow-list when the config names one; a file
    /// that cannot be read or parsed is a startup error.
    pub fn new(deps: SocialConsensusDependencies<R>) -> ConsensusResult<Self> {
        let network = deps.config.network;
        let limits = LimitTable::new(network)?;

        let social_checkpoints = match &deps.config.social_checkpoints_path {
            Some(path) => SocialCheckpoints::load(path)?,
            None => SocialCheckpoints::new(),
        };

        log_event!(
            info,
            COMPONENT,
            "Social consensus initialized",
            network = %network,
            grandfathered = social_checkpoints.len()
        );

        Ok(Self {
            repository: deps.repository,
            limits,
            registries: RuleRegistries::new(network),
            social_checkpoints,
            config: deps.config,
        })
    }

    /// Replace the grandfather allow-list (for testing and reindex tools)
    pub fn with_social_checkpoints(mut self, social_checkpoints: SocialCheckpoints) -> Self {
        self.social_checkpoints = social_checkpoints;
        self
    }

    /// Replace the limit table
    pub fn with_limits(mut self, limits: LimitTable) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> &LimitTable {
        &self.limits
    }

    pub fn config(&self) -> &SocialConsensusConfig {
        &self.config
    }

    /// Name of the checkpoint governing `tx_type` at `height`.
    pub fn active_checkpoint(&self, tx_type: TxType, height: Height) -> &'static str {
        self.registries.active_checkpoint(tx_type, height)
    }

    fn context(&self, height: Height) -> RuleContext<'_> {
        RuleContext {
            height,
            repo: self.repository.as_ref(),
            limits: &self.limits,
            social_checkpoints: &self.social_checkpoints,
        }
    }

    fn run(
        &self,
        tx: &SocialTransaction,
        block: Option<&[SocialTransaction]>,
        height: Height,
    ) -> RuleResult {
        let rule = self.registries.rule_for(tx.tx_type, self.context(height));
        rule.check(tx)?;
        rule.validate(tx, block)
    }

    /// Record and log the outcome of one transaction.
    fn settle(&self, tx: &SocialTransaction, height: Height, result: RuleResult) -> ConsensusResult<Verdict> {
        let verdict = Verdict::from_rule(result).map_err(|err| {
            log_tx_event!(error, COMPONENT, "Repository failure during validation", tx, height = height, error = %err);
            ConsensusError::from(err)
        })?;

        let tx_type = format!("{:?}", tx.tx_type);
        match verdict {
            Verdict::Accepted => metrics::record_accepted(&tx_type),
            Verdict::Rejected(reason) => {
                metrics::record_rejected(&tx_type, &reason.label());
                log_tx_event!(
                    debug,
                    COMPONENT,
                    "Social transaction rejected",
                    tx,
                    height = height,
                    checkpoint = self.active_checkpoint(tx.tx_type, height),
                    reason = ?reason
                );
            }
        }

        Ok(verdict)
    }
}

impl<R> SocialConsensusApi for SocialConsensusService<R>
where
    R: ConsensusRepository + 'static,
{
    fn check(&self, tx: &SocialTransaction, height: Height) -> ConsensusResult<Verdict> {
        let rule = self.registries.rule_for(tx.tx_type, self.context(height));
        self.settle(tx, height, rule.check(tx))
    }

    fn validate(
        &self,
        tx: &SocialTransaction,
        block: Option<&[SocialTransaction]>,
        height: Height,
    ) -> ConsensusResult<Verdict> {
        let start = Instant::now();
        let result = self.run(tx, block, height);
        metrics::record_validation_latency(start.elapsed().as_secs_f64());
        self.settle(tx, height, result)
    }

    fn validate_block(&self, block: &[SocialTransaction], height: Height) -> ConsensusResult<BlockVerdict> {
        let start = Instant::now();
        let ctx = self.context(height);

        // Structural checks read no state, so they run in parallel.
        let checks: Vec<RuleResult> = block
            .par_iter()
            .map(|tx| self.registries.rule_for(tx.tx_type, ctx).check(tx))
            .collect();

        for (index, (tx, check)) in block.iter().zip(checks).enumerate() {
            let result = check.and_then(|_| self.registries.rule_for(tx.tx_type, ctx).validate(tx, Some(block)));

            if let Verdict::Rejected(reason) = self.settle(tx, height, result)? {
                log_block_event!(
                    debug,
                    COMPONENT,
                    "Candidate block rejected",
                    height,
                    block.len(),
                    index = index,
                    reason = ?reason
                );
                return Ok(BlockVerdict::Rejected {
                    index,
                    tx_hash: tx.hash.clone(),
                    reason,
                });
            }
        }

        metrics::record_validation_latency(start.elapsed().as_secs_f64());
        log_block_event!(debug, COMPONENT, "Candidate block accepted", height, block.len());
        Ok(BlockVerdict::Accepted)
    }

    fn account_mode(&self, address: &str, height: Height) -> ConsensusResult<AccountInfo> {
        let rules = ReputationRules::new(self.repository.as_ref(), &self.limits, height);
        Ok(rules.account_mode(address)?)
    }
}
