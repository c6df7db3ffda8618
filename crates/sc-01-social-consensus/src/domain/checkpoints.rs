//! # Rule Checkpoints
//!
//! Social rules change over the chain's history without invalidating blocks
//! validated under older rules. Each rule family has a genesis behaviour
//! record plus an ordered list of checkpoints; a checkpoint is a field-level
//! override applied from its activation height onward.
//!
//! ## Resolution
//!
//! 1. At construction, keep only checkpoints active on the configured network
//! 2. Fold them, in activation order, over the genesis record into one
//!    cumulative record per activation height
//! 3. `resolve(height)` binary-searches the last segment starting `<= height`
//!
//! The genesis segment always starts at height 0, so every height resolves.

use super::config::Network;
use shared_types::Height;

/// Per-network activation height. `None` means the checkpoint never
/// activates on that network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivationHeight {
    pub main: Option<Height>,
    pub test: Option<Height>,
    pub regtest: Option<Height>,
}

impl ActivationHeight {
    /// Active from the first block everywhere.
    pub const GENESIS: Self = Self::everywhere(0);

    pub const fn new(main: Option<Height>, test: Option<Height>, regtest: Option<Height>) -> Self {
        Self {
            main,
            test,
            regtest,
        }
    }

    /// Same height on every network.
    pub const fn everywhere(height: Height) -> Self {
        Self::new(Some(height), Some(height), Some(height))
    }

    /// Mainnet height, active from genesis on test networks.
    pub const fn mainnet(height: Height) -> Self {
        Self::new(Some(height), Some(0), Some(0))
    }

    pub fn for_network(&self, network: Network) -> Option<Height> {
        match network {
            Network::Main => self.main,
            Network::Test => self.test,
            Network::Regtest => self.regtest,
        }
    }
}

/// A named override of a behaviour record.
#[derive(Clone, Debug)]
pub struct Checkpoint<R> {
    pub name: &'static str,
    pub activation: ActivationHeight,
    pub apply: fn(&mut R),
}

impl<R> Checkpoint<R> {
    pub const fn new(name: &'static str, activation: ActivationHeight, apply: fn(&mut R)) -> Self {
        Self {
            name,
            activation,
            apply,
        }
    }
}

/// A resolved behaviour record and where it starts.
#[derive(Clone, Debug)]
struct Segment<R> {
    start: Height,
    name: &'static str,
    rules: R,
}

/// Height-indexed behaviour records for one rule family.
#[derive(Clone, Debug)]
pub struct CheckpointRegistry<R> {
    segments: Vec<Segment<R>>,
}

impl<R: Clone> CheckpointRegistry<R> {
    pub fn new(network: Network, genesis: R, checkpoints: &[Checkpoint<R>]) -> Self {
        let mut active: Vec<(Height, &Checkpoint<R>)> = checkpoints
            .iter()
            .filter_map(|cp| cp.activation.for_network(network).map(|h| (h.max(0), cp)))
            .collect();
        // Stable: checkpoints sharing a height apply in declaration order.
        active.sort_by_key(|(height, _)| *height);

        let mut current = genesis.clone();
        let mut segments = vec![Segment {
            start: 0,
            name: "genesis",
            rules: genesis,
        }];

        for (height, checkpoint) in active {
            (checkpoint.apply)(&mut current);

            let segment = Segment {
                start: height,
                name: checkpoint.name,
                rules: current.clone(),
            };

            match segments.last_mut() {
                Some(last) if last.start == height => *last = segment,
                _ => segments.push(segment),
            }
        }

        Self { segments }
    }

    /// Behaviour record in force at `height`.
    pub fn resolve(&self, height: Height) -> &R {
        &self.segment(height).rules
    }

    /// Name of the checkpoint in force at `height`.
    pub fn active_checkpoint(&self, height: Height) -> &'static str {
        self.segment(height).name
    }

    /// Heights at which the behaviour changes, genesis included.
    pub fn boundaries(&self) -> Vec<Height> {
        self.segments.iter().map(|s| s.start).collect()
    }

    fn segment(&self, height: Height) -> &Segment<R> {
        let idx = self.segments.partition_point(|s| s.start <= height.max(0));
        &self.segments[idx.saturating_sub(1)]
    }
}
