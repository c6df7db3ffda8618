//! Engine configuration
//!
//! Consensus limits and checkpoints are compiled-in tables; the only runtime
//! inputs are the network (which selects activation heights and per-network
//! limit values) and an optional grandfather allow-list file.

use super::error::{ConsensusError, ConsensusResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Chain the node is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Main,
    Test,
    Regtest,
}

impl Network {
    pub fn as_str(self) -> &'static str {
        match self {
            Network::Main => "main",
            Network::Test => "test",
            Network::Regtest => "regtest",
        }
    }
}

impl FromStr for Network {
    type Err = ConsensusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "main" | "mainnet" => Ok(Network::Main),
            "test" | "testnet" => Ok(Network::Test),
            "regtest" => Ok(Network::Regtest),
            other => Err(ConsensusError::UnknownNetwork(other.to_string())),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Social consensus configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialConsensusConfig {
    /// Selects checkpoint activation heights and limit values
    pub network: Network,
    /// JSON file of grandfathered `(hash, tx_type, reason)` records
    pub social_checkpoints_path: Option<PathBuf>,
}

impl SocialConsensusConfig {
    pub fn for_network(network: Network) -> Self {
        Self {
            network,
            social_checkpoints_path: None,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SC_NETWORK`: `main`, `test` or `regtest` (default: main)
    /// - `SC_SOCIAL_CHECKPOINTS`: path to the grandfather allow-list (default: none)
    ///
    /// # Errors
    ///
    /// An unrecognised `SC_NETWORK` is a startup error rather than a silent
    /// fallback to mainnet.
    pub fn from_env() -> ConsensusResult<Self> {
        let network = match env::var("SC_NETWORK") {
            Ok(value) => value.parse()?,
            Err(_) => Network::Main,
        };

        let social_checkpoints_path = env::var("SC_SOCIAL_CHECKPOINTS")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            network,
            social_checkpoints_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_parse() {
        assert_eq!("main".parse::<Network>().unwrap(), Network::Main);
        assert_eq!("TestNet".parse::<Network>().unwrap(), Network::Test);
        assert_eq!(" regtest ".parse::<Network>().unwrap(), Network::Regtest);
        assert!(matches!(
            "devnet".parse::<Network>(),
            Err(ConsensusError::UnknownNetwork(_))
        ));
    }

    #[test]
    fn test_default_config_is_mainnet() {
        let config = SocialConsensusConfig::default();
        assert_eq!(config.network, Network::Main);
        assert!(config.social_checkpoints_path.is_none());
    }
}
