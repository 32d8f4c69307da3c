//! Network identifiers, network types and chain configuration

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Epoch};

/// Network identifier as configured by an operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    MainNet,
    TestNet,
    LocalNet,
    Pangaea,
    Partner,
    StressNet,
    DevNet,
}

impl NetworkId {
    pub const ALL: [NetworkId; 7] = [
        NetworkId::MainNet,
        NetworkId::TestNet,
        NetworkId::LocalNet,
        NetworkId::Pangaea,
        NetworkId::Partner,
        NetworkId::StressNet,
        NetworkId::DevNet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkId::MainNet => "mainnet",
            NetworkId::TestNet => "testnet",
            NetworkId::LocalNet => "localnet",
            NetworkId::Pangaea => "pangaea",
            NetworkId::Partner => "partner",
            NetworkId::StressNet => "stressnet",
            NetworkId::DevNet => "devnet",
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        NetworkId::ALL
            .into_iter()
            .find(|id| id.as_str() == lower)
            .ok_or_else(|| ConfigError::UnknownNetworkId(s.to_string()))
    }
}

/// Network type a node runs as; keys policy exceptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Mainnet,
    Testnet,
    Pangaea,
    Partner,
    Stressnet,
    Devnet,
    Localnet,
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NetworkType::Mainnet => "mainnet",
            NetworkType::Testnet => "testnet",
            NetworkType::Pangaea => "pangaea",
            NetworkType::Partner => "partner",
            NetworkType::Stressnet => "stressnet",
            NetworkType::Devnet => "devnet",
            NetworkType::Localnet => "localnet",
        };
        f.write_str(name)
    }
}

/// Fork epochs and chain ids relevant to voting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub eth_compatible_chain_id: u64,
    pub pre_staking_epoch: Epoch,
    pub staking_epoch: Epoch,
    pub cross_link_epoch: Epoch,
}

impl ChainConfig {
    pub fn mainnet() -> Self {
        Self {
            chain_id: 1,
            eth_compatible_chain_id: 1_666_600_000,
            pre_staking_epoch: 185,
            staking_epoch: 186,
            cross_link_epoch: 186,
        }
    }

    /// Config for the test network, staking from genesis
    pub fn test() -> Self {
        Self {
            chain_id: 2,
            eth_compatible_chain_id: 1_666_700_000,
            pre_staking_epoch: 0,
            staking_epoch: 0,
            cross_link_epoch: 0,
        }
    }

    pub fn is_pre_staking(&self, epoch: Epoch) -> bool {
        epoch >= self.pre_staking_epoch
    }

    /// Committees from this epoch on vote by stake
    pub fn is_staking(&self, epoch: Epoch) -> bool {
        epoch >= self.staking_epoch
    }

    pub fn is_cross_link(&self, epoch: Epoch) -> bool {
        epoch >= self.cross_link_epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_id_parse() {
        assert_eq!("mainnet".parse::<NetworkId>().unwrap(), NetworkId::MainNet);
        assert_eq!("TestNet".parse::<NetworkId>().unwrap(), NetworkId::TestNet);
        for id in NetworkId::ALL {
            assert_eq!(id.to_string().parse::<NetworkId>().unwrap(), id);
        }
        assert!(matches!(
            "moonnet".parse::<NetworkId>(),
            Err(ConfigError::UnknownNetworkId(s)) if s == "moonnet"
        ));
    }

    #[test]
    fn test_chain_config_epochs() {
        let config = ChainConfig::mainnet();
        assert!(!config.is_staking(185));
        assert!(config.is_pre_staking(185));
        assert!(config.is_staking(186));
        assert!(ChainConfig::test().is_staking(0));
    }
}
