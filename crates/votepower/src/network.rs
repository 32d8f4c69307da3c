//! Static network table: id -> (schedule, network type, chain config)

use votepower_sharding::{ChainConfig, EpochSchedule, NetworkId, NetworkType};

use crate::{Error, Result};

/// Everything a node needs to know about its network to weigh votes
#[derive(Debug, Clone)]
pub struct NetworkProfile {
    pub schedule: EpochSchedule,
    pub network_type: NetworkType,
    pub chain_config: ChainConfig,
}

/// Look up a network; only mainnet and testnet are in the table
pub fn resolve(id: NetworkId) -> Result<NetworkProfile> {
    match id {
        NetworkId::MainNet => Ok(NetworkProfile {
            schedule: EpochSchedule::mainnet()?,
            network_type: NetworkType::Mainnet,
            chain_config: ChainConfig::mainnet(),
        }),
        NetworkId::TestNet => Ok(NetworkProfile {
            schedule: EpochSchedule::testnet()?,
            network_type: NetworkType::Testnet,
            chain_config: ChainConfig::test(),
        }),
        other => Err(Error::InvalidNetworkId(other.to_string())),
    }
}

/// [`resolve`] from an operator-supplied name
pub fn resolve_str(id: &str) -> Result<NetworkProfile> {
    let id: NetworkId = id
        .parse()
        .map_err(|_| Error::InvalidNetworkId(id.to_string()))?;
    resolve(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_networks() {
        let mainnet = resolve(NetworkId::MainNet).unwrap();
        assert_eq!(mainnet.network_type, NetworkType::Mainnet);
        assert_eq!(mainnet.chain_config, ChainConfig::mainnet());

        let testnet = resolve_str("testnet").unwrap();
        assert_eq!(testnet.network_type, NetworkType::Testnet);
        assert_eq!(testnet.chain_config, ChainConfig::test());
    }

    #[test]
    fn test_resolve_rejects_ids_outside_table() {
        let outside = [
            NetworkId::LocalNet,
            NetworkId::Pangaea,
            NetworkId::Partner,
            NetworkId::StressNet,
            NetworkId::DevNet,
        ];
        for id in outside {
            assert!(matches!(resolve(id), Err(Error::InvalidNetworkId(s)) if s == id.to_string()));
        }
        assert!(matches!(
            resolve_str("nonet"),
            Err(Error::InvalidNetworkId(s)) if s == "nonet"
        ));
    }
}
