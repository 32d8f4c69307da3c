//! Per-epoch sharding policy

use serde::{Deserialize, Serialize};
use votepower_numeric::Dec;

use crate::ConfigError;

/// Genesis account of a harmony-operated node
///
/// Key material stays as declared text until something needs the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisAccount {
    pub address: String,
    pub bls_public_key: String,
}

/// Sharding policy in force for a range of epochs
pub trait Instance {
    /// Aggregate voting power of harmony-operated slots
    fn harmony_vote_percent(&self) -> Dec;

    /// Aggregate voting power of externally staked slots
    fn external_vote_percent(&self) -> Dec;

    fn num_shards(&self) -> u32;

    fn num_nodes_per_shard(&self) -> usize;

    fn num_harmony_operated_nodes_per_shard(&self) -> usize;

    /// Harmony-operated genesis accounts, interleaved by shard
    fn hmy_accounts(&self) -> &[GenesisAccount];
}

/// Validated [`Instance`] loaded from configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShardingInstance {
    num_shards: u32,
    num_nodes_per_shard: usize,
    num_harmony_operated_nodes_per_shard: usize,
    harmony_vote_percent: Dec,
    external_vote_percent: Dec,
    hmy_accounts: Vec<GenesisAccount>,
}

impl ShardingInstance {
    pub fn new(
        num_shards: u32,
        num_nodes_per_shard: usize,
        num_harmony_operated_nodes_per_shard: usize,
        harmony_vote_percent: Dec,
        hmy_accounts: Vec<GenesisAccount>,
    ) -> Result<Self, ConfigError> {
        let external_vote_percent = Dec::one() - &harmony_vote_percent;
        RawInstance {
            num_shards,
            num_nodes_per_shard,
            num_harmony_operated_nodes_per_shard,
            harmony_vote_percent,
            external_vote_percent,
            hmy_accounts,
        }
        .validate()
    }
}

impl Instance for ShardingInstance {
    fn harmony_vote_percent(&self) -> Dec {
        self.harmony_vote_percent.clone()
    }

    fn external_vote_percent(&self) -> Dec {
        self.external_vote_percent.clone()
    }

    fn num_shards(&self) -> u32 {
        self.num_shards
    }

    fn num_nodes_per_shard(&self) -> usize {
        self.num_nodes_per_shard
    }

    fn num_harmony_operated_nodes_per_shard(&self) -> usize {
        self.num_harmony_operated_nodes_per_shard
    }

    fn hmy_accounts(&self) -> &[GenesisAccount] {
        &self.hmy_accounts
    }
}

/// Unchecked wire form, only reachable through validation
#[derive(Deserialize)]
struct RawInstance {
    num_shards: u32,
    num_nodes_per_shard: usize,
    num_harmony_operated_nodes_per_shard: usize,
    harmony_vote_percent: Dec,
    external_vote_percent: Dec,
    #[serde(default)]
    hmy_accounts: Vec<GenesisAccount>,
}

impl RawInstance {
    fn validate(self) -> Result<ShardingInstance, ConfigError> {
        if self.num_shards == 0 {
            return Err(ConfigError::NoShards);
        }
        if self.num_harmony_operated_nodes_per_shard > self.num_nodes_per_shard {
            return Err(ConfigError::TooManyHarmonyNodes {
                harmony: self.num_harmony_operated_nodes_per_shard,
                total: self.num_nodes_per_shard,
            });
        }
        if self.harmony_vote_percent.is_negative() || self.harmony_vote_percent > Dec::one() {
            return Err(ConfigError::HarmonyPercentOutOfRange(self.harmony_vote_percent));
        }
        if &self.harmony_vote_percent + &self.external_vote_percent != Dec::one() {
            return Err(ConfigError::VotePercentSum {
                harmony: self.harmony_vote_percent,
                external: self.external_vote_percent,
            });
        }

        let need = self.num_shards as usize * self.num_harmony_operated_nodes_per_shard;
        if self.hmy_accounts.len() < need {
            return Err(ConfigError::NotEnoughAccounts {
                need,
                got: self.hmy_accounts.len(),
            });
        }

        Ok(ShardingInstance {
            num_shards: self.num_shards,
            num_nodes_per_shard: self.num_nodes_per_shard,
            num_harmony_operated_nodes_per_shard: self.num_harmony_operated_nodes_per_shard,
            harmony_vote_percent: self.harmony_vote_percent,
            external_vote_percent: self.external_vote_percent,
            hmy_accounts: self.hmy_accounts,
        })
    }
}

impl<'de> Deserialize<'de> for ShardingInstance {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawInstance::deserialize(deserializer)?
            .validate()
            .map_err(serde::de::Error::custom)
    }
}
