//! Built-in schedules for the known networks
//!
//! Genesis accounts of the built-in tables are derived from a network label
//! and an index, so every node reproduces the same key list without shipping
//! it as data.

use sha2::{Digest, Sha256, Sha512};

use crate::{
    ConfigError, EpochSchedule, GenesisAccount, ScheduleEntry, ShardingInstance, ADDRESS_SIZE,
    PUBLIC_KEY_SIZE,
};

/// Domain separator for derived genesis keys
const DOMAIN_GENESIS_KEY: &[u8] = b"votepower_genesis_key_v1";

/// Domain separator for derived genesis addresses
const DOMAIN_GENESIS_ADDRESS: &[u8] = b"votepower_genesis_address_v1";

/// Derive `count` genesis accounts for a network label
pub fn derive_genesis_accounts(label: &str, count: usize) -> Vec<GenesisAccount> {
    (0..count)
        .map(|index| {
            let key = tagged_hash::<Sha512>(DOMAIN_GENESIS_KEY, label, index);
            let addr = tagged_hash::<Sha256>(DOMAIN_GENESIS_ADDRESS, label, index);
            GenesisAccount {
                address: format!("0x{}", hex::encode(&addr[..ADDRESS_SIZE])),
                bls_public_key: hex::encode(&key[..PUBLIC_KEY_SIZE]),
            }
        })
        .collect()
}

fn tagged_hash<D: Digest>(domain: &[u8], label: &str, index: usize) -> Vec<u8> {
    let mut hasher = D::new();
    hasher.update(domain);
    hasher.update(label.as_bytes());
    hasher.update((index as u64).to_le_bytes());
    hasher.finalize().to_vec()
}

struct Row {
    start_epoch: u64,
    num_shards: u32,
    nodes_per_shard: usize,
    harmony_per_shard: usize,
    harmony_percent: &'static str,
}

impl Row {
    const fn new(
        start_epoch: u64,
        num_shards: u32,
        nodes_per_shard: usize,
        harmony_per_shard: usize,
        harmony_percent: &'static str,
    ) -> Self {
        Self {
            start_epoch,
            num_shards,
            nodes_per_shard,
            harmony_per_shard,
            harmony_percent,
        }
    }
}

fn build(label: &str, rows: &[Row]) -> Result<EpochSchedule, ConfigError> {
    let max_accounts = rows
        .iter()
        .map(|r| r.num_shards as usize * r.harmony_per_shard)
        .max()
        .unwrap_or(0);
    let accounts = derive_genesis_accounts(label, max_accounts);

    let entries = rows
        .iter()
        .map(|r| {
            Ok(ScheduleEntry {
                start_epoch: r.start_epoch,
                instance: ShardingInstance::new(
                    r.num_shards,
                    r.nodes_per_shard,
                    r.harmony_per_shard,
                    r.harmony_percent.parse()?,
                    accounts.clone(),
                )?,
            })
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;

    EpochSchedule::new(entries)
}

impl EpochSchedule {
    pub fn mainnet() -> Result<Self, ConfigError> {
        build(
            "mainnet",
            &[
                // pre-staking: every slot is harmony-operated
                Row::new(0, 4, 150, 112, "1"),
                Row::new(186, 4, 250, 170, "0.68"),
                Row::new(366, 4, 250, 90, "0.49"),
            ],
        )
    }

    pub fn testnet() -> Result<Self, ConfigError> {
        build(
            "testnet",
            &[
                Row::new(0, 4, 30, 8, "0.68"),
                Row::new(60_000, 2, 30, 8, "0.49"),
            ],
        )
    }

    pub fn localnet() -> Result<Self, ConfigError> {
        build("localnet", &[Row::new(0, 2, 10, 6, "0.68")])
    }
}
