//! error types for roster construction, lookup and audit

use thiserror::Error;
use votepower_numeric::Dec;
use votepower_sharding::{ConfigError, Epoch, KeyError, SerializedPublicKey, ShardId};

#[derive(Debug, Error)]
pub enum Error {
    #[error("nil epoch for roster compute (shard {shard_id})")]
    MissingEpoch { shard_id: ShardId },

    #[error("invalid network id: {0}")]
    InvalidNetworkId(String),

    #[error("voting power does not sum to one: shard {shard_id} epoch {epoch} total {total}")]
    VotingPowerInvariantViolated {
        shard_id: ShardId,
        epoch: Epoch,
        total: Dec,
    },

    #[error("external slots with zero total effective stake (shard {shard_id})")]
    ZeroEffectiveStake { shard_id: ShardId },

    #[error("negative effective stake for slot {key} (shard {shard_id})")]
    NegativeEffectiveStake {
        shard_id: ShardId,
        key: SerializedPublicKey,
    },

    #[error("unexpected harmony node not found in slots: shard {shard_id}, pubkey {key}")]
    MissingProtocolAccountInSlots {
        shard_id: ShardId,
        key: SerializedPublicKey,
    },

    #[error("harmony account {index} out of range for shard {shard_id} ({available} known)")]
    ProtocolAccountIndexOutOfRange {
        shard_id: ShardId,
        index: usize,
        available: usize,
    },

    #[error("invalid key material for harmony account {index}: {source}")]
    InvalidKeyMaterial {
        index: usize,
        #[source]
        source: KeyError,
    },

    #[error("network configuration: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
