//! Shard committees and their slots

use core::fmt;

use serde::{Deserialize, Serialize};
use votepower_numeric::Dec;

use crate::{Address, SerializedPublicKey};

/// Epoch number
pub type Epoch = u64;

/// Shard identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShardId(pub u32);

impl fmt::Display for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ShardId {
    fn from(id: u32) -> Self {
        ShardId(id)
    }
}

/// One committee seat
///
/// A slot without effective stake is harmony-operated; a slot with one is
/// externally staked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub earning_account: Address,
    pub bls_public_key: SerializedPublicKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_stake: Option<Dec>,
}

impl Slot {
    /// Harmony-operated slot
    pub fn harmony(earning_account: Address, bls_public_key: SerializedPublicKey) -> Self {
        Self {
            earning_account,
            bls_public_key,
            effective_stake: None,
        }
    }

    /// Externally staked slot
    pub fn staked(
        earning_account: Address,
        bls_public_key: SerializedPublicKey,
        effective_stake: Dec,
    ) -> Self {
        Self {
            earning_account,
            bls_public_key,
            effective_stake: Some(effective_stake),
        }
    }

    pub fn is_harmony_slot(&self) -> bool {
        self.effective_stake.is_none()
    }
}

/// Shard committee: slot order defines the signer bitmap index of each key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Committee {
    pub shard_id: ShardId,
    pub slots: Vec<Slot>,
}

impl Committee {
    pub fn new(shard_id: ShardId, slots: Vec<Slot>) -> Self {
        Self { shard_id, slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Keys in slot order, duplicates included
    pub fn bls_public_keys(&self) -> Vec<SerializedPublicKey> {
        self.slots.iter().map(|s| s.bls_public_key).collect()
    }
}
