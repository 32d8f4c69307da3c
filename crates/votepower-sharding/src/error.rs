//! error types for sharding configuration

use thiserror::Error;
use votepower_numeric::{Dec, DecError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid key length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("harmony-operated nodes per shard ({harmony}) exceed nodes per shard ({total})")]
    TooManyHarmonyNodes { harmony: usize, total: usize },

    #[error("harmony vote percent {0} outside [0, 1]")]
    HarmonyPercentOutOfRange(Dec),

    #[error("vote percents do not add up to 1: harmony {harmony} + external {external}")]
    VotePercentSum { harmony: Dec, external: Dec },

    #[error("not enough genesis accounts: need {need}, got {got}")]
    NotEnoughAccounts { need: usize, got: usize },

    #[error("shard count must be non-zero")]
    NoShards,

    #[error("schedule is empty")]
    EmptySchedule,

    #[error("schedule must start at epoch 0, first entry starts at {0}")]
    ScheduleStartsLate(u64),

    #[error("schedule epochs not strictly increasing at epoch {0}")]
    UnorderedSchedule(u64),

    #[error("unknown network id: {0}")]
    UnknownNetworkId(String),

    #[error("invalid decimal: {0}")]
    Decimal(#[from] DecError),

    #[error("malformed schedule json: {0}")]
    Json(#[from] serde_json::Error),
}
