//! Sharding model consumed by the voting-power core
//!
//! Committees are ordered slot lists; schedules map epochs to the sharding
//! policy (vote percentages, shard counts, genesis accounts) in force.
//!
//! ## Layout
//!
//! - [`SerializedPublicKey`], [`Address`]: identities and earning accounts
//! - [`Slot`], [`Committee`]: per-shard membership, order preserved
//! - [`Instance`], [`Schedule`]: policy lookup, implemented by
//!   [`ShardingInstance`] and [`EpochSchedule`]
//! - [`NetworkId`], [`NetworkType`], [`ChainConfig`]: network tables

mod committee;
mod error;
mod genesis;
mod instance;
mod key;
mod network;
mod schedule;

pub use committee::{Committee, Epoch, ShardId, Slot};
pub use error::{ConfigError, KeyError};
pub use genesis::derive_genesis_accounts;
pub use instance::{GenesisAccount, Instance, ShardingInstance};
pub use key::{Address, SerializedPublicKey, ADDRESS_SIZE, PUBLIC_KEY_SIZE};
pub use network::{ChainConfig, NetworkId, NetworkType};
pub use schedule::{EpochSchedule, Schedule, ScheduleEntry};

pub use votepower_numeric::Dec;
