//! Stake-weighted voting power for sharded BFT committees
//!
//! Each epoch a shard committee gets a [`Roster`]: harmony-operated slots
//! split the harmony vote percent evenly, externally staked slots split the
//! external percent in proportion to effective stake, and the whole roster
//! sums to exactly one. Consensus asks a [`quorum::Verifier`] whether a set
//! of signers clears a phase threshold.
//!
//! ```
//! use votepower::{compute_roster, NetworkType};
//! use votepower_sharding::{Address, Committee, EpochSchedule, SerializedPublicKey, ShardId, Slot};
//! use votepower_numeric::Dec;
//!
//! let schedule = EpochSchedule::localnet().unwrap();
//! let committee = Committee::new(
//!     ShardId(0),
//!     vec![
//!         Slot::harmony(Address([1; 20]), SerializedPublicKey([1; 48])),
//!         Slot::staked(Address([2; 20]), SerializedPublicKey([2; 48]), Dec::new(1_000)),
//!     ],
//! );
//! let roster = compute_roster(NetworkType::Localnet, &schedule, &committee, 5).unwrap();
//! assert_eq!(roster.total_voting_power(), Dec::one());
//! ```

mod audit;
mod diagnostics;
mod error;
pub mod network;
pub mod policy;
pub mod quorum;
mod roster;

pub use audit::check_protocol_accounts_present;
pub use diagnostics::{DiagnosticSink, TracingSink};
pub use error::{Error, Result};
pub use network::{resolve, resolve_str, NetworkProfile};
pub use policy::{resolve_vote_percents, vote_percent_override, VotePercents};
pub use quorum::{new_verifier, verifier_for_network, QuorumVerifier, Verifier, VotingPolicy};
pub use roster::{compute_roster, compute_roster_with_diagnostics, Roster, VoteEntry};

pub use votepower_numeric::Dec;
pub use votepower_sharding::{
    Committee, Epoch, NetworkId, NetworkType, SerializedPublicKey, ShardId, Slot,
};
