//! Quorum decisions for consensus phases
//!
//! Consensus asks one question per phase: do the observed signers hold
//! enough voting power? [`Verifier`] answers it for both voting regimes:
//!
//! - [`UniformVerifier`]: legacy epochs, one slot one vote
//! - [`StakeVerifier`]: staking epochs, weights from a [`Roster`]
//!
//! [`new_verifier`] picks the regime. A verifier is built at each epoch or
//! committee change and dropped with it.
//!
//! [`Roster`]: crate::Roster

mod stake;
mod threshold;
mod uniform;

pub use stake::StakeVerifier;
pub use threshold::{Phase, Threshold, ThresholdKind};
pub use uniform::UniformVerifier;

use std::collections::BTreeSet;

use tracing::debug;
use votepower_numeric::Dec;
use votepower_sharding::{Committee, Epoch, NetworkId, NetworkType, Schedule, SerializedPublicKey};

use crate::network::resolve;
use crate::Result;

/// Weighting regime of a verifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VotingPolicy {
    Uniform,
    Stake,
}

/// Decision contract shared by both voting regimes
pub trait Verifier {
    fn policy(&self) -> VotingPolicy;

    /// Voting power of the whole committee
    fn total_power(&self) -> Dec;

    /// Power held by `signers`; non-members contribute nothing
    fn signers_power(&self, signers: &BTreeSet<SerializedPublicKey>) -> Dec;

    fn is_quorum_achieved(
        &self,
        signers: &BTreeSet<SerializedPublicKey>,
        kind: ThresholdKind,
    ) -> bool;

    fn is_member(&self, key: &SerializedPublicKey) -> bool;

    /// Slot index of `key`, the position its bit takes in a signer bitmap
    fn index_of(&self, key: &SerializedPublicKey) -> Option<usize>;

    fn ordered_identities(&self) -> &[SerializedPublicKey];

    /// Signers outside the committee, for the caller to flag
    fn unknown_signers(&self, signers: &BTreeSet<SerializedPublicKey>) -> Vec<SerializedPublicKey> {
        signers.iter().filter(|k| !self.is_member(k)).copied().collect()
    }

    fn is_phase_quorum_achieved(
        &self,
        signers: &BTreeSet<SerializedPublicKey>,
        phase: Phase,
    ) -> bool {
        self.is_quorum_achieved(signers, phase.threshold_kind())
    }
}

/// Verifier chosen by [`new_verifier`]
#[derive(Debug, Clone)]
pub enum QuorumVerifier {
    Uniform(UniformVerifier),
    Stake(StakeVerifier),
}

macro_rules! dispatch {
    ($self:ident, $v:ident => $body:expr) => {
        match $self {
            QuorumVerifier::Uniform($v) => $body,
            QuorumVerifier::Stake($v) => $body,
        }
    };
}

impl Verifier for QuorumVerifier {
    fn policy(&self) -> VotingPolicy {
        dispatch!(self, v => v.policy())
    }

    fn total_power(&self) -> Dec {
        dispatch!(self, v => v.total_power())
    }

    fn signers_power(&self, signers: &BTreeSet<SerializedPublicKey>) -> Dec {
        dispatch!(self, v => v.signers_power(signers))
    }

    fn is_quorum_achieved(
        &self,
        signers: &BTreeSet<SerializedPublicKey>,
        kind: ThresholdKind,
    ) -> bool {
        dispatch!(self, v => v.is_quorum_achieved(signers, kind))
    }

    fn is_member(&self, key: &SerializedPublicKey) -> bool {
        dispatch!(self, v => v.is_member(key))
    }

    fn index_of(&self, key: &SerializedPublicKey) -> Option<usize> {
        dispatch!(self, v => v.index_of(key))
    }

    fn ordered_identities(&self) -> &[SerializedPublicKey] {
        dispatch!(self, v => v.ordered_identities())
    }
}

/// Verifier for `committee` at `epoch`
///
/// Staking epochs get a roster-backed verifier and inherit every roster
/// build error; otherwise the committee votes uniformly and this cannot fail.
pub fn new_verifier(
    network_type: NetworkType,
    schedule: &dyn Schedule,
    committee: &Committee,
    epoch: impl Into<Option<Epoch>>,
    is_staking: bool,
) -> Result<QuorumVerifier> {
    if is_staking {
        StakeVerifier::compute(network_type, schedule, committee, epoch).map(QuorumVerifier::Stake)
    } else {
        Ok(QuorumVerifier::Uniform(UniformVerifier::new(committee)))
    }
}

/// Resolve `network_id` and build the verifier its chain config calls for
pub fn verifier_for_network(
    network_id: NetworkId,
    committee: &Committee,
    epoch: Epoch,
) -> Result<QuorumVerifier> {
    let profile = resolve(network_id)?;
    let is_staking = profile.chain_config.is_staking(epoch);
    debug!(
        network = %network_id,
        shard = %committee.shard_id,
        epoch,
        is_staking,
        "building quorum verifier"
    );
    new_verifier(profile.network_type, &profile.schedule, committee, epoch, is_staking)
}
