//! Stake-weighted verifier backed by a roster

use std::collections::BTreeSet;

use votepower_numeric::Dec;
use votepower_sharding::{Committee, Epoch, NetworkType, Schedule, SerializedPublicKey};

use super::{ThresholdKind, Verifier, VotingPolicy};
use crate::roster::{compute_roster, Roster};
use crate::Result;

/// Weights each signer by its roster `overall_percent`
#[derive(Debug, Clone)]
pub struct StakeVerifier {
    roster: Roster,
}

impl StakeVerifier {
    pub fn new(roster: Roster) -> Self {
        Self { roster }
    }

    /// Build the roster for `committee` at `epoch` and wrap it
    pub fn compute(
        network_type: NetworkType,
        schedule: &dyn Schedule,
        committee: &Committee,
        epoch: impl Into<Option<Epoch>>,
    ) -> Result<Self> {
        compute_roster(network_type, schedule, committee, epoch).map(Self::new)
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }
}

impl Verifier for StakeVerifier {
    fn policy(&self) -> VotingPolicy {
        VotingPolicy::Stake
    }

    fn total_power(&self) -> Dec {
        self.roster.total_voting_power()
    }

    fn signers_power(&self, signers: &BTreeSet<SerializedPublicKey>) -> Dec {
        signers
            .iter()
            .filter_map(|k| self.roster.voter(k))
            .map(|entry| &entry.overall_percent)
            .sum()
    }

    fn is_quorum_achieved(
        &self,
        signers: &BTreeSet<SerializedPublicKey>,
        kind: ThresholdKind,
    ) -> bool {
        kind.threshold().is_met_by_power(&self.signers_power(signers))
    }

    fn is_member(&self, key: &SerializedPublicKey) -> bool {
        self.roster.voter(key).is_some()
    }

    fn index_of(&self, key: &SerializedPublicKey) -> Option<usize> {
        self.roster.index_of(key)
    }

    fn ordered_identities(&self) -> &[SerializedPublicKey] {
        self.roster.ordered_identities()
    }
}
