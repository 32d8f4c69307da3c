//! Equal-weight verifier for non-staking epochs

use std::collections::{BTreeMap, BTreeSet};

use votepower_numeric::Dec;
use votepower_sharding::{Committee, SerializedPublicKey, ShardId};

use super::{ThresholdKind, Verifier, VotingPolicy};

/// Every distinct identity carries `1/N` of the vote
///
/// A key repeated across slots votes once, from its first slot.
#[derive(Debug, Clone)]
pub struct UniformVerifier {
    shard_id: ShardId,
    ordered_identities: Vec<SerializedPublicKey>,
    /// first slot index of each identity
    members: BTreeMap<SerializedPublicKey, usize>,
}

impl UniformVerifier {
    /// Never fails: any committee, even an empty one, has a uniform split
    pub fn new(committee: &Committee) -> Self {
        let ordered_identities = committee.bls_public_keys();
        let mut members = BTreeMap::new();
        for (i, key) in ordered_identities.iter().enumerate() {
            members.entry(*key).or_insert(i);
        }
        Self {
            shard_id: committee.shard_id,
            ordered_identities,
            members,
        }
    }

    pub fn shard_id(&self) -> ShardId {
        self.shard_id
    }

    fn signer_count(&self, signers: &BTreeSet<SerializedPublicKey>) -> usize {
        signers.iter().filter(|k| self.members.contains_key(*k)).count()
    }
}

impl Verifier for UniformVerifier {
    fn policy(&self) -> VotingPolicy {
        VotingPolicy::Uniform
    }

    fn total_power(&self) -> Dec {
        Dec::one()
    }

    fn signers_power(&self, signers: &BTreeSet<SerializedPublicKey>) -> Dec {
        let n = self.members.len();
        if n == 0 {
            return Dec::zero();
        }
        Dec::from(self.signer_count(signers)) / Dec::from(n)
    }

    fn is_quorum_achieved(
        &self,
        signers: &BTreeSet<SerializedPublicKey>,
        kind: ThresholdKind,
    ) -> bool {
        kind.threshold().is_met_by_count(self.signer_count(signers), self.members.len())
    }

    fn is_member(&self, key: &SerializedPublicKey) -> bool {
        self.members.contains_key(key)
    }

    fn index_of(&self, key: &SerializedPublicKey) -> Option<usize> {
        self.members.get(key).copied()
    }

    fn ordered_identities(&self) -> &[SerializedPublicKey] {
        &self.ordered_identities
    }
}
