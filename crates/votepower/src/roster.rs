//! Voting-power roster construction
//!
//! A roster assigns every committee member a fraction of the shard's voting
//! power. Harmony-operated slots split the harmony percentage evenly;
//! externally staked slots split the external percentage by effective stake.
//!
//! ## Normalization
//!
//! Fixed-point division is not exactly invertible, so the category sums can
//! miss one by a few units in the last place. The residue goes to the last
//! externally staked voter in slot order. Which voter absorbs it is part of
//! the consensus contract: every node must pick the same one.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{debug, warn};
use votepower_numeric::Dec;
use votepower_sharding::{
    Address, Committee, Epoch, NetworkType, Schedule, SerializedPublicKey, ShardId,
};

use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::policy::resolve_vote_percents;
use crate::{Error, Result};

/// Voting weight of one committee member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteEntry {
    pub identity: SerializedPublicKey,
    pub earning_account: Address,
    /// Share within its own category
    pub group_percent: Dec,
    /// Share of the whole committee's voting power
    pub overall_percent: Dec,
    pub is_harmony_node: bool,
    pub effective_stake: Dec,
    /// Deposited stake; slots carry only effective stake, so this stays zero
    /// unless a caller fills it in for reporting
    pub raw_stake: Dec,
}

/// Voting power of a committee for one epoch
///
/// Built once per (committee, epoch) and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Roster {
    shard_id: ShardId,
    epoch: Epoch,
    /// entries in slot order, first occurrence of each identity only
    voters: Vec<VoteEntry>,
    #[serde(skip)]
    index: BTreeMap<SerializedPublicKey, usize>,
    ordered_identities: Vec<SerializedPublicKey>,
    total_effective_stake: Dec,
    hmy_slot_count: usize,
    our_voting_power_total_percentage: Dec,
    their_voting_power_total_percentage: Dec,
    override_active: bool,
}

impl Roster {
    pub fn shard_id(&self) -> ShardId {
        self.shard_id
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn voter(&self, key: &SerializedPublicKey) -> Option<&VoteEntry> {
        self.index.get(key).map(|&i| &self.voters[i])
    }

    /// Entries in slot order
    pub fn voters(&self) -> impl Iterator<Item = &VoteEntry> {
        self.voters.iter()
    }

    /// Number of distinct identities
    pub fn len(&self) -> usize {
        self.voters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voters.is_empty()
    }

    /// Every slot's identity in committee order, duplicates included
    pub fn ordered_identities(&self) -> &[SerializedPublicKey] {
        &self.ordered_identities
    }

    /// First slot index holding `key`
    pub fn index_of(&self, key: &SerializedPublicKey) -> Option<usize> {
        self.ordered_identities.iter().position(|k| k == key)
    }

    pub fn identity_at(&self, index: usize) -> Option<&SerializedPublicKey> {
        self.ordered_identities.get(index)
    }

    pub fn total_effective_stake(&self) -> &Dec {
        &self.total_effective_stake
    }

    pub fn hmy_slot_count(&self) -> usize {
        self.hmy_slot_count
    }

    /// Aggregate power of harmony-operated slots
    pub fn our_percentage(&self) -> &Dec {
        &self.our_voting_power_total_percentage
    }

    /// Aggregate power of externally staked slots
    pub fn their_percentage(&self) -> &Dec {
        &self.their_voting_power_total_percentage
    }

    /// One, except while a vote-percent override is active
    pub fn total_voting_power(&self) -> Dec {
        &self.our_voting_power_total_percentage + &self.their_voting_power_total_percentage
    }

    pub fn is_override_active(&self) -> bool {
        self.override_active
    }
}

/// Build the roster for `committee` at `epoch`
///
/// Duplicate identities are reported through `tracing`.
pub fn compute_roster(
    network_type: NetworkType,
    schedule: &dyn Schedule,
    committee: &Committee,
    epoch: impl Into<Option<Epoch>>,
) -> Result<Roster> {
    compute_roster_with_diagnostics(network_type, schedule, committee, epoch, &TracingSink)
}

/// [`compute_roster`] reporting duplicates to `sink`
pub fn compute_roster_with_diagnostics(
    network_type: NetworkType,
    schedule: &dyn Schedule,
    committee: &Committee,
    epoch: impl Into<Option<Epoch>>,
    sink: &dyn DiagnosticSink,
) -> Result<Roster> {
    let shard_id = committee.shard_id;
    let epoch = epoch.into().ok_or(Error::MissingEpoch { shard_id })?;

    // first occurrence of an identity is the one that votes
    let mut seen = BTreeSet::new();
    let mut unique = Vec::with_capacity(committee.len());
    for (i, slot) in committee.slots.iter().enumerate() {
        if seen.insert(slot.bls_public_key) {
            unique.push(slot);
        } else {
            sink.duplicate_identity(shard_id, i, &slot.bls_public_key);
        }
    }

    let mut total_effective_stake = Dec::zero();
    let mut hmy_slot_count = 0usize;
    for slot in &unique {
        match &slot.effective_stake {
            Some(stake) if stake.is_negative() => {
                return Err(Error::NegativeEffectiveStake {
                    shard_id,
                    key: slot.bls_public_key,
                });
            }
            Some(stake) => total_effective_stake += stake,
            None => hmy_slot_count += 1,
        }
    }

    let has_external = unique.len() > hmy_slot_count;
    if has_external && total_effective_stake.is_zero() {
        return Err(Error::ZeroEffectiveStake { shard_id });
    }

    let percents = resolve_vote_percents(network_type, schedule, epoch);
    if percents.overridden {
        warn!(
            shard = %shard_id,
            epoch,
            harmony = %percents.harmony,
            external = %percents.external,
            "vote percent override active, skipping normalization"
        );
    }

    let hmy_count = Dec::from(hmy_slot_count);
    let mut our_percentage = Dec::zero();
    let mut their_percentage = Dec::zero();
    let mut last_staked_voter = None;
    let mut voters = Vec::with_capacity(unique.len());
    let mut index = BTreeMap::new();

    for slot in unique {
        let entry = match &slot.effective_stake {
            Some(stake) => {
                let group_percent = stake / &total_effective_stake;
                let overall_percent = &group_percent * &percents.external;
                their_percentage += &overall_percent;
                last_staked_voter = Some(voters.len());
                VoteEntry {
                    identity: slot.bls_public_key,
                    earning_account: slot.earning_account,
                    group_percent,
                    overall_percent,
                    is_harmony_node: false,
                    effective_stake: stake.clone(),
                    raw_stake: Dec::zero(),
                }
            }
            None => {
                let overall_percent = &percents.harmony / &hmy_count;
                // a zero harmony share still splits its group evenly
                let group_percent = overall_percent
                    .checked_div(&percents.harmony)
                    .unwrap_or_else(|| Dec::one() / &hmy_count);
                our_percentage += &overall_percent;
                VoteEntry {
                    identity: slot.bls_public_key,
                    earning_account: slot.earning_account,
                    group_percent,
                    overall_percent,
                    is_harmony_node: true,
                    effective_stake: Dec::zero(),
                    raw_stake: Dec::zero(),
                }
            }
        };
        index.insert(entry.identity, voters.len());
        voters.push(entry);
    }

    if !percents.overridden {
        if let Some(last) = last_staked_voter {
            let diff = Dec::one() - (&our_percentage + &their_percentage);
            if !diff.is_zero() {
                debug!(
                    shard = %shard_id,
                    epoch,
                    residue = %diff,
                    "assigning rounding residue to last staked voter"
                );
                voters[last].overall_percent += &diff;
                their_percentage += &diff;
            }

            let total = &our_percentage + &their_percentage;
            let negative = voters.iter().any(|v| v.overall_percent.is_negative());
            if total != Dec::one() || negative {
                return Err(Error::VotingPowerInvariantViolated {
                    shard_id,
                    epoch,
                    total,
                });
            }
        }
    }

    debug!(
        shard = %shard_id,
        epoch,
        voters = voters.len(),
        hmy_slots = hmy_slot_count,
        ours = %our_percentage,
        theirs = %their_percentage,
        "computed voting power roster"
    );

    Ok(Roster {
        shard_id,
        epoch,
        voters,
        index,
        ordered_identities: committee.bls_public_keys(),
        total_effective_stake,
        hmy_slot_count,
        our_voting_power_total_percentage: our_percentage,
        their_voting_power_total_percentage: their_percentage,
        override_active: percents.overridden,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use votepower_sharding::{EpochSchedule, Instance, ScheduleEntry, ShardingInstance, Slot};

    fn key(i: u8) -> SerializedPublicKey {
        SerializedPublicKey([i; 48])
    }

    fn harmony_slot(i: u8) -> Slot {
        Slot::harmony(Address([i; 20]), key(i))
    }

    fn staked_slot(i: u8, stake: i64) -> Slot {
        Slot::staked(Address([i; 20]), key(i), Dec::new(stake))
    }

    fn schedule(harmony: &str) -> EpochSchedule {
        let instance = ShardingInstance::new(1, 100, 0, harmony.parse().unwrap(), vec![]).unwrap();
        EpochSchedule::new(vec![ScheduleEntry { start_epoch: 0, instance }]).unwrap()
    }

    fn mainnet_roster(
        schedule: &dyn Schedule,
        committee: &Committee,
        epoch: Epoch,
    ) -> Result<Roster> {
        compute_roster(NetworkType::Mainnet, schedule, committee, epoch)
    }

    /// Policy that skips instance validation
    struct FixedPolicy {
        harmony: Dec,
        external: Dec,
    }

    impl Instance for FixedPolicy {
        fn harmony_vote_percent(&self) -> Dec {
            self.harmony.clone()
        }
        fn external_vote_percent(&self) -> Dec {
            self.external.clone()
        }
        fn num_shards(&self) -> u32 {
            1
        }
        fn num_nodes_per_shard(&self) -> usize {
            100
        }
        fn num_harmony_operated_nodes_per_shard(&self) -> usize {
            0
        }
        fn hmy_accounts(&self) -> &[votepower_sharding::GenesisAccount] {
            &[]
        }
    }

    impl Schedule for FixedPolicy {
        fn instance_for_epoch(&self, _epoch: Epoch) -> &dyn Instance {
            self
        }
    }

    #[derive(Default)]
    struct RecordingSink(RefCell<Vec<(usize, SerializedPublicKey)>>);

    impl DiagnosticSink for RecordingSink {
        fn duplicate_identity(
            &self,
            _shard_id: ShardId,
            slot_index: usize,
            key: &SerializedPublicKey,
        ) {
            self.0.borrow_mut().push((slot_index, *key));
        }
    }

    fn mixed_committee() -> Committee {
        Committee::new(
            ShardId(0),
            vec![
                harmony_slot(1),
                staked_slot(2, 100),
                harmony_slot(3),
                staked_slot(4, 200),
                harmony_slot(5),
                staked_slot(6, 300),
            ],
        )
    }

    #[test]
    fn test_mixed_committee_sums_to_one() {
        let roster = mainnet_roster(&schedule("0.68"), &mixed_committee(), 500).unwrap();

        assert_eq!(roster.total_voting_power(), Dec::one());
        assert_eq!(roster.hmy_slot_count(), 3);
        assert_eq!(roster.total_effective_stake(), &Dec::new(600));
        assert!(!roster.is_override_active());

        let per_harmony = "0.68".parse::<Dec>().unwrap() / Dec::new(3);
        for entry in roster.voters().filter(|e| e.is_harmony_node) {
            assert_eq!(entry.overall_percent, per_harmony);
            assert_eq!(entry.group_percent, "0.333333333333333334".parse().unwrap());
        }
    }

    #[test]
    fn test_residue_goes_to_last_staked_voter() {
        let roster = mainnet_roster(&schedule("0.68"), &mixed_committee(), 500).unwrap();
        let external: Dec = "0.32".parse().unwrap();

        // earlier staked voters keep the unadjusted share
        for k in [key(2), key(4)] {
            let entry = roster.voter(&k).unwrap();
            assert_eq!(entry.overall_percent, &entry.group_percent * &external);
        }

        // the last one absorbs whatever is left
        let others: Dec = roster
            .voters()
            .filter(|e| e.identity != key(6))
            .map(|e| &e.overall_percent)
            .sum();
        assert_eq!(roster.voter(&key(6)).unwrap().overall_percent, Dec::one() - others);
    }

    #[test]
    fn test_duplicate_keeps_first_occurrence() {
        let committee = Committee::new(
            ShardId(2),
            vec![staked_slot(1, 100), harmony_slot(2), staked_slot(1, 900)],
        );
        let sink = RecordingSink::default();
        let roster = compute_roster_with_diagnostics(
            NetworkType::Mainnet,
            &schedule("0.5"),
            &committee,
            10,
            &sink,
        )
        .unwrap();

        assert_eq!(roster.len(), 2);
        assert_eq!(roster.voter(&key(1)).unwrap().effective_stake, Dec::new(100));
        assert_eq!(roster.total_effective_stake(), &Dec::new(100));
        assert_eq!(roster.total_voting_power(), Dec::one());
        assert_eq!(*sink.0.borrow(), vec![(2, key(1))]);
        assert_eq!(roster.ordered_identities(), &[key(1), key(2), key(1)]);
        assert_eq!(roster.index_of(&key(1)), Some(0));
    }

    #[test]
    fn test_missing_epoch() {
        let err = compute_roster(NetworkType::Mainnet, &schedule("0.68"), &mixed_committee(), None)
            .unwrap_err();
        assert!(matches!(err, Error::MissingEpoch { shard_id: ShardId(0) }));
    }

    #[test]
    fn test_harmony_only_committee_skips_invariant() {
        let committee = Committee::new(ShardId(0), vec![harmony_slot(1), harmony_slot(2)]);
        let roster = mainnet_roster(&schedule("0.68"), &committee, 1).unwrap();
        assert_eq!(roster.total_voting_power(), "0.68".parse().unwrap());
        assert_eq!(roster.their_percentage(), &Dec::zero());
    }

    #[test]
    fn test_zero_harmony_percent_splits_group_evenly() {
        let committee = Committee::new(
            ShardId(0),
            vec![harmony_slot(1), harmony_slot(2), staked_slot(3, 10)],
        );
        let roster = mainnet_roster(&schedule("0"), &committee, 1).unwrap();
        let entry = roster.voter(&key(1)).unwrap();
        assert_eq!(entry.overall_percent, Dec::zero());
        assert_eq!(entry.group_percent, "0.5".parse().unwrap());
        assert_eq!(roster.voter(&key(3)).unwrap().overall_percent, Dec::one());
    }

    #[test]
    fn test_negative_stake_is_rejected() {
        let committee = Committee::new(
            ShardId(3),
            vec![harmony_slot(1), staked_slot(2, -10), staked_slot(3, 20)],
        );
        let err = mainnet_roster(&schedule("0.5"), &committee, 1).unwrap_err();
        assert!(matches!(
            err,
            Error::NegativeEffectiveStake { shard_id: ShardId(3), key: k } if k == key(2)
        ));
    }

    #[test]
    fn test_negative_stake_from_json_is_rejected() {
        let mut committee = Committee::new(ShardId(0), vec![harmony_slot(1), staked_slot(3, 20)]);
        let mut slot = staked_slot(2, 0);
        slot.effective_stake = Some("-0.5".parse().unwrap());
        committee.slots.insert(1, slot);
        let json = serde_json::to_string(&committee).unwrap();
        let committee: Committee = serde_json::from_str(&json).unwrap();

        let err = mainnet_roster(&schedule("0.5"), &committee, 1).unwrap_err();
        assert!(matches!(err, Error::NegativeEffectiveStake { .. }));
    }

    #[test]
    fn test_zero_total_stake() {
        let committee = Committee::new(ShardId(5), vec![staked_slot(1, 0), staked_slot(2, 0)]);
        let err = mainnet_roster(&schedule("0.68"), &committee, 1).unwrap_err();
        assert!(matches!(err, Error::ZeroEffectiveStake { shard_id: ShardId(5) }));
    }

    #[test]
    fn test_malformed_percentages_violate_invariant() {
        let policy = FixedPolicy {
            harmony: "0.9".parse().unwrap(),
            external: "0.9".parse().unwrap(),
        };
        let committee = Committee::new(
            ShardId(1),
            vec![harmony_slot(1), staked_slot(2, 50), staked_slot(3, 50)],
        );
        let err = mainnet_roster(&policy, &committee, 7).unwrap_err();
        assert!(matches!(
            err,
            Error::VotingPowerInvariantViolated { shard_id: ShardId(1), epoch: 7, .. }
        ));
    }

    #[test]
    fn test_empty_committee() {
        let committee = Committee::new(ShardId(0), vec![]);
        let roster = mainnet_roster(&schedule("0.68"), &committee, 1).unwrap();
        assert!(roster.is_empty());
        assert_eq!(roster.total_voting_power(), Dec::zero());
    }

    #[test]
    fn test_roster_serializes_for_diagnostics() {
        let roster = mainnet_roster(&schedule("0.68"), &mixed_committee(), 500).unwrap();
        let json = serde_json::to_value(&roster).unwrap();
        assert_eq!(json["hmy_slot_count"], 3);
        assert_eq!(json["voters"].as_array().unwrap().len(), 6);
        assert_eq!(json["our_voting_power_total_percentage"], "0.680000000000000001");
    }
}
