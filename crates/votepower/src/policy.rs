//! Vote percentage policy, including historical overrides
//!
//! Overrides replace the schedule's percentages for a closed epoch range on
//! one network type. While an override applies, roster normalization and the
//! sum-to-one check are skipped, because override percentages need not sum to
//! one. Retiring an override is deleting its row.

use votepower_numeric::Dec;
use votepower_sharding::{Epoch, NetworkType, Schedule};

/// Percentages for an epoch range that supersede the schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VotePercentOverride {
    pub network_type: NetworkType,
    /// first epoch covered, inclusive
    pub first_epoch: Epoch,
    /// last epoch covered, inclusive
    pub last_epoch: Epoch,
    pub harmony_basis_points: i64,
    pub external_basis_points: i64,
}

impl VotePercentOverride {
    pub fn covers(&self, network_type: NetworkType, epoch: Epoch) -> bool {
        self.network_type == network_type && (self.first_epoch..=self.last_epoch).contains(&epoch)
    }

    pub fn harmony_percent(&self) -> Dec {
        from_basis_points(self.harmony_basis_points)
    }

    pub fn external_percent(&self) -> Dec {
        from_basis_points(self.external_basis_points)
    }
}

fn from_basis_points(bp: i64) -> Dec {
    Dec::new(bp) / Dec::new(10_000)
}

pub const VOTE_PERCENT_OVERRIDES: &[VotePercentOverride] = &[
    // testnet incident recovery: harmony nodes hold 70% so blocks keep
    // finalizing while external validators recover; sums to 1.10
    VotePercentOverride {
        network_type: NetworkType::Testnet,
        first_epoch: 73_305,
        last_epoch: 73_490,
        harmony_basis_points: 7_000,
        external_basis_points: 4_000,
    },
];

/// Override in force for `(network_type, epoch)`, if any
pub fn vote_percent_override(
    network_type: NetworkType,
    epoch: Epoch,
) -> Option<&'static VotePercentOverride> {
    VOTE_PERCENT_OVERRIDES
        .iter()
        .find(|o| o.covers(network_type, epoch))
}

/// Percentages a roster is built with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotePercents {
    pub harmony: Dec,
    pub external: Dec,
    /// true when an override replaced the schedule values
    pub overridden: bool,
}

/// Resolve the percentages for an epoch, applying overrides
pub fn resolve_vote_percents(
    network_type: NetworkType,
    schedule: &dyn Schedule,
    epoch: Epoch,
) -> VotePercents {
    if let Some(o) = vote_percent_override(network_type, epoch) {
        return VotePercents {
            harmony: o.harmony_percent(),
            external: o.external_percent(),
            overridden: true,
        };
    }

    let instance = schedule.instance_for_epoch(epoch);
    VotePercents {
        harmony: instance.harmony_vote_percent(),
        external: instance.external_vote_percent(),
        overridden: false,
    }
}
