//! Quorum thresholds per consensus phase

use votepower_numeric::Dec;

/// Fraction of voting power a phase needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThresholdKind {
    /// at least 2/3
    Supermajority,
    /// more than 1/2
    Majority,
}

/// `numerator / denominator`, met at equality only when `inclusive`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threshold {
    pub numerator: u64,
    pub denominator: u64,
    pub inclusive: bool,
}

impl ThresholdKind {
    pub const fn threshold(self) -> Threshold {
        match self {
            ThresholdKind::Supermajority => Threshold {
                numerator: 2,
                denominator: 3,
                inclusive: true,
            },
            ThresholdKind::Majority => Threshold {
                numerator: 1,
                denominator: 2,
                inclusive: false,
            },
        }
    }
}

impl Threshold {
    /// Compare `power` (a fraction of one) without rounding the threshold
    pub fn is_met_by_power(&self, power: &Dec) -> bool {
        let scaled = power * &Dec::from(self.denominator);
        let bar = Dec::from(self.numerator);
        if self.inclusive {
            scaled >= bar
        } else {
            scaled > bar
        }
    }

    /// Compare `signers` out of `members` equal votes
    pub fn is_met_by_count(&self, signers: usize, members: usize) -> bool {
        if members == 0 {
            return false;
        }
        let lhs = signers as u128 * self.denominator as u128;
        let rhs = members as u128 * self.numerator as u128;
        if self.inclusive {
            lhs >= rhs
        } else {
            lhs > rhs
        }
    }
}

/// Consensus phase asking for a quorum decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Prepare,
    Commit,
    ViewChange,
}

impl Phase {
    pub const fn threshold_kind(self) -> ThresholdKind {
        match self {
            Phase::Prepare | Phase::Commit => ThresholdKind::Supermajority,
            Phase::ViewChange => ThresholdKind::Majority,
        }
    }
}

impl From<Phase> for ThresholdKind {
    fn from(phase: Phase) -> Self {
        phase.threshold_kind()
    }
}
