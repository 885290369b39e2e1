use crate::types::{ParameterSet, SweepRanges};
use std::collections::BTreeSet;

/// Every `(n, m, trials)` combination of three inclusive ranges, in canonical
/// order.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ParameterSweep {
    ranges: SweepRanges,
    sets: BTreeSet<ParameterSet>,
}

impl ParameterSweep {
    pub fn expand(ranges: SweepRanges) -> Self {
        let mut sets = BTreeSet::new();
        for n in ranges.n.values() {
            for m in ranges.m.values() {
                for trials in ranges.trials.values() {
                    sets.insert(ParameterSet::new(n, m, trials));
                }
            }
        }
        Self { ranges, sets }
    }

    pub fn ranges(&self) -> &SweepRanges {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterSet> + '_ {
        self.sets.iter()
    }

    /// Upper bound on sequence elements scanned across the whole sweep.
    pub fn total_work(&self) -> u128 {
        self.sets.iter().map(ParameterSet::work).sum()
    }
}
