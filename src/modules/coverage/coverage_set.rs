use crate::core::models::Interval;
use crate::modules::coverage::merge::{calculate_total_watched_time, merge_intervals, percentage_of};
use serde::{Deserialize, Serialize};

/// Sorted, pairwise-disjoint, positive-length intervals
///
/// The only way to build one is through [`merge_intervals`], so the
/// invariant holds for every value, including ones read back from a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Interval>", into = "Vec<Interval>")]
pub struct CoverageSet {
    intervals: Vec<Interval>,
}

impl CoverageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the coverage of arbitrary intervals
    pub fn from_intervals(intervals: &[Interval]) -> Self {
        Self {
            intervals: merge_intervals(intervals),
        }
    }

    /// Coverage of `self` together with `additional`
    pub fn union(&self, additional: &[Interval]) -> Self {
        if additional.is_empty() {
            return self.clone();
        }

        let mut all = Vec::with_capacity(self.intervals.len() + additional.len());
        all.extend_from_slice(&self.intervals);
        all.extend_from_slice(additional);
        Self::from_intervals(&all)
    }

    pub fn as_slice(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Unique seconds covered
    pub fn total_watched(&self) -> f64 {
        calculate_total_watched_time(&self.intervals)
    }

    /// Unclamped percentage of `total_duration` covered
    pub fn progress_percentage(&self, total_duration: f64) -> f64 {
        percentage_of(self.total_watched(), total_duration)
    }
}

impl From<Vec<Interval>> for CoverageSet {
    fn from(intervals: Vec<Interval>) -> Self {
        Self::from_intervals(&intervals)
    }
}

impl From<CoverageSet> for Vec<Interval> {
    fn from(set: CoverageSet) -> Self {
        set.intervals
    }
}

impl<'a> IntoIterator for &'a CoverageSet {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}
