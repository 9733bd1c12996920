use crate::core::models::Interval;

/// Merge intervals into the minimal sorted, disjoint set covering their union
///
/// Intervals that touch (`next.start == last.end`) are joined. Zero-length
/// intervals cover nothing and are dropped. The result does not depend on
/// the input order.
///
/// # Arguments
/// * `intervals` - Raw intervals in any order, possibly overlapping
///
/// # Returns
/// * `Vec<Interval>` - Sorted by start, with `a.end < b.start` for every adjacent pair
pub fn merge_intervals(intervals: &[Interval]) -> Vec<Interval> {
    let mut sorted: Vec<Interval> = intervals.iter().copied().filter(|i| !i.is_empty()).collect();
    if sorted.is_empty() {
        return sorted;
    }

    sorted.sort_by(|a, b| a.start().total_cmp(&b.start()));

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for current in sorted {
        match merged.last_mut() {
            Some(last) if last.reaches(&current) => last.extend_to(current.end()),
            _ => merged.push(current),
        }
    }

    merged
}

/// Sum of covered seconds
///
/// Does not merge: overlapping input is counted twice. Pass the output of
/// [`merge_intervals`] (or a `CoverageSet`).
pub fn calculate_total_watched_time(merged: &[Interval]) -> f64 {
    merged.iter().map(Interval::len).sum()
}

/// Percentage of `total_duration` covered by the union of `intervals`
///
/// Returns `0.0` for a zero, negative or non-finite duration. Not capped at
/// 100: coverage past a wrong declared duration shows up as overshoot.
pub fn calculate_progress_percentage(intervals: &[Interval], total_duration: f64) -> f64 {
    let watched = calculate_total_watched_time(&merge_intervals(intervals));
    percentage_of(watched, total_duration)
}

pub(crate) fn percentage_of(watched: f64, total_duration: f64) -> f64 {
    if !total_duration.is_finite() || total_duration <= 0.0 {
        return 0.0;
    }
    watched / total_duration * 100.0
}
