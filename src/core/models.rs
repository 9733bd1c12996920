use crate::core::error::{ProgressError, ProgressResult};
use crate::modules::coverage::coverage_set::CoverageSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open span `[start, end)` of video, in seconds, that was actually played.
///
/// Bounds are validated on construction: both finite, both `>= 0`, and
/// `start <= end`. A zero-length interval is representable so malformed
/// client input can be carried to the merge, which drops it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WatchedInterval", into = "WatchedInterval")]
pub struct Interval {
    start: f64,
    end: f64,
}

impl Interval {
    pub fn new(start: f64, end: f64) -> ProgressResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(ProgressError::malformed(format!(
                "interval bounds must be finite, got [{}, {})",
                start, end
            )));
        }
        if start < 0.0 || end < 0.0 {
            return Err(ProgressError::malformed(format!(
                "interval bounds must not be negative, got [{}, {})",
                start, end
            )));
        }
        if start > end {
            return Err(ProgressError::malformed(format!(
                "interval start {} is after its end {}",
                start, end
            )));
        }

        Ok(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// Covered seconds
    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether `other` overlaps or touches this interval, assuming `other` starts no earlier.
    pub(crate) fn reaches(&self, other: &Interval) -> bool {
        other.start <= self.end
    }

    /// Grow the end bound to cover `end`; never shrinks.
    pub(crate) fn extend_to(&mut self, end: f64) {
        self.end = self.end.max(end);
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Wire shape of an interval: `{ "start": number, "end": number }`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WatchedInterval {
    pub start: f64,
    pub end: f64,
}

impl TryFrom<WatchedInterval> for Interval {
    type Error = ProgressError;

    fn try_from(value: WatchedInterval) -> Result<Self, Self::Error> {
        Interval::new(value.start, value.end)
    }
}

impl From<Interval> for WatchedInterval {
    fn from(value: Interval) -> Self {
        WatchedInterval {
            start: value.start,
            end: value.end,
        }
    }
}

/// Identifies one progress record: a (user, video) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProgressKey {
    pub user_id: String,
    pub video_id: String,
}

impl ProgressKey {
    pub fn new(user_id: impl Into<String>, video_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            video_id: video_id.into(),
        }
    }
}

impl fmt::Display for ProgressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.user_id, self.video_id)
    }
}

/// Persisted watch state for one (user, video) pair
///
/// Created on first update and only ever grown afterwards: the coverage is
/// a union and `last_position` a running maximum, so applying the same
/// updates in any order yields the same record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub intervals: CoverageSet,
    pub last_position: f64,
}

impl ProgressRecord {
    /// Union `new_intervals` into the coverage and advance `last_position`.
    pub fn merge_in(&mut self, new_intervals: &[Interval]) {
        self.intervals = self.intervals.union(new_intervals);

        let newest_end = new_intervals
            .iter()
            .map(Interval::end)
            .fold(self.last_position, f64::max);
        self.last_position = newest_end;
    }
}

/// `update_progress` request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateProgressRequest {
    pub user_id: String,
    pub video_id: String,
    pub intervals: Vec<WatchedInterval>,
    pub video_duration: f64,
}

impl UpdateProgressRequest {
    pub fn key(&self) -> ProgressKey {
        ProgressKey::new(self.user_id.clone(), self.video_id.clone())
    }

    /// Validate every wire interval; a single bad interval rejects the request.
    pub fn validated_intervals(&self) -> ProgressResult<Vec<Interval>> {
        self.intervals
            .iter()
            .copied()
            .map(Interval::try_from)
            .collect()
    }
}

/// Response for both `get_progress` and `update_progress`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub progress_percentage: f64,
    pub last_position: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: f64, end: f64) -> Interval {
        Interval::new(start, end).unwrap()
    }

    // ── Interval ──────────────────────────────────────────────────────────────

    #[test]
    fn interval_rejects_negative_bounds() {
        assert!(matches!(
            Interval::new(-1.0, 4.0),
            Err(ProgressError::MalformedInput(_))
        ));
    }

    #[test]
    fn interval_rejects_nan_and_infinity() {
        assert!(Interval::new(f64::NAN, 4.0).is_err());
        assert!(Interval::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn interval_rejects_reversed_bounds() {
        assert!(Interval::new(8.0, 3.0).is_err());
    }

    #[test]
    fn zero_length_interval_is_constructible_but_empty() {
        let empty = iv(5.0, 5.0);
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0.0);
    }

    #[test]
    fn interval_deserialization_validates() {
        let ok: Interval = serde_json::from_str(r#"{"start":1,"end":2}"#).unwrap();
        assert_eq!(ok, iv(1.0, 2.0));

        let bad = serde_json::from_str::<Interval>(r#"{"start":3,"end":2}"#);
        assert!(bad.is_err());
    }

    // ── ProgressRecord ────────────────────────────────────────────────────────

    #[test]
    fn merge_in_keeps_last_position_as_maximum() {
        let mut record = ProgressRecord::default();
        record.merge_in(&[iv(40.0, 50.0)]);
        record.merge_in(&[iv(0.0, 10.0)]);

        assert_eq!(record.last_position, 50.0);
        assert_eq!(record.intervals.as_slice(), &[iv(0.0, 10.0), iv(40.0, 50.0)]);
    }

    #[test]
    fn merge_in_with_no_intervals_leaves_record_untouched() {
        let mut record = ProgressRecord::default();
        record.merge_in(&[iv(0.0, 10.0)]);
        let before = record.clone();

        record.merge_in(&[]);
        assert_eq!(record, before);
    }

    // ── Wire types ────────────────────────────────────────────────────────────

    #[test]
    fn request_with_one_bad_interval_is_rejected() {
        let request = UpdateProgressRequest {
            user_id: "u".into(),
            video_id: "v".into(),
            intervals: vec![
                WatchedInterval { start: 0.0, end: 5.0 },
                WatchedInterval { start: -2.0, end: 1.0 },
            ],
            video_duration: 60.0,
        };
        assert!(request.validated_intervals().is_err());
    }

    #[test]
    fn request_parses_from_wire_json() {
        let body = r#"{
            "user_id": "user-1",
            "video_id": "video-9",
            "intervals": [{"start": 0, "end": 10}, {"start": 5, "end": 20}],
            "video_duration": 100
        }"#;
        let request: UpdateProgressRequest = serde_json::from_str(body).unwrap();

        assert_eq!(request.key(), ProgressKey::new("user-1", "video-9"));
        assert_eq!(request.validated_intervals().unwrap().len(), 2);
    }

    #[test]
    fn response_serializes_with_snake_case_fields() {
        let response = ProgressResponse {
            progress_percentage: 20.0,
            last_position: 20.0,
        };
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["progress_percentage"], 20.0);
        assert_eq!(json["last_position"], 20.0);
    }
}
