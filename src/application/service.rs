use crate::application::config::Settings;
use crate::core::error::{ProgressError, ProgressResult};
use crate::core::models::{Interval, ProgressKey, ProgressRecord, ProgressResponse, UpdateProgressRequest};
use crate::core::traits::ProgressStore;
use crate::modules::storage::memory_backend::MemoryProgressStore;
use crate::utils::round_to;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// How raw percentages are reported
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentagePolicy {
    pub clamp: bool,
    pub decimal_places: u32,
}

impl Default for PercentagePolicy {
    fn default() -> Self {
        Self {
            clamp: false,
            decimal_places: 2,
        }
    }
}

impl PercentagePolicy {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            clamp: settings.clamp_percentage,
            decimal_places: settings.decimal_places,
        }
    }

    pub fn apply(&self, raw: f64) -> f64 {
        let value = if self.clamp { raw.clamp(0.0, 100.0) } else { raw };
        round_to(value, self.decimal_places)
    }
}

/// The progress store contract: `get_progress` and `update_progress`
///
/// Each update is a read-merge-write under the store lock, so concurrent
/// updates for the same key union their intervals instead of overwriting.
/// When the primary store is unreachable the same operation runs against the
/// transient fallback store.
pub struct ProgressService {
    primary: Mutex<Box<dyn ProgressStore>>,
    fallback: Option<Mutex<MemoryProgressStore>>,
    policy: PercentagePolicy,
}

impl ProgressService {
    pub fn new(primary: Box<dyn ProgressStore>) -> Self {
        Self {
            primary: Mutex::new(primary),
            fallback: None,
            policy: PercentagePolicy::default(),
        }
    }

    /// Set the transient store used when the primary is unreachable
    pub fn with_fallback(mut self, fallback: MemoryProgressStore) -> Self {
        self.fallback = Some(Mutex::new(fallback));
        self
    }

    pub fn with_policy(mut self, policy: PercentagePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Current snapshot for `key`; zeros when nothing was recorded
    pub fn get_progress(&self, key: &ProgressKey, duration: f64) -> ProgressResult<ProgressResponse> {
        let attempt = {
            let store = lock(&self.primary);
            store.load(key)
        };

        let record = match attempt {
            Ok(record) => record,
            Err(e) if e.is_transport() => match &self.fallback {
                Some(fallback) => {
                    warn!(%key, error = %e, "primary store unavailable, reading transient store");
                    lock(fallback).load(key)?
                }
                None => return Err(e),
            },
            Err(e) => return Err(e),
        };

        Ok(record
            .map(|r| self.snapshot(&r, duration))
            .unwrap_or_default())
    }

    /// Union `new_intervals` into the stored coverage and return the new snapshot
    pub fn update_progress(
        &self,
        key: &ProgressKey,
        new_intervals: &[Interval],
        duration: f64,
    ) -> ProgressResult<ProgressResponse> {
        let attempt = {
            let mut store = lock(&self.primary);
            merge_and_save(&mut **store, key, new_intervals)
        };

        let record = match attempt {
            Ok(record) => record,
            Err(e) if e.is_transport() => match &self.fallback {
                Some(fallback) => {
                    warn!(%key, error = %e, "primary store unavailable, updating transient store");
                    let mut store = lock(fallback);
                    merge_and_save(&mut *store, key, new_intervals)?
                }
                None => return Err(e),
            },
            Err(e) => return Err(e),
        };

        Ok(self.snapshot(&record, duration))
    }

    /// `update_progress` for a wire request; malformed intervals reject the whole request
    pub fn apply_request(&self, request: &UpdateProgressRequest) -> ProgressResult<ProgressResponse> {
        let intervals = request.validated_intervals()?;
        self.update_progress(&request.key(), &intervals, request.video_duration)
    }

    fn snapshot(&self, record: &ProgressRecord, duration: f64) -> ProgressResponse {
        ProgressResponse {
            progress_percentage: self.policy.apply(record.intervals.progress_percentage(duration)),
            last_position: record.last_position,
        }
    }
}

fn merge_and_save(
    store: &mut dyn ProgressStore,
    key: &ProgressKey,
    new_intervals: &[Interval],
) -> Result<ProgressRecord, ProgressError> {
    let record = store.update(key, &mut |record| record.merge_in(new_intervals))?;

    debug!(
        %key,
        store = store.name(),
        spans = record.intervals.len(),
        watched = record.intervals.total_watched(),
        last_position = record.last_position,
        "progress merged"
    );
    Ok(record)
}

/// Records are only replaced whole, so a poisoned lock still guards consistent data.
fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
