use crate::application::service::ProgressService;
use crate::core::events::{EventReceiver, PlaybackEvent};
use crate::core::models::{Interval, ProgressKey, ProgressResponse};
use crate::modules::coverage::coverage_set::CoverageSet;
use crate::modules::tracking::tracker::TrackerState;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// One viewer watching one video
///
/// Owns the live tracker and the coverage accumulated during this session.
/// Every flush sends the whole local coverage; the store's union makes the
/// resend idempotent, so coverage whose earlier flush failed is persisted by
/// the next one that succeeds.
pub struct PlaybackSession {
    key: ProgressKey,
    duration: f64,
    service: Arc<ProgressService>,

    tracker: TrackerState,
    watched: CoverageSet,
    snapshot: ProgressResponse,

    /// Keep coverage from a failed flush for the next one instead of dropping it
    retain_failed_flushes: bool,

    /// Set once teardown has been handled; later events are ignored
    closed: bool,
}

impl PlaybackSession {
    /// Open a session, loading the stored snapshot so playback can resume
    ///
    /// A store failure here is logged and the session starts from zero.
    pub fn start(service: Arc<ProgressService>, key: ProgressKey, duration: f64) -> Self {
        let snapshot = match service.get_progress(&key, duration) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(%key, error = %e, "could not load progress, starting from zero");
                ProgressResponse::default()
            }
        };
        info!(
            %key,
            progress = snapshot.progress_percentage,
            resume_at = snapshot.last_position,
            "session started"
        );

        Self {
            key,
            duration,
            service,
            tracker: TrackerState::default(),
            watched: CoverageSet::new(),
            snapshot,
            retain_failed_flushes: true,
            closed: false,
        }
    }

    pub fn with_retain_failed_flushes(mut self, retain: bool) -> Self {
        self.retain_failed_flushes = retain;
        self
    }

    /// Feed one playback event
    ///
    /// Returns the fresh snapshot when the event flushed an interval and the
    /// store accepted it.
    pub fn handle(&mut self, event: &PlaybackEvent) -> Option<ProgressResponse> {
        if self.closed {
            debug!(key = %self.key, event = event.name(), "event after teardown ignored");
            return None;
        }

        let transition = self.tracker.apply(event);
        self.tracker = transition.state;
        if matches!(event, PlaybackEvent::Teardown) {
            self.closed = true;
        }

        transition.flush.and_then(|interval| self.flush(interval))
    }

    /// Consume events until teardown or until every sender is gone
    ///
    /// A disconnected channel is treated as teardown, so the open span is
    /// flushed exactly once either way.
    pub fn run(&mut self, events: EventReceiver) -> ProgressResponse {
        for event in events.iter() {
            self.handle(&event);
            if self.is_closed() {
                break;
            }
        }
        if !self.is_closed() {
            if self.tracker().is_tracking() {
                debug!(key = %self.key, "event stream ended mid-span");
            }
            self.handle(&PlaybackEvent::Teardown);
        }

        info!(
            key = %self.key,
            progress = self.snapshot.progress_percentage,
            last_position = self.snapshot.last_position,
            "session ended"
        );
        self.snapshot
    }

    fn flush(&mut self, interval: Interval) -> Option<ProgressResponse> {
        let previous = self.watched.clone();
        self.watched = self.watched.union(&[interval]);

        match self
            .service
            .update_progress(&self.key, self.watched.as_slice(), self.duration)
        {
            Ok(snapshot) => {
                debug!(key = %self.key, %interval, progress = snapshot.progress_percentage, "flushed");
                self.snapshot = snapshot;
                Some(snapshot)
            }
            Err(e) => {
                if self.closed {
                    error!(key = %self.key, %interval, error = %e, "final flush failed, coverage lost");
                } else if self.retain_failed_flushes {
                    warn!(key = %self.key, %interval, error = %e, "flush failed, will resend with next flush");
                } else {
                    warn!(key = %self.key, %interval, error = %e, "flush failed, interval discarded");
                    self.watched = previous;
                }
                None
            }
        }
    }

    /// Position to resume playback from
    pub fn resume_position(&self) -> f64 {
        self.snapshot.last_position
    }

    /// Last snapshot the store confirmed
    pub fn snapshot(&self) -> ProgressResponse {
        self.snapshot
    }

    /// Coverage accumulated during this session
    pub fn watched(&self) -> &CoverageSet {
        &self.watched
    }

    pub fn tracker(&self) -> TrackerState {
        self.tracker
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
