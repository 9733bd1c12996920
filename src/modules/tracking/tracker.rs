use crate::core::events::PlaybackEvent;
use crate::core::models::Interval;
use crate::utils::whole_seconds;

/// Live accumulator for the span currently being watched
///
/// - `Idle`: nothing open; only `play` opens a span
/// - `Tracking`: a span `[start, end)` is open, `end` being the last observed
///   whole second plus one (equal to `start` until the first time update)
///
/// Transitions are pure: each returns the next state and, when a span was
/// closed, the interval to flush.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TrackerState {
    #[default]
    Idle,
    Tracking { start: f64, end: f64 },
}

/// Outcome of a transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: TrackerState,
    pub flush: Option<Interval>,
}

impl Transition {
    fn stay(state: TrackerState) -> Self {
        Self { state, flush: None }
    }
}

impl TrackerState {
    pub fn is_tracking(&self) -> bool {
        matches!(self, TrackerState::Tracking { .. })
    }

    /// Route an event to its transition
    pub fn apply(self, event: &PlaybackEvent) -> Transition {
        match *event {
            PlaybackEvent::Play { position } => self.on_play(position),
            PlaybackEvent::TimeUpdate { position } => self.on_time_update(position),
            PlaybackEvent::Pause | PlaybackEvent::Seek { .. } | PlaybackEvent::Ended => {
                self.on_pause_or_seek()
            }
            PlaybackEvent::Teardown => self.on_teardown(),
        }
    }

    /// Open a span at `position`.
    ///
    /// A `play` while already tracking keeps the open span; players emit
    /// duplicate play events on buffering recovery.
    pub fn on_play(self, position: f64) -> Transition {
        match self {
            TrackerState::Idle if position.is_finite() => {
                let start = whole_seconds(position);
                Transition::stay(TrackerState::Tracking { start, end: start })
            }
            _ => Transition::stay(self),
        }
    }

    /// Extend the open span to cover the second at `position`.
    ///
    /// A position before the span's start means playback jumped back without
    /// a seek event; the open span is closed and a new one starts there.
    pub fn on_time_update(self, position: f64) -> Transition {
        let TrackerState::Tracking { start, end } = self else {
            return Transition::stay(self);
        };
        if !position.is_finite() {
            return Transition::stay(self);
        }

        let second = whole_seconds(position);
        if second < start {
            return Transition {
                state: TrackerState::Tracking {
                    start: second,
                    end: second + 1.0,
                },
                flush: closed_span(start, end),
            };
        }

        Transition::stay(TrackerState::Tracking {
            start,
            end: end.max(second + 1.0),
        })
    }

    /// Close the open span (pause, seek and end-of-media all land here)
    pub fn on_pause_or_seek(self) -> Transition {
        match self {
            TrackerState::Idle => Transition::stay(self),
            TrackerState::Tracking { start, end } => Transition {
                state: TrackerState::Idle,
                flush: closed_span(start, end),
            },
        }
    }

    /// Close the open span before the session goes away
    pub fn on_teardown(self) -> Transition {
        self.on_pause_or_seek()
    }
}

/// The interval for a closed span, `None` when no second was observed
fn closed_span(start: f64, end: f64) -> Option<Interval> {
    if end <= start {
        return None;
    }
    Interval::new(start, end).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn iv(start: f64, end: f64) -> Interval {
        Interval::new(start, end).unwrap()
    }

    /// Feed a sequence of events, collecting every flushed interval.
    fn run(events: &[PlaybackEvent]) -> (TrackerState, Vec<Interval>) {
        let mut state = TrackerState::default();
        let mut flushed = Vec::new();
        for event in events {
            let t = state.apply(event);
            state = t.state;
            flushed.extend(t.flush);
        }
        (state, flushed)
    }

    // ── Idle ──────────────────────────────────────────────────────────────────

    #[test]
    fn starts_idle() {
        assert_eq!(TrackerState::default(), TrackerState::Idle);
        assert!(!TrackerState::default().is_tracking());
    }

    #[test]
    fn time_update_while_idle_is_ignored() {
        let t = TrackerState::Idle.on_time_update(12.0);
        assert_eq!(t.state, TrackerState::Idle);
        assert_eq!(t.flush, None);
    }

    #[test]
    fn pause_while_idle_flushes_nothing() {
        let t = TrackerState::Idle.on_pause_or_seek();
        assert_eq!(t, Transition::stay(TrackerState::Idle));
    }

    // ── Tracking ──────────────────────────────────────────────────────────────

    #[test]
    fn play_opens_span_at_whole_second() {
        let t = TrackerState::Idle.on_play(7.8);
        assert_eq!(t.state, TrackerState::Tracking { start: 7.0, end: 7.0 });
        assert_eq!(t.flush, None);
    }

    #[test]
    fn time_updates_extend_end_to_last_second_plus_one() {
        let (state, flushed) = run(&[
            PlaybackEvent::Play { position: 0.0 },
            PlaybackEvent::TimeUpdate { position: 0.3 },
            PlaybackEvent::TimeUpdate { position: 1.2 },
            PlaybackEvent::TimeUpdate { position: 4.9 },
        ]);
        assert_eq!(state, TrackerState::Tracking { start: 0.0, end: 5.0 });
        assert!(flushed.is_empty());
    }

    #[test]
    fn pause_flushes_and_returns_to_idle() {
        let (state, flushed) = run(&[
            PlaybackEvent::Play { position: 10.0 },
            PlaybackEvent::TimeUpdate { position: 10.5 },
            PlaybackEvent::TimeUpdate { position: 14.2 },
            PlaybackEvent::Pause,
        ]);
        assert_eq!(state, TrackerState::Idle);
        assert_eq!(flushed, vec![iv(10.0, 15.0)]);
    }

    #[test]
    fn seek_ended_and_teardown_all_flush() {
        for closing in [
            PlaybackEvent::Seek { position: 90.0 },
            PlaybackEvent::Ended,
            PlaybackEvent::Teardown,
        ] {
            let (state, flushed) = run(&[
                PlaybackEvent::Play { position: 0.0 },
                PlaybackEvent::TimeUpdate { position: 2.0 },
                closing,
            ]);
            assert_eq!(state, TrackerState::Idle, "{} must close the span", closing.name());
            assert_eq!(flushed, vec![iv(0.0, 3.0)]);
        }
    }

    #[test]
    fn play_then_immediate_pause_flushes_nothing() {
        let (_, flushed) = run(&[PlaybackEvent::Play { position: 5.0 }, PlaybackEvent::Pause]);
        assert!(flushed.is_empty());
    }

    #[test]
    fn resume_after_flush_opens_a_fresh_span() {
        let (_, flushed) = run(&[
            PlaybackEvent::Play { position: 0.0 },
            PlaybackEvent::TimeUpdate { position: 3.0 },
            PlaybackEvent::Pause,
            PlaybackEvent::Play { position: 4.0 },
            PlaybackEvent::TimeUpdate { position: 6.0 },
            PlaybackEvent::Pause,
        ]);
        assert_eq!(flushed, vec![iv(0.0, 4.0), iv(4.0, 7.0)]);
    }

    #[test]
    fn time_updates_after_seek_are_ignored_until_play() {
        let (state, flushed) = run(&[
            PlaybackEvent::Play { position: 0.0 },
            PlaybackEvent::TimeUpdate { position: 1.0 },
            PlaybackEvent::Seek { position: 50.0 },
            PlaybackEvent::TimeUpdate { position: 50.5 },
        ]);
        assert_eq!(state, TrackerState::Idle);
        assert_eq!(flushed, vec![iv(0.0, 2.0)]);
    }

    #[test]
    fn duplicate_play_keeps_open_span() {
        let (state, _) = run(&[
            PlaybackEvent::Play { position: 3.0 },
            PlaybackEvent::TimeUpdate { position: 6.0 },
            PlaybackEvent::Play { position: 6.0 },
        ]);
        assert_eq!(state, TrackerState::Tracking { start: 3.0, end: 7.0 });
    }

    #[test]
    fn backwards_time_update_closes_span_and_reopens() {
        let (state, flushed) = run(&[
            PlaybackEvent::Play { position: 20.0 },
            PlaybackEvent::TimeUpdate { position: 25.0 },
            PlaybackEvent::TimeUpdate { position: 5.0 },
        ]);
        assert_eq!(flushed, vec![iv(20.0, 26.0)]);
        assert_eq!(state, TrackerState::Tracking { start: 5.0, end: 6.0 });
    }

    #[test]
    fn non_finite_positions_are_ignored() {
        assert_eq!(TrackerState::Idle.on_play(f64::NAN).state, TrackerState::Idle);

        let open = TrackerState::Tracking { start: 1.0, end: 3.0 };
        assert_eq!(open.on_time_update(f64::INFINITY).state, open);
    }
}
