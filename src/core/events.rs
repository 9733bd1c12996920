use serde::{Deserialize, Serialize};

/// Playback events a session reacts to
///
/// Positions are the player's current time in seconds. Scripts for the
/// `replay` command use the same shape, e.g. `{"event": "play", "position": 0}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// Playback started or resumed at `position`
    Play { position: f64 },

    /// Periodic current-time report while playing
    TimeUpdate { position: f64 },

    /// Playback paused
    Pause,

    /// User jumped to `position`
    ///
    /// Only closes the open span; the target is not tracked until the next
    /// `Play` reopens a span there.
    Seek { position: f64 },

    /// Media reached its end
    Ended,

    /// The session is going away (player closed, tab unloaded)
    Teardown,
}

impl PlaybackEvent {
    /// Short label for log lines
    pub fn name(&self) -> &'static str {
        match self {
            PlaybackEvent::Play { .. } => "play",
            PlaybackEvent::TimeUpdate { .. } => "timeupdate",
            PlaybackEvent::Pause => "pause",
            PlaybackEvent::Seek { .. } => "seek",
            PlaybackEvent::Ended => "ended",
            PlaybackEvent::Teardown => "teardown",
        }
    }
}

/// Type alias for event sender
pub type EventSender = crossbeam_channel::Sender<PlaybackEvent>;

/// Type alias for event receiver
pub type EventReceiver = crossbeam_channel::Receiver<PlaybackEvent>;
