use thiserror::Error;

/// Errors raised by the coverage engine and the progress stores
#[derive(Error, Debug)]
pub enum ProgressError {
    /// The backing store could not be reached (I/O, unavailable medium)
    #[error("progress store unavailable: {0}")]
    Transport(#[from] std::io::Error),

    /// Interval bounds or durations that cannot be accounted for
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The store was reachable but its contents could not be decoded or encoded
    #[error("progress store is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProgressError {
    /// Whether the error means "try the fallback store instead"
    pub fn is_transport(&self) -> bool {
        matches!(self, ProgressError::Transport(_))
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        ProgressError::MalformedInput(message.into())
    }
}

pub type ProgressResult<T> = Result<T, ProgressError>;
