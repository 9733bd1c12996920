use crate::core::models::ProgressResponse;
use std::time::Duration;

/// Formats a duration as MM:SS or HH:MM:SS
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Formats a duration in a compact form (e.g., "3:45" instead of "03:45")
pub fn format_duration_compact(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Converts a position in seconds to a `Duration`
///
/// Bad or negative values become zero; values past `Duration::MAX` saturate.
pub fn seconds_to_duration(seconds: f64) -> Duration {
    if seconds.is_finite() && seconds > 0.0 {
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}

/// Represents formatted progress information ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedProgress {
    pub position_text: String,
    pub duration_text: String,
    pub percentage_text: String,
    pub combined_label: String,
}

/// Strategy pattern for different progress label formats
pub trait ProgressLabelFormatter {
    fn format(&self, position: Duration, total: Duration, percentage: f64) -> String;
}

/// Default formatter: "Progress: 20.00% | 00:20 / 01:40"
pub struct DefaultProgressFormatter;

impl ProgressLabelFormatter for DefaultProgressFormatter {
    fn format(&self, position: Duration, total: Duration, percentage: f64) -> String {
        format!(
            "Progress: {:.2}% | {} / {}",
            percentage,
            format_duration(position),
            format_duration(total)
        )
    }
}

/// Compact formatter: "20.00% 0:20/1:40"
pub struct CompactProgressFormatter;

impl ProgressLabelFormatter for CompactProgressFormatter {
    fn format(&self, position: Duration, total: Duration, percentage: f64) -> String {
        format!(
            "{:.2}% {}/{}",
            percentage,
            format_duration_compact(position),
            format_duration_compact(total)
        )
    }
}

/// Factory for creating formatted progress information
pub struct ProgressFormatter<F: ProgressLabelFormatter> {
    label_formatter: F,
}

impl<F: ProgressLabelFormatter> ProgressFormatter<F> {
    pub fn new(label_formatter: F) -> Self {
        Self { label_formatter }
    }

    pub fn format(&self, response: &ProgressResponse, video_duration: f64) -> FormattedProgress {
        let position = seconds_to_duration(response.last_position);
        let total = seconds_to_duration(video_duration);

        FormattedProgress {
            position_text: format_duration(position),
            duration_text: format_duration(total),
            percentage_text: format!("{:.2}%", response.progress_percentage),
            combined_label: self
                .label_formatter
                .format(position, total, response.progress_percentage),
        }
    }
}

// Convenience constructors
impl ProgressFormatter<DefaultProgressFormatter> {
    pub fn default_formatter() -> Self {
        Self::new(DefaultProgressFormatter)
    }
}

impl ProgressFormatter<CompactProgressFormatter> {
    pub fn compact_formatter() -> Self {
        Self::new(CompactProgressFormatter)
    }
}
