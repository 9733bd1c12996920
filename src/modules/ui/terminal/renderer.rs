use crate::core::models::Interval;
use crate::modules::ui::progress_formatter::FormattedProgress;

/// Plain stdout/stderr output for one-shot commands
pub struct TerminalRenderer;

impl TerminalRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn print_message(&self, message: &str) {
        println!("{}", message);
    }

    pub fn print_progress(&self, progress: &FormattedProgress) {
        println!("{}", progress.combined_label);
    }

    /// Multi-line summary printed when a session ends
    pub fn print_progress_details(&self, progress: &FormattedProgress) {
        println!("Watched:       {}", progress.percentage_text);
        println!("Last position: {}", progress.position_text);
        println!("Duration:      {}", progress.duration_text);
    }

    pub fn print_coverage(&self, intervals: &[Interval], total_watched: f64) {
        if intervals.is_empty() {
            println!("Nothing watched");
            return;
        }
        let total = intervals.len();
        for (index, interval) in intervals.iter().enumerate() {
            println!("[{}/{}] {}", index + 1, total, interval);
        }
        println!("Total watched: {}s", total_watched);
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}
