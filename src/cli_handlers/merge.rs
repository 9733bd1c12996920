use crate::cli_handlers::CliCommand;
use crate::core::models::Interval;
use crate::modules::coverage::merge::{
    calculate_progress_percentage, calculate_total_watched_time, merge_intervals,
};
use crate::modules::ui::terminal::renderer::TerminalRenderer;
use anyhow::Result;

pub struct MergeCommand {
    pub intervals: Vec<Interval>,
    pub duration: Option<f64>,
}

impl CliCommand for MergeCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let merged = merge_intervals(&self.intervals);
        let ui = TerminalRenderer::new();

        ui.print_coverage(&merged, calculate_total_watched_time(&merged));
        if let Some(duration) = self.duration {
            let percentage = calculate_progress_percentage(&self.intervals, duration);
            ui.print_message(&format!("Progress: {:.2}% of {}s", percentage, duration));
        }

        Ok(())
    }
}
