use crate::application::config::Settings;
use crate::cli_handlers::{CliCommand, build_service};
use crate::core::models::{Interval, ProgressKey};
use crate::modules::ui::progress_formatter::ProgressFormatter;
use crate::modules::ui::terminal::renderer::TerminalRenderer;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub struct UpdateCommand {
    pub store: Option<PathBuf>,
    pub user: String,
    pub video: String,
    pub duration: f64,
    pub compact: bool,
    pub intervals: Vec<Interval>,
}

impl CliCommand for UpdateCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let settings = Settings::load()?;
        let service = build_service(&settings, self.store)?;
        let ui = TerminalRenderer::new();
        let key = ProgressKey::new(self.user, self.video);

        let response = service
            .update_progress(&key, &self.intervals, self.duration)
            .with_context(|| format!("Could not update progress for {}", key))?;

        let formatted = if self.compact {
            ProgressFormatter::compact_formatter().format(&response, self.duration)
        } else {
            ProgressFormatter::default_formatter().format(&response, self.duration)
        };
        ui.print_progress(&formatted);

        Ok(())
    }
}
