use crate::application::config::Settings;
use crate::cli_handlers::{CliCommand, build_service};
use crate::core::models::ProgressKey;
use crate::modules::ui::progress_formatter::ProgressFormatter;
use crate::modules::ui::terminal::renderer::TerminalRenderer;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub struct GetCommand {
    pub store: Option<PathBuf>,
    pub user: String,
    pub video: String,
    pub duration: f64,
    pub compact: bool,
}

impl CliCommand for GetCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let settings = Settings::load()?;
        let service = build_service(&settings, self.store)?;
        let ui = TerminalRenderer::new();
        let key = ProgressKey::new(self.user, self.video);

        let response = service
            .get_progress(&key, self.duration)
            .with_context(|| format!("Could not read progress for {}", key))?;

        let formatted = if self.compact {
            ProgressFormatter::compact_formatter().format(&response, self.duration)
        } else {
            ProgressFormatter::default_formatter().format(&response, self.duration)
        };
        ui.print_progress(&formatted);

        Ok(())
    }
}
