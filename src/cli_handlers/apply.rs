use crate::application::config::Settings;
use crate::cli_handlers::{CliCommand, build_service};
use crate::core::models::UpdateProgressRequest;
use crate::modules::ui::terminal::renderer::TerminalRenderer;
use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

pub struct ApplyCommand {
    pub store: Option<PathBuf>,
    pub file: PathBuf,
}

impl CliCommand for ApplyCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let settings = Settings::load()?;
        let service = build_service(&settings, self.store)?;
        let ui = TerminalRenderer::new();

        let body = read_input(&self.file)?;
        let request: UpdateProgressRequest =
            serde_json::from_str(&body).context("Invalid update_progress request")?;

        let response = service.apply_request(&request)?;
        ui.print_message(&serde_json::to_string_pretty(&response)?);

        Ok(())
    }
}

/// Read the whole request from a file, or stdin for `-`
fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .context("Could not read request from stdin")?;
        return Ok(body);
    }
    fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))
}
