use crate::application::config::Settings;
use crate::cli_handlers::CliCommand;
use crate::modules::ui::terminal::renderer::TerminalRenderer;
use anyhow::Result;
use std::path::PathBuf;

pub struct ConfigCommand {
    pub clamp: Option<bool>,
    pub decimals: Option<u32>,
    pub retain_failed: Option<bool>,
    pub store_path: Option<PathBuf>,
}

impl ConfigCommand {
    fn has_changes(&self) -> bool {
        self.clamp.is_some()
            || self.decimals.is_some()
            || self.retain_failed.is_some()
            || self.store_path.is_some()
    }

    fn apply_to(&self, settings: &mut Settings) {
        if let Some(clamp) = self.clamp {
            settings.clamp_percentage = clamp;
        }
        if let Some(decimals) = self.decimals {
            settings.decimal_places = decimals;
        }
        if let Some(retain) = self.retain_failed {
            settings.retain_failed_flushes = retain;
        }
        if let Some(path) = &self.store_path {
            settings.store_path = Some(path.clone());
        }
    }
}

impl CliCommand for ConfigCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let mut settings = Settings::load()?;
        let ui = TerminalRenderer::new();

        if self.has_changes() {
            self.apply_to(&mut settings);
            settings.save()?;
            ui.print_message("✓ Settings updated");
        }

        ui.print_message(&toml::to_string_pretty(&settings)?);

        Ok(())
    }
}
