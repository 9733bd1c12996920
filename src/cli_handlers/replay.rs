use crate::application::config::Settings;
use crate::cli_handlers::{CliCommand, build_service};
use crate::core::events::{EventReceiver, EventSender, PlaybackEvent};
use crate::core::models::ProgressKey;
use crate::modules::tracking::session::PlaybackSession;
use crate::modules::ui::progress_formatter::{ProgressFormatter, format_duration, seconds_to_duration};
use crate::modules::ui::terminal::renderer::TerminalRenderer;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub struct ReplayCommand {
    pub store: Option<PathBuf>,
    pub user: String,
    pub video: String,
    pub duration: f64,
    pub file: PathBuf,
}

impl CliCommand for ReplayCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let settings = Settings::load()?;
        let service = build_service(&settings, self.store)?;
        let ui = TerminalRenderer::new();

        let script = fs::read_to_string(&self.file)
            .with_context(|| format!("Could not read {}", self.file.display()))?;
        let events: Vec<PlaybackEvent> =
            serde_json::from_str(&script).context("Invalid playback event script")?;

        let key = ProgressKey::new(self.user, self.video);
        let mut session = PlaybackSession::start(service, key, self.duration)
            .with_retain_failed_flushes(settings.retain_failed_flushes);
        let formatter = ProgressFormatter::default_formatter();
        ui.print_message(&format!(
            "Resuming at {}",
            format_duration(seconds_to_duration(session.resume_position()))
        ));
        ui.print_progress(&formatter.format(&session.snapshot(), self.duration));

        let (tx, rx): (EventSender, EventReceiver) = crossbeam_channel::unbounded();
        for event in events {
            tx.send(event)?;
        }
        drop(tx);

        let response = session.run(rx);
        let watched = session.watched();
        ui.print_coverage(watched.as_slice(), watched.total_watched());
        ui.print_progress_details(&formatter.format(&response, self.duration));

        Ok(())
    }
}
