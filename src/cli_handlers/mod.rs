mod apply;
mod get;
mod merge;
mod replay;
mod settings;
mod update;

pub use apply::ApplyCommand;
pub use get::GetCommand;
pub use merge::MergeCommand;
pub use replay::ReplayCommand;
pub use settings::ConfigCommand;
pub use update::UpdateCommand;

use crate::application::config::Settings;
use crate::application::service::{PercentagePolicy, ProgressService};
use crate::cli::{Cli, Commands};
use crate::core::traits::ProgressStore;
use crate::modules::storage::json_backend::JsonProgressStore;
use crate::modules::storage::memory_backend::MemoryProgressStore;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Every CLI command implements this trait.
///
/// Commands own their arguments and are consumed on execution, so they run exactly once.
pub trait CliCommand {
    fn execute(self: Box<Self>) -> Result<()>;
}

/// Converts parsed [`Cli`] arguments into a boxed [`CliCommand`] ready to execute.
///
/// Keeping this in one place means `main.rs` never needs to know about concrete command types.
pub fn from_cli(cli: Cli) -> Box<dyn CliCommand> {
    let store = cli.store;
    match cli.command {
        Commands::Merge { intervals, duration } => Box::new(MergeCommand { intervals, duration }),
        Commands::Update {
            user,
            video,
            duration,
            compact,
            intervals,
        } => Box::new(UpdateCommand {
            store,
            user,
            video,
            duration,
            compact,
            intervals,
        }),
        Commands::Get {
            user,
            video,
            duration,
            compact,
        } => Box::new(GetCommand {
            store,
            user,
            video,
            duration,
            compact,
        }),
        Commands::Apply { file } => Box::new(ApplyCommand { store, file }),
        Commands::Replay {
            user,
            video,
            duration,
            file,
        } => Box::new(ReplayCommand {
            store,
            user,
            video,
            duration,
            file,
        }),
        Commands::Config {
            clamp,
            decimals,
            retain_failed,
            store_path,
        } => Box::new(ConfigCommand {
            clamp,
            decimals,
            retain_failed,
            store_path,
        }),
    }
}

/// Durable store path chosen by `--store` or the settings, `None` for the default location
fn resolve_store_path(settings: &Settings, store_override: Option<PathBuf>) -> Option<PathBuf> {
    store_override.or_else(|| settings.store_path.clone())
}

/// Build the progress service used by store-backed commands
///
/// The transient fallback is created once here and shared by every
/// operation of the process. If the durable store cannot even be opened the
/// transient store becomes the only store.
fn build_service(settings: &Settings, store_override: Option<PathBuf>) -> Result<Arc<ProgressService>> {
    let opened = match resolve_store_path(settings, store_override) {
        Some(path) => JsonProgressStore::with_path(path),
        None => JsonProgressStore::new(),
    };

    let primary: Box<dyn ProgressStore> = match opened {
        Ok(store) => {
            debug!(path = %store.path().display(), "using json progress store");
            Box::new(store)
        }
        Err(e) => {
            warn!(error = %e, "progress store unavailable, using transient store");
            Box::new(MemoryProgressStore::new())
        }
    };

    let service = ProgressService::new(primary)
        .with_fallback(MemoryProgressStore::new())
        .with_policy(PercentagePolicy::from_settings(settings));
    Ok(Arc::new(service))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_override_wins_over_settings() {
        let settings = Settings {
            store_path: Some(PathBuf::from("/data/configured.json")),
            ..Default::default()
        };
        let path = resolve_store_path(&settings, Some(PathBuf::from("/tmp/override.json")));
        assert_eq!(path, Some(PathBuf::from("/tmp/override.json")));

        let path = resolve_store_path(&settings, None);
        assert_eq!(path, Some(PathBuf::from("/data/configured.json")));

        assert_eq!(resolve_store_path(&Settings::default(), None), None);
    }

    #[test]
    fn built_service_persists_to_the_chosen_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        let service = build_service(&Settings::default(), Some(path.clone())).unwrap();

        let key = crate::core::models::ProgressKey::new("u", "v");
        let interval = crate::core::models::Interval::new(0.0, 30.0).unwrap();
        service.update_progress(&key, &[interval], 60.0).unwrap();

        assert!(path.exists());
        let reopened = build_service(&Settings::default(), Some(path)).unwrap();
        assert_eq!(reopened.get_progress(&key, 60.0).unwrap().progress_percentage, 50.0);
    }
}
