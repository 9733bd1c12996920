use crate::utils::{APP_NAME, CONFIG_FILE_NAME};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// User settings, read from `<config_dir>/watch-progress/config.toml`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Durable store file; defaults to `progress.json` next to the config
    pub store_path: Option<PathBuf>,

    /// Cap reported percentages at 100
    pub clamp_percentage: bool,

    /// Digits kept after the decimal point in `progress_percentage`
    pub decimal_places: u32,

    /// Keep coverage whose flush failed to persist and resend it with the next flush
    pub retain_failed_flushes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: None,
            clamp_percentage: false,
            decimal_places: 2,
            retain_failed_flushes: true,
        }
    }
}

impl Settings {
    /// Directory holding the config and, by default, the store
    pub fn config_dir() -> Result<PathBuf> {
        let mut path = dirs::config_dir().context("Could not find config directory")?;
        path.push(APP_NAME);
        Ok(path)
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load from the default location; a missing file yields defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read settings from {}", path.display()))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Invalid settings in {}", path.display()))?;
        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Could not write settings to {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.decimal_places, 2);
        assert!(!settings.clamp_percentage);
        assert!(settings.retain_failed_flushes);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "clamp_percentage = true\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert!(settings.clamp_percentage);
        assert_eq!(settings.decimal_places, 2);
        assert_eq!(settings.store_path, None);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");
        let settings = Settings {
            store_path: Some(dir.path().join("progress.json")),
            clamp_percentage: true,
            decimal_places: 1,
            retain_failed_flushes: false,
        };

        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "decimal_places = \"two\"\n").unwrap();

        assert!(Settings::load_from(&path).is_err());
    }
}
