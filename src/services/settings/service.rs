use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::Settings;

const SETTINGS_FILE: &str = "settings.toml";

/// Loads and stores panel settings in a TOML file.
pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Service bound to the platform configuration directory.
    pub fn with_default_path() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn default_path() -> Result<PathBuf> {
        ProjectDirs::from("com", "Ken24T", "calendar-panel")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
            .ok_or_else(|| anyhow!("Could not determine a configuration directory"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and validate the settings file
    pub fn get(&self) -> Result<Settings> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings in {}", self.path.display()))?;

        if let Err(e) = settings.validate() {
            log::warn!("Rejecting settings in {}: {}", self.path.display(), e);
            return Err(anyhow!("Invalid settings in {}: {}", self.path.display(), e));
        }

        Ok(settings)
    }

    /// Like [`get`](Self::get), but a missing file yields the defaults.
    pub fn get_or_default(&self) -> Result<Settings> {
        if !self.path.exists() {
            log::info!(
                "No settings file at {}, using defaults",
                self.path.display()
            );
            return Ok(Settings::default());
        }
        self.get()
    }

    /// Validate and write settings, creating the parent directory if needed
    pub fn update(&self, settings: &Settings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))?;

        log::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}
