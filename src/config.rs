//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_DIR_NAME, DEFAULT_LAYOUT_TAG, DEFAULT_VOLUME};
use crate::models::Volume;

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Directory holding template records (defaults to `<config dir>/templates`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_dir: Option<PathBuf>,
}

/// Sound output settings applied at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Initial volume (0.0 - 1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,
    /// Whether key presses play sounds
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_volume() -> f32 {
    DEFAULT_VOLUME
}

fn default_enabled() -> bool {
    true
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            enabled: default_enabled(),
        }
    }
}

/// Keyboard preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardConfig {
    /// Layout tag recorded with saved templates ("67%", "75%", "100%")
    #[serde(default = "default_layout")]
    pub layout: String,
}

fn default_layout() -> String {
    DEFAULT_LAYOUT_TAG.to_string()
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            layout: default_layout(),
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/KeyAura/config.toml`
/// - macOS: `~/Library/Application Support/KeyAura/config.toml`
/// - Windows: `%APPDATA%\KeyAura\config.toml`
///
/// # Validation
///
/// - `playback.volume` must be within 0.0 - 1.0
/// - `keyboard.layout` must not be empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// File system paths
    #[serde(default)]
    pub paths: PathConfig,
    /// Playback settings
    #[serde(default)]
    pub playback: PlaybackConfig,
    /// Keyboard settings
    #[serde(default)]
    pub keyboard: KeyboardConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(CONFIG_DIR_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Resolves the template directory: the configured one, or `<config dir>/templates`.
    pub fn template_dir(&self) -> Result<PathBuf> {
        match &self.paths.template_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::config_dir()?.join("templates")),
        }
    }

    /// Loads configuration from the default config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from `config_path`, or defaults if it doesn't exist.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate().context(format!(
            "Invalid config file: {}",
            config_path.display()
        ))?;

        Ok(config)
    }

    /// Saves configuration to the default config file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to `config_path` using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir).context(format!(
                "Failed to create config directory: {}",
                config_dir.display()
            ))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        if Volume::new(self.playback.volume).is_err() {
            anyhow::bail!(
                "Volume must be between 0.0 and 1.0, got {}",
                self.playback.volume
            );
        }

        if self.keyboard.layout.trim().is_empty() {
            anyhow::bail!("Keyboard layout tag cannot be empty");
        }

        Ok(())
    }

    /// Validated startup volume.
    pub fn volume(&self) -> Result<Volume> {
        Volume::new(self.playback.volume).map_err(anyhow::Error::from)
    }
}
