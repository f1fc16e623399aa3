//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{
    APP_NAME, DEFAULT_BATCH_SIZE, DEFAULT_ITEM_MARGIN, DEFAULT_LOCALE, DEFAULT_SENTINEL_MARGIN,
    DEFAULT_STAGGER_CAP_MS, DEFAULT_STAGGER_STEP_MS,
};

/// Theme display mode preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemeMode {
    /// Automatically detect OS theme (dark/light)
    #[default]
    Auto,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Catalog export opened when no file is given on the command line
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

/// Catalog browsing behaviour.
///
/// Read once at startup; the view never changes these while running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseConfig {
    /// Items revealed per batch (manual and automatic growth)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Rows around the viewport within which the load-more sentinel counts as visible
    #[serde(default = "default_sentinel_margin")]
    pub sentinel_margin: u32,
    /// Rows around the viewport within which an item placeholder counts as visible
    #[serde(default = "default_item_margin")]
    pub item_margin: u32,
    /// Reveal stagger per position within a batch (milliseconds)
    #[serde(default = "default_stagger_step_ms")]
    pub stagger_step_ms: u64,
    /// Maximum reveal stagger (milliseconds)
    #[serde(default = "default_stagger_cap_ms")]
    pub stagger_cap_ms: u64,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_sentinel_margin() -> u32 {
    DEFAULT_SENTINEL_MARGIN
}

fn default_item_margin() -> u32 {
    DEFAULT_ITEM_MARGIN
}

fn default_stagger_step_ms() -> u64 {
    DEFAULT_STAGGER_STEP_MS
}

fn default_stagger_cap_ms() -> u64 {
    DEFAULT_STAGGER_CAP_MS
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            sentinel_margin: default_sentinel_margin(),
            item_margin: default_item_margin(),
            stagger_step_ms: default_stagger_step_ms(),
            stagger_cap_ms: default_stagger_cap_ms(),
        }
    }
}

/// UI preferences configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Theme mode preference (Auto, Dark, Light)
    #[serde(default)]
    pub theme_mode: ThemeMode,
    /// Display locale for names and labels (search always covers every locale)
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme_mode: ThemeMode::default(),
            locale: default_locale(),
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/LazyShelf/config.toml`
/// - macOS: `~/Library/Application Support/LazyShelf/config.toml`
/// - Windows: `%APPDATA%\LazyShelf\config.toml`
///
/// # Validation
///
/// - `batch_size` must be at least 1
/// - `stagger_step_ms` must not exceed `stagger_cap_ms`
/// - `locale` must be non-empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// File system paths
    #[serde(default)]
    pub paths: PathConfig,
    /// Browsing behaviour
    #[serde(default)]
    pub browse: BrowseConfig,
    /// UI preferences
    #[serde(default)]
    pub ui: UiConfig,
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
            .join(APP_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from a specific file, defaulting when it is missing.
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

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the config file using atomic write.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to a specific file using temp file + rename.
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
        if self.browse.batch_size == 0 {
            anyhow::bail!("browse.batch_size must be at least 1");
        }

        if self.browse.stagger_step_ms > self.browse.stagger_cap_ms {
            anyhow::bail!(
                "browse.stagger_step_ms ({}) exceeds browse.stagger_cap_ms ({})",
                self.browse.stagger_step_ms,
                self.browse.stagger_cap_ms
            );
        }

        if self.ui.locale.trim().is_empty() {
            anyhow::bail!("ui.locale cannot be empty");
        }

        Ok(())
    }
}
