//! Configuration management for cohortdesk
//!
//! This module handles loading, parsing, and validation of configuration files.

use crate::constants::{CONFIG_GENERATED, SELECTOR_DEFAULT_COOLDOWN_MS, SELECTOR_MAX_COOLDOWN_MS};
use crate::ui::components::SelectorVariant;
use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub ui: UiConfig,
    pub selector: SelectorConfig,
    pub logging: LoggingConfig,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Which roster selector to show
    /// Options: "inline", "list"
    pub selector_variant: String,
}

/// Roster selector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// How long the inline selector stays busy after a bulk add, in milliseconds
    pub cooldown_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Write logs to a file
    pub enabled: bool,
    /// Minimum level written to the file: error, warn, info, debug, trace
    pub level: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            selector_variant: "inline".to_string(),
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: SELECTOR_DEFAULT_COOLDOWN_MS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or return defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;

        if let Some(path) = config_path {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in order of precedence
    fn find_config_file() -> Result<Option<PathBuf>> {
        // 1. Check current directory
        let current_dir_config = PathBuf::from("cohortdesk.toml");
        if current_dir_config.exists() {
            return Ok(Some(current_dir_config));
        }

        // 2. Check XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("cohortdesk").join("config.toml");
            if xdg_config.exists() {
                return Ok(Some(xdg_config));
            }
        }

        Ok(None)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.ui.selector_variant.as_str(), "inline" | "list") {
            anyhow::bail!(
                "selector_variant must be \"inline\" or \"list\", got \"{}\"",
                self.ui.selector_variant
            );
        }

        if self.selector.cooldown_ms > SELECTOR_MAX_COOLDOWN_MS {
            anyhow::bail!(
                "cooldown_ms cannot exceed {} ({} given)",
                SELECTOR_MAX_COOLDOWN_MS,
                self.selector.cooldown_ms
            );
        }

        if LevelFilter::from_str(&self.logging.level).is_err() {
            anyhow::bail!("Invalid logging level '{}'", self.logging.level);
        }

        Ok(())
    }

    /// The selector variant described by `[ui]` and `[selector]`
    pub fn selector_variant(&self) -> SelectorVariant {
        match self.ui.selector_variant.as_str() {
            "list" => SelectorVariant::ListView,
            _ => SelectorVariant::Inline {
                cooldown: Duration::from_millis(self.selector.cooldown_ms),
            },
        }
    }

    /// The file log level, falling back to info for unparsable values
    pub fn log_level(&self) -> LevelFilter {
        LevelFilter::from_str(&self.logging.level).unwrap_or(LevelFilter::Info)
    }

    /// Generate default configuration file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        let toml_content = toml::to_string_pretty(&config).context("Failed to serialize default config")?;

        // Add header comment
        let header = format!(
            "# cohortdesk Configuration File\n# Generated on {}\n\n",
            chrono::Local::now().format("%Y-%m-%d")
        );

        let full_content = header + &toml_content;

        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        std::fs::write(&path, full_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        println!("{}: {}", CONFIG_GENERATED, path.as_ref().display());
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn get_xdg_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
            .map(|dir| dir.join("cohortdesk"))
    }

    /// Get the default config file path
    pub fn get_default_config_path() -> Result<PathBuf> {
        Ok(Self::get_xdg_config_dir()?.join("config.toml"))
    }
}
