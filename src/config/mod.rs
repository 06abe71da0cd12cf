//! Configuration management
//!
//! Handles the ~/.pneumatic-conditions/ directory and its config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::editor::DEFAULT_ORDER_BASE;
use crate::operators::Messages;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// First `order` value when conditions are renumbered
    #[serde(default = "default_order_base")]
    pub order_base: usize,
    /// Whether the account's plan includes conditions
    #[serde(default = "default_access_conditions")]
    pub access_conditions: bool,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
}

fn default_order_base() -> usize {
    DEFAULT_ORDER_BASE
}

fn default_access_conditions() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            order_base: default_order_base(),
            access_conditions: default_access_conditions(),
            logging: LoggingConfig::default(),
            messages: MessagesConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// tracing filter used when RUST_LOG is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MessagesConfig {
    /// TOML dictionary overriding the built-in labels
    pub path: Option<PathBuf>,
}

impl Config {
    /// Built-in labels with the configured overrides applied
    pub fn load_messages(&self) -> Result<Messages> {
        let messages = Messages::english();
        match &self.messages.path {
            Some(path) => Ok(messages.merged_with(Messages::from_toml_file(path)?)),
            None => Ok(messages),
        }
    }
}

/// Returns the path to the home directory (~/.pneumatic-conditions)
pub fn conditions_home() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".pneumatic-conditions"))
}

/// Paths of the configuration directory
pub struct ConditionsPaths {
    pub root: PathBuf,
    pub config: PathBuf,
}

impl ConditionsPaths {
    pub fn new() -> Result<Self> {
        let root = conditions_home()?;
        Ok(Self::at(root))
    }

    pub fn at(root: PathBuf) -> Self {
        Self {
            config: root.join("config.toml"),
            root,
        }
    }

    /// Create the directory if it doesn't exist
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.root).context("Failed to create config directory")?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.config.exists()
    }
}

/// Load configuration from the default location
pub fn load_config() -> Result<Config> {
    let paths = ConditionsPaths::new()?;
    load_config_from(&paths.config)
}

/// Load configuration from a file; a missing file yields defaults
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(path).context("Failed to read config.toml")?;
    toml::from_str(&content).context("Failed to parse config.toml")
}

/// Save configuration to a file
pub fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(path, content).context("Failed to write config.toml")?;
    Ok(())
}
