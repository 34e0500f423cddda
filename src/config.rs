//! Rule files.
//!
//! Rules can be kept in a TOML file instead of being typed on the command
//! line every time. Rows are read in file order and go through the same
//! validation as rows given on the command line.
//!
//! # Configuration File Format
//!
//! ```toml
//! [listing]
//! order = "descending"
//!
//! [[rules]]
//! before = "cat"
//! after = "feline"
//!
//! [[rules]]
//! before = "IMG_"
//! after = "holiday_"
//! ```

use crate::listing::SortOrder;
use crate::rules::RuleRow;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the current directory when no path is given.
pub const LOCAL_CONFIG_FILE: &str = ".multirename.toml";

/// Errors that can occur while loading a rule file.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Rule rows and display preferences loaded from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameConfig {
    #[serde(default)]
    pub listing: ListingConfig,

    /// Rule rows, in the order they are applied.
    #[serde(default)]
    pub rules: Vec<RuleRow>,
}

/// How the directory listing is shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingConfig {
    #[serde(default)]
    pub order: SortOrder,
}

impl RenameConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// 1. If `config_path` is provided, load from that file
    /// 2. Otherwise look for `.multirename.toml` in the current directory
    /// 3. Otherwise use the defaults: no rules, ascending listing
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen file cannot be read or parsed.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            log::debug!("Using rule file {}", local_config.display());
            return Self::load_from_file(&local_config);
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::parse(&content)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }
}
