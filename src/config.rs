use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GuardedPushError, Result};
use crate::logging::{Level, Style};

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "guardedpush.toml";

/// File name looked up in the user config directory
pub const USER_CONFIG_FILE: &str = ".guardedpush.toml";

/// Placeholder replaced by the deleted path in the deletion commit template
pub const FILE_PLACEHOLDER: &str = "{file}";

/// Represents the complete configuration for guarded-push.
///
/// Every section is optional; missing keys fall back to defaults.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub stash: StashConfig,

    #[serde(default)]
    pub deletions: DeletionsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_remote_name() -> String {
    "origin".to_string()
}

fn default_stash_message() -> String {
    "Auto stash before rebase".to_string()
}

fn default_deletion_message() -> String {
    "chore({file}): Handle deletions".to_string()
}

fn default_true() -> bool {
    true
}

/// Remote used for fetch, rebase and push.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RemoteConfig {
    #[serde(default = "default_remote_name")]
    pub name: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            name: default_remote_name(),
        }
    }
}

/// How local changes are set aside around the rebase.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StashConfig {
    #[serde(default = "default_stash_message")]
    pub message: String,

    #[serde(default = "default_true")]
    pub include_untracked: bool,
}

impl Default for StashConfig {
    fn default() -> Self {
        StashConfig {
            message: default_stash_message(),
            include_untracked: true,
        }
    }
}

/// Commit template for files deleted on disk but still tracked.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DeletionsConfig {
    #[serde(default = "default_deletion_message")]
    pub message: String,
}

impl DeletionsConfig {
    /// Commit message for a single deleted path
    pub fn message_for(&self, file: &str) -> String {
        self.message.replace(FILE_PLACEHOLDER, file)
    }
}

impl Default for DeletionsConfig {
    fn default() -> Self {
        DeletionsConfig {
            message: default_deletion_message(),
        }
    }
}

fn default_level() -> Level {
    Level::Info
}

/// Console logger settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: Level,

    #[serde(default)]
    pub style: Style,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_level(),
            style: Style::default(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `guardedpush.toml` in current directory
/// 3. `.guardedpush.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    match locate_config(config_path) {
        Some(path) => load_from_path(&path),
        None => Ok(Config::default()),
    }
}

fn locate_config(config_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(PathBuf::from(path));
    }

    let local = Path::new(".").join(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(USER_CONFIG_FILE))
        .filter(|path| path.exists())
}

fn load_from_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path).map_err(|e| {
        GuardedPushError::config(format!("Cannot read {}: {}", path.display(), e))
    })?;

    parse_config(&contents)
        .map_err(|e| GuardedPushError::config(format!("Invalid {}: {}", path.display(), e)))
}

/// Parse configuration from TOML text
pub fn parse_config(contents: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(contents)
}
