use crate::error::{GameLibError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// SteamConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteamConfig {
    #[serde(default = "default_steam_base")]
    pub api_base: String,
    #[serde(default = "default_true")]
    pub include_free_games: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_steam_base() -> String {
    "https://api.steampowered.com".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for SteamConfig {
    fn default() -> Self {
        Self {
            api_base: default_steam_base(),
            include_free_games: true,
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ---------------------------------------------------------------------------
// PollConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_poll_base")]
    pub api_base: String,
    #[serde(default = "default_poll_title")]
    pub title: String,
    #[serde(default = "default_true")]
    pub multi: bool,
    #[serde(default = "default_dupcheck")]
    pub dupcheck: String,
    #[serde(default)]
    pub captcha: bool,
    #[serde(default = "default_max_options")]
    pub max_options: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_poll_base() -> String {
    "https://www.strawpoll.me".to_string()
}

fn default_poll_title() -> String {
    "What to play?".to_string()
}

fn default_dupcheck() -> String {
    "normal".to_string()
}

fn default_max_options() -> usize {
    30
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            api_base: default_poll_base(),
            title: default_poll_title(),
            multi: true,
            dupcheck: default_dupcheck(),
            captcha: false,
            max_options: default_max_options(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ---------------------------------------------------------------------------
// StorageConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database file name, relative to `.gamelib/`.
    #[serde(default = "default_db_file")]
    pub db_file: String,
}

fn default_db_file() -> String {
    paths::DEFAULT_DB_FILE.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_file: default_db_file(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub steam: SteamConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            steam: SteamConfig::default(),
            poll: PollConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(GameLibError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn db_path(&self, root: &Path) -> std::path::PathBuf {
        paths::db_path(root, &self.storage.db_file)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        for (name, base) in [
            ("steam.api_base", &self.steam.api_base),
            ("poll.api_base", &self.poll.api_base),
        ] {
            if base.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("{name} is empty"),
                });
            } else if !base.starts_with("http://") && !base.starts_with("https://") {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("{name} '{base}' is not an http(s) URL"),
                });
            }
        }

        // a poll with fewer than two options cannot be created
        if self.poll.max_options < 2 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "poll.max_options={} leaves no room for a poll (need at least 2)",
                    self.poll.max_options
                ),
            });
        }

        if self.poll.title.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "poll.title is empty".to_string(),
            });
        }

        if self.storage.db_file.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "storage.db_file is empty".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
