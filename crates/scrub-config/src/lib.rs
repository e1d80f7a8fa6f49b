use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for forum-scrub
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub redaction: RedactionConfig,

    #[serde(default)]
    pub run: RunConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file holding the roster and the forum table
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    /// Destination table for redacted posts
    #[serde(default = "default_forum_table")]
    pub forum_table: String,

    /// Table listing in-the-clear user names
    #[serde(default = "default_roster_table")]
    pub roster_table: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedactionConfig {
    /// Also remove any known first name found in a post (off: too many
    /// first names are ordinary words)
    #[serde(default)]
    pub token_pass: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Log a progress line every N inserted records
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,

    /// Where to dump the first-name token set (JSON)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_tokens_path: Option<PathBuf>,

    /// Write logs to a timestamped file in this directory instead of stderr
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            forum_table: default_forum_table(),
            roster_table: default_roster_table(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            progress_interval: default_progress_interval(),
            first_tokens_path: None,
            log_dir: None,
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("forum.db")
}

fn default_forum_table() -> String {
    "contents".to_string()
}

fn default_roster_table() -> String {
    "UserGrade".to_string()
}

fn default_progress_interval() -> usize {
    100
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            Self::load_from(&path)
        } else {
            // Create default config file
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(&path, content)?;
            Ok(config)
        }
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("org", "forum-scrub", "forum-scrub") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.forum-scrub/config.toml")
        }
    }
}
