//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name of the per-directory config
pub const LOCAL_CONFIG_FILE: &str = "shipquote.yaml";

/// Environment variable overriding the dataset directory
pub const DATA_DIR_ENV: &str = "SHIPQUOTE_DATA_DIR";

/// Environment variable overriding the default output format
pub const FORMAT_ENV: &str = "SHIPQUOTE_FORMAT";

/// shipquote configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dataset directory replacing the embedded dataset
    pub data_dir: Option<PathBuf>,

    /// Default output format
    pub default_format: Option<String>,

    /// Log filter used when neither SHIPQUOTE_LOG nor -v/-q is given
    pub log_level: Option<String>,

    /// Config files that existed but could not be read
    #[serde(skip)]
    pub problems: Vec<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Global user config (~/.config/shipquote/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            config.merge_file(&global_path);
        }

        // 2. Local config (./shipquote.yaml)
        config.merge_file(Path::new(LOCAL_CONFIG_FILE));

        // 3. Environment variables
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.is_empty() {
                config.data_dir = Some(PathBuf::from(dir));
            }
        }
        if let Ok(format) = std::env::var(FORMAT_ENV) {
            if !format.is_empty() {
                config.default_format = Some(format);
            }
        }

        config
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "shipquote")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge a config file if it exists; unreadable files are recorded in `problems`
    pub fn merge_file(&mut self, path: &Path) {
        if !path.exists() {
            return;
        }

        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|contents| Self::from_yaml(&contents).map_err(|e| e.to_string()));

        match parsed {
            Ok(other) => self.merge(other),
            Err(e) => self
                .problems
                .push(format!("ignoring {}: {}", path.display(), e)),
        }
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yml::Error> {
        // An empty file is a valid, empty config
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yml::from_str(contents)
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.data_dir.is_some() {
            self.data_dir = other.data_dir;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
        self.problems.extend(other.problems);
    }
}
