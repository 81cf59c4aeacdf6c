//! Configuration types and parsing for sparkify.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Path value that selects a private in-memory database
pub const MEMORY_DB_PATH: &str = ":memory:";

const DEFAULT_PROJECT_NAME: &str = "sparkify";
const DEFAULT_DB_PATH: &str = "sparkify.duckdb";
const DEFAULT_SONG_DATA: &str = "data/song_data";
const DEFAULT_LOG_DATA: &str = "data/log_data";

/// Default source file extension
pub const DEFAULT_EXTENSION: &str = "json";
/// Artist name probed when none is configured
pub const DEFAULT_PROBE_ARTIST: &str = "Casual";

/// Main project configuration from sparkify.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Input data locations
    #[serde(default)]
    pub data: DataConfig,

    /// Verification harness settings
    #[serde(default)]
    pub verify: VerifyConfig,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database path (DuckDB file, or `:memory:`)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Input data roots
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    /// Root directory of the song metadata files
    #[serde(default = "default_song_data")]
    pub song_data: String,

    /// Root directory of the event log files
    #[serde(default = "default_log_data")]
    pub log_data: String,

    /// File extension (without dot) of input files
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            song_data: default_song_data(),
            log_data: default_log_data(),
            extension: default_extension(),
        }
    }
}

/// Verification harness settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifyConfig {
    /// Artist name the parameterized smoke query looks up
    #[serde(default = "default_probe_artist")]
    pub probe_artist: String,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            probe_artist: default_probe_artist(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROJECT_NAME.to_string(),
            database: DatabaseConfig::default(),
            data: DataConfig::default(),
            verify: VerifyConfig::default(),
        }
    }
}

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_song_data() -> String {
    DEFAULT_SONG_DATA.to_string()
}

fn default_log_data() -> String {
    DEFAULT_LOG_DATA.to_string()
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_probe_artist() -> String {
    DEFAULT_PROBE_ARTIST.to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for sparkify.yml or sparkify.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        match Self::find_in_dir(dir) {
            Some(path) => Self::load(&path),
            None => Err(CoreError::ConfigNotFound {
                path: dir.join("sparkify.yml").display().to_string(),
            }),
        }
    }

    /// Load configuration from a project directory, falling back to defaults
    /// when the directory has no config file.
    pub fn load_or_default(dir: &Path) -> CoreResult<Self> {
        match Self::find_in_dir(dir) {
            Some(path) => Self::load(&path),
            None => {
                log::debug!(
                    "No sparkify.yml in {}, using default configuration",
                    dir.display()
                );
                Ok(Self::default())
            }
        }
    }

    fn find_in_dir(dir: &Path) -> Option<PathBuf> {
        ["sparkify.yml", "sparkify.yaml"]
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }
        if self.database.path.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }
        if self.data.extension.is_empty() || self.data.extension.starts_with('.') {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "data.extension must be a bare extension like 'json', found '{}'",
                    self.data.extension
                ),
            });
        }
        Ok(())
    }

    /// Absolute database path, or `:memory:` unchanged
    pub fn database_path_absolute(&self, root: &Path) -> String {
        if self.database.path == MEMORY_DB_PATH {
            return self.database.path.clone();
        }
        root.join(&self.database.path).display().to_string()
    }

    /// Absolute song data root
    pub fn song_data_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.data.song_data)
    }

    /// Absolute log data root
    pub fn log_data_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.data.log_data)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
