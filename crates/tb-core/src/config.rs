//! Configuration types and parsing for testbed.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file names looked up in a project directory, in order
pub const CONFIG_FILE_NAMES: [&str; 2] = ["testbed.yml", "testbed.yaml"];

/// Project configuration from testbed.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    #[serde(default)]
    pub name: Option<String>,

    /// Directories holding scenario JSON files, searched in order; new
    /// scenarios are saved to the first one
    #[serde(default = "default_scenario_paths")]
    pub scenario_paths: Vec<String>,

    /// Database the scenario tables are created in
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Mock HTTP server settings
    #[serde(default)]
    pub mock_server: MockServerConfig,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// DuckDB file path, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,
}

/// Mock server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MockServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Answer CORS preflights and add permissive CORS headers
    #[serde(default)]
    pub cors: bool,
}

fn default_scenario_paths() -> Vec<String> {
    vec!["scenarios".to_string()]
}

fn default_db_path() -> String {
    "target/testbed.duckdb".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4010
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for MockServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: None,
            scenario_paths: default_scenario_paths(),
            database: DatabaseConfig::default(),
            mock_server: MockServerConfig::default(),
        }
    }
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
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory.
    ///
    /// A directory without a config file gets the defaults.
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }
        log::debug!("No config file in {}, using defaults", dir.display());
        Ok(Self::default())
    }

    fn validate(&self) -> CoreResult<()> {
        if self.scenario_paths.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "At least one scenario_paths entry must be specified".to_string(),
            });
        }
        if self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Scenario directories resolved against the project root
    pub fn scenario_paths_absolute(&self, root: &Path) -> Vec<PathBuf> {
        self.scenario_paths.iter().map(|p| root.join(p)).collect()
    }

    /// Database path resolved against the project root (`:memory:` kept as is)
    pub fn database_path(&self, root: &Path) -> String {
        if self.database.path == ":memory:" || Path::new(&self.database.path).is_absolute() {
            self.database.path.clone()
        } else {
            root.join(&self.database.path).display().to_string()
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
