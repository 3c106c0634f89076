//! Configuration system for the redex TUI
//!
//! Launcher preferences (engine URL, source root, tick intervals) loaded
//! from `~/.redex.toml`. This is plain startup configuration; it is not a
//! settings store and nothing here is written back during a session.

use std::{fs, path::PathBuf};

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine RPC endpoint URL
    pub rpc_url: String,
    /// Root directory used to resolve source files, if any
    pub source_root: Option<PathBuf>,
    /// Terminal refresh interval in milliseconds
    pub refresh_interval: u64,
    /// Background data fetch interval in milliseconds
    pub data_fetch_interval: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:3030".to_string(),
            source_root: None,
            refresh_interval: 50,
            data_fetch_interval: 100,
        }
    }
}

impl Config {
    /// Get the config file path (`~/.redex.toml`)
    pub fn config_path() -> Result<PathBuf> {
        let home =
            dirs::home_dir().ok_or_else(|| eyre::eyre!("Unable to determine home directory"))?;
        Ok(home.join(".redex.toml"))
    }

    /// Load configuration from the default path, creating a default file if
    /// it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            info!("Config file not found, creating default at {:?}", config_path);
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        Self::load_from_path(config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(config_path: PathBuf) -> Result<Self> {
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {config_path:?}"))?;

        let config: Self =
            toml::from_str(&content).with_context(|| "Failed to parse config file as TOML")?;

        debug!("Loaded configuration from {:?}", config_path);
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config to TOML")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {config_path:?}"))?;

        debug!("Saved configuration to {:?}", config_path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.rpc_url, "http://localhost:3030");
        assert_eq!(config.source_root, None);
        assert_eq!(config.refresh_interval, 50);
        assert_eq!(config.data_fetch_interval, 100);
    }

    #[test]
    fn test_partial_config_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "rpc_url = \"http://localhost:9000\"").unwrap();
        writeln!(file, "source_root = \"/home/user/project\"").unwrap();

        let config = Config::load_from_path(file.path().to_path_buf()).unwrap();
        assert_eq!(config.rpc_url, "http://localhost:9000");
        assert_eq!(config.source_root, Some(PathBuf::from("/home/user/project")));
        assert_eq!(config.refresh_interval, 50);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "rpc_url = 42").unwrap();
        assert!(Config::load_from_path(file.path().to_path_buf()).is_err());
    }
}
