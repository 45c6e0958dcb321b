// Copyright (c) 2026 sensorloom
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/sensorloom/sensorloom-rs

//! Configuration module

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level
    pub log_level: String,

    /// Directory holding stored sensor profiles
    pub profile_dir: PathBuf,

    /// Fixed random seed for reproducible telemetry streams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Snapshot monitoring configuration
    pub monitor: MonitorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            profile_dir: Self::config_dir().join("profiles"),
            seed: None,
            monitor: MonitorConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Self::default();

            // Create parent directories
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            config.save(path)?;
            Ok(config)
        }
    }

    /// Get configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("sensorloom"))
            .unwrap_or_else(|| PathBuf::from("./config"))
    }

    /// Get default configuration path
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}

/// Snapshot monitoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// How often the snapshot is polled, in Hz. Decoupled from the
    /// engine's own tick rate.
    pub poll_hz: f64,

    /// Which sensor the monitor logs
    pub log_sensor: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_hz: 10.0,
            log_sensor: "accelerometer".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = Config::default();
        let content = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&content).unwrap();
        assert_eq!(back.log_level, "info");
        assert!((back.monitor.poll_hz - 10.0).abs() < 1e-12);
        assert_eq!(back.monitor.log_sensor, "accelerometer");
    }

    #[test]
    fn load_or_create_writes_a_default_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.toml");
        let config = Config::load_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.log_level, "info");

        // Second call loads the file it just wrote.
        let again = Config::load_or_create(&path).unwrap();
        assert_eq!(again.monitor.log_sensor, config.monitor.log_sensor);
    }
}
