/*!
Configuration management for upbtool.
*/

use serde::{Deserialize, Serialize};
use std::path::Path;
use anyhow::{Context, Result};

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub network: NetworkConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            network: NetworkConfig::default(),
            output: OutputConfig::default(),
        }
    }

    /// Read addressing and output settings from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config {}", path.display()))?;

        toml::from_str(&text).with_context(|| format!("Invalid TOML in config {}", path.display()))
    }

    /// Write these settings as TOML, replacing any existing file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = toml::to_string_pretty(self).context("Cannot serialize config as TOML")?;

        std::fs::write(path, text)
            .with_context(|| format!("Cannot write config {}", path.display()))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Addressing defaults for built packets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network id used when `--network` is omitted
    pub network_id: u8,

    /// Source id used when `--source` is omitted (255 is the PIM broadcast id)
    pub source_id: u8,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            network_id: 1,
            source_id: 255,
        }
    }
}

/// Output and logging preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON documents
    pub pretty_json: bool,

    /// Log filter used when RUST_LOG is not set
    pub log_level: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty_json: true,
            log_level: "info".to_string(),
        }
    }
}
