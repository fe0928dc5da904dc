//! Discovery tool configuration management

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub discover: DiscoverSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverSettings {
    pub log_level: String,
    /// Location of the usb.ids name database
    #[serde(default = "default_usb_ids_path")]
    pub usb_ids_path: PathBuf,
    /// TCP port the remote daemon listens on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_usb_ids_path() -> PathBuf {
    PathBuf::from("/usr/share/hwdata/usb.ids")
}

fn default_port() -> u16 {
    protocol::USBIP_PORT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            discover: DiscoverSettings {
                log_level: "info".to_string(),
                usb_ids_path: default_usb_ids_path(),
                port: default_port(),
            },
        }
    }
}

impl Config {
    /// Load configuration from the specified path
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p
        } else {
            // Try standard locations in order
            let candidates = vec![
                Self::default_path(),
                PathBuf::from("/etc/usbip-discover/config.toml"),
            ];

            candidates
                .into_iter()
                .find(|p| p.exists())
                .ok_or_else(|| anyhow!("No configuration file found, using defaults"))?
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        config.validate()?;

        tracing::debug!("Loaded configuration from: {}", config_path.display());
        Ok(config)
    }

    /// Load configuration or return defaults if not found
    pub fn load_or_default() -> Self {
        match Self::load(None) {
            Ok(config) => config,
            Err(e) => {
                // Print to stderr since logging might not be initialized yet
                eprintln!("Config: {}", e);
                Self::default()
            }
        }
    }

    /// Save configuration to the specified path
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::debug!("Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("usbip-discover").join("config.toml")
        } else {
            PathBuf::from(".config/usbip-discover/config.toml")
        }
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.discover.log_level.as_str()) {
            return Err(anyhow!(
                "Invalid log level '{}', must be one of: {}",
                self.discover.log_level,
                valid_levels.join(", ")
            ));
        }

        if self.discover.port == 0 {
            return Err(anyhow!("Remote port must be non-zero"));
        }

        Ok(())
    }
}
