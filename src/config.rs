use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::constants::{DEFAULT_NEXT_UP_LIMIT, DEFAULT_PREMIERE_WINDOW_MONTHS};
use crate::utils::RowError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub jellyfin: JellyfinConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub rows: RowsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JellyfinConfig {
    #[serde(default)]
    pub server_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_timeout")]
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowsConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u32,

    #[serde(default = "default_next_up_limit")]
    pub next_up_limit: u32,

    #[serde(default = "default_premiere_window_months")]
    pub premiere_window_months: u32,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            debug!("Loading config from {:?}", config_path);
            let contents =
                fs::read_to_string(config_path).context("Failed to read config file")?;
            let config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            info!("Config loaded successfully");
            Ok(config)
        } else {
            info!("No config file found, using defaults");
            let config = Config::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, contents).context("Failed to write config file")?;

        debug!("Config saved to {:?}", config_path);
        Ok(())
    }

    /// Server URL, token and user id, or a configuration error naming the
    /// first missing one.
    pub fn jellyfin_credentials(&self) -> Result<(String, String, String), RowError> {
        let jellyfin = &self.jellyfin;
        if jellyfin.server_url.is_empty() {
            return Err(RowError::Configuration(
                "jellyfin.server_url is not set".to_string(),
            ));
        }
        let api_key = jellyfin
            .api_key
            .clone()
            .ok_or_else(|| RowError::Configuration("jellyfin.api_key is not set".to_string()))?;
        let user_id = jellyfin
            .user_id
            .clone()
            .ok_or_else(|| RowError::Configuration("jellyfin.user_id is not set".to_string()))?;
        Ok((jellyfin.server_url.clone(), api_key, user_id))
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to get config directory")?;
        Ok(config_dir.join("reel-rows").join("config.toml"))
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connection_timeout: default_timeout(),
        }
    }
}

impl Default for RowsConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            next_up_limit: default_next_up_limit(),
            premiere_window_months: default_premiere_window_months(),
        }
    }
}

// Default value functions
fn default_timeout() -> u64 { 30 }
fn default_chunk_size() -> u32 { 15 }
fn default_next_up_limit() -> u32 { DEFAULT_NEXT_UP_LIMIT }
fn default_premiere_window_months() -> u32 { DEFAULT_PREMIERE_WINDOW_MONTHS }
