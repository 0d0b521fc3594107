//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the API base URL, media upload endpoints, and the last
//! used login email.
//!
//! Configuration is stored at `~/.config/fitdesk/config.json`. Every
//! field can be overridden by a `FITDESK_*` environment variable, which
//! wins over the file.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "fitdesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Fallback API base URL when neither env nor config provides one
const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub base_url: Option<String>,
    pub upload_url: Option<String>,
    pub media_public_url: Option<String>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Resolve the API base URL. Env wins over the config file.
    pub fn api_base_url(&self) -> String {
        std::env::var("FITDESK_BASE_URL")
            .ok()
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Resolve the media upload endpoint, if configured.
    pub fn media_upload_url(&self) -> Option<String> {
        std::env::var("FITDESK_UPLOAD_URL")
            .ok()
            .or_else(|| self.upload_url.clone())
    }

    /// Resolve the public base URL uploaded media is served from.
    pub fn media_public_base(&self) -> Option<String> {
        std::env::var("FITDESK_MEDIA_PUBLIC_URL")
            .ok()
            .or_else(|| self.media_public_url.clone())
    }
}
