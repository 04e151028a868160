//! Configuration management for the KissKH addon
//!
//! Handles config file loading/saving and environment overrides.
//! Config is stored at ~/.config/kisskh-addon/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::scrape::page::default_feed_ids;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the addon server binds to
    pub host: String,
    /// Port the addon server listens on
    pub port: u16,
    /// Cinemeta metadata addon
    pub cinemeta_url: String,
    /// KissKH site root
    pub site_url: String,
    /// Blogger feed host
    pub feed_url: String,
    /// Feed ids tried when an episode page does not name one
    pub default_feed_ids: Vec<String>,
    pub page_timeout_secs: u64,
    pub feed_timeout_secs: u64,
    pub subtitle_timeout_secs: u64,
    /// User-Agent sent on site page requests
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7000,
            cinemeta_url: "https://v3-cinemeta.strem.io".to_string(),
            site_url: "https://kisskh.club".to_string(),
            feed_url: "https://www.blogger.com".to_string(),
            default_feed_ids: default_feed_ids(),
            page_timeout_secs: 10,
            feed_timeout_secs: 5,
            subtitle_timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Get config file path (~/.config/kisskh-addon/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("kisskh-addon").join("config.toml"))
    }

    /// Load config from the default path, or return defaults if not found
    pub fn load() -> Self {
        Self::path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
            .with_env_overrides()
    }

    /// Load config from an explicit file; unreadable files yield defaults
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&path)
    }

    /// Save config to an explicit file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Apply environment overrides:
    /// PORT, KISSKH_SITE_URL, KISSKH_CINEMETA_URL, KISSKH_FEED_URL
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.port = port;
        }
        if let Ok(url) = std::env::var("KISSKH_SITE_URL") {
            self.site_url = url;
        }
        if let Ok(url) = std::env::var("KISSKH_CINEMETA_URL") {
            self.cinemeta_url = url;
        }
        if let Ok(url) = std::env::var("KISSKH_FEED_URL") {
            self.feed_url = url;
        }
        self
    }

    /// Point every upstream at one base URL (used by tests against a mock server)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            cinemeta_url: base_url.clone(),
            site_url: base_url.clone(),
            feed_url: base_url,
            ..Self::default()
        }
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn feed_timeout(&self) -> Duration {
        Duration::from_secs(self.feed_timeout_secs)
    }

    pub fn subtitle_timeout(&self) -> Duration {
        Duration::from_secs(self.subtitle_timeout_secs)
    }
}
