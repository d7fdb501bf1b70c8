use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::platform;
use crate::feed::RECORDS_PER_PAGE;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub daemon: DaemonConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_http_enabled")]
    pub enabled: bool,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Poll/merge tuning shared by every client of the roll log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Maximum records in the visible window (and per `/rolls.json` page).
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Short-poll period in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Where the daemon persists the roll log between runs.
    #[serde(default = "default_rolls_file")]
    pub rolls_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the daemon the TUI talks to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Name recorded against rolls submitted from this client.
    #[serde(default = "default_user")]
    pub user: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: default_http_enabled(),
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            rolls_file: default_rolls_file(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user: default_user(),
        }
    }
}

fn default_http_enabled() -> bool {
    true
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_page_size() -> usize {
    RECORDS_PER_PAGE
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_rolls_file() -> PathBuf {
    platform::data_dir().join("rolls.json")
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_user() -> String {
    "anon".to_string()
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.http.enabled);
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.http.bind_address, "127.0.0.1");
        assert_eq!(config.feed.page_size, 20);
        assert_eq!(config.feed.poll_interval_ms, 1000);
        assert!(config.client.base_url.starts_with("http://"));
        assert!(config.daemon.rolls_file.ends_with("ddroller/rolls.json"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [feed]
            poll_interval_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.feed.poll_interval_ms, 250);
        assert_eq!(config.feed.page_size, 20);
        assert_eq!(config.http.port, 8080);
    }
}
