//! Configuration management for the rewards gateway

use crate::reward::DEFAULT_RELAY_EXTRA_DATA_THRESHOLD;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub reward: RewardConfig,
}

/// Upstream node settings, handed to each data client on construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL serving both the beacon REST API and execution JSON-RPC
    #[serde(default)]
    pub endpoint: String,

    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default)]
    pub pid_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Extra-data byte length above which a block is reported as relay-built
    #[serde(default = "default_relay_threshold")]
    pub relay_extra_data_threshold: usize,
}

fn default_timeout() -> u64 {
    10000
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_relay_threshold() -> usize {
    DEFAULT_RELAY_EXTRA_DATA_THRESHOLD
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            timeout_ms: default_timeout(),
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            pid_file: None,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.listen_addr
            .parse()
            .with_context(|| format!("Invalid listen address: {}", self.listen_addr))
    }
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            relay_extra_data_threshold: default_relay_threshold(),
        }
    }
}

impl Config {
    /// Load configuration from file, environment, and defaults
    /// Priority: Environment variables > Config file > Defaults
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        if let Some((file_config, config_path)) = Self::load_from_file()? {
            tracing::info!("Loaded configuration from: {}", config_path.display());
            config = file_config;
        } else {
            tracing::debug!("Using default configuration (no config file found)");
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load configuration from file (searches multiple locations)
    fn load_from_file() -> Result<Option<(Self, PathBuf)>> {
        for path in &Self::config_file_paths() {
            if path.exists() {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

                let config = Self::from_toml(&contents)
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

                return Ok(Some((config, path.clone())));
            }
        }

        Ok(None)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Get list of config file paths to search (in order of priority)
    pub fn config_file_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. Current directory
        paths.push(PathBuf::from("./eth-rewards-api.toml"));

        // 2. User config directory (~/.config/eth-rewards-api/config.toml)
        if let Some(proj_dirs) = ProjectDirs::from("io", "eth-rewards", "eth-rewards-api") {
            paths.push(proj_dirs.config_dir().join("config.toml"));
        }

        // 3. System location
        paths.push(PathBuf::from("/etc/eth-rewards-api/config.toml"));

        paths
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Upstream; ERA_ENDPOINT wins over the legacy variable
        if let Some(endpoint) = var("ERA_ENDPOINT").or_else(|| var("QUICKNODE_ENDPOINT")) {
            self.upstream.endpoint = endpoint;
        }
        if let Some(timeout) = var("ERA_TIMEOUT_MS").and_then(|t| t.parse().ok()) {
            self.upstream.timeout_ms = timeout;
        }

        // Server
        if let Some(addr) = var("ERA_LISTEN_ADDR") {
            self.server.listen_addr = addr;
        }
        if let Some(pid_file) = var("ERA_PID_FILE") {
            self.server.pid_file = Some(pid_file);
        }

        // Reward
        if let Some(threshold) = var("ERA_RELAY_THRESHOLD").and_then(|t| t.parse().ok()) {
            self.reward.relay_extra_data_threshold = threshold;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let endpoint = &self.upstream.endpoint;
        if endpoint.is_empty() {
            anyhow::bail!("Upstream endpoint not set (use ERA_ENDPOINT or QUICKNODE_ENDPOINT)");
        }
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            anyhow::bail!("Invalid upstream endpoint: {}", endpoint);
        }

        if self.upstream.timeout_ms == 0 {
            anyhow::bail!("Upstream timeout must be greater than 0");
        }

        self.server.socket_addr()?;

        Ok(())
    }

    /// Help text shown when no configuration file exists
    pub fn config_not_found_help() -> String {
        let mut help = String::from("No configuration file found. Searched:\n");
        for path in Self::config_file_paths() {
            help.push_str(&format!("  - {}\n", path.display()));
        }
        help.push_str("Run `eth-rewards-api config example` for a template.");
        help
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn with_endpoint(endpoint: &str) -> Config {
        let mut config = Config::default();
        config.upstream.endpoint = endpoint.to_string();
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.upstream.timeout_ms, 10000);
        assert_eq!(config.upstream.timeout(), Duration::from_secs(10));
        assert_eq!(config.server.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.reward.relay_extra_data_threshold, 20);
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::default().validate().is_err());
        assert!(with_endpoint("https://node.example:8545").validate().is_ok());
        assert!(with_endpoint("node.example:8545").validate().is_err());

        let mut config = with_endpoint("http://localhost:5052");
        config.upstream.timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = with_endpoint("http://localhost:5052");
        config.server.listen_addr = "not-an-addr".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml(
            r#"
            [upstream]
            endpoint = "http://localhost:5052"

            [reward]
            relay_extra_data_threshold = 32
            "#,
        )
        .unwrap();
        assert_eq!(config.upstream.endpoint, "http://localhost:5052");
        assert_eq!(config.upstream.timeout_ms, 10000);
        assert_eq!(config.reward.relay_extra_data_threshold, 32);
        assert_eq!(config.server.listen_addr, "0.0.0.0:8080");
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("QUICKNODE_ENDPOINT", "https://legacy.example"),
            ("ERA_ENDPOINT", "https://preferred.example"),
            ("ERA_TIMEOUT_MS", "2500"),
            ("ERA_RELAY_THRESHOLD", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.upstream.endpoint, "https://preferred.example");
        assert_eq!(config.upstream.timeout_ms, 2500);
        assert_eq!(config.reward.relay_extra_data_threshold, 20);
    }

    #[test]
    fn test_legacy_endpoint_variable() {
        let mut config = Config::default();
        config.apply_overrides(|k| {
            (k == "QUICKNODE_ENDPOINT").then(|| "https://legacy.example".to_string())
        });
        assert_eq!(config.upstream.endpoint, "https://legacy.example");
    }

    #[test]
    fn test_config_roundtrips_through_toml() {
        let text = toml::to_string_pretty(&with_endpoint("http://localhost:5052")).unwrap();
        assert!(text.contains("[upstream]"));
        assert!(Config::from_toml(&text).is_ok());
    }
}
