//! Configuration module for Veildrive.
//!
//! Provides typed configuration structs that map to the JSON configuration
//! file, with read-or-initialize loading: the first run writes a file with
//! defaults to the platform application-data directory, and every later
//! run loads that file instead of the defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Default address of the remote store's service endpoint, used until the
/// user points the client elsewhere.
const DEFAULT_REMOTE_SERVER_ADDRESS: &str =
    "FWvCrDZqMHrLCKd1Hm1yPFVDiNPPpTW6AZFVqUTM5ij2.8KNbVQwGD3hYqkfLqMZtXQ7rMBnEHt7cXPzSZGun4acJ";

/// Default websocket endpoint of the local network client process.
const DEFAULT_LOCAL_CLIENT_ENDPOINT: &str = "ws://127.0.0.1:1234";

/// Top-level configuration for the Veildrive client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub connection: ConnectionConfig,
    pub polling: PollingConfig,
}

/// Transport endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Address of the remote store service on the overlay network.
    pub remote_server_address: String,
    /// Endpoint of the local network client the application talks to.
    pub local_client_endpoint: String,
}

/// Poller refresh intervals, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Connectivity probe interval.
    pub connectivity_interval_ms: u64,
    /// Current-path listing refresh interval.
    pub listing_interval_ms: u64,
    /// Favorites refresh interval (favorites change rarely).
    pub favorites_interval_ms: u64,
}

impl PollingConfig {
    /// Connectivity probe interval as a [`Duration`].
    pub fn connectivity_interval(&self) -> Duration {
        Duration::from_millis(self.connectivity_interval_ms)
    }

    /// Listing refresh interval as a [`Duration`].
    pub fn listing_interval(&self) -> Duration {
        Duration::from_millis(self.listing_interval_ms)
    }

    /// Favorites refresh interval as a [`Duration`].
    pub fn favorites_interval(&self) -> Duration {
        Duration::from_millis(self.favorites_interval_ms)
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Load from `path`, creating the file with defaults if it does not exist.
    ///
    /// A present-but-unreadable file is an error rather than a silent
    /// overwrite.
    pub fn load_or_init(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            return Self::load(path);
        }
        let config = Self::default();
        config.save(path)?;
        tracing::info!(path = %path.display(), "Wrote initial configuration");
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON, creating parent
    /// directories as needed.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_DATA_HOME/veildrive/config.json` on Linux and the
    /// application-data directory on other platforms.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("veildrive")
            .join("config.json")
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            remote_server_address: DEFAULT_REMOTE_SERVER_ADDRESS.to_string(),
            local_client_endpoint: DEFAULT_LOCAL_CLIENT_ENDPOINT.to_string(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            connectivity_interval_ms: 1000,
            listing_interval_ms: 1000,
            favorites_interval_ms: 5000,
        }
    }
}
