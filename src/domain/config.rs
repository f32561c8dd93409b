//! # Configuration
//!
//! Manages the loading and parsing of the application's configuration file
//! (`config.yaml`). Defines the structs for chat connections, the stream
//! relay, and system settings.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub services: ServicesConfig,
    pub relay: RelayConfig,
    #[serde(default)]
    pub system: SystemConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }
}

/// Configuration for the connected chat services.
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    pub connections: Vec<MatrixConnection>,
}

/// One named Matrix connection. Destinations refer to connections by name.
#[derive(Debug, Deserialize, Clone)]
pub struct MatrixConnection {
    pub name: String,
    pub homeserver: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Settings for the stream relay core.
#[derive(Debug, Deserialize, Clone)]
pub struct RelayConfig {
    /// Base URL of the upstream REST API.
    pub api_base: String,
    /// URL of the upstream push stream.
    pub stream_url: String,
    /// Opaque credential, passed through as a bearer token.
    pub token: String,
    /// Base URL used to link announced posts.
    #[serde(default = "default_status_url_base")]
    pub status_url_base: String,
    /// Places to announce stream items.
    #[serde(default)]
    pub announce: Vec<Destination>,
    /// Waits (seconds) applied after consecutive connection failures.
    #[serde(default = "default_reconnect_seconds")]
    pub reconnect_seconds: Vec<u64>,
}

/// A (connection, channel) pair eligible to receive broadcast notices.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Destination {
    pub connection: String,
    pub channel: String,
}

/// System-level settings for the bot.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct SystemConfig {
    #[serde(default)]
    pub admin: Vec<String>,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_status_url_base() -> String {
    "https://twitter.com".to_string()
}

fn default_reconnect_seconds() -> Vec<u64> {
    vec![2, 10, 60, 300]
}

fn default_data_dir() -> String {
    "data".to_string()
}
