use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config/client.json";

const ENV_API_URL: &str = "WFC_API_URL";
const ENV_SOCKET_URL: &str = "WFC_SOCKET_URL";
const ENV_USE_MOCK_DATA: &str = "WFC_USE_MOCK_DATA";
const ENV_DATABASE_PATH: &str = "WFC_DATABASE_PATH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_url: String,
    pub socket_url: String,
    /// Serve the canned dataset instead of talking to the backend.
    pub use_mock_data: bool,
    /// Install the canned dataset when the chat list cannot be fetched.
    pub fallback_to_mock: bool,
    pub database_path: String,
    pub request_timeout_secs: u64,
    pub typing_timeout_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000/api".to_string(),
            socket_url: "ws://localhost:5000/socket".to_string(),
            use_mock_data: false,
            fallback_to_mock: false,
            database_path: "data/client.db".to_string(),
            request_timeout_secs: 15,
            typing_timeout_ms: 3000,
        }
    }
}

impl AppConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn typing_timeout(&self) -> Duration {
        Duration::from_millis(self.typing_timeout_ms)
    }

    /// Apply `WFC_*` overrides through `lookup` (normally `std::env::var`).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(url) = lookup(ENV_SOCKET_URL) {
            self.socket_url = url;
        }
        if let Some(path) = lookup(ENV_DATABASE_PATH) {
            self.database_path = path;
        }
        if let Some(flag) = lookup(ENV_USE_MOCK_DATA) {
            match parse_flag(&flag) {
                Some(value) => self.use_mock_data = value,
                None => log::warn!("Ignoring {ENV_USE_MOCK_DATA}={flag}: expected true/false"),
            }
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

/// File values, then environment overrides.
pub fn load_with_env(path: &str) -> AppConfig {
    let mut config = load_config(path);
    config.apply_overrides(|key| env::var(key).ok());
    config
}

pub fn save_config(path: &str, config: &AppConfig) -> std::io::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)
}
