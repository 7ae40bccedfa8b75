//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the API base URL, the token storage backend and the
//! last email used to sign in.
//!
//! Configuration is stored at `~/.config/newsdesk/config.json`.
//! `NEWSDESK_API_URL` and `NEWSDESK_TOKEN_BACKEND` override the file for
//! the current run only; they are never written back.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "newsdesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Production backend
pub const DEFAULT_API_BASE_URL: &str = "https://news-backend-tahw.onrender.com/api";

/// HTTP request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// How long a soft-delete can be undone.
const DEFAULT_UNDO_WINDOW_SECS: u64 = 5;

const ENV_API_URL: &str = "NEWSDESK_API_URL";
const ENV_TOKEN_BACKEND: &str = "NEWSDESK_TOKEN_BACKEND";

/// Where the access token is persisted between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenBackend {
    #[default]
    File,
    Keyring,
}

impl TokenBackend {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "file" => Some(TokenBackend::File),
            "keyring" | "keychain" => Some(TokenBackend::Keyring),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub token_backend: TokenBackend,
    pub request_timeout_secs: u64,
    pub undo_window_secs: u64,
    pub last_email: Option<String>,
    #[serde(skip)]
    overrides: Overrides,
}

/// Values taken from the environment.
#[derive(Debug, Clone, Default)]
struct Overrides {
    api_base_url: Option<String>,
    token_backend: Option<TokenBackend>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            token_backend: TokenBackend::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            undo_window_secs: DEFAULT_UNDO_WINDOW_SECS,
            last_email: None,
            overrides: Overrides::default(),
        }
    }
}

impl Config {
    /// Load the config file (defaults if missing) and apply env overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_API_URL).ok(),
            std::env::var(ENV_TOKEN_BACKEND).ok(),
        );
    }

    fn apply_overrides(&mut self, api_url: Option<String>, token_backend: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.overrides.api_base_url = Some(url);
        }
        if let Some(backend) = token_backend {
            match TokenBackend::from_str(&backend) {
                Some(b) => self.overrides.token_backend = Some(b),
                None => warn!(value = %backend, "Unknown token backend, keeping configured one"),
            }
        }
    }

    /// Effective token backend, environment first.
    pub fn token_backend(&self) -> TokenBackend {
        self.overrides.token_backend.unwrap_or(self.token_backend)
    }

    /// Base URL without a trailing slash.
    pub fn api_base_url(&self) -> String {
        self.overrides
            .api_base_url
            .as_deref()
            .or(self.api_base_url.as_deref())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_string()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn undo_window(&self) -> Duration {
        Duration::from_secs(self.undo_window_secs)
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
}
