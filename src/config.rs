use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::client::{normalize_url, HttpChatBackend};
use crate::error::{ConfigError, TransportError};

pub const DEFAULT_BACKEND_URL: &str = "https://vetchat-backend.onrender.com";

/// Environment variable that overrides `backend_url`.
pub const BACKEND_URL_ENV: &str = "VETCHAT_BACKEND_URL";

/// Whether the client asks for a phone number before chatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdentityMode {
    #[default]
    Required,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend_url: String,
    pub identity: IdentityMode,
    pub request_timeout_secs: Option<u64>,
    pub store_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            identity: IdentityMode::default(),
            request_timeout_secs: None,
            store_path: None,
        }
    }
}

impl Config {
    pub fn path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        Some(base.config_dir().join("vetchat.toml"))
    }

    /// Read the config file, falling back to defaults when it is missing or
    /// unreadable, then apply the environment override.
    pub fn load() -> Self {
        let mut config = Self::path()
            .and_then(|path| fs::read_to_string(path).ok())
            .and_then(|text| match Self::from_toml_str(&text) {
                Ok(config) => Some(config),
                Err(e) => {
                    log::warn!("ignoring config file: {e}");
                    None
                }
            })
            .unwrap_or_default();
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                config.backend_url = url;
            }
        }
        config.backend_url = normalize_url(&config.backend_url);
        config
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        url::Url::parse(&normalize_url(&config.backend_url))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Build the HTTP backend. An unusable `backend_url` falls back to
    /// [`DEFAULT_BACKEND_URL`] so the client still starts.
    pub fn backend(&self) -> Result<HttpChatBackend, TransportError> {
        match HttpChatBackend::with_timeout(&self.backend_url, self.request_timeout()) {
            Err(TransportError::InvalidUrl(e)) => {
                log::warn!("invalid backend url {}: {e}, using {DEFAULT_BACKEND_URL}", self.backend_url);
                HttpChatBackend::with_timeout(DEFAULT_BACKEND_URL, self.request_timeout())
            }
            other => other,
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn requires_identity(&self) -> bool {
        self.identity == IdentityMode::Required
    }
}
