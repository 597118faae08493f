//! Client configuration: where the remote store lives and how long to wait for it.
//!
//! Resolution order, later wins:
//! 1. built-in defaults
//! 2. `{config_dir}/config.json`
//! 3. `EXPENSES_API_URL` (from the environment or a `.env` file)
//! 4. command-line flags (applied by the binary)

use crate::error::config::ConfigError;

use common::ErrorLocation;

use std::env;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_VERSION: u32 = 1;
const MAX_TIMEOUT_SECS: u64 = 300;

pub const APP_DIR_NAME: &str = "expense-tracker";
pub const API_URL_ENV: &str = "EXPENSES_API_URL";
pub const DEFAULT_API_HOSTNAME: &str = "localhost";
pub const DEFAULT_API_PORT: u16 = 5000;
pub const DEFAULT_BASE_URL: &str =
    const_format::concatcp!("http://", DEFAULT_API_HOSTNAME, ":", DEFAULT_API_PORT);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            server: ServerConfig::default(),
        }
    }
}

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_request_timeout_secs() -> u64 {
    30
}

/// Loads `.env` from the current directory if one exists.
///
/// Returns the path that was loaded. A missing file is normal and not logged
/// as a problem.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            info!("Loaded .env from: {}", path.display());
            Some(path)
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            warn!("Failed to parse .env: {e}");
            None
        }
    }
}

impl AppConfig {
    /// Platform config directory for this application, e.g.
    /// `~/.config/expense-tracker` on Linux.
    #[track_caller]
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or_else(|| ConfigError::NoConfigDir {
                location: ErrorLocation::from(Location::caller()),
                message: "No platform config directory available".to_string(),
            })
    }

    pub fn exists(config_dir: &Path) -> bool {
        config_dir.join(CONFIG_FILE_NAME).is_file()
    }

    /// Load config from `{config_dir}/config.json`.
    ///
    /// A missing file yields defaults. A file that exists but cannot be read,
    /// parsed or validated is an error.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Read {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        let config: AppConfig = serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            message: e.to_string(),
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Save config to `{config_dir}/config.json` through a temp file and rename.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::Write {
            location: ErrorLocation::from(Location::caller()),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let temp_path = config_dir.join(format!("{CONFIG_FILE_NAME}.tmp"));

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            location: ErrorLocation::from(Location::caller()),
            message: e.to_string(),
        })?;

        std::fs::write(&temp_path, json).map_err(|e| ConfigError::Write {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::Write {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// Applies `EXPENSES_API_URL` if set. Returns whether anything changed.
    pub fn apply_env_overrides(&mut self) -> bool {
        match env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => {
                debug!("Using {API_URL_ENV} override: {url}");
                self.server.base_url = url.trim().to_string();
                true
            }
            Ok(_) => false,
            Err(env::VarError::NotPresent) => false,
            Err(env::VarError::NotUnicode(_)) => {
                warn!("{API_URL_ENV} contains invalid unicode, ignoring");
                false
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::Validation {
                location: ErrorLocation::from(Location::caller()),
                message: format!(
                    "Invalid version: {} (expected 1-{CONFIG_VERSION})",
                    self.version
                ),
            });
        }

        let url = &self.server.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Validation {
                location: ErrorLocation::from(Location::caller()),
                message: format!("Invalid base URL: '{url}' (must start with http:// or https://)"),
            });
        }

        let timeout = self.server.request_timeout_secs;
        if timeout == 0 || timeout > MAX_TIMEOUT_SECS {
            return Err(ConfigError::Validation {
                location: ErrorLocation::from(Location::caller()),
                message: format!("Invalid request timeout: {timeout}s (must be 1-{MAX_TIMEOUT_SECS})"),
            });
        }

        Ok(())
    }
}
