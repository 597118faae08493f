//! Resolves where the binary keeps its files and which store it talks to.

use crate::error::AppError;

use common::ErrorLocation;
use expense_core::AppConfig;

use std::fs::create_dir_all;
use std::panic::Location;
use std::path::{Path, PathBuf};

use log::debug;

/// `--config-dir` if given, otherwise the platform config directory. Created if missing.
pub fn config_dir(requested: Option<&Path>) -> Result<PathBuf, AppError> {
    let dir = match requested {
        Some(dir) => dir.to_path_buf(),
        None => AppConfig::default_dir()?,
    };

    create_dir_all(&dir).map_err(|e| AppError::App {
        message: format!("Failed to create config directory {}: {e}", dir.display()),
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok(dir)
}

/// Loads `config.json`, then applies `EXPENSES_API_URL`, then `--api-url`.
///
/// On first run the defaults are written out so there is a file to edit.
pub fn resolve(config_dir: &Path, api_url: Option<&str>) -> Result<AppConfig, AppError> {
    if !AppConfig::exists(config_dir) {
        AppConfig::default().save(config_dir)?;
    }

    let mut config = AppConfig::load(config_dir)?;
    config.apply_env_overrides();

    if let Some(url) = api_url.map(str::trim).filter(|url| !url.is_empty()) {
        debug!("Using --api-url override: {url}");
        config.server.base_url = url.to_string();
    }

    config.validate()?;
    Ok(config)
}
