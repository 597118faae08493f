use std::path::PathBuf;

use common::ErrorLocation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config Read Error: {path}: {source} {location}")]
    Read {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config Parse Error: {path}: {message} {location}")]
    Parse {
        location: ErrorLocation,
        path: PathBuf,
        message: String,
    },

    #[error("Config Write Error: {path}: {source} {location}")]
    Write {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config Serialize Error: {message} {location}")]
    Serialize {
        location: ErrorLocation,
        message: String,
    },

    #[error("Config Directory Error: {message} {location}")]
    NoConfigDir {
        location: ErrorLocation,
        message: String,
    },

    #[error("Config Validation Error: {message} {location}")]
    Validation {
        location: ErrorLocation,
        message: String,
    },
}
