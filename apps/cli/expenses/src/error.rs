use common::ErrorLocation;
use expense_core::{ClientError, ConfigError, CoreError};
use models::ModelError;

use std::panic::Location;

use thiserror::Error;

/// Errors that end a CLI invocation.
///
/// Core errors are flattened to their message so the location recorded here is
/// the point where the command gave up, not deep inside the client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Error from this binary (logger, runtime, config directory)
    #[error("Expenses Error: {message} {location}")]
    App {
        message: String,
        location: ErrorLocation,
    },

    /// Error from expense-core operations (client, config)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        location: ErrorLocation,
    },

    /// Input rejected before anything was sent
    #[error("Invalid Input: {message} {location}")]
    InvalidInput {
        message: String,
        location: ErrorLocation,
    },
}

impl AppError {
    /// The message without the location, for terminal output.
    pub fn message(&self) -> &str {
        match self {
            AppError::App { message, .. }
            | AppError::Core { message, .. }
            | AppError::InvalidInput { message, .. } => message,
        }
    }
}

impl From<CoreError> for AppError {
    #[track_caller]
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Model(model) => AppError::from(model),
            other => AppError::Core {
                message: other.to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
        }
    }
}

impl From<ClientError> for AppError {
    #[track_caller]
    fn from(error: ClientError) -> Self {
        AppError::Core {
            message: error.message().to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ConfigError> for AppError {
    #[track_caller]
    fn from(error: ConfigError) -> Self {
        AppError::Core {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ModelError> for AppError {
    #[track_caller]
    fn from(error: ModelError) -> Self {
        let message = match error {
            ModelError::Validation { message, .. } => message,
            ModelError::UnknownCategory { value, .. } => format!("Unknown category: {value}"),
        };
        AppError::InvalidInput {
            message,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
