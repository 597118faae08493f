use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

use thiserror::Error as ThisError;

/// Failures of a single round trip to the remote expense store.
///
/// `Http`, `Server` and `Json` form the transport class: the request may succeed
/// if the user repeats it. `NotFound` is reserved for deleting an unknown id.
#[derive(Debug, ThisError)]
pub enum ClientError {
    #[error("HTTP Error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
    },

    #[error("Server Error: {message} {location}")]
    Server {
        status: HttpStatusCode,
        message: String,
        location: ErrorLocation,
    },

    #[error("Not Found Error: {message} {location}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON Error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },
}

impl ClientError {
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Http { .. } | ClientError::Server { .. } | ClientError::Json { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }

    /// Whether repeating the same request later can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Http { .. } => true,
            ClientError::Server { status, .. } => status.is_retryable(),
            _ => false,
        }
    }

    /// The cause without the location suffix, for user-facing text.
    pub fn message(&self) -> &str {
        match self {
            ClientError::Http { message, .. }
            | ClientError::Server { message, .. }
            | ClientError::NotFound { message, .. }
            | ClientError::Json { message, .. }
            | ClientError::UrlParse { message, .. } => message,
        }
    }
}

impl From<url::ParseError> for ClientError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        ClientError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        let location = ErrorLocation::from(Location::caller());
        if error.is_decode() {
            return ClientError::Json {
                message: error.to_string(),
                location,
            };
        }
        ClientError::Http {
            message: error.to_string(),
            location,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        ClientError::Json {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
