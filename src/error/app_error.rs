use thiserror::Error;

use crate::config::error::ConfigError;
use crate::platform::PlatformError;

/// Application-wide error type for the webhook pipeline.
///
/// Every variant is terminal for the current request; nothing here is retried.
/// The HTTP mapping lives in `api::middleware::error_handler`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Caller presented a missing or wrong shared secret
    #[error("{message}")]
    Forbidden { message: String },

    /// Request body is malformed or incomplete
    #[error("{message}")]
    BadRequest { message: String },

    /// User or channel lookup failed on the chat platform.
    /// The platform's text is passed through for operator diagnosis.
    #[error("{0}")]
    Platform(#[from] PlatformError),

    /// Post creation failed on the chat platform
    #[error("Could not send DM to user: {source}")]
    Dispatch {
        #[source]
        source: PlatformError,
    },

    /// A chat platform call did not finish in time
    #[error("{operation} timed out after {seconds}s")]
    Timeout { operation: String, seconds: u64 },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal Server Error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let key = error.field().unwrap_or("settings").to_string();
        AppError::Configuration {
            key,
            source: error.into(),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
