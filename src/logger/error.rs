//! Error types for the logger

use thiserror::Error;

/// Errors that can occur while setting up or adjusting logging
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid filter '{directive}': {message}")]
    Filter { directive: String, message: String },

    #[error("Logger reload failed: {message}")]
    Reload { message: String },
}

impl LoggerError {
    pub fn filter(directive: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Filter {
            directive: directive.into(),
            message: message.into(),
        }
    }

    pub fn reload(message: impl Into<String>) -> Self {
        Self::Reload {
            message: message.into(),
        }
    }
}
