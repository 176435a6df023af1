//! Configuration validation logic
//!
//! This module provides validation methods for all configuration structures
//! to ensure configuration values are within acceptable ranges and formats.

use crate::config::error::ConfigError;
use crate::config::settings::{
    BotConfig, FileSettings, LoggerSettings, PlatformConfig, ServerConfig, Settings, WebhookConfig,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// Mattermost username length limits
const BOT_USERNAME_MIN_LEN: usize = 3;
const BOT_USERNAME_MAX_LEN: usize = 22;

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Port must be between 1 and 65535
    /// - Request timeout must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl PlatformConfig {
    /// Validate the Mattermost connection
    ///
    /// # Validation Rules
    /// - URL must use http:// or https://
    /// - Token must not be empty
    /// - Timeout must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ConfigError::validation(
                "platform.url",
                "Platform URL must start with http:// or https://.",
            ));
        }

        if self.token.trim().is_empty() {
            return Err(ConfigError::validation(
                "platform.token",
                "Platform access token is required.",
            ));
        }

        if self.timeout == 0 {
            return Err(ConfigError::validation(
                "platform.timeout",
                "Platform timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl BotConfig {
    /// Validate the bot profile against the platform's username rules
    pub fn validate(&self) -> Result<(), ConfigError> {
        let username = self.username.as_str();
        let valid_length = (BOT_USERNAME_MIN_LEN..=BOT_USERNAME_MAX_LEN).contains(&username.len());
        let starts_with_letter = username.chars().next().is_some_and(|c| c.is_ascii_lowercase());
        let valid_chars = username
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '-' | '_'));

        if !(valid_length && starts_with_letter && valid_chars) {
            return Err(ConfigError::ValidationError {
                field: "bot.username".to_string(),
                message: format!(
                    "Invalid bot username '{}'. Use {}-{} lowercase letters, digits, '.', '-' or '_', starting with a letter.",
                    self.username, BOT_USERNAME_MIN_LEN, BOT_USERNAME_MAX_LEN
                ),
            });
        }

        if self.display_name.trim().is_empty() {
            return Err(ConfigError::validation(
                "bot.display_name",
                "Bot display name cannot be empty.",
            ));
        }

        Ok(())
    }
}

impl WebhookConfig {
    /// Validate webhook authentication
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::validation(
                "webhook.secret",
                "Webhook secret is required. Set MOODLE_NOTIFY_WEBHOOK__SECRET or webhook.secret.",
            ));
        }
        Ok(())
    }
}

impl FileSettings {
    /// Validate file settings
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - If file logging is enabled, path must not be empty
    /// - Log format must be one of: full, compact, json
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        self.file.validate()?;

        Ok(())
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// This method validates all sub-configurations and returns the first
    /// validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.logger.validate()?;
        self.platform.validate()?;
        self.bot.validate()?;
        self.webhook.validate()?;
        Ok(())
    }
}
