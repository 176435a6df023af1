//! Configuration management for moodle-notify
//!
//! Layered loading with support for:
//! - TOML configuration files
//! - Environment variable overrides
//! - Per-environment files (development, test, staging, production)
//! - Reloading the webhook secret at runtime
//!
//! # Configuration Priority (lowest to highest)
//! 1. `default.toml` - Base default configuration
//! 2. `{environment}.toml` - Environment-specific configuration
//! 3. `local.toml` - Local overrides (not committed to version control)
//! 4. `MOODLE_NOTIFY_*` environment variables
//! 5. Command line flags

pub mod environment;
pub mod error;
pub mod loader;
pub mod runtime;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use runtime::{ConfigHandle, RuntimeConfig};
pub use settings::{BotConfig, PlatformConfig, Settings, WebhookConfig};

/// Serializes tests that read or mutate process environment variables
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
