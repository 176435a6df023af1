//! Deployment environment selection
//!
//! The environment picks which `{environment}.toml` overlay is layered over
//! `default.toml`. It comes from `--env`, else `MOODLE_NOTIFY_APP_ENV`, else
//! defaults to development.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Staging,
    Production,
}

/// Accepted spellings, canonical name first
const NAMES: [(Environment, &[&str]); 4] = [
    (Environment::Development, &["development", "dev"]),
    (Environment::Test, &["test"]),
    (Environment::Staging, &["staging", "stage"]),
    (Environment::Production, &["production", "prod"]),
];

impl Environment {
    pub const ENV_VAR: &'static str = "MOODLE_NOTIFY_APP_ENV";

    /// Environment selected by `MOODLE_NOTIFY_APP_ENV`.
    ///
    /// Unset or blank means development. An unknown value is an error rather
    /// than a silent fallback, so a typo cannot load the wrong overlay.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(Self::ENV_VAR) {
            Ok(value) if !value.trim().is_empty() => value.parse(),
            _ => Ok(Self::default()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        NAMES
            .iter()
            .find(|(env, _)| env == self)
            .map(|(_, names)| names[0])
            .unwrap_or("development")
    }

    /// Name of the overlay file for this environment inside the config directory
    pub fn overlay_file_name(&self) -> String {
        format!("{}.toml", self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        NAMES
            .iter()
            .find(|(_, names)| names.contains(&wanted.as_str()))
            .map(|(env, _)| *env)
            .ok_or_else(|| {
                ConfigError::EnvVarError(format!(
                    "Invalid {} '{}'. Valid values are: development, test, staging, production",
                    Self::ENV_VAR,
                    s
                ))
            })
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
