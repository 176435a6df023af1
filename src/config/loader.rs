//! Layered configuration loading
//!
//! `ConfigLoader` resolves where configuration comes from once, at startup,
//! and can then be asked to load it again (for example on SIGHUP) with the
//! same sources.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for configuration directory
pub const CONFIG_DIR_ENV: &str = "MOODLE_NOTIFY_CONFIG_DIR";

/// Environment variable for a single configuration file
pub const CONFIG_FILE_ENV: &str = "MOODLE_NOTIFY_CONFIG_FILE";

/// Default configuration directory
const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "MOODLE_NOTIFY";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Configuration loader that handles layered configuration loading
///
/// Sources, lowest priority first:
/// 1. `default.toml` (required)
/// 2. `{environment}.toml` (optional)
/// 3. `local.toml` (optional)
/// 4. `MOODLE_NOTIFY_*` environment variables
///
/// When a single configuration file is selected, it replaces steps 1-3.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl Default for ConfigLoader {
    /// Layered `config/` directory in the development environment, ignoring
    /// process environment selectors
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: None,
            environment: AppEnvironment::default(),
        }
    }
}

impl ConfigLoader {
    /// Create a loader from `MOODLE_NOTIFY_CONFIG_DIR`, `MOODLE_NOTIFY_CONFIG_FILE`
    /// and `MOODLE_NOTIFY_APP_ENV`.
    ///
    /// # Errors
    ///
    /// Returns an error if both `MOODLE_NOTIFY_CONFIG_DIR` and
    /// `MOODLE_NOTIFY_CONFIG_FILE` are set, or if `MOODLE_NOTIFY_APP_ENV`
    /// names an unknown environment.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = std::env::var(CONFIG_DIR_ENV).ok().map(PathBuf::from);
        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_dir.is_some() && config_file.is_some() {
            return Err(ConfigError::mutual_exclusivity(
                "MOODLE_NOTIFY_CONFIG_DIR and MOODLE_NOTIFY_CONFIG_FILE cannot both be set. \
                 Use MOODLE_NOTIFY_CONFIG_DIR for layered configuration or \
                 MOODLE_NOTIFY_CONFIG_FILE for a single configuration file.",
            ));
        }

        Ok(Self {
            config_dir: config_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR)),
            config_file,
            environment: AppEnvironment::from_env()?,
        })
    }

    /// Load a single file instead of the layered directory
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Override the environment used to pick `{environment}.toml`
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    /// Get the current application environment
    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    /// Get the single configuration file, if one is selected
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Load and validate configuration from all sources
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `default.toml` (or the selected single file) is not found
    /// - Configuration parsing fails
    /// - Configuration validation fails
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let settings = self.load_unvalidated()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration without running validation
    ///
    /// Used when CLI overrides still have to be applied before validating.
    pub fn load_unvalidated(&self) -> Result<Settings, ConfigError> {
        self.build_config()?.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = match self.config_file {
            Some(ref config_file) => Self::add_file_source(builder, config_file, true)?,
            None => self.build_layered_config(builder)?,
        };

        // MOODLE_NOTIFY_WEBHOOK__SECRET -> webhook.secret
        Self::add_env_source(builder)
            .build()
            .map_err(ConfigError::from)
    }

    fn build_layered_config(
        &self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let default_path = self.config_dir.join("default.toml");
        let builder = Self::add_file_source(builder, &default_path, true)?;

        let env_path = self
            .config_dir
            .join(self.environment.overlay_file_name());
        let builder = Self::add_file_source(builder, &env_path, false)?;

        let local_path = self.config_dir.join("local.toml");
        Self::add_file_source(builder, &local_path, false)
    }

    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.is_file() {
            return Err(ConfigError::file_not_found(format!(
                "Required configuration file not found: {}",
                path.display()
            )));
        }

        Ok(builder.add_source(
            File::new(&path.to_string_lossy(), FileFormat::Toml).required(required),
        ))
    }

    /// Environment variables with prefix `MOODLE_NOTIFY_` map to configuration keys,
    /// `__` separates nested keys.
    fn add_env_source(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_LOCK as TEST_MUTEX;
    use std::fs;
    use tempfile::TempDir;

    const DEFAULT_TOML: &str = r#"
[application]
name = "test-app"
version = "1.0.0"

[server]
host = "127.0.0.1"
port = 3000

[logger]
level = "info"

[platform]
url = "http://localhost:8065"
token = "default-token"

[webhook]
secret = "default-secret"
"#;

    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            fs::write(temp_dir.path().join(name), content).expect("Failed to write config file");
        }
        temp_dir
    }

    /// Restores touched environment variables on drop
    struct EnvGuard {
        vars_to_restore: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        /// Starts from a clean slate for every variable the loader reads
        fn clean() -> Self {
            let mut guard = Self {
                vars_to_restore: Vec::new(),
            };
            for key in [
                CONFIG_DIR_ENV,
                CONFIG_FILE_ENV,
                AppEnvironment::ENV_VAR,
                "MOODLE_NOTIFY_SERVER__PORT",
                "MOODLE_NOTIFY_WEBHOOK__SECRET",
            ] {
                guard.remove(key);
            }
            guard
        }

        fn set(&mut self, key: &str, value: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::set_var(key, value);
            }
        }

        fn remove(&mut self, key: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, original_value) in self.vars_to_restore.iter().rev() {
                unsafe {
                    match original_value {
                        Some(value) => std::env::set_var(key, value),
                        None => std::env::remove_var(key),
                    }
                }
            }
        }
    }

    #[test]
    fn test_config_loader_new_default() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(loader.config_dir, PathBuf::from("config"));
        assert!(loader.config_file().is_none());
        assert_eq!(loader.environment(), AppEnvironment::Development);
    }

    #[test]
    fn test_config_loader_rejects_unknown_environment() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        env.set(AppEnvironment::ENV_VAR, "prodution");

        match ConfigLoader::new() {
            Err(ConfigError::EnvVarError(msg)) => assert!(msg.contains("prodution")),
            other => panic!("Expected EnvVarError, got {other:?}"),
        }
    }

    #[test]
    fn test_config_loader_mutual_exclusivity_error() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        env.set(CONFIG_DIR_ENV, "/custom/config");
        env.set(CONFIG_FILE_ENV, "/path/to/config.toml");

        match ConfigLoader::new() {
            Err(ConfigError::MutualExclusivityError(msg)) => {
                assert!(msg.contains(CONFIG_DIR_ENV));
                assert!(msg.contains(CONFIG_FILE_ENV));
            }
            other => panic!("Expected MutualExclusivityError, got {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_default_toml() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());

        let result = ConfigLoader::new().unwrap().load();
        match result {
            Err(ConfigError::FileNotFound(msg)) => assert!(msg.contains("default.toml")),
            other => panic!("Expected FileNotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_full_precedence_chain() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();

        let temp_dir = setup_config_dir(&[
            ("default.toml", DEFAULT_TOML),
            (
                "production.toml",
                "[server]\nport = 3001\n\n[platform]\nurl = \"https://chat.example.com\"\n",
            ),
            ("local.toml", "[server]\nport = 3002\n"),
        ]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.set(AppEnvironment::ENV_VAR, "production");
        env.set("MOODLE_NOTIFY_WEBHOOK__SECRET", "from-env");

        let settings = ConfigLoader::new().unwrap().load().expect("Should load settings");

        assert_eq!(settings.webhook.secret, "from-env");
        assert_eq!(settings.server.port, 3002);
        assert_eq!(settings.platform.url, "https://chat.example.com");
        assert_eq!(settings.platform.token, "default-token");
        assert_eq!(settings.application.name, "test-app");
        // not present in any file
        assert_eq!(settings.bot.username, "moodle");
    }

    #[test]
    fn test_env_var_override_of_numeric_value() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_TOML)]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.set("MOODLE_NOTIFY_SERVER__PORT", "4000");

        let settings = ConfigLoader::new().unwrap().load().unwrap();
        assert_eq!(settings.server.port, 4000);
    }

    #[test]
    fn test_optional_files_not_required() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_TOML)]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.set(AppEnvironment::ENV_VAR, "staging");

        let settings = ConfigLoader::new().unwrap().load().unwrap();
        assert_eq!(settings.webhook.secret, "default-secret");
    }

    #[test]
    fn test_single_file_mode_skips_layering() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[
            ("single.toml", DEFAULT_TOML),
            ("local.toml", "[server]\nport = 9999\n"),
        ]);

        let loader = ConfigLoader::new()
            .unwrap()
            .with_config_file(temp_dir.path().join("single.toml"));
        let settings = loader.load().unwrap();
        assert_eq!(settings.server.port, 3000);
    }

    #[test]
    fn test_load_rejects_missing_secret() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[(
            "app.toml",
            "[platform]\ntoken = \"t\"\n",
        )]);

        let loader = ConfigLoader::new()
            .unwrap()
            .with_config_file(temp_dir.path().join("app.toml"));
        match loader.load() {
            Err(ConfigError::ValidationError { field, .. }) => assert_eq!(field, "webhook.secret"),
            other => panic!("Expected ValidationError, got {other:?}"),
        }
        assert!(loader.load_unvalidated().is_ok());
    }
}
