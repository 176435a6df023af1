//! Configuration merger for CLI arguments and config files
//!
//! This module handles merging CLI argument overrides with file-based configuration,
//! implementing the configuration precedence logic.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, settings::Settings};

/// Configuration merger that handles CLI argument integration with file-based configuration
///
/// CLI arguments override configuration file and environment values. The
/// loader is kept so the same sources can be read again on reload.
#[derive(Debug, Clone)]
pub struct ConfigurationMerger {
    loader: ConfigLoader,
    base_config: Settings,
}

impl ConfigurationMerger {
    /// Create a new configuration merger from an already loaded base configuration
    pub fn new(loader: ConfigLoader, base_config: Settings) -> Self {
        Self {
            loader,
            base_config,
        }
    }

    /// Resolve configuration sources from the CLI and load them
    ///
    /// `--config` selects a single file and `--env` overrides environment
    /// detection. The loaded configuration is not validated yet; validation
    /// happens after CLI overrides are applied.
    ///
    /// # Errors
    /// Returns ConfigError if the sources are contradictory or cannot be parsed
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?;

        if let Some(path) = &cli.config {
            loader = loader.with_config_file(path);
        }

        if let Some(env) = cli.env {
            loader = loader.with_environment(env.into());
        }

        let base_config = loader.load_unvalidated()?;
        Ok(Self::new(loader, base_config))
    }

    /// Merge CLI arguments with the base configuration
    ///
    /// Precedence, highest first:
    /// 1. Command-specific arguments (`serve --port`, `serve --log-level`)
    /// 2. Global flags (`--verbose`, `--quiet`)
    /// 3. Environment variables and configuration files
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        Self::apply_cli_args(self.base_config.clone(), cli)
    }

    /// Load the configuration sources again and re-apply `cli`
    pub fn reload(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        Self::apply_cli_args(self.loader.load_unvalidated()?, cli)
    }

    fn apply_cli_args(mut config: Settings, cli: &Cli) -> Result<Settings, ConfigError> {
        Self::apply_global_overrides(&mut config, cli);

        if let Some(ref command) = cli.command {
            Self::apply_command_overrides(&mut config, command);
        }

        config.validate()?;

        Ok(config)
    }

    fn apply_global_overrides(config: &mut Settings, cli: &Cli) {
        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }
    }

    fn apply_command_overrides(config: &mut Settings, command: &Commands) {
        match command {
            Commands::Serve {
                host,
                port,
                log_level,
                dry_run: _,
            } => {
                if let Some(host_addr) = host {
                    config.server.host = host_addr.clone();
                }

                if let Some(port_num) = port {
                    config.server.port = *port_num;
                }

                // takes precedence over --verbose/--quiet
                if let Some(level) = log_level {
                    config.logger.level = level.as_str().to_string();
                }
            }
        }
    }

    /// The loader this configuration came from
    pub fn loader(&self) -> &ConfigLoader {
        &self.loader
    }

    /// Get the base configuration before CLI overrides
    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}
