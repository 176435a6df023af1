//! CLI argument parsing with clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Webhook receiver that delivers Moodle notifications as Mattermost direct messages
#[derive(Parser, Debug, Clone)]
#[command(name = "moodle-notify")]
#[command(about = "Deliver Moodle notifications as Mattermost direct messages")]
#[command(long_about = "
moodle-notify receives notification webhooks from Moodle and posts each one
as a direct message from a bot account to the recipient on Mattermost.

EXAMPLES:
    # Start the server with default configuration
    moodle-notify serve

    # Bind to all interfaces on a custom port
    moodle-notify serve --host 0.0.0.0 --port 8080

    # Use a single configuration file
    moodle-notify --config /etc/moodle-notify/config.toml serve

    # Check configuration without starting the server
    moodle-notify serve --dry-run

Send SIGHUP to a running server to reload the webhook secret and log level.
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    /// Subcommand to execute (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Load this single TOML file instead of the layered `config/` directory.
    /// `MOODLE_NOTIFY_*` environment variables still apply on top.
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `{environment}.toml` is layered over `default.toml`.
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the webhook server (default)
    ///
    /// Provisions the bot account on Mattermost, then accepts notifications
    /// on `POST /api/v1/notify`.
    Serve {
        /// Host address to bind to
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port number to listen on
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level override, takes precedence over --verbose/--quiet
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        ///
        /// Returns exit code 0 if valid, non-zero if invalid. No network
        /// calls are made.
        #[arg(long)]
        dry_run: bool,
    },
}

impl Commands {
    /// `serve` with no overrides, used when no subcommand is given
    pub fn default_serve() -> Self {
        Commands::Serve {
            host: None,
            port: None,
            log_level: None,
            dry_run: false,
        }
    }
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

/// Log level options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Cli {
    /// The command to run, `serve` when none was given
    pub fn command_or_default(&self) -> Commands {
        self.command.clone().unwrap_or_else(Commands::default_serve)
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["moodle-notify", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["moodle-notify"]).unwrap();
        assert!(cli.command.is_none());
        assert!(matches!(
            cli.command_or_default(),
            Commands::Serve { dry_run: false, .. }
        ));
    }

    #[test]
    fn test_serve_command() {
        let cli = Cli::try_parse_from([
            "moodle-notify",
            "serve",
            "--host",
            "0.0.0.0",
            "--port",
            "9090",
            "--log-level",
            "warning",
            "--dry-run",
        ])
        .unwrap();
        let Some(Commands::Serve {
            host,
            port,
            log_level,
            dry_run,
        }) = cli.command
        else {
            panic!("Expected Serve command");
        };
        assert_eq!(host.as_deref(), Some("0.0.0.0"));
        assert_eq!(port, Some(9090));
        assert_eq!(log_level, Some(LogLevel::Warn));
        assert!(dry_run);
    }

    #[test]
    fn test_env_aliases() {
        let cli = Cli::try_parse_from(["moodle-notify", "--env", "prod"]).unwrap();
        assert_eq!(
            crate::config::Environment::from(cli.env.unwrap()),
            crate::config::Environment::Production
        );
    }

    #[test]
    fn test_conflicting_verbose_quiet() {
        let err = Cli::try_parse_from(["moodle-notify", "--verbose", "--quiet"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
