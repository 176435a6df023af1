//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use std::sync::Arc;

use super::config_merger::ConfigurationMerger;
use super::handlers::ServeCommandHandler;
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;
use crate::logger::LogLevelHandle;
use crate::server::Reloader;

/// Execute a CLI command with the given settings
///
/// `settings` must already carry the CLI overrides. `merger` is used to
/// build the reloader so reloaded settings get the same overrides.
///
/// # Errors
/// Returns errors from command handlers
pub async fn execute_command(
    cli: &Cli,
    merger: ConfigurationMerger,
    settings: Settings,
    log_handle: Option<LogLevelHandle>,
) -> anyhow::Result<()> {
    match cli.command_or_default() {
        Commands::Serve { dry_run, .. } => {
            let mut handler =
                ServeCommandHandler::new(settings).with_reloader(reloader(merger, cli.clone()));
            if let Some(handle) = log_handle {
                handler = handler.with_log_handle(handle);
            }
            handler.execute(dry_run).await
        }
    }
}

/// Reloads the original configuration sources and re-applies `cli`
pub fn reloader(merger: ConfigurationMerger, cli: Cli) -> Reloader {
    Arc::new(move || merger.reload(&cli))
}
