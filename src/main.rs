use clap::Parser;

use moodle_notify::cli::{Cli, execute_command, init_logger_from_settings, load_and_merge_config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (merger, settings) = load_and_merge_config(&cli)?;
    let log_handle = init_logger_from_settings(&settings)?;

    execute_command(&cli, merger, settings, Some(log_handle)).await
}
