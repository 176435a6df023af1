//! Serve command handler
//!
//! Handles the serve command including dry-run validation and server startup.

use crate::config::settings::Settings;
use crate::logger::LogLevelHandle;
use crate::server::{Reloader, Server};

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
    reloader: Option<Reloader>,
    log_handle: Option<LogLevelHandle>,
}

impl ServeCommandHandler {
    /// Create a new serve command handler
    pub fn new(config: Settings) -> Self {
        Self {
            config,
            reloader: None,
            log_handle: None,
        }
    }

    /// Source of fresh settings for SIGHUP reloads
    pub fn with_reloader(mut self, reloader: Reloader) -> Self {
        self.reloader = Some(reloader);
        self
    }

    /// Handle used to apply reloaded log levels
    pub fn with_log_handle(mut self, handle: LogLevelHandle) -> Self {
        self.log_handle = Some(handle);
        self
    }

    /// Execute the serve command with optional dry-run support
    ///
    /// # Errors
    /// - Configuration validation errors
    /// - Server startup errors (if not dry-run)
    pub async fn execute(self, dry_run: bool) -> anyhow::Result<()> {
        if dry_run {
            return self.validate_only();
        }

        let mut server = Server::new(self.config);
        if let Some(reloader) = self.reloader {
            server = server.with_reloader(reloader);
        }
        if let Some(handle) = self.log_handle {
            server = server.with_log_handle(handle);
        }
        server.run().await
    }

    /// Validate configuration without starting the server
    ///
    /// Nothing is sent to the chat platform.
    pub fn validate_only(&self) -> anyhow::Result<()> {
        self.config.validate()?;

        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!(
            "✓ Mattermost URL: {} (timeout {}s)",
            self.config.platform.url, self.config.platform.timeout
        );
        println!(
            "✓ Bot account: {} ({})",
            self.config.bot.username, self.config.bot.display_name
        );
        println!("✓ Webhook secret is configured");

        match self.config.assets.assets_dir() {
            Some(dir) if dir.is_dir() => {
                println!("✓ Static assets served from: {}", dir.display())
            }
            Some(dir) => println!(
                "! Static assets directory not found, /static disabled: {}",
                dir.display()
            ),
            None => println!("✓ Static assets disabled"),
        }

        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(())
    }

    /// Get the configuration
    pub fn config(&self) -> &Settings {
        &self.config
    }
}
