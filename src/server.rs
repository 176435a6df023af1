//! Server module for managing HTTP server lifecycle
//!
//! This module handles startup (bot provisioning, state, router), runtime
//! configuration reloads, and graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::signal;

use crate::api::routes::create_router;
use crate::config::{ConfigError, ConfigHandle, Settings};
use crate::logger::LogLevelHandle;
use crate::platform::{ChatPlatform, MattermostClient};
use crate::services::{NotifyService, Services};
use crate::state::AppState;

/// Produces freshly loaded settings when a reload is requested
pub type Reloader = Arc<dyn Fn() -> Result<Settings, ConfigError> + Send + Sync>;

/// HTTP server manager
pub struct Server {
    settings: Settings,
    reloader: Option<Reloader>,
    log_handle: Option<LogLevelHandle>,
}

impl Server {
    /// Create a new server with the given settings
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            reloader: None,
            log_handle: None,
        }
    }

    /// Reload configuration with `reloader` on SIGHUP
    pub fn with_reloader(mut self, reloader: Reloader) -> Self {
        self.reloader = Some(reloader);
        self
    }

    /// Apply reloaded log levels through `handle`
    pub fn with_log_handle(mut self, handle: LogLevelHandle) -> Self {
        self.log_handle = Some(handle);
        self
    }

    /// Start the server and run until shutdown signal
    ///
    /// # Errors
    /// - Platform client construction or bot provisioning errors
    /// - Address binding errors
    /// - Server runtime errors
    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!(
            app_name = %self.settings.application.name,
            app_version = %self.settings.application.version,
            "Application starting"
        );

        tracing::info!(
            host = %self.settings.server.host,
            port = self.settings.server.port,
            request_timeout = self.settings.server.request_timeout,
            "Server configuration loaded"
        );

        // URL only; the token stays out of the logs
        tracing::info!(
            url = %self.settings.platform.url,
            timeout = self.settings.platform.timeout,
            bot = %self.settings.bot.username,
            "Platform configuration loaded"
        );

        let platform: Arc<dyn ChatPlatform> = Arc::new(
            MattermostClient::new(&self.settings.platform)
                .map_err(|e| anyhow::anyhow!("Failed to create platform client: {}", e))?,
        );

        let state = bootstrap(&self.settings, platform).await?;
        tracing::info!(bot_id = %state.services.notify.bot_id(), "Application state created");

        if let Some(reloader) = self.reloader.clone() {
            spawn_reload_on_hangup(reloader, state.config.clone(), self.log_handle.clone())?;
        }

        let router = create_router(
            state,
            self.settings.assets.assets_dir(),
            Duration::from_secs(self.settings.server.request_timeout),
        );

        let address = self.settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;

        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Provisions the bot account and builds the application state.
///
/// The bot id is resolved once here; later reloads do not change it.
pub async fn bootstrap(
    settings: &Settings,
    platform: Arc<dyn ChatPlatform>,
) -> anyhow::Result<AppState> {
    let timeout = Duration::from_secs(settings.platform.timeout);

    let bot_id = tokio::time::timeout(timeout, platform.ensure_bot(&settings.bot))
        .await
        .map_err(|_| {
            anyhow::anyhow!(
                "Bot provisioning on {} timed out after {}s",
                platform.name(),
                timeout.as_secs()
            )
        })?
        .map_err(|e| anyhow::anyhow!("Failed to ensure bot account: {}", e))?;

    tracing::info!(
        platform = platform.name(),
        username = %settings.bot.username,
        bot_id = %bot_id,
        "Bot account ready"
    );

    let notify = NotifyService::new(platform, bot_id, timeout);
    Ok(AppState::new(
        Services::new(notify),
        ConfigHandle::new(&settings.webhook),
    ))
}

/// Publishes a reload result.
///
/// Valid settings replace the webhook secret and log level; invalid ones are
/// logged and the running configuration stays as it is. Returns the config
/// version in effect afterwards.
pub fn apply_reload(
    config: &ConfigHandle,
    log_handle: Option<&LogLevelHandle>,
    reloaded: Result<Settings, ConfigError>,
) -> u64 {
    let settings = match reloaded {
        Ok(settings) => settings,
        Err(e) => {
            let version = config.current().version;
            tracing::error!(error = %e, config_version = version, "Configuration reload rejected");
            return version;
        }
    };

    if let Some(handle) = log_handle
        && let Err(e) = handle.set_level(&settings.logger.level)
    {
        tracing::warn!(error = %e, "Could not apply reloaded log level");
    }

    let version = config.apply(&settings.webhook);
    tracing::info!(config_version = version, "Configuration reloaded");
    version
}

#[cfg(unix)]
fn spawn_reload_on_hangup(
    reloader: Reloader,
    config: ConfigHandle,
    log_handle: Option<LogLevelHandle>,
) -> anyhow::Result<()> {
    let mut hangup = signal::unix::signal(signal::unix::SignalKind::hangup())?;

    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            tracing::info!("Received SIGHUP, reloading configuration");
            let reloader = reloader.clone();
            // file IO
            let reloaded = match tokio::task::spawn_blocking(move || reloader()).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(error = %e, "Configuration reload task failed");
                    continue;
                }
            };
            apply_reload(&config, log_handle.as_ref(), reloaded);
        }
    });

    Ok(())
}

#[cfg(not(unix))]
fn spawn_reload_on_hangup(
    _reloader: Reloader,
    _config: ConfigHandle,
    _log_handle: Option<LogLevelHandle>,
) -> anyhow::Result<()> {
    tracing::warn!("Configuration reload on SIGHUP is only available on Unix");
    Ok(())
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
