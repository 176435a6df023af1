//! Application state for the Axum web framework.

use crate::config::ConfigHandle;
use crate::services::Services;

/// Shared state handed to every request handler.
///
/// Cloning is cheap: services share the platform client through an `Arc`
/// and the config handle wraps a watch channel.
#[derive(Clone)]
pub struct AppState {
    /// Business logic services
    pub services: Services,
    /// Reloadable runtime configuration
    pub config: ConfigHandle,
}

impl AppState {
    pub fn new(services: Services, config: ConfigHandle) -> Self {
        Self { services, config }
    }
}
