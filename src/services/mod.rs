//! Service layer for business logic operations.
//!
//! Services sit between the HTTP handlers and the chat platform.

mod notify_service;

pub use notify_service::NotifyService;

/// Aggregates all services for convenient access.
///
/// Used as part of the Axum application state; cloning is cheap since the
/// platform client is shared behind an `Arc`.
#[derive(Clone)]
pub struct Services {
    pub notify: NotifyService,
}

impl Services {
    pub fn new(notify: NotifyService) -> Self {
        Self { notify }
    }
}
