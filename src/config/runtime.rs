//! Reloadable runtime configuration
//!
//! Request handlers read a versioned snapshot; a reload publishes a new one
//! without blocking in-flight requests. A request keeps the snapshot it
//! started with.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use crate::config::settings::WebhookConfig;

/// Values a running server picks up on reload
#[derive(Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Incremented on every applied reload, starting at 1
    pub version: u64,
    /// Shared secret expected from the webhook caller
    pub secret: String,
}

impl fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("version", &self.version)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Shared handle to the current [`RuntimeConfig`]
#[derive(Clone)]
pub struct ConfigHandle {
    tx: Arc<watch::Sender<Arc<RuntimeConfig>>>,
}

impl ConfigHandle {
    pub fn new(webhook: &WebhookConfig) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(RuntimeConfig {
            version: 1,
            secret: webhook.secret.clone(),
        }));
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot in effect right now
    pub fn current(&self) -> Arc<RuntimeConfig> {
        self.tx.borrow().clone()
    }

    /// Publishes new values and returns the new version
    pub fn apply(&self, webhook: &WebhookConfig) -> u64 {
        let mut version = 0;
        self.tx.send_modify(|current| {
            version = current.version + 1;
            *current = Arc::new(RuntimeConfig {
                version,
                secret: webhook.secret.clone(),
            });
        });
        version
    }

    /// Receiver notified on every applied reload
    pub fn subscribe(&self) -> watch::Receiver<Arc<RuntimeConfig>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn webhook(secret: &str) -> WebhookConfig {
        WebhookConfig {
            secret: secret.to_string(),
        }
    }

    #[test]
    fn test_initial_snapshot() {
        let handle = ConfigHandle::new(&webhook("one"));
        let current = handle.current();
        assert_eq!(current.version, 1);
        assert_eq!(current.secret, "one");
    }

    #[test]
    fn test_apply_bumps_version_and_keeps_old_snapshots_intact() {
        let handle = ConfigHandle::new(&webhook("one"));
        let before = handle.current();

        assert_eq!(handle.apply(&webhook("two")), 2);

        assert_eq!(before.secret, "one");
        assert_eq!(handle.current().secret, "two");
        assert_eq!(handle.current().version, 2);
    }

    #[test]
    fn test_clones_share_state() {
        let handle = ConfigHandle::new(&webhook("one"));
        let clone = handle.clone();
        clone.apply(&webhook("two"));
        assert_eq!(handle.current().secret, "two");
    }

    #[tokio::test]
    async fn test_subscribers_are_notified() {
        let handle = ConfigHandle::new(&webhook("one"));
        let mut rx = handle.subscribe();
        handle.apply(&webhook("two"));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().version, 2);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let handle = ConfigHandle::new(&webhook("hunter2"));
        assert!(!format!("{:?}", handle.current()).contains("hunter2"));
    }
}
