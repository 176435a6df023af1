//! Chat platform collaborators.
//!
//! The webhook pipeline only needs four capabilities from the chat server:
//! provisioning the bot account, finding a user by email, opening a direct
//! channel and creating a post. They are expressed as the [`ChatPlatform`]
//! trait so the pipeline can run against the real Mattermost API or the
//! in-memory implementation used by tests.

mod mattermost;
mod memory;
mod types;

pub use mattermost::MattermostClient;
pub use memory::{InMemoryPlatform, Operation};
pub use types::{Channel, PlatformError, Post, PostProps, SlackAttachment, User};

use async_trait::async_trait;

use crate::config::BotConfig;

/// Capabilities consumed from the chat platform.
///
/// Implementations must be Send + Sync; one instance is shared by all request
/// handlers for the lifetime of the process.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Makes sure the bot account described by `profile` exists and returns its user id
    async fn ensure_bot(&self, profile: &BotConfig) -> Result<String, PlatformError>;

    /// Looks up a user by email address
    async fn get_user_by_email(&self, email: &str) -> Result<User, PlatformError>;

    /// Returns the direct channel between two users, creating it if needed
    async fn get_direct_channel(
        &self,
        user_id: &str,
        other_user_id: &str,
    ) -> Result<Channel, PlatformError>;

    /// Creates a post and returns it as stored by the platform
    async fn create_post(&self, post: &Post) -> Result<Post, PlatformError>;

    /// Returns the platform name for logging
    fn name(&self) -> &'static str;
}
