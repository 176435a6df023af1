//! Delivery of inbound notifications as direct messages.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::models::Notification;
use crate::platform::{ChatPlatform, Post, PlatformError};

/// Sends a validated notification to its recipient through the chat platform.
///
/// The recipient is looked up by email, the bot's direct channel with them is
/// opened (or reused) and a single post carrying the rendered attachment is
/// created. Each platform call is bounded by `timeout`.
#[derive(Clone)]
pub struct NotifyService {
    platform: Arc<dyn ChatPlatform>,
    bot_id: String,
    timeout: Duration,
}

impl NotifyService {
    pub fn new(platform: Arc<dyn ChatPlatform>, bot_id: impl Into<String>, timeout: Duration) -> Self {
        Self {
            platform,
            bot_id: bot_id.into(),
            timeout,
        }
    }

    /// Id of the bot account posts are sent from
    pub fn bot_id(&self) -> &str {
        &self.bot_id
    }

    /// Delivers `notification`, returning the created post
    ///
    /// # Errors
    /// - `AppError::Platform` when the user or channel lookup fails
    /// - `AppError::Dispatch` when the post cannot be created
    /// - `AppError::Timeout` when any call exceeds the configured timeout
    pub async fn notify(&self, notification: &Notification) -> AppResult<Post> {
        let user = self
            .bounded("GetUserByEmail", self.platform.get_user_by_email(&notification.email))
            .await?
            .map_err(AppError::Platform)?;

        let channel = self
            .bounded(
                "GetDirectChannel",
                self.platform.get_direct_channel(&user.id, &self.bot_id),
            )
            .await?
            .map_err(AppError::Platform)?;

        let post = notification.to_post(&self.bot_id, &channel.id);
        let created = self
            .bounded("CreatePost", self.platform.create_post(&post))
            .await?
            .map_err(|source| AppError::Dispatch { source })?;

        tracing::debug!(
            platform = self.platform.name(),
            channel_id = %channel.id,
            post_id = %created.id,
            "Direct message created"
        );
        Ok(created)
    }

    async fn bounded<T>(
        &self,
        operation: &str,
        call: impl Future<Output = Result<T, PlatformError>>,
    ) -> AppResult<Result<T, PlatformError>> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| AppError::Timeout {
                operation: operation.to_string(),
                seconds: self.timeout.as_secs(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ATTACHMENT_COLOR;
    use crate::platform::{InMemoryPlatform, Operation};

    fn notification(email: &str) -> Notification {
        Notification {
            email: email.to_string(),
            message: "Assignment due".to_string(),
            message_html: "<p>Assignment <b>due</b></p>".to_string(),
            subject: "Reminder".to_string(),
        }
    }

    fn service(platform: Arc<InMemoryPlatform>) -> NotifyService {
        NotifyService::new(platform, "bot-moodle", Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_notify_posts_attachment_to_direct_channel() {
        let platform = Arc::new(InMemoryPlatform::new().with_user("s@example.com", "student"));
        let post = service(platform.clone())
            .notify(&notification("s@example.com"))
            .await
            .unwrap();

        assert_eq!(post.channel_id, "bot-moodle__user-student");
        assert_eq!(post.user_id, "bot-moodle");
        assert!(post.message.is_empty());

        let posts = platform.posts();
        assert_eq!(posts.len(), 1);
        let attachment = &posts[0].props.attachments[0];
        assert_eq!(attachment.title, "Reminder");
        assert_eq!(attachment.color, ATTACHMENT_COLOR);
        assert_eq!(attachment.text, "Assignment **due**");
    }

    #[tokio::test]
    async fn test_unknown_user_is_a_platform_error() {
        let platform = Arc::new(InMemoryPlatform::new());
        let err = service(platform.clone())
            .notify(&notification("ghost@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Platform(_)));
        assert_eq!(
            err.to_string(),
            "GetUserByEmail: Unable to find the user., resource: User id: email=ghost@example.com"
        );
        assert!(platform.posts().is_empty());
    }

    #[tokio::test]
    async fn test_post_failure_is_a_dispatch_error() {
        let platform = Arc::new(InMemoryPlatform::new().with_user("s@example.com", "student"));
        platform.fail(
            Operation::CreatePost,
            PlatformError::new("CreatePost", "channel is archived", ""),
        );

        let err = service(platform)
            .notify(&notification("s@example.com"))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not send DM to user: CreatePost: channel is archived"
        );
    }

    #[tokio::test]
    async fn test_channel_failure_is_a_platform_error() {
        let platform = Arc::new(InMemoryPlatform::new().with_user("s@example.com", "student"));
        platform.fail(
            Operation::GetDirectChannel,
            PlatformError::new("GetDirectChannel", "forbidden", "").with_status(403),
        );

        let err = service(platform)
            .notify(&notification("s@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Platform(ref e) if e.operation == "GetDirectChannel"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_platform_times_out() {
        let platform = Arc::new(InMemoryPlatform::new().with_user("s@example.com", "student"));
        platform.stall(Operation::GetUserByEmail, Duration::from_secs(60));

        let err = service(platform.clone())
            .notify(&notification("s@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Timeout { ref operation, seconds: 5 } if operation == "GetUserByEmail"));
        assert!(platform.posts().is_empty());
    }
}
