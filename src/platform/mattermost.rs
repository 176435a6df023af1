//! Mattermost REST API (v4) implementation of [`ChatPlatform`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::types::{Channel, PlatformError, Post, User};
use super::ChatPlatform;
use crate::config::{BotConfig, PlatformConfig};

/// Error body returned by the Mattermost API on non-2xx responses
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    detailed_error: String,
}

/// Bot account as returned by `POST /api/v4/bots`
#[derive(Debug, Deserialize)]
struct Bot {
    user_id: String,
}

/// Mattermost client authenticated with a bearer token.
///
/// The token should belong to the bot account (or an admin when the bot still
/// has to be created). Every request carries the configured timeout.
pub struct MattermostClient {
    http: Client,
    base_url: String,
    token: String,
}

impl MattermostClient {
    /// Creates a client from platform configuration
    pub fn new(config: &PlatformConfig) -> Result<Self, PlatformError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .connect_timeout(Duration::from_secs(config.timeout.min(10)))
            .user_agent(concat!("moodle-notify/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PlatformError::new("NewClient", e.to_string(), ""))?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v4{}", self.base_url, path)
    }

    /// Sends the request and decodes either the success body or the platform error
    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<T, PlatformError> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| PlatformError::new(operation, e.to_string(), ""))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| PlatformError::new(operation, "Invalid response body", e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        Err(api_error(operation, status.as_u16(), &body))
    }
}

/// Builds a [`PlatformError`] from a non-2xx Mattermost response
fn api_error(operation: &str, status: u16, body: &str) -> PlatformError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = if parsed.message.is_empty() {
        format!("Request failed with status {status}")
    } else {
        parsed.message
    };
    PlatformError::new(operation, message, parsed.detailed_error).with_status(status)
}

#[async_trait]
impl ChatPlatform for MattermostClient {
    async fn ensure_bot(&self, profile: &BotConfig) -> Result<String, PlatformError> {
        let path = format!("/users/username/{}", urlencoding::encode(&profile.username));
        let existing: Result<User, PlatformError> = self
            .execute("EnsureBot", self.http.get(self.endpoint(&path)))
            .await;

        match existing {
            Ok(user) if user.is_bot => Ok(user.id),
            Ok(user) => Err(PlatformError::new(
                "EnsureBot",
                "Username is taken by a regular user account.",
                format!("username={}", user.username),
            )),
            Err(err) if err.is_not_found() => {
                tracing::info!(username = %profile.username, "Creating bot account");
                let request = self.http.post(self.endpoint("/bots")).json(&json!({
                    "username": profile.username,
                    "display_name": profile.display_name,
                    "description": profile.description,
                }));
                let bot: Bot = self.execute("EnsureBot", request).await?;
                Ok(bot.user_id)
            }
            Err(err) => Err(err),
        }
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, PlatformError> {
        let path = format!("/users/email/{}", urlencoding::encode(email));
        self.execute("GetUserByEmail", self.http.get(self.endpoint(&path)))
            .await
    }

    async fn get_direct_channel(
        &self,
        user_id: &str,
        other_user_id: &str,
    ) -> Result<Channel, PlatformError> {
        let request = self
            .http
            .post(self.endpoint("/channels/direct"))
            .json(&[user_id, other_user_id]);
        self.execute("GetDirectChannel", request).await
    }

    async fn create_post(&self, post: &Post) -> Result<Post, PlatformError> {
        let request = self.http.post(self.endpoint("/posts")).json(post);
        self.execute("CreatePost", request).await
    }

    fn name(&self) -> &'static str {
        "mattermost"
    }
}
