//! Wire types shared with the chat platform.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A chat platform user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_bot: bool,
}

/// A chat platform channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Rich attachment rendered alongside a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackAttachment {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub text: String,
}

/// Post properties understood by the platform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostProps {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<SlackAttachment>,
}

/// A message in a channel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub user_id: String,
    pub channel_id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub props: PostProps,
}

/// Error reported by (or while talking to) the chat platform.
///
/// Displays as `<operation>: <message>, <detail>`, the same shape the
/// platform uses for its own application errors, so handlers can surface it
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformError {
    /// Operation that failed, e.g. `GetUserByEmail`
    pub operation: String,
    /// Short human readable message
    pub message: String,
    /// Extra detail, may be empty
    pub detail: String,
    /// HTTP status returned by the platform, when there was a response
    pub status_code: Option<u16>,
}

impl PlatformError {
    pub fn new(
        operation: impl Into<String>,
        message: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            operation: operation.into(),
            message: message.into(),
            detail: detail.into(),
            status_code: None,
        }
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// Whether the platform answered 404 for this operation
    pub fn is_not_found(&self) -> bool {
        self.status_code == Some(404)
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.operation, self.message)?;
        if !self.detail.is_empty() {
            write!(f, ", {}", self.detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for PlatformError {}
