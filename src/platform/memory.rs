//! In-memory [`ChatPlatform`] for tests and local runs without a chat server.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use super::types::{Channel, PlatformError, Post, User};
use super::ChatPlatform;
use crate::config::BotConfig;

/// Platform operations that can be made to fail or stall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    EnsureBot,
    GetUserByEmail,
    GetDirectChannel,
    CreatePost,
}

#[derive(Default)]
struct MemoryState {
    users: HashMap<String, User>,
    bots: HashMap<String, String>,
    posts: Vec<Post>,
    failures: HashMap<Operation, PlatformError>,
    latency: HashMap<Operation, Duration>,
}

/// Chat platform kept entirely in memory.
///
/// Users are seeded by email, direct channels get deterministic ids and every
/// created post is recorded for inspection.
#[derive(Default)]
pub struct InMemoryPlatform {
    state: Mutex<MemoryState>,
}

impl InMemoryPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user with id `user-<username>`
    pub fn with_user(self, email: &str, username: &str) -> Self {
        self.lock().users.insert(
            email.to_string(),
            User {
                id: format!("user-{username}"),
                username: username.to_string(),
                email: email.to_string(),
                is_bot: false,
            },
        );
        self
    }

    /// Makes every subsequent call to `operation` fail with `error`
    pub fn fail(&self, operation: Operation, error: PlatformError) {
        self.lock().failures.insert(operation, error);
    }

    /// Delays every subsequent call to `operation`
    pub fn stall(&self, operation: Operation, delay: Duration) {
        self.lock().latency.insert(operation, delay);
    }

    /// Posts created so far
    pub fn posts(&self) -> Vec<Post> {
        self.lock().posts.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies configured latency and failure for `operation`
    async fn enter(&self, operation: Operation) -> Result<(), PlatformError> {
        let delay = self.lock().latency.get(&operation).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.lock().failures.get(&operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

/// Direct channel name as the platform derives it: both ids, sorted, joined by `__`
fn direct_channel_name(a: &str, b: &str) -> String {
    if a < b {
        format!("{a}__{b}")
    } else {
        format!("{b}__{a}")
    }
}

#[async_trait]
impl ChatPlatform for InMemoryPlatform {
    async fn ensure_bot(&self, profile: &BotConfig) -> Result<String, PlatformError> {
        self.enter(Operation::EnsureBot).await?;
        let mut state = self.lock();
        let id = state
            .bots
            .entry(profile.username.clone())
            .or_insert_with(|| format!("bot-{}", profile.username))
            .clone();
        Ok(id)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, PlatformError> {
        self.enter(Operation::GetUserByEmail).await?;
        self.lock().users.get(email).cloned().ok_or_else(|| {
            PlatformError::new(
                "GetUserByEmail",
                "Unable to find the user.",
                format!("resource: User id: email={email}"),
            )
            .with_status(404)
        })
    }

    async fn get_direct_channel(
        &self,
        user_id: &str,
        other_user_id: &str,
    ) -> Result<Channel, PlatformError> {
        self.enter(Operation::GetDirectChannel).await?;
        let name = direct_channel_name(user_id, other_user_id);
        Ok(Channel {
            id: name.clone(),
            name,
        })
    }

    async fn create_post(&self, post: &Post) -> Result<Post, PlatformError> {
        self.enter(Operation::CreatePost).await?;
        let mut state = self.lock();
        let mut stored = post.clone();
        stored.id = format!("post-{}", state.posts.len() + 1);
        state.posts.push(stored.clone());
        Ok(stored)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
