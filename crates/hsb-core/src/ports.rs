use async_trait::async_trait;

use crate::{domain::ChatId, Result};

/// Source of homework-review status updates.
///
/// The HTTP status API is the first implementation; tests substitute
/// in-process fakes.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch the raw status payload for updates since `from_date`
    /// (unix seconds).
    async fn fetch(&self, from_date: i64) -> Result<serde_json::Value>;
}

/// Outbound messaging port.
///
/// Telegram is the first implementation; the shape is small enough that a
/// future adapter (Slack/Discord) fits behind the same interface.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()>;
}
