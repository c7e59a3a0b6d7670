use async_trait::async_trait;
use teloxide::types::{ChatId, InlineKeyboardMarkup, MessageId, UserId};
use tracing::warn;

use crate::error::PlatformError;

/// A message the bot can point back at: its chat plus its id in that chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

impl MessageRef {
    pub fn new(chat_id: ChatId, message_id: MessageId) -> Self {
        Self { chat_id, message_id }
    }
}

/// Permission sets applied with [`ChatApi::restrict_member`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionPreset {
    /// Nothing allowed; the member can read but not write.
    Muted,
    /// The regular member rights: sending everything and inviting users.
    Unrestricted,
}

/// Outbound calls the bot makes to the messaging platform.
///
/// Text is sent as HTML. Implemented for teloxide in [`crate::telegram`].
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn approve_join_request(&self, chat_id: ChatId, user_id: UserId) -> Result<(), PlatformError>;

    async fn restrict_member(
        &self,
        chat_id: ChatId,
        user_id: UserId,
        preset: PermissionPreset,
    ) -> Result<(), PlatformError>;

    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<MessageRef, PlatformError>;

    async fn edit_message(
        &self,
        message: MessageRef,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<(), PlatformError>;

    async fn delete_message(&self, message: MessageRef) -> Result<(), PlatformError>;

    /// Copy `source` into `to` without a forward header.
    async fn copy_message(&self, to: ChatId, source: MessageRef) -> Result<(), PlatformError>;

    /// Acknowledge a button press, optionally showing `text` as an alert.
    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<(), PlatformError>;
}

/// Best-effort send. Failures are logged and reported as `false`; callers that
/// do not care discard the result.
pub async fn notify<A: ChatApi + ?Sized>(
    api: &A,
    chat_id: ChatId,
    text: &str,
    keyboard: Option<InlineKeyboardMarkup>,
) -> bool {
    match api.send_message(chat_id, text, keyboard).await {
        Ok(_) => true,
        Err(e) => {
            warn!(chat_id = chat_id.0, error = %e, "Best-effort message not delivered");
            false
        }
    }
}
