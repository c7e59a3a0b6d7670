use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatPermissions, InlineKeyboardMarkup, ParseMode};
use teloxide::{ApiError, RequestError};

use crate::api::{ChatApi, MessageRef, PermissionPreset};
use crate::error::PlatformError;

/// [`ChatApi`] backed by a teloxide [`Bot`].
#[derive(Clone)]
pub struct TelegramApi {
    bot: Bot,
}

impl TelegramApi {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

impl From<RequestError> for PlatformError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::RetryAfter(secs) => Self::RateLimited(secs.duration()),
            RequestError::Api(api) => match api {
                ApiError::BotBlocked => Self::Blocked,
                ApiError::UserDeactivated | ApiError::ChatNotFound | ApiError::UserNotFound => {
                    Self::RecipientGone
                }
                ApiError::NotEnoughRightsToRestrict => Self::AdminRequired,
                other => Self::from_description(&other.to_string()),
            },
            other => Self::Other(other.to_string()),
        }
    }
}

fn permissions(preset: PermissionPreset) -> ChatPermissions {
    match preset {
        PermissionPreset::Muted => ChatPermissions::empty(),
        PermissionPreset::Unrestricted => {
            ChatPermissions::SEND_MESSAGES
                | ChatPermissions::SEND_MEDIA_MESSAGES
                | ChatPermissions::SEND_POLLS
                | ChatPermissions::SEND_OTHER_MESSAGES
                | ChatPermissions::ADD_WEB_PAGE_PREVIEWS
                | ChatPermissions::INVITE_USERS
        }
    }
}

#[async_trait]
impl ChatApi for TelegramApi {
    async fn approve_join_request(&self, chat_id: ChatId, user_id: UserId) -> Result<(), PlatformError> {
        self.bot.approve_chat_join_request(chat_id, user_id).await?;
        Ok(())
    }

    async fn restrict_member(
        &self,
        chat_id: ChatId,
        user_id: UserId,
        preset: PermissionPreset,
    ) -> Result<(), PlatformError> {
        self.bot
            .restrict_chat_member(chat_id, user_id, permissions(preset))
            .await?;
        Ok(())
    }

    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<MessageRef, PlatformError> {
        let mut req = self
            .bot
            .send_message(chat_id, text)
            .parse_mode(ParseMode::Html);
        if let Some(markup) = keyboard {
            req = req.reply_markup(markup);
        }
        let sent = req.await?;
        Ok(MessageRef::new(sent.chat.id, sent.id))
    }

    async fn edit_message(
        &self,
        message: MessageRef,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<(), PlatformError> {
        let mut req = self
            .bot
            .edit_message_text(message.chat_id, message.message_id, text)
            .parse_mode(ParseMode::Html);
        if let Some(markup) = keyboard {
            req = req.reply_markup(markup);
        }
        req.await?;
        Ok(())
    }

    async fn delete_message(&self, message: MessageRef) -> Result<(), PlatformError> {
        self.bot
            .delete_message(message.chat_id, message.message_id)
            .await?;
        Ok(())
    }

    async fn copy_message(&self, to: ChatId, source: MessageRef) -> Result<(), PlatformError> {
        self.bot
            .copy_message(to, source.chat_id, source.message_id)
            .await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<(), PlatformError> {
        let mut req = self.bot.answer_callback_query(callback_id.to_string());
        if let Some(text) = text {
            req = req.text(text).show_alert(true);
        }
        req.await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn muted_preset_denies_everything() {
        assert!(permissions(PermissionPreset::Muted).is_empty());
    }

    #[test]
    fn unrestricted_preset_allows_sending_but_not_admin_rights() {
        let perms = permissions(PermissionPreset::Unrestricted);
        assert!(perms.contains(ChatPermissions::SEND_MESSAGES));
        assert!(perms.contains(ChatPermissions::INVITE_USERS));
        assert!(!perms.contains(ChatPermissions::CHANGE_INFO));
        assert!(!perms.contains(ChatPermissions::PIN_MESSAGES));
    }

    #[test]
    fn blocked_api_error_maps_to_blocked() {
        let err: PlatformError = RequestError::Api(ApiError::BotBlocked).into();
        assert_eq!(err, PlatformError::Blocked);
    }
}
