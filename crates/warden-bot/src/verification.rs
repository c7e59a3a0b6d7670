//! Join request → mute → deep-link unmute.
//!
//! All state lives in the chat id, the user id and the persisted mute record,
//! so a verification link keeps working across restarts.

use teloxide::types::{ChatId, UserId};
use tracing::{error, info, warn};
use warden_types::{Counter, PayloadError, UnmuteTarget};

use crate::api::{ChatApi, PermissionPreset};
use crate::error::PlatformError;
use crate::keyboards;
use crate::state::{Warden, or_default};
use crate::texts;

/// A pending membership application as delivered by the platform.
#[derive(Debug, Clone)]
pub struct JoinRequest {
    pub chat_id: ChatId,
    pub chat_title: String,
    pub user_id: UserId,
    pub username: Option<String>,
    pub first_name: String,
}

/// What happened to a join request. `muted` without `approved` never occurs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinOutcome {
    pub approved: bool,
    pub muted: bool,
    pub announced: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    Unmuted { chat_title: String },
    NotPending,
    WrongUser,
    Malformed(PayloadError),
    AdminRequired,
    Failed(PlatformError),
}

impl VerifyOutcome {
    /// Full reply for the private chat.
    pub fn reply(&self, mention: &str) -> String {
        match self {
            Self::Unmuted { chat_title } => texts::unmuted(mention, chat_title),
            other => other.short().to_string(),
        }
    }

    /// One-line form, used for button alerts.
    pub fn short(&self) -> std::borrow::Cow<'static, str> {
        match self {
            Self::Unmuted { chat_title } => texts::unmuted_short(chat_title).into(),
            Self::NotPending => texts::NOT_PENDING.into(),
            Self::WrongUser => texts::WRONG_USER.into(),
            Self::Malformed(_) => texts::INVALID_LINK.into(),
            Self::AdminRequired => texts::UNMUTE_ADMIN_REQUIRED.into(),
            Self::Failed(_) => texts::UNMUTE_FAILED.into(),
        }
    }
}

impl<A: ChatApi> Warden<A> {
    /// Approve, mute and announce a new member.
    ///
    /// Only a failed approval aborts; a failed restriction or announcement is
    /// logged and leaves the member approved.
    pub async fn handle_join_request(&self, req: &JoinRequest) -> JoinOutcome {
        let mut outcome = JoinOutcome::default();

        self.remember_user(req.user_id, req.username.as_deref(), &req.first_name);

        if !self.approve_with_retry(req).await {
            return outcome;
        }
        outcome.approved = true;
        or_default(self.db.increment(Counter::RequestsAccepted), "increment_requests");
        info!(
            user_id = req.user_id.0,
            chat_id = req.chat_id.0,
            chat = %req.chat_title,
            "Approved join request"
        );

        match self
            .api
            .restrict_member(req.chat_id, req.user_id, PermissionPreset::Muted)
            .await
        {
            Ok(()) => {
                outcome.muted = true;
                self.tracker()
                    .mark_muted(req.user_id, req.chat_id, &req.chat_title);
                info!(user_id = req.user_id.0, chat_id = req.chat_id.0, "Muted new member");
            }
            Err(e) => {
                error!(user_id = req.user_id.0, chat_id = req.chat_id.0, error = %e, "Failed to mute new member");
            }
        }

        outcome.announced = self.announce(req).await;
        outcome
    }

    /// Approve once; on flood control wait the signalled time and try exactly
    /// one more time.
    async fn approve_with_retry(&self, req: &JoinRequest) -> bool {
        match self.api.approve_join_request(req.chat_id, req.user_id).await {
            Ok(()) => true,
            Err(PlatformError::AdminRequired) => {
                error!(chat_id = req.chat_id.0, chat = %req.chat_title, "Bot lacks admin rights to approve join requests");
                false
            }
            Err(PlatformError::RateLimited(wait)) => {
                warn!(?wait, chat_id = req.chat_id.0, "Flood control on approval, retrying once");
                tokio::time::sleep(wait).await;
                match self.api.approve_join_request(req.chat_id, req.user_id).await {
                    Ok(()) => true,
                    Err(e) => {
                        error!(user_id = req.user_id.0, chat_id = req.chat_id.0, error = %e, "Approval retry failed");
                        false
                    }
                }
            }
            Err(e) => {
                error!(user_id = req.user_id.0, chat_id = req.chat_id.0, error = %e, "Failed to approve join request");
                false
            }
        }
    }

    /// Post the welcome with the unmute button into the chat itself.
    async fn announce(&self, req: &JoinRequest) -> bool {
        let target = UnmuteTarget::new(req.chat_id.0, req.user_id.0);
        let link = match self.settings.unmute_link(target) {
            Ok(link) => link,
            Err(e) => {
                error!(error = %e, bot = %self.settings.bot_username, "Cannot build unmute link");
                return false;
            }
        };

        let text = texts::group_welcome(&texts::mention(req.user_id, &req.first_name));
        match self
            .api
            .send_message(req.chat_id, &text, Some(keyboards::unmute(link)))
            .await
        {
            Ok(_) => {
                or_default(self.db.increment(Counter::MessagesSent), "increment_messages");
                info!(user_id = req.user_id.0, chat_id = req.chat_id.0, "Verification message sent");
                true
            }
            Err(e) => {
                error!(chat_id = req.chat_id.0, error = %e, "Failed to send verification message");
                false
            }
        }
    }

    /// Lift the restriction for `caller` if `payload` names them and they are
    /// still pending in that chat. Repeating a successful call is a no-op.
    pub async fn verify(&self, caller: UserId, payload: &str) -> VerifyOutcome {
        let target: UnmuteTarget = match payload.parse() {
            Ok(target) => target,
            Err(e) => {
                warn!(user_id = caller.0, payload, error = %e, "Malformed unmute payload");
                return VerifyOutcome::Malformed(e);
            }
        };

        if target.user_id != caller.0 {
            warn!(user_id = caller.0, target = target.user_id, "Unmute link used by someone else");
            return VerifyOutcome::WrongUser;
        }

        let chat_id = ChatId(target.chat_id);
        let tracker = self.tracker();
        let Some(record) = tracker.pending(caller, chat_id) else {
            return VerifyOutcome::NotPending;
        };

        match self
            .api
            .restrict_member(chat_id, caller, PermissionPreset::Unrestricted)
            .await
        {
            Ok(()) => {
                tracker.clear(caller, chat_id);
                or_default(self.db.increment(Counter::UsersUnmuted), "increment_unmuted");
                info!(user_id = caller.0, chat_id = chat_id.0, "Unmuted verified member");
                VerifyOutcome::Unmuted {
                    chat_title: record.chat_title,
                }
            }
            Err(PlatformError::AdminRequired) => {
                error!(chat_id = chat_id.0, "Bot lacks admin rights to unmute");
                VerifyOutcome::AdminRequired
            }
            Err(e) => {
                error!(user_id = caller.0, chat_id = chat_id.0, error = %e, "Failed to unmute");
                VerifyOutcome::Failed(e)
            }
        }
    }
}
