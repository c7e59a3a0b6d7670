use teloxide::types::{ChatId, UserId};
use tracing::{debug, error, info, warn};
use warden_types::UnmuteTarget;

use crate::api::{ChatApi, MessageRef, notify};
use crate::commands::Command;
use crate::keyboards::{self, CALLBACK_BACK, CALLBACK_HELP};
use crate::state::{Warden, or_default};
use crate::texts;
use crate::verification::VerifyOutcome;

/// Who sent an update.
#[derive(Debug, Clone)]
pub struct Caller {
    pub id: UserId,
    pub username: Option<String>,
    pub first_name: String,
}

impl Caller {
    pub fn mention(&self) -> String {
        texts::mention(self.id, &self.first_name)
    }
}

/// A command received in a private chat.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub chat_id: ChatId,
    pub caller: Caller,
    /// The message the command replied to, if any.
    pub reply_to: Option<MessageRef>,
}

/// An inline button press.
#[derive(Debug, Clone)]
pub struct ButtonPress {
    pub callback_id: String,
    pub caller: Caller,
    /// The message carrying the button, when still accessible.
    pub message: Option<MessageRef>,
    pub data: String,
}

enum TargetArg {
    Missing,
    Invalid,
    Valid(UserId),
}

fn parse_target(arg: &str) -> TargetArg {
    match arg.split_whitespace().next() {
        None => TargetArg::Missing,
        Some(raw) => raw
            .parse::<u64>()
            .map_or(TargetArg::Invalid, |id| TargetArg::Valid(UserId(id))),
    }
}

impl<A: ChatApi> Warden<A> {
    pub async fn handle_command(&self, inv: &Invocation, cmd: Command) {
        let caller = &inv.caller;
        self.remember_user(caller.id, caller.username.as_deref(), &caller.first_name);

        let role = self.role_of(caller.id);
        if !role.allows(cmd.required_role()) {
            warn!(user_id = caller.id.0, ?role, ?cmd, "Command refused");
            self.reply(inv, texts::NOT_AUTHORIZED).await;
            return;
        }

        match cmd {
            Command::Start(param) => self.start(inv, param.trim()).await,
            Command::Help => self.reply(inv, texts::HELP).await,
            Command::Stats => self.stats(inv).await,
            Command::Broadcast => match inv.reply_to {
                Some(source) => {
                    let tally = self.broadcast(inv.chat_id, source).await;
                    info!(by = caller.id.0, delivered = tally.delivered, total = tally.total, "Broadcast finished");
                }
                None => self.reply(inv, texts::BROADCAST_NEEDS_REPLY).await,
            },
            Command::AddSudo(arg) => self.add_sudo(inv, &arg).await,
            Command::RmSudo(arg) => self.remove_sudo(inv, &arg).await,
            Command::ListSudo => self.list_sudo(inv).await,
        }
    }

    pub async fn handle_button(&self, press: &ButtonPress) {
        let answer = match press.data.as_str() {
            CALLBACK_HELP => {
                self.edit_or_log(press.message, texts::HELP, keyboards::back()).await;
                None
            }
            CALLBACK_BACK => {
                let text = texts::start(&press.caller.mention());
                self.edit_or_log(press.message, &text, keyboards::start(&self.settings))
                    .await;
                None
            }
            data if UnmuteTarget::is_unmute_payload(data) => {
                Some(self.verify(press.caller.id, data).await.short())
            }
            other => {
                debug!(data = other, "Ignoring unknown button");
                None
            }
        };

        if let Err(e) = self
            .api
            .answer_callback(&press.callback_id, answer.as_deref())
            .await
        {
            debug!(error = %e, "Failed to answer callback");
        }
    }

    async fn reply(&self, inv: &Invocation, text: &str) {
        notify(&self.api, inv.chat_id, text, None).await;
    }

    async fn edit_or_log(
        &self,
        message: Option<MessageRef>,
        text: &str,
        keyboard: teloxide::types::InlineKeyboardMarkup,
    ) {
        let Some(message) = message else { return };
        if let Err(e) = self.api.edit_message(message, text, Some(keyboard)).await {
            warn!(error = %e, "Failed to edit message");
        }
    }

    async fn start(&self, inv: &Invocation, param: &str) {
        let caller = &inv.caller;

        if UnmuteTarget::is_unmute_payload(param) {
            let outcome = self.verify(caller.id, param).await;
            let keyboard = match &outcome {
                VerifyOutcome::Unmuted { .. } => keyboards::links(&self.settings),
                _ => None,
            };
            notify(&self.api, inv.chat_id, &outcome.reply(&caller.mention()), keyboard).await;
            return;
        }

        notify(
            &self.api,
            inv.chat_id,
            &texts::start(&caller.mention()),
            Some(keyboards::start(&self.settings)),
        )
        .await;
        info!(user_id = caller.id.0, "User started the bot");
    }

    async fn stats(&self, inv: &Invocation) {
        let users = or_default(self.db.user_count(), "user_count");
        let counters = or_default(self.db.counters(), "counters");
        let pending = or_default(self.db.mute_count(), "mute_count");
        let sudo_count = or_default(self.db.sudo_count(), "sudo_count");
        let generated = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();

        let text = texts::stats(
            users,
            &counters,
            pending,
            sudo_count,
            self.settings.owner_id,
            &generated,
        );
        self.reply(inv, &text).await;
        info!(user_id = inv.caller.id.0, "Stats requested");
    }

    async fn add_sudo(&self, inv: &Invocation, arg: &str) {
        let user_id = match parse_target(arg) {
            TargetArg::Missing => return self.reply(inv, &texts::usage("addsudo")).await,
            TargetArg::Invalid => return self.reply(inv, texts::INVALID_USER_ID).await,
            TargetArg::Valid(id) => id,
        };

        if user_id == self.settings.owner_id {
            return self.reply(inv, texts::OWNER_ALREADY_SUDO).await;
        }
        if or_default(self.db.is_sudo(user_id.0), "is_sudo") {
            return self.reply(inv, &texts::already_sudo(user_id.0)).await;
        }

        match self.db.add_sudo(user_id.0, inv.caller.id.0) {
            Ok(()) => {
                info!(user_id = user_id.0, "Sudo user added");
                self.reply(inv, &texts::sudo_added(user_id.0)).await;
                notify(&self.api, ChatId(user_id.0 as i64), texts::PROMOTED, None).await;
            }
            Err(e) => {
                error!(user_id = user_id.0, error = %e, "Failed to add sudo user");
                self.reply(inv, &texts::sudo_add_failed(user_id.0)).await;
            }
        }
    }

    async fn remove_sudo(&self, inv: &Invocation, arg: &str) {
        let user_id = match parse_target(arg) {
            TargetArg::Missing => return self.reply(inv, &texts::usage("rmsudo")).await,
            TargetArg::Invalid => return self.reply(inv, texts::INVALID_USER_ID).await,
            TargetArg::Valid(id) => id,
        };

        if user_id == self.settings.owner_id {
            return self.reply(inv, texts::CANNOT_REMOVE_OWNER).await;
        }

        match self.db.remove_sudo(user_id.0) {
            Ok(true) => {
                info!(user_id = user_id.0, "Sudo user removed");
                self.reply(inv, &texts::sudo_removed(user_id.0)).await;
                notify(&self.api, ChatId(user_id.0 as i64), texts::DEMOTED, None).await;
            }
            Ok(false) => self.reply(inv, &texts::not_sudo(user_id.0)).await,
            Err(e) => {
                error!(user_id = user_id.0, error = %e, "Failed to remove sudo user");
                self.reply(inv, &texts::sudo_remove_failed(user_id.0)).await;
            }
        }
    }

    async fn list_sudo(&self, inv: &Invocation) {
        let grants = or_default(self.db.sudo_grants(), "sudo_grants");
        if grants.is_empty() {
            return self.reply(inv, texts::NO_SUDO_USERS).await;
        }
        self.reply(inv, &texts::sudo_list(&grants, self.settings.owner_id))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_argument_parsing() {
        assert!(matches!(parse_target(""), TargetArg::Missing));
        assert!(matches!(parse_target("   "), TargetArg::Missing));
        assert!(matches!(parse_target("abc"), TargetArg::Invalid));
        assert!(matches!(parse_target("-5"), TargetArg::Invalid));
        assert!(matches!(parse_target("77 extra"), TargetArg::Valid(UserId(77))));
    }
}
