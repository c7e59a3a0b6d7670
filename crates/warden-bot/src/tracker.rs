use teloxide::types::{ChatId, UserId};
use tracing::{debug, error};
use warden_db::Database;
use warden_types::MuteRecord;

use crate::state::or_default;

/// Which (user, chat) pairs are muted pending verification.
///
/// Every call goes straight to the store. Store failures are logged and read
/// as "not pending" / "nothing changed".
pub struct MembershipTracker<'a> {
    db: &'a Database,
}

impl<'a> MembershipTracker<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn mark_muted(&self, user_id: UserId, chat_id: ChatId, chat_title: &str) -> bool {
        match self.db.add_mute(user_id.0, chat_id.0, chat_title) {
            Ok(()) => {
                debug!(user_id = user_id.0, chat_id = chat_id.0, "Mute recorded");
                true
            }
            Err(e) => {
                error!(user_id = user_id.0, chat_id = chat_id.0, error = %e, "Failed to record mute");
                false
            }
        }
    }

    pub fn pending(&self, user_id: UserId, chat_id: ChatId) -> Option<MuteRecord> {
        or_default(self.db.get_mute(user_id.0, chat_id.0), "get_mute")
    }

    pub fn clear(&self, user_id: UserId, chat_id: ChatId) -> bool {
        or_default(self.db.remove_mute(user_id.0, chat_id.0), "remove_mute")
    }
}
