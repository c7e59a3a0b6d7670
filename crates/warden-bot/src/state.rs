use std::sync::Arc;

use teloxide::types::UserId;
use tracing::{error, info};
use warden_db::Database;
use warden_types::Role;

use crate::api::ChatApi;
use crate::settings::Settings;
use crate::tracker::MembershipTracker;

pub type SharedWarden<A> = Arc<Warden<A>>;

/// Everything a handler needs: the platform, the store and startup settings.
pub struct Warden<A> {
    pub api: A,
    pub db: Database,
    pub settings: Settings,
}

impl<A: ChatApi> Warden<A> {
    pub fn new(api: A, db: Database, settings: Settings) -> Self {
        info!(
            owner_id = settings.owner_id.0,
            bot = %settings.bot_username,
            "Warden initialised"
        );
        Self { api, db, settings }
    }

    pub fn tracker(&self) -> MembershipTracker<'_> {
        MembershipTracker::new(&self.db)
    }

    /// Role of `user_id` as of this call. A failed grant lookup reads as no grant.
    pub fn role_of(&self, user_id: UserId) -> Role {
        if user_id == self.settings.owner_id {
            return Role::Owner;
        }
        let has_grant = or_default(self.db.is_sudo(user_id.0), "is_sudo");
        Role::resolve(user_id.0, self.settings.owner_id.0, has_grant)
    }

    pub fn remember_user(&self, user_id: UserId, username: Option<&str>, first_name: &str) {
        or_default(self.db.upsert_user(user_id.0, username, first_name), "upsert_user");
    }
}

/// Log a failed store call and carry on with the type's default value.
pub(crate) fn or_default<T: Default>(result: anyhow::Result<T>, op: &'static str) -> T {
    result.unwrap_or_else(|e| {
        error!(op, error = %e, "Store operation failed");
        T::default()
    })
}
