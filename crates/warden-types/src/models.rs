use chrono::{DateTime, Utc};

/// A person the bot has seen, either through a command or a join request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user_id: u64,
    pub username: Option<String>,
    pub first_name: String,
    pub first_seen: DateTime<Utc>,
}

/// Elevated command access granted by the owner.
/// The owner is never stored as a grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SudoGrant {
    pub user_id: u64,
    pub granted_by: u64,
    pub granted_at: DateTime<Utc>,
}

/// A member restricted in `chat_id` until they complete verification.
/// At most one exists per (user, chat).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuteRecord {
    pub user_id: u64,
    pub chat_id: i64,
    pub chat_title: String,
    pub muted_at: DateTime<Utc>,
}

/// Increment-only aggregate counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub requests_accepted: u64,
    pub messages_sent: u64,
    pub users_unmuted: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    RequestsAccepted,
    MessagesSent,
    UsersUnmuted,
}

impl Counter {
    /// Column backing this counter in the `stats` table.
    pub fn column(self) -> &'static str {
        match self {
            Self::RequestsAccepted => "total_requests",
            Self::MessagesSent => "total_messages_sent",
            Self::UsersUnmuted => "total_unmuted",
        }
    }
}

impl Counters {
    pub fn get(&self, counter: Counter) -> u64 {
        match counter {
            Counter::RequestsAccepted => self.requests_accepted,
            Counter::MessagesSent => self.messages_sent,
            Counter::UsersUnmuted => self.users_unmuted,
        }
    }
}
