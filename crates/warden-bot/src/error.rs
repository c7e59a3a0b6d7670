use std::time::Duration;

use thiserror::Error;

/// Failure of a call to the messaging platform, classified by what the
/// caller should do about it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// The bot is missing the administrative right the call needs.
    #[error("bot lacks the required admin rights")]
    AdminRequired,

    /// Flood control; the call may be retried after the given wait.
    #[error("rate limited, retry after {0:?}")]
    RateLimited(Duration),

    #[error("recipient blocked the bot")]
    Blocked,

    /// Deactivated account or a peer the bot can no longer reach.
    #[error("recipient no longer exists")]
    RecipientGone,

    #[error("{0}")]
    Other(String),
}

impl PlatformError {
    /// Classify a raw platform error description such as
    /// `"Bad Request: CHAT_ADMIN_REQUIRED"`.
    pub fn from_description(description: &str) -> Self {
        let lower = description.to_ascii_lowercase();

        if lower.contains("chat_admin_required")
            || lower.contains("not enough rights")
            || lower.contains("need administrator rights")
        {
            Self::AdminRequired
        } else if lower.contains("bot was blocked") || lower.contains("user_is_blocked") {
            Self::Blocked
        } else if lower.contains("user is deactivated")
            || lower.contains("input_user_deactivated")
            || lower.contains("peer_id_invalid")
            || lower.contains("chat not found")
            || lower.contains("user not found")
        {
            Self::RecipientGone
        } else {
            Self::Other(description.to_string())
        }
    }
}
