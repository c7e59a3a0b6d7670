use std::time::Duration;

use teloxide::types::UserId;
use url::Url;
use warden_types::UnmuteTarget;

pub const DEFAULT_BROADCAST_DELAY: Duration = Duration::from_millis(100);

/// Values resolved once at startup and never changed afterwards.
#[derive(Debug, Clone)]
pub struct Settings {
    pub owner_id: UserId,
    /// Username without the leading `@`, taken from `getMe`.
    pub bot_username: String,
    pub updates_url: Option<Url>,
    pub support_url: Option<Url>,
    pub broadcast_delay: Duration,
}

impl Settings {
    pub fn new(owner_id: UserId, bot_username: impl Into<String>) -> Self {
        Self {
            owner_id,
            bot_username: bot_username.into(),
            updates_url: None,
            support_url: None,
            broadcast_delay: DEFAULT_BROADCAST_DELAY,
        }
    }

    /// `https://t.me/<bot>?start=unmute_<chat>_<user>`
    pub fn unmute_link(&self, target: UnmuteTarget) -> Result<Url, url::ParseError> {
        let mut link = Url::parse("https://t.me/")?.join(&self.bot_username)?;
        link.query_pairs_mut()
            .append_pair("start", &target.start_param());
        Ok(link)
    }
}
