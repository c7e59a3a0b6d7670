use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub const UNMUTE_TAG: &str = "unmute";

/// The (chat, user) pair carried by an unmute deep link or button.
///
/// Wire forms: `unmute_<chatId>_<userId>` as a `/start` parameter and
/// `unmute:<chatId>:<userId>` as callback data. Both parse the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnmuteTarget {
    pub chat_id: i64,
    pub user_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("expected 3 fields, found {0}")]
    FieldCount(usize),
    #[error("unknown payload tag {0:?}")]
    UnknownTag(String),
    #[error("invalid chat id {0:?}")]
    InvalidChatId(String),
    #[error("invalid user id {0:?}")]
    InvalidUserId(String),
}

impl UnmuteTarget {
    pub fn new(chat_id: i64, user_id: u64) -> Self {
        Self { chat_id, user_id }
    }

    /// True when `payload` is addressed to the unmute flow at all, well-formed
    /// or not. Used to route before parsing.
    pub fn is_unmute_payload(payload: &str) -> bool {
        payload.starts_with(UNMUTE_TAG)
    }

    pub fn start_param(&self) -> String {
        format!("{UNMUTE_TAG}_{}_{}", self.chat_id, self.user_id)
    }

    pub fn callback_data(&self) -> String {
        format!("{UNMUTE_TAG}:{}:{}", self.chat_id, self.user_id)
    }
}

impl FromStr for UnmuteTarget {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(['_', ':']).collect();
        let [tag, chat, user] = fields.as_slice() else {
            return Err(PayloadError::FieldCount(fields.len()));
        };

        if *tag != UNMUTE_TAG {
            return Err(PayloadError::UnknownTag((*tag).to_string()));
        }
        let chat_id = chat
            .parse::<i64>()
            .map_err(|_| PayloadError::InvalidChatId((*chat).to_string()))?;
        let user_id = user
            .parse::<u64>()
            .map_err(|_| PayloadError::InvalidUserId((*user).to_string()))?;

        Ok(Self { chat_id, user_id })
    }
}

impl fmt::Display for UnmuteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.start_param())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_start_param() {
        let target: UnmuteTarget = "unmute_100_42".parse().unwrap();
        assert_eq!(target, UnmuteTarget::new(100, 42));
    }

    #[test]
    fn parses_supergroup_ids_and_callback_form() {
        let target: UnmuteTarget = "unmute:-1001234567890:42".parse().unwrap();
        assert_eq!(target.chat_id, -1001234567890);
        assert_eq!(target.user_id, 42);

        let again: UnmuteTarget = target.start_param().parse().unwrap();
        assert_eq!(again, target);
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert_eq!(
            "unmute_100".parse::<UnmuteTarget>(),
            Err(PayloadError::FieldCount(2))
        );
        assert_eq!(
            "unmute_100_42_9".parse::<UnmuteTarget>(),
            Err(PayloadError::FieldCount(4))
        );
    }

    #[test]
    fn rejects_non_numeric_ids() {
        assert!(matches!(
            "unmute_abc_42".parse::<UnmuteTarget>(),
            Err(PayloadError::InvalidChatId(_))
        ));
        assert!(matches!(
            "unmute_100_-42".parse::<UnmuteTarget>(),
            Err(PayloadError::InvalidUserId(_))
        ));
        assert!(matches!(
            "unmute_100_".parse::<UnmuteTarget>(),
            Err(PayloadError::InvalidUserId(_))
        ));
    }

    #[test]
    fn rejects_other_tags() {
        assert!(matches!(
            "mute_100_42".parse::<UnmuteTarget>(),
            Err(PayloadError::UnknownTag(_))
        ));
        assert!(!UnmuteTarget::is_unmute_payload("ref_abc"));
    }
}
