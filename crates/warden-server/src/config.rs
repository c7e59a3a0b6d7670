use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use teloxide::types::UserId;
use thiserror::Error;
use url::Url;
use warden_bot::Settings;
use warden_bot::settings::DEFAULT_BROADCAST_DELAY;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{key} has an invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Process configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub owner_id: UserId,
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub broadcast_delay: Duration,
    pub updates_url: Option<Url>,
    pub support_url: Option<Url>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bot_token = get("WARDEN_BOT_TOKEN")
            .or_else(|| get("TELOXIDE_TOKEN"))
            .ok_or(ConfigError::Missing("WARDEN_BOT_TOKEN"))?;

        let owner_raw = get("WARDEN_OWNER_ID").ok_or(ConfigError::Missing("WARDEN_OWNER_ID"))?;
        let owner_id = parse("WARDEN_OWNER_ID", &owner_raw, |v| v.trim().parse::<u64>())?;

        let port = match get("PORT") {
            Some(raw) => parse("PORT", &raw, |v| v.trim().parse::<u16>())?,
            None => 8080,
        };

        let broadcast_delay = match get("WARDEN_BROADCAST_DELAY_MS") {
            Some(raw) => Duration::from_millis(parse("WARDEN_BROADCAST_DELAY_MS", &raw, |v| {
                v.trim().parse::<u64>()
            })?),
            None => DEFAULT_BROADCAST_DELAY,
        };

        let updates_url = get("WARDEN_UPDATES_URL")
            .map(|raw| parse("WARDEN_UPDATES_URL", &raw, |v| Url::parse(v.trim())))
            .transpose()?;
        let support_url = get("WARDEN_SUPPORT_URL")
            .map(|raw| parse("WARDEN_SUPPORT_URL", &raw, |v| Url::parse(v.trim())))
            .transpose()?;

        Ok(Self {
            bot_token,
            owner_id: UserId(owner_id),
            db_path: get("WARDEN_DB_PATH")
                .unwrap_or_else(|| "warden.db".into())
                .into(),
            host: get("WARDEN_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            broadcast_delay,
            updates_url,
            support_url,
        })
    }

    pub fn health_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            key: "WARDEN_HOST",
            value: raw.clone(),
            reason: e.to_string(),
        })
    }

    pub fn settings(&self, bot_username: impl Into<String>) -> Settings {
        Settings {
            owner_id: self.owner_id,
            bot_username: bot_username.into(),
            updates_url: self.updates_url.clone(),
            support_url: self.support_url.clone(),
            broadcast_delay: self.broadcast_delay,
        }
    }
}

fn parse<T, E: std::fmt::Display>(
    key: &'static str,
    raw: &str,
    f: impl FnOnce(&str) -> Result<T, E>,
) -> Result<T, ConfigError> {
    f(raw).map_err(|e| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[("WARDEN_BOT_TOKEN", "123:abc"), ("WARDEN_OWNER_ID", "7548822418")]).unwrap();
        assert_eq!(config.owner_id, UserId(7548822418));
        assert_eq!(config.port, 8080);
        assert_eq!(config.db_path, PathBuf::from("warden.db"));
        assert_eq!(config.broadcast_delay, Duration::from_millis(100));
        assert!(config.updates_url.is_none());
        assert_eq!(config.health_addr().unwrap().port(), 8080);
    }

    #[test]
    fn falls_back_to_teloxide_token() {
        let config = load(&[("TELOXIDE_TOKEN", "t"), ("WARDEN_OWNER_ID", "1")]).unwrap();
        assert_eq!(config.bot_token, "t");
    }

    #[test]
    fn missing_owner_is_an_error() {
        let err = load(&[("WARDEN_BOT_TOKEN", "t")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("WARDEN_OWNER_ID")));
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = load(&[("WARDEN_BOT_TOKEN", "t"), ("WARDEN_OWNER_ID", "me")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "WARDEN_OWNER_ID", .. }));

        let err = load(&[
            ("WARDEN_BOT_TOKEN", "t"),
            ("WARDEN_OWNER_ID", "1"),
            ("PORT", "99999"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }

    #[test]
    fn optional_links_are_parsed() {
        let config = load(&[
            ("WARDEN_BOT_TOKEN", "t"),
            ("WARDEN_OWNER_ID", "1"),
            ("WARDEN_SUPPORT_URL", "https://t.me/support_chat"),
        ])
        .unwrap();
        assert_eq!(
            config.support_url.as_ref().map(Url::as_str),
            Some("https://t.me/support_chat")
        );
        let settings = config.settings("warden_bot");
        assert_eq!(settings.bot_username, "warden_bot");
        assert!(settings.support_url.is_some());
    }
}
