/// Row <-> domain conversions. Timestamps are stored as RFC 3339 UTC text
/// and ids as SQLite integers.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;

pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339()
}

pub fn parse_timestamp(column: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// Telegram user ids fit comfortably in 52 bits, so the i64 column is lossless.
pub fn user_key(user_id: u64) -> i64 {
    user_id as i64
}

pub fn user_from_key(key: i64) -> u64 {
    key as u64
}
