use crate::Database;
use crate::models::{parse_timestamp, timestamp_now, user_from_key, user_key};
use anyhow::Result;
use rusqlite::Connection;
use warden_types::{Counter, Counters, MuteRecord, SudoGrant, UserProfile};

impl Database {
    // -- Users --

    /// Insert a user on first sight, otherwise refresh their names.
    /// The first-seen timestamp is never overwritten.
    pub fn upsert_user(&self, user_id: u64, username: Option<&str>, first_name: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (user_id, username, first_name, joined_date)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(user_id) DO UPDATE SET
                     username = excluded.username,
                     first_name = excluded.first_name",
                rusqlite::params![user_key(user_id), username, first_name, timestamp_now()],
            )?;
            Ok(())
        })
    }

    pub fn get_user(&self, user_id: u64) -> Result<Option<UserProfile>> {
        self.with_conn(|conn| query_user(conn, user_id))
    }

    /// Every known user id, in ascending id order.
    pub fn user_ids(&self) -> Result<Vec<u64>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT user_id FROM users ORDER BY user_id")?;
            let ids = stmt
                .query_map([], |row| row.get::<_, i64>(0))?
                .map(|id| id.map(user_from_key))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(ids)
        })
    }

    pub fn user_count(&self) -> Result<u64> {
        self.with_conn(|conn| count(conn, "SELECT COUNT(*) FROM users"))
    }

    // -- Sudo grants --

    pub fn add_sudo(&self, user_id: u64, granted_by: u64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO sudo_users (user_id, added_by, added_date) VALUES (?1, ?2, ?3)",
                rusqlite::params![user_key(user_id), user_key(granted_by), timestamp_now()],
            )?;
            Ok(())
        })
    }

    /// Returns `true` if a grant was actually removed.
    pub fn remove_sudo(&self, user_id: u64) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM sudo_users WHERE user_id = ?1",
                [user_key(user_id)],
            )?;
            Ok(removed > 0)
        })
    }

    pub fn is_sudo(&self, user_id: u64) -> Result<bool> {
        self.with_conn(|conn| {
            let found = conn
                .query_row(
                    "SELECT 1 FROM sudo_users WHERE user_id = ?1",
                    [user_key(user_id)],
                    |_| Ok(()),
                )
                .optional()?;
            Ok(found.is_some())
        })
    }

    pub fn sudo_grants(&self) -> Result<Vec<SudoGrant>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, added_by, added_date FROM sudo_users ORDER BY added_date, user_id",
            )?;
            let grants = stmt
                .query_map([], |row| {
                    let raw: String = row.get(2)?;
                    Ok(SudoGrant {
                        user_id: user_from_key(row.get(0)?),
                        granted_by: user_from_key(row.get(1)?),
                        granted_at: parse_timestamp(2, &raw)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(grants)
        })
    }

    pub fn sudo_count(&self) -> Result<u64> {
        self.with_conn(|conn| count(conn, "SELECT COUNT(*) FROM sudo_users"))
    }

    // -- Muted members --

    /// Record that `user_id` is muted in `chat_id`. Replaces any previous
    /// record for the same pair.
    pub fn add_mute(&self, user_id: u64, chat_id: i64, chat_title: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO muted_users (user_id, chat_id, chat_title, muted_date)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![user_key(user_id), chat_id, chat_title, timestamp_now()],
            )?;
            Ok(())
        })
    }

    pub fn get_mute(&self, user_id: u64, chat_id: i64) -> Result<Option<MuteRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, chat_id, chat_title, muted_date
                 FROM muted_users WHERE user_id = ?1 AND chat_id = ?2",
            )?;
            let record = stmt
                .query_row(rusqlite::params![user_key(user_id), chat_id], mute_from_row)
                .optional()?;
            Ok(record)
        })
    }

    /// Returns `true` if a record was actually removed.
    pub fn remove_mute(&self, user_id: u64, chat_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM muted_users WHERE user_id = ?1 AND chat_id = ?2",
                rusqlite::params![user_key(user_id), chat_id],
            )?;
            Ok(removed > 0)
        })
    }

    pub fn mute_count(&self) -> Result<u64> {
        self.with_conn(|conn| count(conn, "SELECT COUNT(*) FROM muted_users"))
    }

    // -- Counters --

    pub fn increment(&self, counter: Counter) -> Result<()> {
        let column = counter.column();
        self.with_conn(|conn| {
            conn.execute(
                &format!("UPDATE stats SET {column} = {column} + 1 WHERE id = 1"),
                [],
            )?;
            Ok(())
        })
    }

    pub fn counters(&self) -> Result<Counters> {
        self.with_conn(|conn| {
            let counters = conn.query_row(
                "SELECT total_requests, total_messages_sent, total_unmuted FROM stats WHERE id = 1",
                [],
                |row| {
                    Ok(Counters {
                        requests_accepted: row.get::<_, i64>(0)? as u64,
                        messages_sent: row.get::<_, i64>(1)? as u64,
                        users_unmuted: row.get::<_, i64>(2)? as u64,
                    })
                },
            )?;
            Ok(counters)
        })
    }
}

fn query_user(conn: &Connection, user_id: u64) -> Result<Option<UserProfile>> {
    let mut stmt = conn.prepare(
        "SELECT user_id, username, first_name, joined_date FROM users WHERE user_id = ?1",
    )?;

    let row = stmt
        .query_row([user_key(user_id)], |row| {
            let raw: String = row.get(3)?;
            Ok(UserProfile {
                user_id: user_from_key(row.get(0)?),
                username: row.get(1)?,
                first_name: row.get(2)?,
                first_seen: parse_timestamp(3, &raw)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn mute_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MuteRecord> {
    let raw: String = row.get(3)?;
    Ok(MuteRecord {
        user_id: user_from_key(row.get(0)?),
        chat_id: row.get(1)?,
        chat_title: row.get(2)?,
        muted_at: parse_timestamp(3, &raw)?,
    })
}

fn count(conn: &Connection, sql: &str) -> Result<u64> {
    let n: i64 = conn.query_row(sql, [], |row| row.get(0))?;
    Ok(n as u64)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn upsert_keeps_first_seen() {
        let db = db();
        db.upsert_user(42, Some("alice"), "Alice").unwrap();
        let first = db.get_user(42).unwrap().unwrap();

        db.upsert_user(42, None, "Alice B").unwrap();
        let second = db.get_user(42).unwrap().unwrap();

        assert_eq!(second.first_seen, first.first_seen);
        assert_eq!(second.first_name, "Alice B");
        assert_eq!(second.username, None);
        assert_eq!(db.user_count().unwrap(), 1);
    }

    #[test]
    fn user_ids_are_ordered() {
        let db = db();
        for id in [30, 10, 20] {
            db.upsert_user(id, None, "x").unwrap();
        }
        assert_eq!(db.user_ids().unwrap(), vec![10, 20, 30]);
    }

    #[test]
    fn sudo_grant_lifecycle() {
        let db = db();
        assert!(!db.is_sudo(5).unwrap());

        db.add_sudo(5, 1).unwrap();
        assert!(db.is_sudo(5).unwrap());
        assert_eq!(db.sudo_count().unwrap(), 1);

        let grants = db.sudo_grants().unwrap();
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].user_id, 5);
        assert_eq!(grants[0].granted_by, 1);

        assert!(db.remove_sudo(5).unwrap());
        assert!(!db.remove_sudo(5).unwrap());
        assert!(!db.is_sudo(5).unwrap());
    }

    #[test]
    fn one_mute_per_user_and_chat() {
        let db = db();
        db.add_mute(42, 100, "Group").unwrap();
        db.add_mute(42, 100, "Group renamed").unwrap();
        db.add_mute(42, -200, "Other").unwrap();

        assert_eq!(db.mute_count().unwrap(), 2);
        let record = db.get_mute(42, 100).unwrap().unwrap();
        assert_eq!(record.chat_title, "Group renamed");

        assert!(db.remove_mute(42, 100).unwrap());
        assert!(db.get_mute(42, 100).unwrap().is_none());
        assert!(!db.remove_mute(42, 100).unwrap());
        assert!(db.get_mute(42, -200).unwrap().is_some());
    }

    #[test]
    fn counters_only_increase() {
        let db = db();
        assert_eq!(db.counters().unwrap(), Counters::default());

        db.increment(Counter::RequestsAccepted).unwrap();
        db.increment(Counter::RequestsAccepted).unwrap();
        db.increment(Counter::MessagesSent).unwrap();
        db.increment(Counter::UsersUnmuted).unwrap();

        let counters = db.counters().unwrap();
        assert_eq!(counters.requests_accepted, 2);
        assert_eq!(counters.messages_sent, 1);
        assert_eq!(counters.users_unmuted, 1);
        assert_eq!(counters.get(Counter::RequestsAccepted), 2);
    }
}
