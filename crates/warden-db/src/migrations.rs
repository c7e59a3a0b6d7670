use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);"
    )?;

    let version: i64 = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS users (
                user_id     INTEGER PRIMARY KEY,
                username    TEXT,
                first_name  TEXT NOT NULL DEFAULT '',
                joined_date TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS sudo_users (
                user_id     INTEGER PRIMARY KEY,
                added_by    INTEGER NOT NULL,
                added_date  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS muted_users (
                user_id     INTEGER NOT NULL,
                chat_id     INTEGER NOT NULL,
                chat_title  TEXT NOT NULL DEFAULT '',
                muted_date  TEXT NOT NULL,
                PRIMARY KEY (user_id, chat_id)
            );

            CREATE TABLE IF NOT EXISTS stats (
                id                  INTEGER PRIMARY KEY CHECK (id = 1),
                total_requests      INTEGER NOT NULL DEFAULT 0,
                total_messages_sent INTEGER NOT NULL DEFAULT 0,
                total_unmuted       INTEGER NOT NULL DEFAULT 0
            );

            INSERT OR IGNORE INTO stats (id) VALUES (1);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
