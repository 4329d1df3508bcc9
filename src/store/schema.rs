use anyhow::Result;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("
        PRAGMA synchronous = NORMAL;

        CREATE TABLE IF NOT EXISTS meta (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        -- One row per user. `id` preserves insertion order for ranking output.
        CREATE TABLE IF NOT EXISTS profiles (
            id         INTEGER PRIMARY KEY,
            user_id    TEXT NOT NULL UNIQUE,
            data       TEXT NOT NULL,  -- profile document as JSON
            updated_at TEXT NOT NULL
        );
    ")?;

    conn.execute(
        "INSERT OR IGNORE INTO meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
