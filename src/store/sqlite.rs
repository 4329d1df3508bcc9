use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::schema;
use crate::profile::Profile;

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(dir) = db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating storage dir {}", dir.display()))?;
        }
        let conn = Connection::open(db_path)
            .with_context(|| format!("opening database at {}", db_path.display()))?;
        // journal_mode answers with a row, so it can't go through execute_batch
        conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))?;
        schema::run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Open only if the database file already exists.
    pub fn open_if_exists(db_path: &Path) -> Result<Option<Self>> {
        if db_path.exists() {
            Self::open(db_path).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("opening in-memory database")?;
        schema::run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Insert a profile, or replace the stored document if the user exists.
    /// A replaced profile keeps its original position.
    pub fn upsert_profile(&self, profile: &Profile) -> Result<()> {
        if profile.user_id.trim().is_empty() {
            bail!("profile has no userId");
        }
        let data = serde_json::to_string(profile)
            .with_context(|| format!("encoding profile {}", profile.user_id))?;
        let now = chrono::Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO profiles (user_id, data, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id) DO UPDATE SET
                data = excluded.data,
                updated_at = excluded.updated_at",
            params![profile.user_id, data, now],
        )?;
        Ok(())
    }

    /// Upsert a batch of profiles in one transaction. Nothing is written if
    /// any profile is rejected.
    pub fn import(&self, profiles: &[Profile]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        for profile in profiles {
            self.upsert_profile(profile)?;
        }
        tx.commit()?;
        Ok(profiles.len())
    }

    /// Every stored profile, in insertion order.
    pub fn all_profiles(&self) -> Result<Vec<Profile>> {
        let mut stmt = self
            .conn
            .prepare("SELECT user_id, data FROM profiles ORDER BY id")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut profiles = Vec::new();
        for row in rows {
            let (user_id, data): (String, String) = row?;
            profiles.push(decode(user_id, &data)?);
        }
        Ok(profiles)
    }

    pub fn profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let data: Option<String> = self
            .conn
            .query_row(
                "SELECT data FROM profiles WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;
        data.map(|d| decode(user_id.to_string(), &d)).transpose()
    }

    pub fn profile_count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM profiles", [], |r| r.get(0))?;
        Ok(count)
    }
}

// The row key is authoritative for the id, whatever the document says.
fn decode(user_id: String, data: &str) -> Result<Profile> {
    let mut profile: Profile = serde_json::from_str(data)
        .with_context(|| format!("decoding stored profile {user_id}"))?;
    profile.user_id = user_id;
    Ok(profile)
}
