use chrono::Utc;
use rusqlite::{OptionalExtension, Result as SqlResult, params};
use std::path::Path;

use super::database::Database;

/// Key the bearer token is stored under, shared with the web client.
pub const TOKEN_KEY: &str = "wfc_token";

/// Client-side key/value store that keeps the session across restarts.
pub struct SessionDatabase {
    db: Database,
}

impl SessionDatabase {
    pub fn with_path<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let db = Database::open(path)?;
        let session_db = Self { db };
        session_db.init_schema()?;
        Ok(session_db)
    }

    pub fn in_memory() -> SqlResult<Self> {
        let session_db = Self {
            db: Database::in_memory()?,
        };
        session_db.init_schema()?;
        Ok(session_db)
    }

    fn init_schema(&self) -> SqlResult<()> {
        self.db.connection().execute(
            "CREATE TABLE IF NOT EXISTS session (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    pub fn set(&self, key: &str, value: &str) -> SqlResult<()> {
        self.db.connection().execute(
            "INSERT OR REPLACE INTO session (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().timestamp()],
        )?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> SqlResult<Option<String>> {
        self.db
            .connection()
            .query_row(
                "SELECT value FROM session WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
    }

    pub fn remove(&self, key: &str) -> SqlResult<()> {
        self.db
            .connection()
            .execute("DELETE FROM session WHERE key = ?1", params![key])?;
        Ok(())
    }

    // ========== Token ==========

    pub fn save_token(&self, token: &str) -> SqlResult<()> {
        self.set(TOKEN_KEY, token)
    }

    pub fn load_token(&self) -> SqlResult<Option<String>> {
        self.get(TOKEN_KEY)
    }

    pub fn clear_token(&self) -> SqlResult<()> {
        self.remove(TOKEN_KEY)
    }
}
