use rusqlite::{Connection, Result as SqlResult};
use std::fs;
use std::path::Path;

/// Base SQLite connection wrapper shared by the client tables.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database file, creating its parent directory.
    pub fn open<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        log::debug!("Opened session database at {}", path.display());
        Ok(Self { conn })
    }

    pub fn in_memory() -> SqlResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
