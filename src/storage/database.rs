use rusqlite::Connection;
use std::path::Path;

use super::ensure_parent_dir;
use super::error::StorageResult;

/// Base database connection wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the SQLite file, creating its directory first.
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let path = path.as_ref();
        ensure_parent_dir(path)?;
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        log::info!("Opened database at {}", path.display());
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
