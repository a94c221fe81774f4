//! Owned SQLite handle for the Linkvault domain core.

use rusqlite::Connection;
use std::path::Path;

use super::migrations;

/// An open, migrated SQLite database.
///
/// Construction is the only place the schema is touched: both `open`
/// variants bring the database up to [`migrations::CURRENT_SCHEMA_VERSION`]
/// before returning, so a `Database` in hand always has the full table set.
/// Managers borrow the connection through [`Database::connection`] and
/// share it freely; writes coordinate through transactions, not through
/// this type.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens the database file at `path`, creating and migrating it as needed.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` when the file cannot be opened or a
    /// migration statement fails.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        migrations::run_all(&conn)?;
        Ok(Self { conn })
    }

    /// Opens a fresh in-memory database, migrated and ready for queries.
    /// Dropped together with the `Database`; tests lean on this.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` when a migration statement fails.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        migrations::run_all(&conn)?;
        Ok(Self { conn })
    }

    /// Borrows the underlying connection for the managers to query against.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
