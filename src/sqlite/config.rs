use std::time::Duration;

use crate::error::TableMapError;

use super::connection::SqliteConnection;

/// Options for opening a `SQLite` connection.
#[derive(Debug, Clone)]
pub struct SqliteOptions {
    pub db_path: String,
    pub busy_timeout: Duration,
    pub wal: bool,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            busy_timeout: Duration::from_secs(5),
            wal: false,
        }
    }

    #[must_use]
    pub fn with_wal(mut self, wal: bool) -> Self {
        self.wal = wal;
        self
    }

    #[must_use]
    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn wal(mut self, wal: bool) -> Self {
        self.opts.wal = wal;
        self
    }

    #[must_use]
    pub fn busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.opts.busy_timeout = busy_timeout;
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    /// Open the connection described by these options.
    ///
    /// # Errors
    ///
    /// Returns `TableMapError` if the database cannot be opened or the pragmas fail.
    pub fn open(self) -> Result<SqliteConnection, TableMapError> {
        SqliteConnection::open(&self.finish())
    }
}

impl SqliteConnection {
    #[must_use]
    pub fn builder(db_path: impl Into<String>) -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new(db_path)
    }

    /// Open a database file with the given options.
    ///
    /// # Errors
    /// Returns `TableMapError::SqliteError` if opening the file or applying pragmas fails.
    pub fn open(opts: &SqliteOptions) -> Result<Self, TableMapError> {
        let conn = rusqlite::Connection::open(&opts.db_path)?;
        conn.busy_timeout(opts.busy_timeout)?;
        if opts.wal {
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        }
        tracing::debug!(path = %opts.db_path, wal = opts.wal, "opened sqlite database");
        Ok(Self::from_rusqlite(conn))
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    /// Returns `TableMapError::SqliteError` if `SQLite` cannot allocate the database.
    pub fn open_in_memory() -> Result<Self, TableMapError> {
        Ok(Self::from_rusqlite(rusqlite::Connection::open_in_memory()?))
    }
}
