use std::fmt;

use crate::connection::{Connection, Cursor};
use crate::dialect::Dialect;
use crate::error::TableMapError;
use crate::types::SqlValue;

use super::params::Params;
use rows::OpenRows;

mod rows;
mod tx;

/// A rusqlite connection exposed through the cursor contract.
pub struct SqliteConnection {
    pub(crate) conn: rusqlite::Connection,
}

impl SqliteConnection {
    #[must_use]
    pub fn from_rusqlite(conn: rusqlite::Connection) -> Self {
        Self { conn }
    }

    /// Borrow the raw connection, e.g. to run schema setup the adapter does not cover.
    #[must_use]
    pub fn as_rusqlite(&self) -> &rusqlite::Connection {
        &self.conn
    }

    #[must_use]
    pub fn into_inner(self) -> rusqlite::Connection {
        self.conn
    }

    /// True while a transaction is open on this connection.
    #[must_use]
    pub fn in_transaction(&self) -> bool {
        !self.conn.is_autocommit()
    }
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("path", &self.conn.path())
            .field("in_transaction", &self.in_transaction())
            .finish()
    }
}

/// Cursor over one `SQLite` statement.
///
/// The cursor keeps the statement open and steps it once per `fetch_one`, so
/// rows are read from the database as they are consumed.
pub struct SqliteCursor<'conn> {
    conn: &'conn rusqlite::Connection,
    open: Option<(OpenRows<'conn>, usize)>,
}

impl Cursor for SqliteCursor<'_> {
    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<(), TableMapError> {
        // Reset the previous statement before preparing the next one.
        self.open = None;
        let converted = Params::convert(params);
        let mut stmt = self.conn.prepare_cached(sql)?;
        let columns = stmt.column_count();
        if columns == 0 {
            stmt.execute(rusqlite::params_from_iter(converted.as_values().iter()))?;
        } else {
            self.open = Some((OpenRows::start(stmt, converted.as_values())?, columns));
        }
        Ok(())
    }

    fn fetch_one(&mut self) -> Result<Option<Vec<SqlValue>>, TableMapError> {
        let Some((rows, columns)) = self.open.as_mut() else {
            return Ok(None);
        };
        let row = rows.next_row(*columns)?;
        if row.is_none() {
            self.open = None;
        }
        Ok(row)
    }
}

impl Connection for SqliteConnection {
    type Cursor<'conn> = SqliteCursor<'conn>;

    fn cursor(&self) -> Result<SqliteCursor<'_>, TableMapError> {
        Ok(SqliteCursor {
            conn: &self.conn,
            open: None,
        })
    }

    fn begin(&self) -> Result<(), TableMapError> {
        tx::begin(&self.conn)
    }

    fn commit(&self) -> Result<(), TableMapError> {
        tx::commit(&self.conn)
    }

    fn rollback(&self) -> Result<(), TableMapError> {
        tx::rollback_with_busy_retries(&self.conn)
    }

    fn dialect(&self) -> Dialect {
        Dialect::SQLITE
    }
}
