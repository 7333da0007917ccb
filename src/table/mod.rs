//! The table-as-map adapter.
//!
//! A [`TableMap`] borrows a connection and runs one pre-built statement (or a
//! lookup followed by one write) per call. Nothing is cached: every read goes
//! to the database.

use crate::codec::Codec;
use crate::columns::{ColumnDef, Columns, Fields};
use crate::connection::{Connection, Cursor, run_in_transaction};
use crate::error::TableMapError;
use crate::query_builder::TableQueries;
use crate::types::SqlValue;

mod config;
mod read;
mod write;

pub use config::{TableMapBuilder, TableOptions};
pub use write::PutOutcome;

/// A single table viewed as a map from key columns to value columns.
///
/// Not safe to share across threads unless the connection is; give each
/// worker its own connection and adapter.
pub struct TableMap<'conn, C: Connection> {
    conn: &'conn C,
    table: String,
    keys: Columns,
    values: Columns,
    codec: Codec,
    queries: TableQueries,
    auto_commit: bool,
}

impl<'conn, C: Connection> TableMap<'conn, C> {
    /// Adapter over an existing table, committing after every mutating call.
    ///
    /// # Errors
    /// Returns `TableMapError::ConfigError` when the table or column descriptors are unusable.
    pub fn new(
        conn: &'conn C,
        table: impl Into<String>,
        keys: impl Into<Columns>,
        values: impl Into<Columns>,
    ) -> Result<Self, TableMapError> {
        Self::with_options(conn, TableOptions::new(table, keys, values))
    }

    pub fn builder(conn: &'conn C, table: impl Into<String>) -> TableMapBuilder<'conn, C> {
        TableMapBuilder::new(conn, table)
    }

    /// # Errors
    /// Returns `TableMapError::ConfigError` for unusable descriptors, or the database
    /// error when `options.create` is set and the CREATE statement fails.
    pub fn with_options(conn: &'conn C, options: TableOptions) -> Result<Self, TableMapError> {
        options.validate()?;
        let queries = TableQueries::build(
            conn.dialect(),
            &options.table,
            options.keys.as_slice(),
            options.values.as_slice(),
            options.create,
        );
        let map = Self {
            conn,
            codec: Codec::new(&options.keys, &options.values),
            table: options.table,
            keys: options.keys,
            values: options.values,
            queries,
            auto_commit: options.auto_commit,
        };
        if let Some(create) = &map.queries.create {
            map.mutate(|| map.execute(create, &[]).map(drop))?;
            tracing::info!(table = %map.table, "created table");
        }
        Ok(map)
    }

    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub fn key_columns(&self) -> &[ColumnDef] {
        self.keys.as_slice()
    }

    #[must_use]
    pub fn value_columns(&self) -> &[ColumnDef] {
        self.values.as_slice()
    }

    #[must_use]
    pub fn queries(&self) -> &TableQueries {
        &self.queries
    }

    #[must_use]
    pub fn auto_commit(&self) -> bool {
        self.auto_commit
    }

    /// Open a fresh cursor and execute `sql` on it.
    fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<C::Cursor<'conn>, TableMapError> {
        tracing::debug!(table = %self.table, sql, params = params.len(), "executing statement");
        let mut cursor = self.conn.cursor()?;
        cursor.execute(sql, params)?;
        Ok(cursor)
    }

    /// Execute `sql` and fetch at most one row.
    fn fetch_first(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Option<Vec<SqlValue>>, TableMapError> {
        self.execute(sql, params)?.fetch_one()
    }

    /// Value stored under an already-normalized key, if any row matches.
    fn lookup(&self, key: &[SqlValue]) -> Result<Option<Fields>, TableMapError> {
        self.fetch_first(&self.queries.get, key)?
            .map(|row| self.codec.decode_value(row))
            .transpose()
    }

    fn fetch_count(&self, sql: &str, params: &[SqlValue]) -> Result<usize, TableMapError> {
        let row = self.fetch_first(sql, params)?.ok_or_else(|| {
            TableMapError::ExecutionError(format!("COUNT on {} returned no row", self.table))
        })?;
        row.first()
            .and_then(SqlValue::as_int)
            .and_then(|count| usize::try_from(count).ok())
            .ok_or_else(|| {
                TableMapError::ExecutionError(format!(
                    "COUNT on {} returned a non-integer result",
                    self.table
                ))
            })
    }

    /// Run a write under the table's commit discipline.
    fn mutate<R>(&self, work: impl FnOnce() -> Result<R, TableMapError>) -> Result<R, TableMapError> {
        if self.auto_commit {
            run_in_transaction(self.conn, |_| work())
        } else {
            work()
        }
    }
}
