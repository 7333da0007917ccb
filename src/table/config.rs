use crate::columns::Columns;
use crate::connection::Connection;
use crate::error::TableMapError;

use super::TableMap;

/// Construction-time settings for a [`TableMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    pub table: String,
    pub keys: Columns,
    pub values: Columns,
    /// Run `CREATE TABLE` once while constructing the adapter.
    pub create: bool,
    /// Commit (or roll back) every mutating call on its own.
    pub auto_commit: bool,
}

impl TableOptions {
    #[must_use]
    pub fn new(table: impl Into<String>, keys: impl Into<Columns>, values: impl Into<Columns>) -> Self {
        Self {
            table: table.into(),
            keys: keys.into(),
            values: values.into(),
            create: false,
            auto_commit: true,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), TableMapError> {
        if self.table.is_empty() || self.table.contains('\0') {
            return Err(TableMapError::ConfigError(format!(
                "invalid table name {:?}",
                self.table
            )));
        }
        self.keys.validate("key")?;
        self.values.validate("value")
    }
}

/// Fluent builder for a [`TableMap`].
///
/// ```rust
/// # use sql_table_map::prelude::*;
/// # fn demo() -> Result<(), TableMapError> {
/// let conn = SqliteConnection::open_in_memory()?;
/// let headers = TableMap::builder(&conn, "message_headers")
///     .keys([("message_id", "text"), ("header_index", "int")])
///     .values([("header_name", "text"), ("header_value", "text")])
///     .create(true)
///     .build()?;
/// headers.put(("m1", 0), ("Subject", "hello"))?;
/// # Ok(())
/// # }
/// # demo().unwrap();
/// ```
pub struct TableMapBuilder<'conn, C: Connection> {
    conn: &'conn C,
    table: String,
    keys: Option<Columns>,
    values: Option<Columns>,
    create: bool,
    auto_commit: bool,
}

impl<'conn, C: Connection> TableMapBuilder<'conn, C> {
    pub(super) fn new(conn: &'conn C, table: impl Into<String>) -> Self {
        Self {
            conn,
            table: table.into(),
            keys: None,
            values: None,
            create: false,
            auto_commit: true,
        }
    }

    #[must_use]
    pub fn keys(mut self, keys: impl Into<Columns>) -> Self {
        self.keys = Some(keys.into());
        self
    }

    #[must_use]
    pub fn values(mut self, values: impl Into<Columns>) -> Self {
        self.values = Some(values.into());
        self
    }

    #[must_use]
    pub fn create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    #[must_use]
    pub fn auto_commit(mut self, auto_commit: bool) -> Self {
        self.auto_commit = auto_commit;
        self
    }

    /// # Errors
    /// Returns `TableMapError::ConfigError` when keys or values were not given or are unusable,
    /// or the database error if table creation fails.
    pub fn build(self) -> Result<TableMap<'conn, C>, TableMapError> {
        let keys = self
            .keys
            .ok_or_else(|| TableMapError::ConfigError("key columns are required".into()))?;
        let values = self
            .values
            .ok_or_else(|| TableMapError::ConfigError("value columns are required".into()))?;
        let options = TableOptions {
            table: self.table,
            keys,
            values,
            create: self.create,
            auto_commit: self.auto_commit,
        };
        TableMap::with_options(self.conn, options)
    }
}
