use crate::columns::Fields;
use crate::connection::Connection;
use crate::error::TableMapError;
use crate::sequence::{ItemDecoder, KeyDecoder, RowSequence, ValueDecoder};

use super::TableMap;

impl<'conn, C: Connection> TableMap<'conn, C> {
    /// Value stored under `key`.
    ///
    /// If the key columns are not a real primary key, the value of an arbitrary matching row.
    ///
    /// # Errors
    /// `InvalidKey` for a key of the wrong arity, `KeyNotFound` when no row matches,
    /// or the database error.
    pub fn get(&self, key: impl Into<Fields>) -> Result<Fields, TableMapError> {
        let key = self.codec.normalize_key(key.into())?;
        match self.lookup(&key)? {
            Some(value) => Ok(value),
            None => Err(TableMapError::KeyNotFound(self.codec.key_fields(key))),
        }
    }

    /// Like [`get`](Self::get), but returns `default` when no row matches.
    ///
    /// `default` must have the value arity even though it is only used on a miss.
    ///
    /// # Errors
    /// `InvalidKey`/`InvalidValue` for arguments of the wrong arity, or the database error.
    pub fn get_or_default(
        &self,
        key: impl Into<Fields>,
        default: impl Into<Fields>,
    ) -> Result<Fields, TableMapError> {
        let key = self.codec.normalize_key(key.into())?;
        let default = self.codec.normalize_value(default.into())?;
        Ok(self
            .lookup(&key)?
            .unwrap_or_else(|| self.codec.value_fields(default)))
    }

    /// # Errors
    /// `InvalidKey` for a key of the wrong arity, or the database error.
    pub fn contains(&self, key: impl Into<Fields>) -> Result<bool, TableMapError> {
        let key = self.codec.normalize_key(key.into())?;
        Ok(self.lookup(&key)?.is_some())
    }

    /// Number of rows in the table, counted afresh on every call.
    ///
    /// # Errors
    /// Returns the database error.
    pub fn len(&self) -> Result<usize, TableMapError> {
        self.fetch_count(&self.queries.len, &[])
    }

    /// # Errors
    /// Returns the database error.
    pub fn is_empty(&self) -> Result<bool, TableMapError> {
        Ok(self.len()? == 0)
    }

    /// Smallest key (in SQL `ORDER BY` order over the key columns) whose row holds `value`.
    ///
    /// # Errors
    /// `InvalidValue` for a value of the wrong arity, `ValueNotFound` when no row holds it,
    /// or the database error.
    pub fn index(&self, value: impl Into<Fields>) -> Result<Fields, TableMapError> {
        let params = self.codec.normalize_value(value.into())?;
        match self.fetch_first(&self.queries.index, &params)? {
            Some(row) => self.codec.decode_key(row),
            None => Err(TableMapError::ValueNotFound(self.codec.value_fields(params))),
        }
    }

    /// Number of rows whose value columns equal `value`.
    ///
    /// # Errors
    /// `InvalidValue` for a value of the wrong arity, or the database error.
    pub fn count(&self, value: impl Into<Fields>) -> Result<usize, TableMapError> {
        let params = self.codec.normalize_value(value.into())?;
        self.fetch_count(&self.queries.count, &params)
    }

    /// Smallest key in the table; the first key column is most significant.
    ///
    /// # Errors
    /// `EmptyTable` when the table has no rows, or the database error.
    pub fn min(&self) -> Result<Fields, TableMapError> {
        self.edge_key(&self.queries.min)
    }

    /// Largest key in the table; the first key column is most significant.
    ///
    /// # Errors
    /// `EmptyTable` when the table has no rows, or the database error.
    pub fn max(&self) -> Result<Fields, TableMapError> {
        self.edge_key(&self.queries.max)
    }

    fn edge_key(&self, sql: &str) -> Result<Fields, TableMapError> {
        match self.fetch_first(sql, &[])? {
            Some(row) => self.codec.decode_key(row),
            None => Err(TableMapError::EmptyTable(self.table.clone())),
        }
    }

    /// Lazily iterate over the key of every row.
    ///
    /// # Errors
    /// Returns the database error from executing the scan.
    pub fn iter_keys(&self) -> Result<RowSequence<C::Cursor<'conn>, KeyDecoder>, TableMapError> {
        let cursor = self.execute(&self.queries.keys, &[])?;
        Ok(RowSequence::new(cursor, KeyDecoder(self.codec)))
    }

    /// Lazily iterate over the value of every row.
    ///
    /// # Errors
    /// Returns the database error from executing the scan.
    pub fn iter_values(
        &self,
    ) -> Result<RowSequence<C::Cursor<'conn>, ValueDecoder>, TableMapError> {
        let cursor = self.execute(&self.queries.values, &[])?;
        Ok(RowSequence::new(cursor, ValueDecoder(self.codec)))
    }

    /// Lazily iterate over `(key, value)` for every row.
    ///
    /// # Errors
    /// Returns the database error from executing the scan.
    pub fn iter_items(&self) -> Result<RowSequence<C::Cursor<'conn>, ItemDecoder>, TableMapError> {
        let cursor = self.execute(&self.queries.items, &[])?;
        Ok(RowSequence::new(cursor, ItemDecoder(self.codec)))
    }

    /// Every key in the table. Holds the whole result in memory.
    ///
    /// # Errors
    /// Returns the database error.
    pub fn keys(&self) -> Result<Vec<Fields>, TableMapError> {
        self.iter_keys()?.collect()
    }

    /// Every value in the table. Holds the whole result in memory.
    ///
    /// # Errors
    /// Returns the database error.
    pub fn values(&self) -> Result<Vec<Fields>, TableMapError> {
        self.iter_values()?.collect()
    }

    /// Every `(key, value)` pair in the table. Holds the whole result in memory.
    ///
    /// # Errors
    /// Returns the database error.
    pub fn items(&self) -> Result<Vec<(Fields, Fields)>, TableMapError> {
        self.iter_items()?.collect()
    }
}
