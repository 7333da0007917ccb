use crate::columns::Fields;
use crate::connection::Connection;
use crate::error::TableMapError;
use crate::types::SqlValue;

use super::TableMap;

/// What [`TableMap::put`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// No row matched the key; a new row was inserted.
    Inserted,
    /// A row matched with a different value; its value columns were rewritten.
    Updated,
    /// A row already held this value; nothing was written.
    Unchanged,
}

impl<C: Connection> TableMap<'_, C> {
    /// Store `value` under `key`.
    ///
    /// Asks the database whether a row holds the key and whether its value columns
    /// already equal `value`, then inserts, updates, or does nothing. The comparison
    /// happens in the database so it sees stored values, not their decoded form.
    /// Columns the adapter does not know about get their defaults on insert and are
    /// left alone on update. The check and the write are separate round trips, so a
    /// concurrent writer can slip in between; a resulting key conflict surfaces as
    /// the database error.
    ///
    /// # Errors
    /// `InvalidKey`/`InvalidValue` for arguments of the wrong arity, or the database
    /// error (after rolling back when auto-commit is on).
    pub fn put(
        &self,
        key: impl Into<Fields>,
        value: impl Into<Fields>,
    ) -> Result<PutOutcome, TableMapError> {
        let key = self.codec.normalize_key(key.into())?;
        let value = self.codec.normalize_value(value.into())?;
        let row: Vec<_> = key.into_iter().chain(value).collect();

        match self.stored_value_matches(&row)? {
            None => {
                self.mutate(|| self.execute(&self.queries.insert, &row).map(drop))?;
                Ok(PutOutcome::Inserted)
            }
            Some(true) => Ok(PutOutcome::Unchanged),
            Some(false) => {
                let (key, value) = row.split_at(self.codec.key_arity());
                let params: Vec<_> = value.iter().chain(key).cloned().collect();
                self.mutate(|| self.execute(&self.queries.update, &params).map(drop))?;
                Ok(PutOutcome::Updated)
            }
        }
    }

    /// `None` when no row holds the key, otherwise whether its value columns equal
    /// the value half of `row`.
    fn stored_value_matches(&self, row: &[SqlValue]) -> Result<Option<bool>, TableMapError> {
        let Some(cells) = self.fetch_first(&self.queries.matches, row)? else {
            return Ok(None);
        };
        match cells.first().and_then(SqlValue::as_bool) {
            Some(equal) => Ok(Some(equal)),
            None => Err(TableMapError::ExecutionError(format!(
                "value comparison on {} returned a non-boolean result",
                self.table
            ))),
        }
    }

    /// Value under `key`, inserting `default` first when no row matches.
    ///
    /// Not atomic: a row inserted by someone else between the lookup and the insert
    /// makes the insert fail with the database's key-conflict error.
    ///
    /// # Errors
    /// `InvalidKey`/`InvalidValue` for arguments of the wrong arity, or the database error.
    pub fn set_default(
        &self,
        key: impl Into<Fields>,
        default: impl Into<Fields>,
    ) -> Result<Fields, TableMapError> {
        let key = self.codec.normalize_key(key.into())?;
        let value = self.codec.normalize_value(default.into())?;

        if let Some(existing) = self.lookup(&key)? {
            return Ok(existing);
        }
        let mut row: Vec<_> = key.into_iter().chain(value).collect();
        self.mutate(|| self.execute(&self.queries.insert, &row).map(drop))?;
        Ok(self.codec.value_fields(row.split_off(self.codec.key_arity())))
    }

    /// Delete every row matching `key`. Deleting an absent key is not an error.
    ///
    /// # Errors
    /// `InvalidKey` for a key of the wrong arity, or the database error.
    pub fn delete(&self, key: impl Into<Fields>) -> Result<(), TableMapError> {
        let key = self.codec.normalize_key(key.into())?;
        self.mutate(|| self.execute(&self.queries.delete, &key).map(drop))
    }

    /// Insert a row holding only `value`, leaving the key columns to database defaults.
    ///
    /// Only meaningful when the key columns are generated (serial, rowid alias, ...).
    ///
    /// # Errors
    /// `InvalidValue` for a value of the wrong arity, or the database error.
    pub fn append(&self, value: impl Into<Fields>) -> Result<(), TableMapError> {
        let value = self.codec.normalize_value(value.into())?;
        self.mutate(|| self.execute(&self.queries.append, &value).map(drop))
    }

    /// Delete every row in the table.
    ///
    /// # Errors
    /// Returns the database error.
    pub fn clear(&self) -> Result<(), TableMapError> {
        self.mutate(|| self.execute(&self.queries.clear, &[]).map(drop))
    }
}
