// ouroboros expands to unsafe code for the self-borrow.
#![allow(unsafe_code)]

use ouroboros::self_referencing;
use rusqlite::types::Value;
use rusqlite::{CachedStatement, Rows, params_from_iter};

use crate::error::TableMapError;
use crate::sqlite::query::sqlite_extract_row;
use crate::types::SqlValue;

/// A cached statement together with the live row iterator stepping it.
#[self_referencing]
pub(super) struct OpenRows<'conn> {
    statement: CachedStatement<'conn>,
    #[borrows(mut statement)]
    #[not_covariant]
    rows: Rows<'this>,
}

impl<'conn> OpenRows<'conn> {
    /// Bind `params` without stepping; the first row is read by the first `next_row`.
    pub(super) fn start(
        statement: CachedStatement<'conn>,
        params: &[Value],
    ) -> Result<Self, TableMapError> {
        let rows = OpenRows::try_new(statement, |statement| {
            statement.query(params_from_iter(params.iter()))
        })?;
        Ok(rows)
    }

    /// Step the statement once.
    pub(super) fn next_row(&mut self, columns: usize) -> Result<Option<Vec<SqlValue>>, TableMapError> {
        self.with_rows_mut(|rows| match rows.next()? {
            Some(row) => sqlite_extract_row(row, columns).map(Some),
            None => Ok(None),
        })
    }
}
