use rusqlite::types::Value;

use crate::error::TableMapError;
use crate::types::SqlValue;

/// Extract a `SqlValue` from a `SQLite` row.
///
/// # Errors
///
/// Returns `TableMapError::SqliteError` if the value cannot be read.
pub fn sqlite_extract_value(row: &rusqlite::Row, idx: usize) -> Result<SqlValue, TableMapError> {
    let value: Value = row.get(idx)?;
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Int(i),
        Value::Real(f) => SqlValue::Float(f),
        Value::Text(s) => SqlValue::Text(s),
        Value::Blob(b) => SqlValue::Blob(b),
    })
}

/// Extract the first `columns` cells of a `SQLite` row, in column order.
///
/// # Errors
/// Returns `TableMapError::SqliteError` if any value cannot be read.
pub fn sqlite_extract_row(row: &rusqlite::Row, columns: usize) -> Result<Vec<SqlValue>, TableMapError> {
    (0..columns).map(|idx| sqlite_extract_value(row, idx)).collect()
}
