use crate::columns::{Columns, Fields};
use crate::error::TableMapError;
use crate::types::SqlValue;

/// Converts between the caller's keys and values and fixed-arity column tuples.
///
/// Only tuple length is checked; the SQL types of the columns are taken on faith.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    key_arity: usize,
    value_arity: usize,
    single_key: bool,
    single_value: bool,
}

impl Codec {
    #[must_use]
    pub fn new(keys: &Columns, values: &Columns) -> Self {
        Self {
            key_arity: keys.as_slice().len(),
            value_arity: values.as_slice().len(),
            single_key: keys.is_single(),
            single_value: values.is_single(),
        }
    }

    #[must_use]
    pub fn key_arity(&self) -> usize {
        self.key_arity
    }

    #[must_use]
    pub fn value_arity(&self) -> usize {
        self.value_arity
    }

    /// # Errors
    /// Returns `TableMapError::InvalidKey` when the key does not span exactly the key columns.
    pub fn normalize_key(&self, key: Fields) -> Result<Vec<SqlValue>, TableMapError> {
        normalize(key, self.single_key, self.key_arity).map_err(|found| {
            TableMapError::InvalidKey {
                expected: self.key_arity,
                found,
            }
        })
    }

    /// # Errors
    /// Returns `TableMapError::InvalidValue` when the value does not span exactly the value columns.
    pub fn normalize_value(&self, value: Fields) -> Result<Vec<SqlValue>, TableMapError> {
        normalize(value, self.single_value, self.value_arity).map_err(|found| {
            TableMapError::InvalidValue {
                expected: self.value_arity,
                found,
            }
        })
    }

    /// Rebuild a key from its normalized values, e.g. to report it back.
    #[must_use]
    pub fn key_fields(&self, values: Vec<SqlValue>) -> Fields {
        collapse(values, self.single_key)
    }

    #[must_use]
    pub fn value_fields(&self, values: Vec<SqlValue>) -> Fields {
        collapse(values, self.single_value)
    }

    /// # Errors
    /// Returns `TableMapError::ExecutionError` when the row does not have one cell per key column.
    pub fn decode_key(&self, row: Vec<SqlValue>) -> Result<Fields, TableMapError> {
        check_width(&row, self.key_arity)?;
        Ok(collapse(row, self.single_key))
    }

    /// # Errors
    /// Returns `TableMapError::ExecutionError` when the row does not have one cell per value column.
    pub fn decode_value(&self, row: Vec<SqlValue>) -> Result<Fields, TableMapError> {
        check_width(&row, self.value_arity)?;
        Ok(collapse(row, self.single_value))
    }

    /// Split a full row, key columns first, into its key and value.
    ///
    /// # Errors
    /// Returns `TableMapError::ExecutionError` when the row is not exactly key plus value columns wide.
    pub fn decode_item(&self, mut row: Vec<SqlValue>) -> Result<(Fields, Fields), TableMapError> {
        check_width(&row, self.key_arity + self.value_arity)?;
        let value = row.split_off(self.key_arity);
        Ok((
            collapse(row, self.single_key),
            collapse(value, self.single_value),
        ))
    }
}

// Err carries the arity that was actually supplied. A scalar outside single
// mode is never acceptable, so it reports zero tuple fields.
fn normalize(fields: Fields, single: bool, arity: usize) -> Result<Vec<SqlValue>, usize> {
    let values = match fields {
        Fields::Scalar(value) if single => vec![value],
        Fields::Scalar(_) => return Err(0),
        Fields::Tuple(values) => values,
    };
    if values.len() == arity {
        Ok(values)
    } else {
        Err(values.len())
    }
}

fn collapse(mut values: Vec<SqlValue>, single: bool) -> Fields {
    if single && values.len() == 1 {
        Fields::Scalar(values.remove(0))
    } else {
        Fields::Tuple(values)
    }
}

fn check_width(row: &[SqlValue], expected: usize) -> Result<(), TableMapError> {
    if row.len() == expected {
        Ok(())
    } else {
        Err(TableMapError::ExecutionError(format!(
            "expected {expected} column(s) in result row, got {}",
            row.len()
        )))
    }
}
