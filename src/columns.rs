use std::fmt;

use serde::Serialize;

use crate::error::TableMapError;
use crate::types::SqlValue;

/// One table column: its name and the SQL type used when creating the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub sql_type: String,
}

impl ColumnDef {
    #[must_use]
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
        }
    }

    /// Parse the `name:type` form used on the command line.
    ///
    /// # Errors
    /// Returns `TableMapError::ConfigError` when the colon or either half is missing.
    pub fn parse(raw: &str) -> Result<Self, TableMapError> {
        match raw.split_once(':') {
            Some((name, sql_type)) if !name.is_empty() && !sql_type.trim().is_empty() => {
                Ok(Self::new(name, sql_type.trim()))
            }
            _ => Err(TableMapError::ConfigError(format!(
                "column must be given as name:type, got {raw:?}"
            ))),
        }
    }
}

impl<N: Into<String>, T: Into<String>> From<(N, T)> for ColumnDef {
    fn from((name, sql_type): (N, T)) -> Self {
        Self::new(name, sql_type)
    }
}

/// The key or value columns of a table.
///
/// `Single` makes the adapter accept and return bare scalars for that side;
/// `List` always uses tuples, even when the list has one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Columns {
    Single(ColumnDef),
    List(Vec<ColumnDef>),
}

impl Columns {
    #[must_use]
    pub fn is_single(&self) -> bool {
        matches!(self, Columns::Single(_))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ColumnDef] {
        match self {
            Columns::Single(column) => std::slice::from_ref(column),
            Columns::List(columns) => columns,
        }
    }

    pub(crate) fn validate(&self, side: &str) -> Result<(), TableMapError> {
        let columns = self.as_slice();
        if columns.is_empty() {
            return Err(TableMapError::ConfigError(format!(
                "at least one {side} column is required"
            )));
        }
        for column in columns {
            if column.name.is_empty() {
                return Err(TableMapError::ConfigError(format!(
                    "{side} column names cannot be empty"
                )));
            }
            if column.name.contains('\0') {
                return Err(TableMapError::ConfigError(format!(
                    "{side} column {:?} contains a NUL character",
                    column.name
                )));
            }
        }
        Ok(())
    }
}

impl From<ColumnDef> for Columns {
    fn from(column: ColumnDef) -> Self {
        Columns::Single(column)
    }
}

impl From<Vec<ColumnDef>> for Columns {
    fn from(columns: Vec<ColumnDef>) -> Self {
        Columns::List(columns)
    }
}

impl<'a> From<(&'a str, &'a str)> for Columns {
    fn from(pair: (&'a str, &'a str)) -> Self {
        Columns::Single(pair.into())
    }
}

impl<'a> From<Vec<(&'a str, &'a str)>> for Columns {
    fn from(pairs: Vec<(&'a str, &'a str)>) -> Self {
        Columns::List(pairs.into_iter().map(ColumnDef::from).collect())
    }
}

impl<'a, const N: usize> From<[(&'a str, &'a str); N]> for Columns {
    fn from(pairs: [(&'a str, &'a str); N]) -> Self {
        Columns::List(pairs.into_iter().map(ColumnDef::from).collect())
    }
}

/// A key or value as seen by callers: a bare scalar in single mode, a tuple otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Fields {
    Scalar(SqlValue),
    Tuple(Vec<SqlValue>),
}

impl Fields {
    /// Number of columns this key or value spans.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Fields::Scalar(_) => 1,
            Fields::Tuple(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn as_scalar(&self) -> Option<&SqlValue> {
        if let Fields::Scalar(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_tuple(&self) -> Option<&[SqlValue]> {
        if let Fields::Tuple(values) = self {
            Some(values)
        } else {
            None
        }
    }

    /// Flatten into column order regardless of representation.
    #[must_use]
    pub fn into_values(self) -> Vec<SqlValue> {
        match self {
            Fields::Scalar(value) => vec![value],
            Fields::Tuple(values) => values,
        }
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fields::Scalar(value) => write!(f, "{value}"),
            Fields::Tuple(values) => {
                f.write_str("(")?;
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl From<SqlValue> for Fields {
    fn from(value: SqlValue) -> Self {
        Fields::Scalar(value)
    }
}

impl From<Vec<SqlValue>> for Fields {
    fn from(values: Vec<SqlValue>) -> Self {
        Fields::Tuple(values)
    }
}

macro_rules! scalar_fields_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Fields {
                fn from(value: $ty) -> Self {
                    Fields::Scalar(SqlValue::from(value))
                }
            }
        )*
    };
}

scalar_fields_from!(
    i64,
    i32,
    i16,
    u32,
    f64,
    f32,
    bool,
    String,
    &str,
    chrono::NaiveDateTime,
    chrono::NaiveDate,
    chrono::NaiveTime,
    serde_json::Value,
);

macro_rules! tuple_fields_from {
    ($($name:ident),+) => {
        impl<$($name: Into<SqlValue>),+> From<($($name,)+)> for Fields {
            #[allow(non_snake_case)]
            fn from(($($name,)+): ($($name,)+)) -> Self {
                Fields::Tuple(vec![$($name.into()),+])
            }
        }
    };
}

tuple_fields_from!(A);
tuple_fields_from!(A, B);
tuple_fields_from!(A, B, C);
tuple_fields_from!(A, B, C, D);
tuple_fields_from!(A, B, C, D, E);
tuple_fields_from!(A, B, C, D, E, F);
