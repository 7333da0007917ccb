use thiserror::Error;

use crate::columns::Fields;

#[derive(Debug, Error)]
pub enum TableMapError {
    #[error("Invalid key: expected {expected} field(s), found {found}")]
    InvalidKey { expected: usize, found: usize },

    #[error("Invalid value: expected {expected} field(s), found {found}")]
    InvalidValue { expected: usize, found: usize },

    #[error("Key not found: {0}")]
    KeyNotFound(Fields),

    #[error("Value not found: {0}")]
    ValueNotFound(Fields),

    #[error("Table {0} has no rows")]
    EmptyTable(String),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),
}

impl TableMapError {
    /// True for failures reported by the connection or cursor layer rather than
    /// by the adapter's own argument checks and lookups.
    #[must_use]
    pub fn is_database_error(&self) -> bool {
        match self {
            #[cfg(feature = "sqlite")]
            TableMapError::SqliteError(_) => true,
            #[cfg(feature = "postgres")]
            TableMapError::PostgresError(_) => true,
            TableMapError::ConnectionError(_) | TableMapError::ExecutionError(_) => true,
            TableMapError::InvalidKey { .. }
            | TableMapError::InvalidValue { .. }
            | TableMapError::KeyNotFound(_)
            | TableMapError::ValueNotFound(_)
            | TableMapError::EmptyTable(_)
            | TableMapError::ConfigError(_) => false,
        }
    }
}
