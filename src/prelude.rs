//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::columns::{ColumnDef, Columns, Fields};
pub use crate::connection::{Connection, Cursor, Transaction, run_in_transaction};
pub use crate::dialect::{Dialect, PlaceholderStyle};
pub use crate::error::TableMapError;
pub use crate::sequence::RowSequence;
pub use crate::table::{PutOutcome, TableMap, TableMapBuilder, TableOptions};
pub use crate::types::{DatabaseType, SqlValue};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteConnection, SqliteOptions, SqliteOptionsBuilder};

#[cfg(feature = "postgres")]
pub use crate::postgres::{PostgresConnection, PostgresOptions, PostgresOptionsBuilder};
