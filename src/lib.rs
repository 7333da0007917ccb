//! View a relational table as a persistent map.
//!
//! A [`TableMap`] is built over a table, a set of key columns and a set of
//! value columns. Lookups, inserts, updates and scans become single SQL
//! statements against a [`Connection`]; nothing is cached in memory.
//!
//! ```rust
//! use sql_table_map::prelude::*;
//!
//! # fn main() -> Result<(), TableMapError> {
//! let conn = SqliteConnection::open_in_memory()?;
//! let ages = TableMap::builder(&conn, "ages")
//!     .keys(("name", "TEXT"))
//!     .values(("age", "INTEGER"))
//!     .create(true)
//!     .build()?;
//!
//! ages.put("ada", 36)?;
//! assert_eq!(ages.get("ada")?, Fields::from(36));
//! assert!(!ages.contains("grace")?);
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod columns;
pub mod connection;
pub mod dialect;
pub mod error;
pub mod prelude;
pub mod query_builder;
pub mod sequence;
pub mod table;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use columns::{ColumnDef, Columns, Fields};
pub use connection::{Connection, Cursor, Transaction, run_in_transaction};
pub use error::TableMapError;
pub use table::{PutOutcome, TableMap, TableMapBuilder, TableOptions};
pub use types::{DatabaseType, SqlValue};
