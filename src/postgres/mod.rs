// PostgreSQL backend - drives tokio-postgres synchronously through the cursor contract
//
// - config: connection options and the fluent builder
// - params: `ToSql` for `SqlValue`
// - query: result extraction by column type
// - connection: the `Connection`/`Cursor` implementations

pub mod config;
pub mod connection;
pub mod params;
pub mod query;

pub use config::{PostgresOptions, PostgresOptionsBuilder};
pub use connection::{PostgresConnection, PostgresCursor};
pub use query::postgres_extract_value;
