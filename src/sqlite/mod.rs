// SQLite backend - drives a rusqlite connection through the cursor contract
//
// - config: connection options and the fluent builder
// - params: conversion from `SqlValue` to rusqlite values
// - query: result extraction
// - connection: the `Connection`/`Cursor` implementations and transaction control

pub mod config;
pub mod connection;
pub mod params;
pub mod query;

pub use config::{SqliteOptions, SqliteOptionsBuilder};
pub use connection::{SqliteConnection, SqliteCursor};
pub use params::Params;
