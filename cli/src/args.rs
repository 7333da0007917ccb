use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sql_table_map::{ColumnDef, Columns, DatabaseType, TableMapError};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(author, version, about = "Read and write a database table as a map")]
pub(crate) struct Args {
    #[arg(long, value_enum)]
    pub(crate) backend: DatabaseType,
    /// `SQLite` file path, or a `PostgreSQL` connection string.
    #[arg(long)]
    pub(crate) database: String,
    #[arg(long)]
    pub(crate) table: String,
    /// Key column as `name:type`; repeat for composite keys.
    #[arg(long = "key", value_parser = parse_column, required = true)]
    pub(crate) keys: Vec<ColumnDef>,
    /// Value column as `name:type`; repeat for composite values.
    #[arg(long = "value", value_parser = parse_column, required = true)]
    pub(crate) values: Vec<ColumnDef>,
    #[arg(long)]
    pub(crate) create: bool,
    /// Run the command in one explicit transaction instead of committing per write.
    #[arg(long)]
    pub(crate) no_auto_commit: bool,
    /// Open `SQLite` databases in WAL mode.
    #[arg(long)]
    pub(crate) wal: bool,
    #[arg(long)]
    pub(crate) log: Option<PathBuf>,
    #[arg(long, default_value_t = Level::WARN)]
    pub(crate) log_level: Level,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Command {
    Get { key: Vec<String> },
    /// Key fields followed by the default value's fields.
    GetOr { fields: Vec<String> },
    /// Key fields followed by the default value's fields.
    SetDefault { fields: Vec<String> },
    /// Key fields followed by the value's fields.
    Put { fields: Vec<String> },
    Delete { key: Vec<String> },
    Contains { key: Vec<String> },
    Len,
    Append { value: Vec<String> },
    Index { value: Vec<String> },
    Count { value: Vec<String> },
    Min,
    Max,
    Clear,
    Keys,
    Values,
    Items,
}

impl Args {
    /// One `--key` selects bare scalar keys; more than one selects tuples.
    pub(crate) fn key_columns(&self) -> Columns {
        to_columns(&self.keys)
    }

    pub(crate) fn value_columns(&self) -> Columns {
        to_columns(&self.values)
    }
}

fn to_columns(columns: &[ColumnDef]) -> Columns {
    match columns {
        [single] => Columns::Single(single.clone()),
        many => Columns::List(many.to_vec()),
    }
}

fn parse_column(raw: &str) -> Result<ColumnDef, TableMapError> {
    ColumnDef::parse(raw)
}
