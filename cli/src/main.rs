mod args;
mod commands;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use serde_json::Value as JsonValue;
use sql_table_map::prelude::*;

use crate::args::Args;
use crate::logging::LogWriter;

fn main() -> ExitCode {
    let args = Args::parse();
    let writer = LogWriter::new(args.log.clone()).unwrap_or_else(|err| {
        eprintln!("failed to open log file: {err}");
        std::process::exit(1);
    });

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_target(false)
        .with_max_level(args.log_level)
        .init();

    match execute(&args) {
        Ok(JsonValue::Null) => ExitCode::SUCCESS,
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, table = %args.table, "command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn execute(args: &Args) -> Result<JsonValue, TableMapError> {
    match args.backend {
        #[cfg(feature = "sqlite")]
        DatabaseType::Sqlite => {
            let conn = SqliteOptionsBuilder::new(args.database.as_str())
                .wal(args.wal)
                .open()?;
            commands::run(&conn, args)
        }
        #[cfg(feature = "postgres")]
        DatabaseType::Postgres => {
            let conn = PostgresConnection::connect(&PostgresOptions::from_conninfo(&args.database)?)?;
            commands::run(&conn, args)
        }
    }
}
