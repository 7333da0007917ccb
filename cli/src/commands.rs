use serde_json::{Value as JsonValue, json};
use sql_table_map::prelude::*;

use crate::args::{Args, Command};

/// Build the adapter described by `args` over `conn` and run its command.
///
/// With `--no-auto-commit` the whole command runs in one explicit transaction.
pub(crate) fn run<C: Connection>(conn: &C, args: &Args) -> Result<JsonValue, TableMapError> {
    let map = TableMap::builder(conn, args.table.as_str())
        .keys(args.key_columns())
        .values(args.value_columns())
        .create(args.create)
        .auto_commit(!args.no_auto_commit)
        .build()?;

    if map.auto_commit() {
        dispatch(&map, &args.command)
    } else {
        run_in_transaction(conn, |_| dispatch(&map, &args.command))
    }
}

fn dispatch<C: Connection>(map: &TableMap<'_, C>, command: &Command) -> Result<JsonValue, TableMapError> {
    let keys = map.key_columns();
    let values = map.value_columns();
    let single_key = keys.len() == 1;
    let single_value = values.len() == 1;

    match command {
        Command::Get { key } => to_json(&map.get(parse_fields(keys, single_key, key)?)?),
        Command::GetOr { fields } => {
            let (key, default) = split_at(fields, keys.len())?;
            let key = parse_fields(keys, single_key, key)?;
            let default = parse_fields(values, single_value, default)?;
            to_json(&map.get_or_default(key, default)?)
        }
        Command::SetDefault { fields } => {
            let (key, default) = split_at(fields, keys.len())?;
            let key = parse_fields(keys, single_key, key)?;
            let default = parse_fields(values, single_value, default)?;
            to_json(&map.set_default(key, default)?)
        }
        Command::Put { fields } => {
            let (key, value) = split_at(fields, keys.len())?;
            let key = parse_fields(keys, single_key, key)?;
            let value = parse_fields(values, single_value, value)?;
            let outcome = map.put(key, value)?;
            Ok(json!(format!("{outcome:?}").to_lowercase()))
        }
        Command::Delete { key } => {
            map.delete(parse_fields(keys, single_key, key)?)?;
            Ok(JsonValue::Null)
        }
        Command::Contains { key } => Ok(json!(map.contains(parse_fields(keys, single_key, key)?)?)),
        Command::Len => Ok(json!(map.len()?)),
        Command::Append { value } => {
            map.append(parse_fields(values, single_value, value)?)?;
            Ok(JsonValue::Null)
        }
        Command::Index { value } => to_json(&map.index(parse_fields(values, single_value, value)?)?),
        Command::Count { value } => Ok(json!(map.count(parse_fields(values, single_value, value)?)?)),
        Command::Min => to_json(&map.min()?),
        Command::Max => to_json(&map.max()?),
        Command::Clear => {
            map.clear()?;
            Ok(JsonValue::Null)
        }
        Command::Keys => to_json(&map.keys()?),
        Command::Values => to_json(&map.values()?),
        Command::Items => to_json(&map.items()?),
    }
}

fn split_at(fields: &[String], key_arity: usize) -> Result<(&[String], &[String]), TableMapError> {
    if fields.len() < key_arity {
        return Err(TableMapError::InvalidKey {
            expected: key_arity,
            found: fields.len(),
        });
    }
    Ok(fields.split_at(key_arity))
}

/// Turn command-line words into a key or value, one word per column.
///
/// Arity is left to the adapter so it reports the usual `InvalidKey`/`InvalidValue`.
pub(crate) fn parse_fields(
    columns: &[ColumnDef],
    single: bool,
    raw: &[String],
) -> Result<Fields, TableMapError> {
    let mut parsed = columns
        .iter()
        .zip(raw)
        .map(|(column, word)| parse_word(column, word))
        .collect::<Result<Vec<_>, _>>()?;
    // Surplus words become text so the arity error reports what was typed.
    parsed.extend(raw.iter().skip(columns.len()).map(|word| SqlValue::from(word.as_str())));
    if single && parsed.len() == 1 {
        Ok(Fields::Scalar(parsed.remove(0)))
    } else {
        Ok(Fields::Tuple(parsed))
    }
}

fn parse_word(column: &ColumnDef, word: &str) -> Result<SqlValue, TableMapError> {
    let sql_type = column.sql_type.to_ascii_lowercase();
    let invalid = |kind: &str| {
        TableMapError::ConfigError(format!(
            "column {} expects {kind}, got {word:?}",
            column.name
        ))
    };
    if sql_type.contains("int") || sql_type == "serial" || sql_type == "bigserial" {
        word.parse::<i64>().map(SqlValue::Int).map_err(|_| invalid("an integer"))
    } else if ["real", "floa", "doub", "numeric", "decimal"]
        .iter()
        .any(|hint| sql_type.contains(hint))
    {
        word.parse::<f64>().map(SqlValue::Float).map_err(|_| invalid("a number"))
    } else if sql_type.contains("bool") {
        word.parse::<bool>().map(SqlValue::Bool).map_err(|_| invalid("true or false"))
    } else {
        Ok(SqlValue::Text(word.to_owned()))
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<JsonValue, TableMapError> {
    serde_json::to_value(value)
        .map_err(|e| TableMapError::ExecutionError(format!("failed to encode result: {e}")))
}
