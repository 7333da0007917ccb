#![cfg(feature = "sqlite")]

use sql_table_map::prelude::*;

fn ages(conn: &SqliteConnection) -> Result<TableMap<'_, SqliteConnection>, TableMapError> {
    TableMap::builder(conn, "ages")
        .keys(("name", "TEXT"))
        .values(("age", "INTEGER"))
        .create(true)
        .build()
}

#[test]
fn absent_keys_are_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open_in_memory()?;
    let map = ages(&conn)?;

    assert!(matches!(
        map.get("nobody"),
        Err(TableMapError::KeyNotFound(Fields::Scalar(SqlValue::Text(ref name)))) if name == "nobody"
    ));
    assert!(!map.contains("nobody")?);
    assert_eq!(map.get_or_default("nobody", 0)?, Fields::from(0));
    Ok(())
}

#[test]
fn misses_report_the_requested_fields() -> Result<(), Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open_in_memory()?;
    let map = ages(&conn)?;
    map.put("ada", 36)?;

    assert!(matches!(
        map.index(99),
        Err(TableMapError::ValueNotFound(Fields::Scalar(SqlValue::Int(99))))
    ));
    assert_eq!(map.set_default("bob", 7)?, Fields::from(7));
    assert_eq!(map.get("bob")?, Fields::from(7));
    Ok(())
}

#[test]
fn put_then_get_round_trips() -> Result<(), Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open_in_memory()?;
    let map = ages(&conn)?;

    assert_eq!(map.put("ada", 36)?, PutOutcome::Inserted);
    assert_eq!(map.get("ada")?, Fields::from(36));
    assert!(map.contains("ada")?);
    assert_eq!(map.get_or_default("ada", 0)?, Fields::from(36));

    assert_eq!(map.put("ada", 37)?, PutOutcome::Updated);
    assert_eq!(map.get("ada")?, Fields::from(37));
    assert_eq!(map.len()?, 1);
    Ok(())
}

#[test]
fn repeated_put_leaves_size_alone() -> Result<(), Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open_in_memory()?;
    let map = ages(&conn)?;

    map.put("grace", 45)?;
    let before = map.len()?;
    assert_eq!(map.put("grace", 45)?, PutOutcome::Unchanged);
    assert_eq!(map.len()?, before);
    Ok(())
}

#[test]
fn delete_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open_in_memory()?;
    let map = ages(&conn)?;

    map.put("alan", 41)?;
    map.delete("alan")?;
    assert!(matches!(map.get("alan"), Err(TableMapError::KeyNotFound(_))));
    map.delete("alan")?;
    map.delete("never-there")?;
    assert!(matches!(
        map.get("never-there"),
        Err(TableMapError::KeyNotFound(_))
    ));
    Ok(())
}

#[test]
fn set_default_inserts_only_on_miss() -> Result<(), Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open_in_memory()?;
    let map = ages(&conn)?;

    assert_eq!(map.set_default("linus", 20)?, Fields::from(20));
    assert_eq!(map.set_default("linus", 99)?, Fields::from(20));
    assert_eq!(map.get("linus")?, Fields::from(20));
    assert_eq!(map.len()?, 1);
    Ok(())
}

#[test]
fn clear_empties_the_table() -> Result<(), Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open_in_memory()?;
    let map = ages(&conn)?;

    for (name, age) in [("a", 1), ("b", 2), ("c", 3)] {
        map.put(name, age)?;
    }
    assert!(!map.is_empty()?);
    map.clear()?;
    assert_eq!(map.len()?, 0);
    assert!(map.is_empty()?);
    for name in ["a", "b", "c"] {
        assert!(!map.contains(name)?);
    }
    Ok(())
}

#[test]
fn items_agree_with_get() -> Result<(), Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open_in_memory()?;
    let map = ages(&conn)?;

    for (name, age) in [("x", 10), ("y", 20), ("z", 10)] {
        map.put(name, age)?;
    }
    let items = map.items()?;
    assert_eq!(items.len(), map.len()?);
    for (key, value) in &items {
        assert_eq!(&map.get(key.clone())?, value);
    }

    let mut keys = map.keys()?;
    keys.sort_by_key(ToString::to_string);
    assert_eq!(keys, vec![Fields::from("x"), Fields::from("y"), Fields::from("z")]);

    let values = map.values()?;
    assert_eq!(values.len(), 3);
    assert_eq!(values.iter().filter(|v| **v == Fields::from(10)).count(), 2);
    Ok(())
}

#[test]
fn lazy_sequences_are_single_pass() -> Result<(), Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open_in_memory()?;
    let map = ages(&conn)?;
    map.put("only", 1)?;

    let mut keys = map.iter_keys()?;
    assert_eq!(keys.next().transpose()?, Some(Fields::from("only")));
    assert!(keys.next().is_none());
    assert!(keys.is_exhausted());
    assert!(keys.next().is_none());

    // A fresh sequence scans again.
    assert_eq!(map.iter_items()?.count(), 1);
    Ok(())
}

#[test]
fn sequences_read_rows_as_they_are_consumed() -> Result<(), Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open_in_memory()?;
    let map = ages(&conn)?;
    map.put("bea", 2)?;

    let mut keys = map.iter_keys()?;
    // Written after the scan started but before its first row was read.
    map.put("cal", 3)?;
    let mut seen: Vec<Fields> = keys.by_ref().collect::<Result<_, _>>()?;
    seen.sort_by_key(|key| key.to_string());
    assert_eq!(seen, vec![Fields::from("bea"), Fields::from("cal")]);
    assert!(keys.is_exhausted());
    Ok(())
}

#[test]
fn single_and_list_modes_shape_keys() -> Result<(), Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open_in_memory()?;
    let scalar = ages(&conn)?;
    scalar.put("ada", 36)?;
    assert_eq!(scalar.keys()?, vec![Fields::Scalar(SqlValue::from("ada"))]);
    assert!(matches!(
        scalar.get(("ada", 1)),
        Err(TableMapError::InvalidKey { expected: 1, found: 2 })
    ));

    let listed = TableMap::builder(&conn, "ages_by_list")
        .keys([("name", "TEXT")])
        .values([("age", "INTEGER")])
        .create(true)
        .build()?;
    listed.put(("ada",), (36,))?;
    assert_eq!(listed.get(("ada",))?, Fields::Tuple(vec![SqlValue::from(36)]));
    assert_eq!(listed.keys()?, vec![Fields::Tuple(vec![SqlValue::from("ada")])]);
    assert!(matches!(
        listed.get("ada"),
        Err(TableMapError::InvalidKey { expected: 1, found: 0 })
    ));
    assert!(matches!(
        listed.put(("ada",), (36, 37)),
        Err(TableMapError::InvalidValue { expected: 1, found: 2 })
    ));
    Ok(())
}

#[test]
fn get_or_default_checks_the_default() -> Result<(), Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open_in_memory()?;
    let map = ages(&conn)?;
    map.put("ada", 36)?;

    assert!(matches!(
        map.get_or_default("ada", (1, 2)),
        Err(TableMapError::InvalidValue { expected: 1, found: 2 })
    ));
    Ok(())
}

#[test]
fn awkward_identifiers_are_quoted() -> Result<(), Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open_in_memory()?;
    let map = TableMap::builder(&conn, "my \"odd\" table")
        .keys(("key col", "TEXT"))
        .values(("select", "TEXT"))
        .create(true)
        .build()?;

    map.put("k", "v")?;
    assert_eq!(map.get("k")?, Fields::from("v"));
    let count: i64 = conn.as_rusqlite().query_row(
        "SELECT COUNT(*) FROM \"my \"\"odd\"\" table\"",
        [],
        |row| row.get(0),
    )?;
    assert_eq!(count, 1);
    Ok(())
}

#[test]
fn adapter_works_over_an_existing_table() -> Result<(), Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open_in_memory()?;
    conn.as_rusqlite().execute_batch(
        "CREATE TABLE people (name TEXT PRIMARY KEY, age INTEGER NOT NULL, note TEXT DEFAULT 'n/a');
         INSERT INTO people (name, age, note) VALUES ('ada', 36, 'first');",
    )?;
    let map = TableMap::new(&conn, "people", ("name", "TEXT"), ("age", "INTEGER"))?;

    assert_eq!(map.get("ada")?, Fields::from(36));
    map.put("ada", 37)?;
    map.put("bob", 5)?;

    let notes: Vec<String> = conn
        .as_rusqlite()
        .prepare("SELECT note FROM people ORDER BY name")?
        .query_map([], |row| row.get(0))?
        .collect::<Result<_, _>>()?;
    assert_eq!(notes, vec!["first".to_string(), "n/a".to_string()]);
    Ok(())
}

#[test]
fn bad_descriptors_are_rejected() {
    let conn = SqliteConnection::open_in_memory().unwrap();

    let empty_keys = TableMap::new(&conn, "t", Vec::<(&str, &str)>::new(), ("v", "TEXT"));
    assert!(matches!(empty_keys, Err(TableMapError::ConfigError(_))));

    let empty_name = TableMap::new(&conn, "", ("k", "TEXT"), ("v", "TEXT"));
    assert!(matches!(empty_name, Err(TableMapError::ConfigError(_))));

    let nul_column = TableMap::new(&conn, "t", ("k\0", "TEXT"), ("v", "TEXT"));
    assert!(matches!(nul_column, Err(TableMapError::ConfigError(_))));

    let missing_values = TableMap::builder(&conn, "t").keys(("k", "TEXT")).build();
    assert!(matches!(missing_values, Err(TableMapError::ConfigError(_))));
}

#[test]
fn temporal_values_are_stored_as_text() -> Result<(), Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open_in_memory()?;
    let map = TableMap::builder(&conn, "events")
        .keys(("id", "INTEGER"))
        .values([("day", "TEXT"), ("at", "TEXT")])
        .create(true)
        .build()?;

    let day = chrono::NaiveDate::from_ymd_opt(2004, 2, 18).unwrap();
    let at = chrono::NaiveTime::from_hms_opt(10, 0, 0).unwrap();
    map.put(1, (day, at))?;

    let stored = map.get(1)?;
    let cells = stored.as_tuple().unwrap();
    assert_eq!(cells[0], SqlValue::from("2004-02-18"));
    assert_eq!(cells[0].as_date(), Some(day));
    assert_eq!(cells[1].as_time(), Some(at));
    Ok(())
}
