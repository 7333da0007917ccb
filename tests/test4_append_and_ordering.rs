#![cfg(feature = "sqlite")]

use sql_table_map::prelude::*;

fn notes(conn: &SqliteConnection) -> Result<TableMap<'_, SqliteConnection>, Box<dyn std::error::Error>> {
    conn.as_rusqlite()
        .execute_batch("CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT NOT NULL)")?;
    Ok(TableMap::new(conn, "notes", ("id", "INTEGER"), ("body", "TEXT"))?)
}

#[test]
fn append_adds_exactly_one_row() -> Result<(), Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open_in_memory()?;
    let map = notes(&conn)?;

    let before = map.len()?;
    map.append("first")?;
    assert_eq!(map.len()?, before + 1);

    let newest = map.max()?;
    assert_eq!(map.get(newest)?, Fields::from("first"));

    map.append("second")?;
    assert_eq!(map.items()?.len(), 2);
    assert_eq!(map.get(map.max()?)?, Fields::from("second"));
    Ok(())
}

#[test]
fn index_returns_the_smallest_matching_key() -> Result<(), Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open_in_memory()?;
    let map = notes(&conn)?;

    map.put(7, "dup")?;
    map.put(3, "dup")?;
    map.put(5, "other")?;
    map.put(9, "dup")?;

    assert_eq!(map.index("dup")?, Fields::from(3));
    assert_eq!(map.index("other")?, Fields::from(5));
    assert!(matches!(
        map.index("missing"),
        Err(TableMapError::ValueNotFound(Fields::Scalar(SqlValue::Text(ref v)))) if v == "missing"
    ));
    Ok(())
}

#[test]
fn count_matches_the_number_of_keys() -> Result<(), Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open_in_memory()?;
    let map = notes(&conn)?;

    for (id, body) in [(1, "a"), (2, "b"), (3, "a"), (4, "a")] {
        map.put(id, body)?;
    }
    let by_get = map
        .keys()?
        .into_iter()
        .filter(|key| matches!(map.get(key.clone()), Ok(ref v) if *v == Fields::from("a")))
        .count();
    assert_eq!(map.count("a")?, 3);
    assert_eq!(map.count("a")?, by_get);
    assert_eq!(map.count("zzz")?, 0);
    Ok(())
}

#[test]
fn min_and_max_order_by_key_columns() -> Result<(), Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open_in_memory()?;
    let grid = TableMap::builder(&conn, "grid")
        .keys([("row", "INTEGER"), ("col", "INTEGER")])
        .values(("cell", "TEXT"))
        .create(true)
        .build()?;

    grid.put((2, 1), "c")?;
    grid.put((1, 9), "b")?;
    grid.put((1, 2), "a")?;
    grid.put((2, 0), "d")?;

    assert_eq!(grid.min()?, Fields::from((1, 2)));
    assert_eq!(grid.max()?, Fields::from((2, 1)));
    Ok(())
}

#[test]
fn min_and_max_fail_on_an_empty_table() -> Result<(), Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open_in_memory()?;
    let map = notes(&conn)?;

    assert!(matches!(map.min(), Err(TableMapError::EmptyTable(ref t)) if t == "notes"));
    assert!(matches!(map.max(), Err(TableMapError::EmptyTable(_))));

    map.append("only")?;
    assert_eq!(map.min()?, map.max()?);
    Ok(())
}
