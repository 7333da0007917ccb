use std::thread;
use std::time::Duration;

use crate::error::TableMapError;

const ROLLBACK_BUSY_RETRIES: &[Duration] = &[
    Duration::from_millis(10),
    Duration::from_millis(25),
    Duration::from_millis(50),
];

pub(super) fn begin(conn: &rusqlite::Connection) -> Result<(), TableMapError> {
    conn.execute_batch("BEGIN")?;
    Ok(())
}

pub(super) fn commit(conn: &rusqlite::Connection) -> Result<(), TableMapError> {
    conn.execute_batch("COMMIT")?;
    Ok(())
}

pub(super) fn rollback_with_busy_retries(conn: &rusqlite::Connection) -> Result<(), TableMapError> {
    // SQLite ends the transaction itself after some failures.
    if conn.is_autocommit() {
        tracing::debug!("no sqlite transaction open; skipping ROLLBACK");
        return Ok(());
    }

    for (idx, delay) in ROLLBACK_BUSY_RETRIES.iter().copied().enumerate() {
        match conn.execute_batch("ROLLBACK") {
            Ok(()) => return Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::DatabaseBusy
                    && idx + 1 < ROLLBACK_BUSY_RETRIES.len() =>
            {
                tracing::debug!(attempt = idx + 1, "sqlite busy during ROLLBACK; retrying");
                thread::sleep(delay);
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(TableMapError::ExecutionError(
        "rollback retries exhausted".into(),
    ))
}
