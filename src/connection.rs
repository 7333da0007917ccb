use crate::dialect::Dialect;
use crate::error::TableMapError;
use crate::types::SqlValue;

/// A statement handle opened from a [`Connection`].
///
/// Only one statement is in flight per cursor; executing again discards any
/// rows that were not fetched.
pub trait Cursor {
    /// Execute `sql` with positional `params` bound in order.
    ///
    /// # Errors
    /// Returns the backend's error when preparation or execution fails.
    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<(), TableMapError>;

    /// Fetch the next result row, or `None` once the result is exhausted.
    ///
    /// # Errors
    /// Returns the backend's error when reading the row fails.
    fn fetch_one(&mut self) -> Result<Option<Vec<SqlValue>>, TableMapError>;
}

/// The minimal connection contract the adapter needs.
pub trait Connection {
    type Cursor<'conn>: Cursor
    where
        Self: 'conn;

    /// Open a fresh cursor.
    ///
    /// # Errors
    /// Returns the backend's error when no cursor can be opened.
    fn cursor(&self) -> Result<Self::Cursor<'_>, TableMapError>;

    /// Start a transaction.
    ///
    /// # Errors
    /// Returns the backend's error, for example when a transaction is already open.
    fn begin(&self) -> Result<(), TableMapError>;

    /// Commit the current transaction.
    ///
    /// # Errors
    /// Returns the backend's error when the commit fails.
    fn commit(&self) -> Result<(), TableMapError>;

    /// Roll back the current transaction.
    ///
    /// # Errors
    /// Returns the backend's error when the rollback fails.
    fn rollback(&self) -> Result<(), TableMapError>;

    /// Quoting and placeholder conventions for statements sent to this connection.
    fn dialect(&self) -> Dialect;
}

/// Scoped transaction: commits only when asked, rolls back on every other exit.
pub struct Transaction<'conn, C: Connection + ?Sized> {
    conn: &'conn C,
    finished: bool,
}

impl<'conn, C: Connection + ?Sized> Transaction<'conn, C> {
    /// # Errors
    /// Returns `TableMapError` if the transaction cannot be started.
    pub fn begin(conn: &'conn C) -> Result<Self, TableMapError> {
        conn.begin()?;
        Ok(Self {
            conn,
            finished: false,
        })
    }

    #[must_use]
    pub fn connection(&self) -> &'conn C {
        self.conn
    }

    /// # Errors
    /// Returns `TableMapError` if committing fails; the guard is spent either way.
    pub fn commit(mut self) -> Result<(), TableMapError> {
        self.finished = true;
        self.conn.commit()
    }

    /// # Errors
    /// Returns `TableMapError` if rolling back fails.
    pub fn rollback(mut self) -> Result<(), TableMapError> {
        self.finished = true;
        self.conn.rollback()
    }
}

impl<C: Connection + ?Sized> Drop for Transaction<'_, C> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        tracing::warn!("transaction dropped without commit; rolling back");
        if let Err(err) = self.conn.rollback() {
            tracing::warn!(error = %err, "rollback of dropped transaction failed");
        }
    }
}

/// Run `work` inside its own transaction.
///
/// Commits when `work` succeeds. When it fails the transaction is rolled back
/// and the original error is returned unchanged; a failing rollback is only logged.
///
/// # Errors
/// Returns the error from `begin`, from `work`, or from the commit.
pub fn run_in_transaction<C, R, F>(conn: &C, work: F) -> Result<R, TableMapError>
where
    C: Connection + ?Sized,
    F: FnOnce(&C) -> Result<R, TableMapError>,
{
    let tx = Transaction::begin(conn)?;
    match work(tx.connection()) {
        Ok(result) => {
            tx.commit()?;
            Ok(result)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback() {
                tracing::warn!(error = %rollback_err, "rollback after failed statement also failed");
            }
            Err(err)
        }
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use crate::sqlite::SqliteConnection;
    use crate::test_utils::{RecordingConnection, TxEvent};

    fn recording() -> RecordingConnection<SqliteConnection> {
        RecordingConnection::new(SqliteConnection::open_in_memory().unwrap())
    }

    #[test]
    fn dropped_guard_rolls_back() {
        let conn = recording();
        {
            let _tx = Transaction::begin(&conn).unwrap();
        }
        assert_eq!(conn.events(), vec![TxEvent::Begin, TxEvent::Rollback]);
    }

    #[test]
    fn failed_work_rolls_back_and_keeps_the_error() {
        let conn = recording();
        let err = run_in_transaction(&conn, |_| -> Result<(), TableMapError> {
            Err(TableMapError::ExecutionError("boom".into()))
        })
        .unwrap_err();
        assert!(matches!(err, TableMapError::ExecutionError(ref msg) if msg == "boom"));
        assert_eq!(conn.events(), vec![TxEvent::Begin, TxEvent::Rollback]);
    }

    #[test]
    fn successful_work_commits_once() {
        let conn = recording();
        let answer = run_in_transaction(&conn, |_| Ok(42)).unwrap();
        assert_eq!(answer, 42);
        assert_eq!(conn.events(), vec![TxEvent::Begin, TxEvent::Commit]);
    }
}
