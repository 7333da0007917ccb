use std::collections::VecDeque;
use std::fmt;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use futures_util::TryStreamExt;
use tokio::runtime::{Builder, Runtime};
use tokio_postgres::{Client, NoTls, Row, RowStream};

use crate::connection::{Connection, Cursor};
use crate::dialect::Dialect;
use crate::error::TableMapError;
use crate::types::SqlValue;

use super::config::PostgresOptions;
use super::query::postgres_extract_row;

/// A tokio-postgres client driven synchronously on its own current-thread runtime.
///
/// The runtime also polls the connection task, so it only makes progress while
/// one of this type's methods is blocking on it.
///
/// The client stops reading replies while a row stream has undelivered rows, so
/// at most one stream is live at a time. Before any other statement is sent, the
/// live stream's remaining rows are read into its cursor's buffer.
pub struct PostgresConnection {
    client: Client,
    runtime: Runtime,
    live_stream: Mutex<Weak<Mutex<StreamSlot>>>,
}

/// Rows of one query: the unread stream, or what was left of it once it had to be drained.
#[derive(Default)]
struct StreamSlot {
    stream: Option<Pin<Box<RowStream>>>,
    drained: VecDeque<Row>,
    drain_error: Option<tokio_postgres::Error>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PostgresConnection {
    /// # Errors
    /// Returns `TableMapError::ConnectionError` if the runtime cannot start, or
    /// `TableMapError::PostgresError` if the server rejects the connection.
    pub fn connect(opts: &PostgresOptions) -> Result<Self, TableMapError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                TableMapError::ConnectionError(format!("failed to start postgres runtime: {e}"))
            })?;
        let (client, connection) = runtime.block_on(opts.config.connect(NoTls))?;
        runtime.spawn(async move {
            if let Err(err) = connection.await {
                tracing::error!(error = %err, "postgres connection closed with error");
            }
        });
        Ok(Self {
            client,
            runtime,
            live_stream: Mutex::new(Weak::new()),
        })
    }

    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Run one or more statements without parameters, e.g. schema setup.
    ///
    /// # Errors
    /// Returns `TableMapError::PostgresError` if any statement fails.
    pub fn batch_execute(&self, sql: &str) -> Result<(), TableMapError> {
        self.drain_live_stream();
        self.runtime.block_on(self.client.batch_execute(sql))?;
        Ok(())
    }

    /// Read the rest of the live row stream, if its cursor still holds one.
    ///
    /// A failure while reading is kept for that cursor's next fetch.
    fn drain_live_stream(&self) {
        let live = std::mem::take(&mut *lock(&self.live_stream));
        let Some(slot) = live.upgrade() else {
            return;
        };
        let mut slot = lock(&slot);
        let Some(mut stream) = slot.stream.take() else {
            return;
        };
        let mut rows = VecDeque::new();
        let outcome = self.runtime.block_on(async {
            while let Some(row) = stream.try_next().await? {
                rows.push_back(row);
            }
            Ok::<_, tokio_postgres::Error>(())
        });
        tracing::debug!(rows = rows.len(), "drained open row stream before next statement");
        slot.drained.append(&mut rows);
        slot.drain_error = outcome.err();
    }

    fn track_live_stream(&self, slot: &Arc<Mutex<StreamSlot>>) {
        *lock(&self.live_stream) = Arc::downgrade(slot);
    }
}

impl fmt::Debug for PostgresConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConnection")
            .field("closed", &self.client.is_closed())
            .finish_non_exhaustive()
    }
}

/// Cursor over one `PostgreSQL` statement, streaming rows as they are fetched.
///
/// Statements without result columns run to completion inside `execute`. If
/// another statement runs on the connection before the stream is exhausted, the
/// remaining rows are buffered and handed out from memory.
pub struct PostgresCursor<'conn> {
    conn: &'conn PostgresConnection,
    rows: Option<Arc<Mutex<StreamSlot>>>,
}

impl Cursor for PostgresCursor<'_> {
    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<(), TableMapError> {
        // Dropping an unread stream lets the client discard its remaining rows.
        self.rows = None;
        self.conn.drain_live_stream();
        let client = &self.conn.client;
        let runtime = &self.conn.runtime;
        let statement = runtime.block_on(client.prepare(sql))?;
        // Execution errors of a row stream only show up once it is polled.
        if statement.columns().is_empty() {
            runtime.block_on(client.execute_raw(&statement, params.iter()))?;
        } else {
            let stream = runtime.block_on(client.query_raw(&statement, params.iter()))?;
            let slot = Arc::new(Mutex::new(StreamSlot {
                stream: Some(Box::pin(stream)),
                ..StreamSlot::default()
            }));
            self.conn.track_live_stream(&slot);
            self.rows = Some(slot);
        }
        Ok(())
    }

    fn fetch_one(&mut self) -> Result<Option<Vec<SqlValue>>, TableMapError> {
        let Some(slot) = self.rows.as_ref() else {
            return Ok(None);
        };
        let next = {
            let mut slot = lock(slot);
            if let Some(row) = slot.drained.pop_front() {
                Some(row)
            } else if let Some(err) = slot.drain_error.take() {
                return Err(err.into());
            } else if let Some(stream) = slot.stream.as_mut() {
                self.conn.runtime.block_on(stream.try_next())?
            } else {
                None
            }
        };
        match next {
            Some(row) => postgres_extract_row(&row).map(Some),
            None => {
                self.rows = None;
                Ok(None)
            }
        }
    }
}

impl Connection for PostgresConnection {
    type Cursor<'conn> = PostgresCursor<'conn>;

    fn cursor(&self) -> Result<PostgresCursor<'_>, TableMapError> {
        if self.client.is_closed() {
            return Err(TableMapError::ConnectionError(
                "postgres connection is closed".into(),
            ));
        }
        Ok(PostgresCursor {
            conn: self,
            rows: None,
        })
    }

    fn begin(&self) -> Result<(), TableMapError> {
        self.batch_execute("BEGIN")
    }

    fn commit(&self) -> Result<(), TableMapError> {
        self.batch_execute("COMMIT")
    }

    fn rollback(&self) -> Result<(), TableMapError> {
        self.batch_execute("ROLLBACK")
    }

    fn dialect(&self) -> Dialect {
        Dialect::POSTGRES
    }
}
