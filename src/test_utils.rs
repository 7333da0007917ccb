//! Instrumented connections for exercising commit discipline in tests.

use std::cell::RefCell;

use crate::connection::{Connection, Cursor};
use crate::dialect::Dialect;
use crate::error::TableMapError;
use crate::types::SqlValue;

/// Transaction control calls observed by a [`RecordingConnection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxEvent {
    Begin,
    Commit,
    Rollback,
}

/// Wraps a real connection and records every transaction call and statement.
///
/// Statements whose text starts with a prefix registered through
/// [`fail_on`](Self::fail_on) fail with `ExecutionError` without reaching the
/// wrapped connection.
pub struct RecordingConnection<C> {
    inner: C,
    events: RefCell<Vec<TxEvent>>,
    statements: RefCell<Vec<String>>,
    fail_prefixes: RefCell<Vec<String>>,
}

impl<C: Connection> RecordingConnection<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            events: RefCell::new(Vec::new()),
            statements: RefCell::new(Vec::new()),
            fail_prefixes: RefCell::new(Vec::new()),
        }
    }

    /// Make every later statement starting with `prefix` fail.
    pub fn fail_on(&self, prefix: impl Into<String>) {
        self.fail_prefixes.borrow_mut().push(prefix.into());
    }

    pub fn clear_failures(&self) {
        self.fail_prefixes.borrow_mut().clear();
    }

    #[must_use]
    pub fn events(&self) -> Vec<TxEvent> {
        self.events.borrow().clone()
    }

    /// SQL text of every statement executed so far, including injected failures.
    #[must_use]
    pub fn statements(&self) -> Vec<String> {
        self.statements.borrow().clone()
    }

    /// Forget everything recorded so far; injected failures stay registered.
    pub fn reset(&self) {
        self.events.borrow_mut().clear();
        self.statements.borrow_mut().clear();
    }

    #[must_use]
    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }

    fn record(&self, event: TxEvent) {
        self.events.borrow_mut().push(event);
    }

    fn should_fail(&self, sql: &str) -> bool {
        self.fail_prefixes
            .borrow()
            .iter()
            .any(|prefix| sql.starts_with(prefix.as_str()))
    }
}

/// Cursor handed out by [`RecordingConnection`].
pub struct RecordingCursor<'conn, C: Connection + 'conn> {
    inner: C::Cursor<'conn>,
    owner: &'conn RecordingConnection<C>,
}

impl<'conn, C: Connection + 'conn> Cursor for RecordingCursor<'conn, C> {
    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<(), TableMapError> {
        self.owner.statements.borrow_mut().push(sql.to_owned());
        if self.owner.should_fail(sql) {
            return Err(TableMapError::ExecutionError(format!(
                "injected failure for: {sql}"
            )));
        }
        self.inner.execute(sql, params)
    }

    fn fetch_one(&mut self) -> Result<Option<Vec<SqlValue>>, TableMapError> {
        self.inner.fetch_one()
    }
}

impl<C: Connection> Connection for RecordingConnection<C> {
    type Cursor<'conn>
        = RecordingCursor<'conn, C>
    where
        Self: 'conn;

    fn cursor(&self) -> Result<Self::Cursor<'_>, TableMapError> {
        Ok(RecordingCursor {
            inner: self.inner.cursor()?,
            owner: self,
        })
    }

    fn begin(&self) -> Result<(), TableMapError> {
        self.record(TxEvent::Begin);
        self.inner.begin()
    }

    fn commit(&self) -> Result<(), TableMapError> {
        self.record(TxEvent::Commit);
        self.inner.commit()
    }

    fn rollback(&self) -> Result<(), TableMapError> {
        self.record(TxEvent::Rollback);
        self.inner.rollback()
    }

    fn dialect(&self) -> Dialect {
        self.inner.dialect()
    }
}
