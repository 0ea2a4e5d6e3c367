use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::debug;

use crate::driver::Driver;
use crate::error::{CLOSED_CONNECTION_MESSAGE, MysqlMiddlewareError};
use crate::mysql::MysqlConnector;
use crate::results::QueryOutcome;
use crate::statement::{StatementKind, validate_query};
use crate::traits::{Connector, DatabaseConnection, PhysicalConnection};
use crate::types::SqlValue;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`Connection`], for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Lifecycle of a [`Connection`]. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Open,
    Closed,
}

/// Handle over one physical MySQL connection.
///
/// Created by [`Driver::create`]. Every operation is forwarded to the physical
/// connection; once [`close`](Connection::close) succeeds all further calls
/// fail with [`CLOSED_CONNECTION_MESSAGE`].
///
/// ```rust,no_run
/// use mysql_middleware::prelude::*;
///
/// # async fn demo() -> Result<(), MysqlMiddlewareError> {
/// let driver = MysqlConfig::builder().user("app").database("shop").build()?;
/// let mut conn = driver.create().await?;
///
/// conn.begin_transaction().await?;
/// let sku = [SqlValue::from("A-1")];
/// let outcome = conn
///     .query("INSERT INTO orders (sku) VALUES (?)", Some(&sku[..]))
///     .await?;
/// conn.commit().await?;
/// assert!(outcome.insert_id().is_some());
///
/// let rows = conn
///     .query("SELECT id, sku FROM orders WHERE sku = ?", Some(&sku[..]))
///     .await?
///     .into_rows()
///     .unwrap_or_default();
/// for row in &rows {
///     println!("{:?}", row.get("id"));
/// }
/// conn.close().await?;
/// # Ok(()) }
/// ```
pub struct Connection<C: Connector = MysqlConnector> {
    id: ConnectionId,
    driver: Driver<C>,
    session: C::Session,
    state: ConnectionState,
}

impl<C: Connector> Connection<C> {
    pub(crate) fn new(driver: Driver<C>, session: C::Session) -> Self {
        Self {
            id: ConnectionId::next(),
            driver,
            session,
            state: ConnectionState::Open,
        }
    }

    #[must_use]
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// The driver that created this connection.
    #[must_use]
    pub fn driver(&self) -> &Driver<C> {
        &self.driver
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state == ConnectionState::Closed
    }

    fn ensure_open(
        &self,
        operation: &'static str,
        error: fn(String) -> MysqlMiddlewareError,
    ) -> Result<(), MysqlMiddlewareError> {
        match self.state {
            ConnectionState::Open => Ok(()),
            ConnectionState::Closed => {
                debug!(connection = %self.id, operation, "rejected call on closed connection");
                Err(error(CLOSED_CONNECTION_MESSAGE.to_string()))
            }
        }
    }

    /// Execute one statement with optional positional `?` parameters.
    ///
    /// The outcome depends on the leading keyword: SELECT returns the rows,
    /// an INSERT affecting exactly one row returns its generated key, and
    /// anything else returns [`QueryOutcome::Empty`].
    ///
    /// # Errors
    /// Returns `MysqlMiddlewareError::QueryError` if a value is neither a
    /// number nor a string, the statement fails, or the connection is closed.
    pub async fn query(
        &mut self,
        sql: &str,
        values: Option<&[SqlValue]>,
    ) -> Result<QueryOutcome, MysqlMiddlewareError> {
        self.ensure_open("query", MysqlMiddlewareError::QueryError)?;
        validate_query(values)?;

        let kind = StatementKind::classify(sql);
        let response = self
            .session
            .execute(sql, values.unwrap_or_default())
            .await
            .map_err(|e| MysqlMiddlewareError::QueryError(e.to_string()))?;
        Ok(response.into_outcome(kind))
    }

    /// # Errors
    /// Returns `MysqlMiddlewareError::BeginTransactionError` if the server
    /// rejects the call or the connection is closed.
    pub async fn begin_transaction(&mut self) -> Result<(), MysqlMiddlewareError> {
        self.ensure_open("begin_transaction", MysqlMiddlewareError::BeginTransactionError)?;
        self.session
            .begin_transaction()
            .await
            .map_err(|e| MysqlMiddlewareError::BeginTransactionError(e.to_string()))
    }

    /// # Errors
    /// Returns `MysqlMiddlewareError::CommitError` if the server rejects the
    /// call or the connection is closed.
    pub async fn commit(&mut self) -> Result<(), MysqlMiddlewareError> {
        self.ensure_open("commit", MysqlMiddlewareError::CommitError)?;
        self.session
            .commit()
            .await
            .map_err(|e| MysqlMiddlewareError::CommitError(e.to_string()))
    }

    /// # Errors
    /// Returns `MysqlMiddlewareError::RollbackError` if the server rejects the
    /// call or the connection is closed.
    pub async fn rollback(&mut self) -> Result<(), MysqlMiddlewareError> {
        self.ensure_open("rollback", MysqlMiddlewareError::RollbackError)?;
        self.session
            .rollback()
            .await
            .map_err(|e| MysqlMiddlewareError::RollbackError(e.to_string()))
    }

    /// Close the physical connection. On success the connection is closed for
    /// good; on failure it stays open and usable.
    ///
    /// With [`MysqlConnector`] the underlying `mysql_async` connection is
    /// consumed by the disconnect attempt, so after a failed close later calls
    /// are still accepted but fail with a "connection lost" error.
    ///
    /// # Errors
    /// Returns `MysqlMiddlewareError::CloseError` if the physical close fails
    /// or the connection is already closed.
    pub async fn close(&mut self) -> Result<(), MysqlMiddlewareError> {
        self.ensure_open("close", MysqlMiddlewareError::CloseError)?;
        self.session.close().await.map_err(|e| {
            debug!(connection = %self.id, error = %e, "close failed, connection stays open");
            MysqlMiddlewareError::CloseError(e.to_string())
        })?;
        self.state = ConnectionState::Closed;
        debug!(connection = %self.id, driver = %self.driver.id(), "connection closed");
        Ok(())
    }
}

impl<C: Connector> fmt::Debug for Connection<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("driver", &self.driver.id())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<C: Connector> DatabaseConnection for Connection<C> {
    async fn query(
        &mut self,
        sql: &str,
        values: Option<&[SqlValue]>,
    ) -> Result<QueryOutcome, MysqlMiddlewareError> {
        Connection::query(self, sql, values).await
    }

    async fn begin_transaction(&mut self) -> Result<(), MysqlMiddlewareError> {
        Connection::begin_transaction(self).await
    }

    async fn commit(&mut self) -> Result<(), MysqlMiddlewareError> {
        Connection::commit(self).await
    }

    async fn rollback(&mut self) -> Result<(), MysqlMiddlewareError> {
        Connection::rollback(self).await
    }

    async fn close(&mut self) -> Result<(), MysqlMiddlewareError> {
        Connection::close(self).await
    }
}
