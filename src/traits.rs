//! Seams between the adapter, the client library below it, and the
//! data-access layer above it.

use async_trait::async_trait;

use crate::config::MysqlConfig;
use crate::error::{BackendError, MysqlMiddlewareError};
use crate::results::QueryOutcome;
use crate::statement::ExecuteResponse;
use crate::types::SqlValue;

/// A live connection owned by the client library.
///
/// The physical connection runs one statement at a time; the adapter never
/// calls it concurrently.
#[async_trait]
pub trait PhysicalConnection: Send {
    /// Run a parameterized statement and report rows, affected rows and the
    /// generated key.
    async fn execute(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<ExecuteResponse, BackendError>;

    async fn begin_transaction(&mut self) -> Result<(), BackendError>;

    async fn commit(&mut self) -> Result<(), BackendError>;

    async fn rollback(&mut self) -> Result<(), BackendError>;

    async fn close(&mut self) -> Result<(), BackendError>;
}

/// Opens physical connections for a [`Driver`](crate::Driver).
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Session: PhysicalConnection + 'static;

    async fn connect(&self, config: &MysqlConfig) -> Result<Self::Session, BackendError>;
}

/// Uniform connection surface consumed by the data-access layer.
#[async_trait]
pub trait DatabaseConnection: Send {
    /// Execute one statement and return its normalized outcome.
    async fn query(
        &mut self,
        sql: &str,
        values: Option<&[SqlValue]>,
    ) -> Result<QueryOutcome, MysqlMiddlewareError>;

    async fn begin_transaction(&mut self) -> Result<(), MysqlMiddlewareError>;

    async fn commit(&mut self) -> Result<(), MysqlMiddlewareError>;

    async fn rollback(&mut self) -> Result<(), MysqlMiddlewareError>;

    async fn close(&mut self) -> Result<(), MysqlMiddlewareError>;
}

/// Uniform driver surface consumed by the data-access layer.
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    type Connection: DatabaseConnection;

    async fn create(&self) -> Result<Self::Connection, MysqlMiddlewareError>;
}
