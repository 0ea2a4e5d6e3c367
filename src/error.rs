use thiserror::Error;

/// Message carried by every error returned once a connection has been closed.
pub const CLOSED_CONNECTION_MESSAGE: &str =
    "cannot perform further operations once the connection is closed";

/// Error type produced by the client library behind a physical connection.
///
/// Only its message survives the trip through the adapter.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MysqlMiddlewareError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection creation error: {0}")]
    ConnectionCreationError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Close error: {0}")]
    CloseError(String),

    #[error("Begin transaction error: {0}")]
    BeginTransactionError(String),

    #[error("Commit error: {0}")]
    CommitError(String),

    #[error("Rollback error: {0}")]
    RollbackError(String),
}

impl MysqlMiddlewareError {
    /// The human-readable message without the kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::ConfigError(msg)
            | Self::ConnectionCreationError(msg)
            | Self::QueryError(msg)
            | Self::CloseError(msg)
            | Self::BeginTransactionError(msg)
            | Self::CommitError(msg)
            | Self::RollbackError(msg) => msg,
        }
    }
}

impl From<serde_json::Error> for MysqlMiddlewareError {
    fn from(err: serde_json::Error) -> Self {
        MysqlMiddlewareError::ConfigError(format!("invalid connection options: {err}"))
    }
}
