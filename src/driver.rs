use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::config::MysqlConfig;
use crate::connection::Connection;
use crate::error::MysqlMiddlewareError;
use crate::mysql::MysqlConnector;
use crate::traits::{Connector, DatabaseDriver};

static NEXT_DRIVER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`Driver`], for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DriverId(u64);

impl DriverId {
    fn next() -> Self {
        Self(NEXT_DRIVER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "driver-{}", self.0)
    }
}

struct DriverInner<C> {
    id: DriverId,
    config: MysqlConfig,
    connector: C,
}

/// Holds connection options and opens [`Connection`]s on demand.
///
/// Cloning is cheap and clones share identity; every connection keeps a
/// clone of the driver that created it.
pub struct Driver<C: Connector = MysqlConnector> {
    inner: Arc<DriverInner<C>>,
}

impl Driver<MysqlConnector> {
    /// Driver backed by `mysql_async`.
    ///
    /// # Errors
    /// Returns `MysqlMiddlewareError::ConfigError` if the options fail validation.
    pub fn new(config: MysqlConfig) -> Result<Self, MysqlMiddlewareError> {
        Self::with_connector(config, MysqlConnector)
    }

    /// Driver built from a JSON options record.
    ///
    /// # Errors
    /// Returns `MysqlMiddlewareError::ConfigError` if `options` is not an
    /// object or holds invalid values.
    pub fn from_json(options: JsonValue) -> Result<Self, MysqlMiddlewareError> {
        Self::new(MysqlConfig::from_json(options)?)
    }
}

impl<C: Connector> Driver<C> {
    /// Driver that opens its physical connections through `connector`.
    ///
    /// # Errors
    /// Returns `MysqlMiddlewareError::ConfigError` if the options fail validation.
    pub fn with_connector(config: MysqlConfig, connector: C) -> Result<Self, MysqlMiddlewareError> {
        config.validate()?;
        let id = DriverId::next();
        debug!(driver = %id, host = %config.host, port = config.port, "driver configured");
        Ok(Self {
            inner: Arc::new(DriverInner {
                id,
                config: config.with_derived_flags(),
                connector,
            }),
        })
    }

    #[must_use]
    pub fn id(&self) -> DriverId {
        self.inner.id
    }

    /// Options in effect, including the derived value-handling flags.
    #[must_use]
    pub fn config(&self) -> &MysqlConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn connector(&self) -> &C {
        &self.inner.connector
    }

    /// Whether two handles refer to the same driver.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Open a new physical connection and wrap it.
    ///
    /// # Errors
    /// Returns `MysqlMiddlewareError::ConnectionCreationError` carrying the
    /// client library's message if the connection cannot be opened.
    pub async fn create(&self) -> Result<Connection<C>, MysqlMiddlewareError> {
        let session = self
            .inner
            .connector
            .connect(&self.inner.config)
            .await
            .map_err(|e| {
                warn!(driver = %self.inner.id, error = %e, "failed to open connection");
                MysqlMiddlewareError::ConnectionCreationError(e.to_string())
            })?;
        let conn = Connection::new(self.clone(), session);
        debug!(driver = %self.inner.id, connection = %conn.id(), "connection opened");
        Ok(conn)
    }
}

impl<C: Connector> Clone for Driver<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Connector> fmt::Debug for Driver<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("id", &self.inner.id)
            .field("host", &self.inner.config.host)
            .field("port", &self.inner.config.port)
            .field("database", &self.inner.config.database)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<C: Connector> DatabaseDriver for Driver<C> {
    type Connection = Connection<C>;

    async fn create(&self) -> Result<Self::Connection, MysqlMiddlewareError> {
        Driver::create(self).await
    }
}
