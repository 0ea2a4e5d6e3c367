//! Async adapter exposing one MySQL server connection through a small,
//! uniform interface: connect, query, transaction control and close.
//!
//! All protocol work is left to `mysql_async`. The adapter validates input,
//! normalizes results into [`QueryOutcome`], wraps every failure into
//! [`MysqlMiddlewareError`] and keeps each [`Connection`] in an explicit
//! open/closed state.

pub mod config;
pub mod connection;
pub mod driver;
pub mod error;
pub mod mysql;
pub mod prelude;
pub mod results;
pub mod statement;
pub mod traits;
pub mod types;

pub use config::{ClientFlag, ConnectionFlag, MysqlConfig, MysqlConfigBuilder, SslConfig, TlsOptions};
pub use connection::{Connection, ConnectionId, ConnectionState};
pub use driver::{Driver, DriverId};
pub use error::{BackendError, CLOSED_CONNECTION_MESSAGE, MysqlMiddlewareError};
pub use results::{DbRow, QueryOutcome, ResultSet};
pub use statement::{ExecuteResponse, StatementKind};
pub use traits::{Connector, DatabaseConnection, DatabaseDriver, PhysicalConnection};
pub use types::SqlValue;
