//! Convenient imports for common functionality.

pub use crate::config::{ClientFlag, ConnectionFlag, MysqlConfig, SslConfig, TlsOptions};
pub use crate::connection::Connection;
pub use crate::driver::Driver;
pub use crate::error::{CLOSED_CONNECTION_MESSAGE, MysqlMiddlewareError};
pub use crate::mysql::MysqlConnector;
pub use crate::results::{DbRow, QueryOutcome, ResultSet};
pub use crate::traits::{DatabaseConnection, DatabaseDriver};
pub use crate::types::SqlValue;
