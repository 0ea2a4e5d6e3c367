use async_trait::async_trait;
use mysql_async::Conn;
use tracing::debug;

use super::config::{build_opts, warn_unsupported};
use super::executor::MysqlSession;
use crate::config::MysqlConfig;
use crate::error::BackendError;
use crate::traits::Connector;

/// Opens physical connections with `mysql_async`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlConnector;

#[async_trait]
impl Connector for MysqlConnector {
    type Session = MysqlSession;

    async fn connect(&self, config: &MysqlConfig) -> Result<Self::Session, BackendError> {
        if config.password2.is_some() || config.password3.is_some() {
            return Err(
                "multi-factor authentication (password2/password3) is not supported by the MySQL client"
                    .into(),
            );
        }
        warn_unsupported(config);

        let conn = Conn::new(build_opts(config)).await?;
        debug!(
            server_version = ?conn.server_version(),
            connection_id = conn.id(),
            "mysql connection established"
        );
        Ok(MysqlSession::new(conn, config.value_options()))
    }
}
