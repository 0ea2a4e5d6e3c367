use async_trait::async_trait;
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, Row};

use super::params::convert_params;
use super::query::build_result_set;
use crate::config::ValueOptions;
use crate::error::BackendError;
use crate::statement::ExecuteResponse;
use crate::traits::PhysicalConnection;
use crate::types::SqlValue;

/// One `mysql_async` connection.
///
/// `mysql_async` consumes the connection when disconnecting, so a failed
/// disconnect leaves nothing to talk to; later calls report that instead of
/// reaching the server.
pub struct MysqlSession {
    conn: Option<Conn>,
    value_options: ValueOptions,
}

impl MysqlSession {
    #[must_use]
    pub fn new(conn: Conn, value_options: ValueOptions) -> Self {
        Self {
            conn: Some(conn),
            value_options,
        }
    }

    fn conn(&mut self) -> Result<&mut Conn, BackendError> {
        self.conn
            .as_mut()
            .ok_or_else(|| "the MySQL connection was lost during a failed disconnect".into())
    }

    async fn run(&mut self, statement: &'static str) -> Result<(), BackendError> {
        self.conn()?.query_drop(statement).await?;
        Ok(())
    }
}

#[async_trait]
impl PhysicalConnection for MysqlSession {
    async fn execute(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<ExecuteResponse, BackendError> {
        let value_options = self.value_options;
        let conn = self.conn()?;

        let rows: Vec<Row> = conn.exec(sql, convert_params(params)).await?;

        Ok(ExecuteResponse {
            affected_rows: conn.affected_rows(),
            last_insert_id: conn.last_insert_id(),
            rows: build_result_set(rows, value_options),
        })
    }

    async fn begin_transaction(&mut self) -> Result<(), BackendError> {
        self.run("START TRANSACTION").await
    }

    async fn commit(&mut self) -> Result<(), BackendError> {
        self.run("COMMIT").await
    }

    async fn rollback(&mut self) -> Result<(), BackendError> {
        self.run("ROLLBACK").await
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        let conn = self
            .conn
            .take()
            .ok_or_else(|| BackendError::from("the MySQL connection is already released"))?;
        conn.disconnect().await?;
        Ok(())
    }
}
