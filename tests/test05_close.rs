mod common;

use common::{Call, scripted_driver};
use mysql_middleware::prelude::*;
use mysql_middleware::ConnectionState;

#[tokio::test]
async fn closed_connection_rejects_everything() -> Result<(), MysqlMiddlewareError> {
    let (driver, connector) = scripted_driver();
    let mut conn = driver.create().await?;

    conn.close().await?;
    assert_eq!(conn.state(), ConnectionState::Closed);

    for _ in 0..3 {
        let closed = CLOSED_CONNECTION_MESSAGE.to_string();
        assert_eq!(
            conn.query("SELECT 1", None).await.unwrap_err(),
            MysqlMiddlewareError::QueryError(closed.clone())
        );
        assert_eq!(
            conn.close().await.unwrap_err(),
            MysqlMiddlewareError::CloseError(closed.clone())
        );
        assert_eq!(
            conn.begin_transaction().await.unwrap_err(),
            MysqlMiddlewareError::BeginTransactionError(closed.clone())
        );
        assert_eq!(
            conn.commit().await.unwrap_err(),
            MysqlMiddlewareError::CommitError(closed.clone())
        );
        assert_eq!(
            conn.rollback().await.unwrap_err(),
            MysqlMiddlewareError::RollbackError(closed)
        );
    }

    // only the first close reached the physical connection
    assert_eq!(connector.calls(), vec![Call::Close]);
    Ok(())
}

#[tokio::test]
async fn closed_message_is_exact() -> Result<(), MysqlMiddlewareError> {
    let (driver, _connector) = scripted_driver();
    let mut conn = driver.create().await?;
    conn.close().await?;

    let err = conn.query("   ", None).await.unwrap_err();
    assert_eq!(
        err.message(),
        "cannot perform further operations once the connection is closed"
    );
    Ok(())
}

#[tokio::test]
async fn failed_close_leaves_connection_open() -> Result<(), MysqlMiddlewareError> {
    let (driver, connector) = scripted_driver();
    connector.script().close_error = Some("Broken pipe".into());
    let mut conn = driver.create().await?;

    let err = conn.close().await.unwrap_err();
    assert_eq!(err, MysqlMiddlewareError::CloseError("Broken pipe".into()));
    assert_eq!(conn.state(), ConnectionState::Open);

    conn.query("SELECT 1", None).await?;
    assert_eq!(connector.executions(), 1);

    connector.script().close_error = None;
    conn.close().await?;
    assert!(conn.is_closed());
    Ok(())
}

#[tokio::test]
async fn closing_one_connection_leaves_siblings_open() -> Result<(), MysqlMiddlewareError> {
    let (driver, _connector) = scripted_driver();
    let mut first = driver.create().await?;
    let mut second = driver.create().await?;

    first.close().await?;
    assert!(first.is_closed());
    assert!(!second.is_closed());
    second.query("SELECT 1", None).await?;
    Ok(())
}
