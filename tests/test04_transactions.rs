mod common;

use common::{Call, scripted_driver};
use mysql_middleware::prelude::*;

#[tokio::test]
async fn transaction_calls_are_forwarded_in_order() -> Result<(), MysqlMiddlewareError> {
    let (driver, connector) = scripted_driver();
    let mut conn = driver.create().await?;

    conn.begin_transaction().await?;
    conn.query("UPDATE t SET x = 1", None).await?;
    conn.commit().await?;
    conn.begin_transaction().await?;
    conn.rollback().await?;

    assert_eq!(
        connector.calls(),
        vec![
            Call::Begin,
            Call::Execute("UPDATE t SET x = 1".into(), Vec::new()),
            Call::Commit,
            Call::Begin,
            Call::Rollback,
        ]
    );
    Ok(())
}

#[tokio::test]
async fn no_ordering_is_enforced() -> Result<(), MysqlMiddlewareError> {
    let (driver, connector) = scripted_driver();
    let mut conn = driver.create().await?;

    conn.commit().await?;
    conn.rollback().await?;
    assert_eq!(connector.calls(), vec![Call::Commit, Call::Rollback]);
    Ok(())
}

#[tokio::test]
async fn failures_map_to_their_own_kinds() -> Result<(), MysqlMiddlewareError> {
    let (driver, connector) = scripted_driver();
    {
        let mut script = connector.script();
        script.begin_error = Some("begin refused".into());
        script.commit_error = Some("Deadlock found when trying to get lock".into());
        script.rollback_error = Some("rollback refused".into());
    }
    let mut conn = driver.create().await?;

    assert_eq!(
        conn.begin_transaction().await.unwrap_err(),
        MysqlMiddlewareError::BeginTransactionError("begin refused".into())
    );
    assert_eq!(
        conn.commit().await.unwrap_err(),
        MysqlMiddlewareError::CommitError("Deadlock found when trying to get lock".into())
    );
    assert_eq!(
        conn.rollback().await.unwrap_err(),
        MysqlMiddlewareError::RollbackError("rollback refused".into())
    );
    assert!(!conn.is_closed());
    Ok(())
}
