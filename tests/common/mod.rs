#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mysql_middleware::{
    BackendError, Connector, Driver, ExecuteResponse, MysqlConfig, PhysicalConnection, SqlValue,
};

/// Calls a scripted session has seen, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Execute(String, Vec<SqlValue>),
    Begin,
    Commit,
    Rollback,
    Close,
}

/// Shared script for every session a `ScriptedConnector` opens.
#[derive(Debug, Default)]
pub struct Script {
    pub calls: Vec<Call>,
    pub response: ExecuteResponse,
    pub execute_error: Option<String>,
    pub begin_error: Option<String>,
    pub commit_error: Option<String>,
    pub rollback_error: Option<String>,
    pub close_error: Option<String>,
    pub connect_error: Option<String>,
    pub connects: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedConnector {
    script: Arc<Mutex<Script>>,
}

impl ScriptedConnector {
    pub fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().expect("script lock")
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script().calls.clone()
    }

    pub fn executions(&self) -> usize {
        self.script()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Execute(..)))
            .count()
    }
}

pub struct ScriptedSession {
    script: Arc<Mutex<Script>>,
}

impl ScriptedSession {
    fn record(&self, call: Call, failure: impl FnOnce(&Script) -> Option<String>) -> Result<(), BackendError> {
        let mut script = self.script.lock().expect("script lock");
        script.calls.push(call);
        match failure(&script) {
            Some(msg) => Err(msg.into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PhysicalConnection for ScriptedSession {
    async fn execute(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<ExecuteResponse, BackendError> {
        self.record(Call::Execute(sql.to_string(), params.to_vec()), |s| {
            s.execute_error.clone()
        })?;
        Ok(self.script.lock().expect("script lock").response.clone())
    }

    async fn begin_transaction(&mut self) -> Result<(), BackendError> {
        self.record(Call::Begin, |s| s.begin_error.clone())
    }

    async fn commit(&mut self) -> Result<(), BackendError> {
        self.record(Call::Commit, |s| s.commit_error.clone())
    }

    async fn rollback(&mut self) -> Result<(), BackendError> {
        self.record(Call::Rollback, |s| s.rollback_error.clone())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        self.record(Call::Close, |s| s.close_error.clone())
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    type Session = ScriptedSession;

    async fn connect(&self, _config: &MysqlConfig) -> Result<Self::Session, BackendError> {
        let mut script = self.script();
        if let Some(msg) = &script.connect_error {
            return Err(msg.clone().into());
        }
        script.connects += 1;
        Ok(ScriptedSession {
            script: Arc::clone(&self.script),
        })
    }
}

pub fn scripted_driver() -> (Driver<ScriptedConnector>, ScriptedConnector) {
    let connector = ScriptedConnector::default();
    let driver = Driver::with_connector(MysqlConfig::default(), connector.clone())
        .expect("default config is valid");
    (driver, connector)
}
