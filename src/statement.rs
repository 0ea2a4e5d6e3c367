//! Statement classification and query input validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::MysqlMiddlewareError;
use crate::results::{QueryOutcome, ResultSet};
use crate::types::SqlValue;

static SELECT_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^\s*select").expect("static regex"));
static INSERT_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^\s*insert").expect("static regex"));

/// Statement category, decided by a prefix match on the leading keyword.
///
/// Comments or multiple statements in front of the keyword are not looked
/// through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Other,
}

impl StatementKind {
    #[must_use]
    pub fn classify(sql: &str) -> Self {
        if SELECT_PREFIX.is_match(sql) {
            StatementKind::Select
        } else if INSERT_PREFIX.is_match(sql) {
            StatementKind::Insert
        } else {
            StatementKind::Other
        }
    }
}

/// What the physical connection reports after a parameterized execute.
#[derive(Debug, Clone, Default)]
pub struct ExecuteResponse {
    /// Rows produced by the statement, empty for non-queries.
    pub rows: ResultSet,
    pub affected_rows: u64,
    /// Generated key of the last inserted row, when the server reported one.
    pub last_insert_id: Option<u64>,
}

impl ExecuteResponse {
    /// Shape a raw response into the outcome for a statement of `kind`.
    #[must_use]
    pub fn into_outcome(self, kind: StatementKind) -> QueryOutcome {
        match kind {
            StatementKind::Select => QueryOutcome::Rows(self.rows),
            // mysql_async reports a zero LAST_INSERT_ID as None
            StatementKind::Insert if self.affected_rows == 1 => {
                QueryOutcome::InsertId(self.last_insert_id.unwrap_or(0))
            }
            StatementKind::Insert | StatementKind::Other => QueryOutcome::Empty,
        }
    }
}

/// Reject query input before it reaches the physical connection.
///
/// # Errors
/// Returns `MysqlMiddlewareError::QueryError` for a bound value that is
/// neither a number nor a string. SQL text is left for the server to judge.
pub fn validate_query(values: Option<&[SqlValue]>) -> Result<(), MysqlMiddlewareError> {
    if let Some((idx, value)) = values
        .unwrap_or_default()
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_bindable())
    {
        return Err(MysqlMiddlewareError::QueryError(format!(
            "invalid value at position {idx}: {} values cannot be bound, only numbers and strings ({value:?})",
            value.kind()
        )));
    }
    Ok(())
}
