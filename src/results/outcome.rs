use super::ResultSet;

/// Normalized result of [`Connection::query`](crate::Connection::query).
///
/// Which variant comes back depends on the statement's leading keyword:
/// SELECT yields [`Rows`](QueryOutcome::Rows), a single-row INSERT yields
/// [`InsertId`](QueryOutcome::InsertId), everything else is
/// [`Empty`](QueryOutcome::Empty).
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    /// Rows returned by a SELECT, unmodified.
    Rows(ResultSet),
    /// Generated key of the one row an INSERT affected.
    InsertId(u64),
    /// Nothing to report.
    Empty,
}

impl QueryOutcome {
    #[must_use]
    pub fn rows(&self) -> Option<&ResultSet> {
        if let QueryOutcome::Rows(rows) = self {
            Some(rows)
        } else {
            None
        }
    }

    #[must_use]
    pub fn into_rows(self) -> Option<ResultSet> {
        if let QueryOutcome::Rows(rows) = self {
            Some(rows)
        } else {
            None
        }
    }

    #[must_use]
    pub fn insert_id(&self) -> Option<u64> {
        if let QueryOutcome::InsertId(id) = self {
            Some(*id)
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, QueryOutcome::Empty)
    }
}
