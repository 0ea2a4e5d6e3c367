//! Row containers and the normalized outcome of a query.

mod outcome;
mod result_set;
mod row;

pub use outcome::QueryOutcome;
pub use result_set::ResultSet;
pub use row::DbRow;
