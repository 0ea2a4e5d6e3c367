// MySQL module - connects the adapter to `mysql_async`
//
// - config: translating `MysqlConfig` into client options
// - client: the `Connector` that opens physical connections
// - executor: the `PhysicalConnection` over one `mysql_async::Conn`
// - params: converting bound values into client values
// - query: converting client rows into a `ResultSet`

pub mod client;
pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use client::MysqlConnector;
pub use config::build_opts;
pub use executor::MysqlSession;
pub use query::build_result_set;
