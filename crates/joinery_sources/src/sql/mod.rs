//! SQL adapter: dialect-aware statement generation over a pluggable backend.

pub mod connection;
pub mod datasource;
pub mod dialect;
pub mod sqlite;

pub use connection::{RowSet, SqlConnection, SqlConnector, TableInfo};
pub use datasource::{SqlConfig, SqlDataset, SqlDatasource};
pub use dialect::{LIKE_ESCAPE, SqlDialect};
pub use sqlite::SqliteConnector;
