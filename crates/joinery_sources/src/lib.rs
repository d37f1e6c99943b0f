//! Leaf datasources for Joinery.
//!
//! This crate provides:
//! - [`Datasource`] - The contract every composable source implements
//! - [`DatasourceRegistry`] - Name to datasource lookup used while building
//! - [`TableDatasource`] - Static rows held in memory
//! - [`SqlDatasource`] - SQL tables and views in four dialects, with a
//!   bundled SQLite backend

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod datasource;
pub mod registry;
pub mod sql;
pub mod table;

pub use datasource::{Datasource, DatasourceRef, validate_key_columns};
pub use registry::DatasourceRegistry;
pub use sql::{SqlConfig, SqlConnection, SqlConnector, SqlDatasource, SqlDialect, SqliteConnector};
pub use table::{TableConfig, TableDatasource, TableRow};
