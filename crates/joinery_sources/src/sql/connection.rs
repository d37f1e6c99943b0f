//! Backend boundary for SQL datasources.

use std::fmt;

use joinery_foundation::Result;

/// A fully materialized statement result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowSet {
    /// Column labels in result order.
    pub columns: Vec<String>,
    /// Row values, parallel to `columns`; `None` is SQL NULL.
    pub rows: Vec<Vec<Option<String>>>,
}

impl RowSet {
    /// Position of a result column.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Columns and primary key of a table or view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableInfo {
    /// Column names in table order.
    pub columns: Vec<String>,
    /// Primary key columns in key order; empty if none is declared.
    pub primary_key: Vec<String>,
}

/// One open connection. Dropping it closes the connection.
pub trait SqlConnection {
    /// Executes one statement and materializes all rows.
    ///
    /// # Errors
    ///
    /// Returns a statement error if the backend rejects the statement.
    fn query(&mut self, sql: &str) -> Result<RowSet>;

    /// Describes a table, view, or query.
    ///
    /// # Errors
    ///
    /// Returns a statement error if `table` cannot be described.
    fn describe(&mut self, table: &str) -> Result<TableInfo>;
}

/// Opens connections, one per query.
pub trait SqlConnector: Send + Sync + fmt::Debug {
    /// Opens a new connection.
    ///
    /// # Errors
    ///
    /// Returns a connection error if the backend is unreachable.
    fn connect(&self) -> Result<Box<dyn SqlConnection>>;
}
