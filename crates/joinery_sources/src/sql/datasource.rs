//! Datasource backed by one SQL table or view.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use joinery_foundation::{
    Dataset, DatasetRef, Error, ErrorKind, Lookup, QueryPart, QueryResults, Record, Result, Schema,
    decode_key, encode_key,
};
use tracing::{debug, error, warn};

use super::connection::{RowSet, SqlConnector};
use super::dialect::SqlDialect;
use crate::datasource::{Datasource, validate_key_columns};

/// Configuration of a [`SqlDatasource`].
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct SqlConfig {
    /// Datasource name.
    pub name: String,
    /// Table or view to read.
    pub table: String,
    /// Dialect used to generate statements.
    #[cfg_attr(feature = "serde", serde(default))]
    pub dialect: SqlDialect,
    /// Declared columns; introspected when absent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub schema: Option<Vec<String>>,
    /// Declared key columns; required with a declared schema, otherwise
    /// taken from the primary key when absent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub key: Option<Vec<String>>,
}

impl SqlConfig {
    /// Creates a configuration that introspects schema and key.
    #[must_use]
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            ..Self::default()
        }
    }

    /// Sets the dialect.
    #[must_use]
    pub fn with_dialect(mut self, dialect: SqlDialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Declares the schema.
    #[must_use]
    pub fn with_schema<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.schema = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Declares the key columns.
    #[must_use]
    pub fn with_key<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.key = Some(columns.into_iter().map(Into::into).collect());
        self
    }
}

/// A row read from an SQL backend.
#[derive(Debug)]
pub struct SqlDataset(Record);

impl Dataset for SqlDataset {
    fn get(&self, column: &str) -> Lookup {
        self.0.get(column)
    }

    fn key(&self) -> &str {
        self.0.key()
    }
}

/// Datasource translating queries into one SQL statement each.
///
/// Every query opens its own connection and closes it before returning.
pub struct SqlDatasource {
    name: String,
    table: String,
    dialect: SqlDialect,
    schema: Arc<Schema>,
    key_columns: Vec<String>,
    connector: Arc<dyn SqlConnector>,
}

impl SqlDatasource {
    /// Builds the datasource, introspecting the table if needed.
    ///
    /// # Errors
    ///
    /// Fails on an empty or colliding schema, bad key columns, or when the
    /// table cannot be described.
    pub fn new(config: &SqlConfig, connector: Arc<dyn SqlConnector>) -> Result<Self> {
        let name = config.name.as_str();
        let (schema, key_columns) = match &config.schema {
            Some(columns) => {
                if columns.is_empty() {
                    return Err(Error::empty_schema(name));
                }
                let schema = Schema::from_columns(name, columns.iter().cloned())?;
                let key = config.key.clone().ok_or_else(|| Error::missing_key(name))?;
                (schema, key)
            }
            None => {
                debug!(datasource = name, table = %config.table, "schema not declared, introspecting");
                let introspection = |e: Error| {
                    Error::new(ErrorKind::Introspection {
                        datasource: name.to_string(),
                        message: e.to_string(),
                    })
                };
                let mut conn = connector.connect().map_err(introspection)?;
                let info = conn.describe(&config.table).map_err(introspection)?;
                if info.columns.is_empty() {
                    return Err(Error::empty_schema(name));
                }
                let schema = Schema::from_columns(name, info.columns)?;
                let key = config.key.clone().unwrap_or(info.primary_key);
                (schema, key)
            }
        };
        validate_key_columns(name, &schema, &key_columns)?;

        Ok(Self {
            name: name.to_string(),
            table: config.table.clone(),
            dialect: config.dialect,
            schema: Arc::new(schema),
            key_columns,
            connector,
        })
    }

    /// Key columns in key order.
    #[must_use]
    pub fn key_columns(&self) -> &[String] {
        &self.key_columns
    }

    /// The dialect statements are generated in.
    #[must_use]
    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    fn run(&self, sql: &str) -> QueryResults {
        debug!(datasource = %self.name, statement = sql, "executing");
        let rows = match self.connector.connect() {
            Ok(mut conn) => conn.query(sql),
            Err(e) => {
                error!(datasource = %self.name, error = %e, "cannot connect");
                return QueryResults::new();
            }
        };
        match rows {
            Ok(rows) => self.datasets(&rows),
            Err(e) => {
                error!(datasource = %self.name, statement = sql, error = %e, "query failed");
                QueryResults::new()
            }
        }
    }

    fn datasets(&self, rows: &RowSet) -> QueryResults {
        let mapping: Vec<(&str, Option<usize>)> = self
            .schema
            .iter()
            .map(|column| (column, rows.column_index(column)))
            .collect();
        for (column, _) in mapping.iter().filter(|(_, idx)| idx.is_none()) {
            warn!(datasource = %self.name, column = *column, "column missing from result set");
        }

        rows.rows
            .iter()
            .map(|row| {
                let values: HashMap<String, String> = mapping
                    .iter()
                    .filter_map(|(column, idx)| {
                        let value = row.get((*idx)?)?.clone()?;
                        Some(((*column).to_string(), value))
                    })
                    .collect();
                let key = encode_key(
                    self.key_columns
                        .iter()
                        .map(|c| (c.as_str(), values.get(c).map(String::as_str))),
                );
                let dataset: DatasetRef =
                    Arc::new(SqlDataset(Record::new(self.schema.clone(), values, key)));
                dataset
            })
            .collect()
    }
}

impl Datasource for SqlDatasource {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn find(&self, query: &[QueryPart]) -> QueryResults {
        match self.dialect.find_statement(&self.table, query) {
            Some(sql) => self.run(&sql),
            None => QueryResults::new(),
        }
    }

    fn datasets_by_key(&self, keys: &[String]) -> QueryResults {
        let decoded: Vec<Vec<(String, String)>> = keys.iter().map(|k| decode_key(k)).collect();
        match self.dialect.by_key_statement(&self.table, &decoded) {
            Some(sql) => self.run(&sql),
            None => QueryResults::new(),
        }
    }

    fn contents(&self) -> QueryResults {
        self.run(&self.dialect.contents_statement(&self.table))
    }
}

impl fmt::Debug for SqlDatasource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlDatasource")
            .field("name", &self.name)
            .field("table", &self.table)
            .field("dialect", &self.dialect)
            .field("schema", &self.schema)
            .field("key_columns", &self.key_columns)
            .finish_non_exhaustive()
    }
}
