//! Static in-memory tables.
//!
//! Rows are given in the configuration, either positionally (schema order)
//! or by column name. Keys join the key-column values with
//! [`KEY_SEPARATOR`](joinery_foundation::KEY_SEPARATOR) and are not escaped.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use joinery_foundation::{
    Dataset, Error, ErrorKind, Lookup, MatchMode, Predicate, QueryPart, QueryResults, Record,
    Result, Schema, is_identifier, join_key,
};

use crate::datasource::{Datasource, validate_key_columns};

/// One configured row.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(untagged))]
pub enum TableRow {
    /// Values in schema order; missing trailing values are null.
    Positional(Vec<Option<String>>),
    /// Values by column name; missing columns are null.
    Named(BTreeMap<String, Option<String>>),
}

/// Configuration of a [`TableDatasource`].
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct TableConfig {
    /// Datasource name.
    pub name: String,
    /// Column names.
    pub schema: Vec<String>,
    /// Key column names.
    pub key: Vec<String>,
    /// Rows in declaration order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rows: Vec<TableRow>,
}

impl TableConfig {
    /// Creates a configuration without rows.
    #[must_use]
    pub fn new<S, K>(
        name: impl Into<String>,
        schema: impl IntoIterator<Item = S>,
        key: impl IntoIterator<Item = K>,
    ) -> Self
    where
        S: Into<String>,
        K: Into<String>,
    {
        Self {
            name: name.into(),
            schema: schema.into_iter().map(Into::into).collect(),
            key: key.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Adds a row given in schema order.
    #[must_use]
    pub fn with_row<V: Into<String>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.rows.push(TableRow::Positional(
            values.into_iter().map(|v| Some(v.into())).collect(),
        ));
        self
    }

    /// Adds a row given by column name.
    #[must_use]
    pub fn with_named_row<C, V>(mut self, values: impl IntoIterator<Item = (C, V)>) -> Self
    where
        C: Into<String>,
        V: Into<String>,
    {
        self.rows.push(TableRow::Named(
            values
                .into_iter()
                .map(|(c, v)| (c.into(), Some(v.into())))
                .collect(),
        ));
        self
    }
}

/// A row of a static table.
#[derive(Debug)]
pub struct TableDataset(Record);

impl Dataset for TableDataset {
    fn get(&self, column: &str) -> Lookup {
        self.0.get(column)
    }

    fn key(&self) -> &str {
        self.0.key()
    }
}

/// A datasource serving fixed rows from memory.
pub struct TableDatasource {
    name: String,
    schema: Arc<Schema>,
    rows: QueryResults,
}

impl TableDatasource {
    /// Builds the table and all of its rows.
    ///
    /// # Errors
    ///
    /// Fails on invalid or duplicate column names, an empty schema, bad key
    /// columns, or a row that does not fit the schema.
    pub fn new(config: &TableConfig) -> Result<Self> {
        let name = config.name.as_str();
        if config.schema.is_empty() {
            return Err(Error::empty_schema(name));
        }
        for column in &config.schema {
            if !is_identifier(column) {
                return Err(Error::new(ErrorKind::InvalidColumnName {
                    datasource: name.to_string(),
                    column: column.clone(),
                }));
            }
        }
        let schema = Arc::new(Schema::from_columns(name, config.schema.iter().cloned())?);
        validate_key_columns(name, &schema, &config.key)?;

        let mut rows = QueryResults::new();
        for (index, row) in config.rows.iter().enumerate() {
            let values = row_values(name, &schema, index, row)?;
            let key = join_key(
                config
                    .key
                    .iter()
                    .map(|column| values.get(column).map(String::as_str)),
            );
            rows.push(Arc::new(TableDataset(Record::new(schema.clone(), values, key))));
        }

        Ok(Self {
            name: name.to_string(),
            schema,
            rows,
        })
    }
}

fn row_values(
    datasource: &str,
    schema: &Schema,
    index: usize,
    row: &TableRow,
) -> Result<HashMap<String, String>> {
    let mut values = HashMap::new();
    match row {
        TableRow::Positional(items) => {
            if items.len() > schema.len() {
                return Err(Error::new(ErrorKind::InvalidRow {
                    datasource: datasource.to_string(),
                    message: format!(
                        "row {} has {} values but the schema has only {} columns",
                        index + 1,
                        items.len(),
                        schema.len()
                    ),
                }));
            }
            for (column, value) in schema.iter().zip(items) {
                if let Some(value) = value {
                    values.insert(column.to_string(), value.clone());
                }
            }
        }
        TableRow::Named(items) => {
            for (column, value) in items {
                if !schema.contains(column) {
                    return Err(Error::column_not_in_schema(datasource, column.clone()));
                }
                if let Some(value) = value {
                    values.insert(column.clone(), value.clone());
                }
            }
        }
    }
    Ok(values)
}

impl Datasource for TableDatasource {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn find(&self, query: &[QueryPart]) -> QueryResults {
        if query.is_empty() {
            return QueryResults::new();
        }
        Predicate::with_mode(query, MatchMode::Anchored).filter(&self.rows)
    }

    fn datasets_by_key(&self, keys: &[String]) -> QueryResults {
        let wanted: HashSet<&str> = keys.iter().map(String::as_str).collect();
        self.rows
            .iter()
            .filter(|ds| wanted.contains(ds.key()))
            .cloned()
            .collect()
    }

    fn contents(&self) -> QueryResults {
        self.rows.clone()
    }
}

impl fmt::Debug for TableDatasource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableDatasource")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .field("rows", &self.rows.len())
            .finish()
    }
}
