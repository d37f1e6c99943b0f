//! Reshape: a view of one source with columns dropped, added or renamed.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use joinery_foundation::{
    ColumnNotFound, Dataset, DatasetRef, Error, ErrorKind, Lookup, QueryPart, QueryResults,
    Result, Schema, is_identifier,
};
use joinery_sources::{Datasource, DatasourceRef, DatasourceRegistry};
use tracing::debug;

/// Configuration of a [`ReshapeDatasource`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct ReshapeConfig {
    /// Datasource name.
    pub name: String,
    /// Wrapped source.
    pub source: String,
    /// Source columns to hide.
    pub drop: Vec<String>,
    /// New columns; always null unless a rename feeds them.
    pub add: Vec<String>,
    /// `(old, new)` pairs.
    pub rename: Vec<(String, String)>,
}

impl ReshapeConfig {
    /// Creates a configuration that passes every column through.
    #[must_use]
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            ..Self::default()
        }
    }

    /// Drops a column.
    #[must_use]
    pub fn with_drop(mut self, column: impl Into<String>) -> Self {
        self.drop.push(column.into());
        self
    }

    /// Adds an empty column.
    #[must_use]
    pub fn with_add(mut self, column: impl Into<String>) -> Self {
        self.add.push(column.into());
        self
    }

    /// Renames a column.
    #[must_use]
    pub fn with_rename(mut self, old: impl Into<String>, new: impl Into<String>) -> Self {
        self.rename.push((old.into(), new.into()));
        self
    }
}

#[derive(Debug)]
struct Layout {
    schema: Schema,
    /// New name to source name.
    renamed: HashMap<String, String>,
    /// Added columns with no source column behind them.
    empty: HashSet<String>,
}

impl Layout {
    /// The source column behind `column`, or `None` for an always-null one.
    fn source_column<'a>(&'a self, column: &'a str) -> Option<&'a str> {
        if self.empty.contains(column) {
            return None;
        }
        Some(self.renamed.get(column).map_or(column, String::as_str))
    }
}

/// A source row seen through a reshaped schema.
pub struct ReshapedDataset {
    inner: DatasetRef,
    layout: Arc<Layout>,
}

impl Dataset for ReshapedDataset {
    fn get(&self, column: &str) -> Lookup {
        if !self.layout.schema.contains(column) {
            return Err(ColumnNotFound::new(column));
        }
        match self.layout.source_column(column) {
            Some(source_column) => Ok(self.inner.value(source_column)),
            None => Ok(None),
        }
    }

    fn key(&self) -> &str {
        self.inner.key()
    }
}

impl fmt::Debug for ReshapedDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReshapedDataset").field(&self.inner).finish()
    }
}

/// Exposes one source under a derived schema.
pub struct ReshapeDatasource {
    name: String,
    source: DatasourceRef,
    layout: Arc<Layout>,
}

impl ReshapeDatasource {
    /// Builds the view.
    ///
    /// # Errors
    ///
    /// Fails if the source is missing, a dropped or renamed column does not
    /// exist, a new column name is not an identifier, or nothing is left.
    pub fn new(config: &ReshapeConfig, registry: &DatasourceRegistry) -> Result<Self> {
        let name = config.name.as_str();
        let source = registry.require(name, &config.source)?;
        let source_schema = source.schema();

        let mut drops: Vec<String> = Vec::new();
        let mut adds: Vec<String> = Vec::new();
        for column in &config.drop {
            if !source_schema.contains(column) {
                return Err(Error::column_not_in_schema(name, column.clone()));
            }
            push_once(&mut drops, column);
        }
        for column in &config.add {
            check_identifier(name, column)?;
            drops.retain(|c| c != column);
            push_once(&mut adds, column);
        }

        let mut renamed = HashMap::new();
        for (old, new) in &config.rename {
            if !source_schema.contains(old) {
                return Err(Error::column_not_in_schema(name, old.clone()));
            }
            check_identifier(name, new)?;
            renamed.insert(new.clone(), old.clone());
            push_once(&mut drops, old);
            drops.retain(|c| c != new);
            push_once(&mut adds, new);
        }

        let empty: HashSet<String> = adds
            .iter()
            .filter(|c| !source_schema.contains(c) && !renamed.contains_key(*c))
            .cloned()
            .collect();

        let mut schema = Schema::new();
        for column in source_schema.iter().filter(|c| !drops.iter().any(|d| d == c)) {
            schema.push_unique(column);
        }
        for column in adds {
            schema.push_unique(column);
        }
        if schema.is_empty() {
            return Err(Error::empty_schema(name));
        }

        Ok(Self {
            name: name.to_string(),
            source,
            layout: Arc::new(Layout {
                schema,
                renamed,
                empty,
            }),
        })
    }

    fn wrap(&self, results: &QueryResults) -> QueryResults {
        results
            .iter()
            .map(|ds| {
                let wrapped: DatasetRef = Arc::new(ReshapedDataset {
                    inner: ds.clone(),
                    layout: self.layout.clone(),
                });
                wrapped
            })
            .collect()
    }
}

fn push_once(list: &mut Vec<String>, column: &str) {
    if !list.iter().any(|c| c == column) {
        list.push(column.to_string());
    }
}

fn check_identifier(datasource: &str, column: &str) -> Result<()> {
    if is_identifier(column) {
        return Ok(());
    }
    Err(Error::new(ErrorKind::InvalidColumnName {
        datasource: datasource.to_string(),
        column: column.to_string(),
    }))
}

impl Datasource for ReshapeDatasource {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &Schema {
        &self.layout.schema
    }

    fn find(&self, query: &[QueryPart]) -> QueryResults {
        let mut translated = Vec::with_capacity(query.len());
        for part in query {
            let column = part.column();
            let source_column = if self.layout.schema.contains(column) {
                self.layout.source_column(column)
            } else {
                None
            };
            match source_column {
                Some(source_column) => translated.push(part.with_column(source_column)),
                None => {
                    debug!(datasource = %self.name, column, "predicate on a column without data");
                    return QueryResults::new();
                }
            }
        }
        self.wrap(&self.source.find(&translated))
    }

    fn datasets_by_key(&self, keys: &[String]) -> QueryResults {
        self.wrap(&self.source.datasets_by_key(keys))
    }

    fn contents(&self) -> QueryResults {
        QueryResults::new()
    }
}

impl fmt::Debug for ReshapeDatasource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReshapeDatasource")
            .field("name", &self.name)
            .field("source", &self.source.name())
            .field("schema", &self.layout.schema)
            .finish()
    }
}
