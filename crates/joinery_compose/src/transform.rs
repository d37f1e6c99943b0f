//! Column Transformer: computed pseudo-columns on top of existing rows.
//!
//! A [`ColumnTransformer`] holds a registry of column functions. Rows
//! wrapped by it look the function up each time a column is read, so a
//! function registered after wrapping is visible in rows wrapped before.
//! Functions only ever see the untransformed row; one pseudo-column cannot
//! read another.
//!
//! Clones share the registry. Registration takes a write lock; callers that
//! register while queries run see either the old or the new function.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use joinery_foundation::{
    Dataset, DatasetRef, Lookup, Predicate, QueryPart, QueryResults, Schema,
};
use joinery_sources::{Datasource, DatasourceRef};
use tracing::debug;

/// Read access to the row a column function is evaluated on.
pub trait Values {
    /// The value of `column`, `None` for null or unknown columns.
    fn value(&self, column: &str) -> Option<String>;

    /// True if the row has `column` at all, null or not.
    fn has_value(&self, column: &str) -> bool;

    /// The value of `column`, or the empty string.
    fn string(&self, column: &str) -> String {
        self.value(column).unwrap_or_default()
    }

    /// True if the value of `column` is `true` in any letter case.
    fn boolean(&self, column: &str) -> bool {
        self.string(column).eq_ignore_ascii_case("true")
    }
}

struct DatasetValues<'a>(&'a dyn Dataset);

impl Values for DatasetValues<'_> {
    fn value(&self, column: &str) -> Option<String> {
        self.0.value(column)
    }

    fn has_value(&self, column: &str) -> bool {
        self.0.get(column).is_ok()
    }
}

/// A function computing one pseudo-column.
pub type ColumnFunction = Arc<dyn Fn(&dyn Values) -> String + Send + Sync>;

/// A shared registry of pseudo-column functions.
#[derive(Clone, Default)]
pub struct ColumnTransformer {
    functions: Arc<RwLock<BTreeMap<String, ColumnFunction>>>,
}

impl ColumnTransformer {
    /// Creates a transformer without functions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `function` and returns the transformer.
    #[must_use]
    pub fn with_function<F>(self, column: impl Into<String>, function: F) -> Self
    where
        F: Fn(&dyn Values) -> String + Send + Sync + 'static,
    {
        self.add(column, function);
        self
    }

    /// Registers `function` for `column`, replacing an earlier one.
    pub fn add<F>(&self, column: impl Into<String>, function: F)
    where
        F: Fn(&dyn Values) -> String + Send + Sync + 'static,
    {
        let column = column.into();
        debug!(column = %column, "registering pseudo-column");
        self.functions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(column, Arc::new(function));
    }

    /// True if a function is registered for `column`.
    #[must_use]
    pub fn has_pseudo_column(&self, column: &str) -> bool {
        self.functions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(column)
    }

    /// Names of the registered pseudo-columns, sorted.
    #[must_use]
    pub fn pseudo_columns(&self) -> Vec<String> {
        self.functions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    fn function(&self, column: &str) -> Option<ColumnFunction> {
        self.functions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(column)
            .cloned()
    }

    /// Reads `column` of `dataset`, computing it if it is a pseudo-column.
    pub fn get(&self, column: &str, dataset: &dyn Dataset) -> Lookup {
        match self.function(column) {
            Some(function) => Ok(Some(function(&DatasetValues(dataset)))),
            None => dataset.get(column),
        }
    }

    /// Wraps one row.
    #[must_use]
    pub fn transform(&self, dataset: DatasetRef) -> DatasetRef {
        Arc::new(TransformedDataset {
            inner: dataset,
            transformer: self.clone(),
        })
    }

    /// Wraps every row of `results`.
    #[must_use]
    pub fn transform_results(&self, results: &QueryResults) -> QueryResults {
        results.iter().map(|ds| self.transform(ds.clone())).collect()
    }

    /// Exposes `source` with the pseudo-columns registered now.
    #[must_use]
    pub fn wrap(&self, source: DatasourceRef) -> TransformedDatasource {
        let columns = self.pseudo_columns();
        let mut schema = source.schema().clone();
        for column in &columns {
            schema.push_unique(column.as_str());
        }
        let pseudo: HashSet<String> = columns.into_iter().collect();
        TransformedDatasource {
            name: source.name().to_string(),
            source,
            transformer: self.clone(),
            schema,
            pseudo,
        }
    }
}

impl fmt::Debug for ColumnTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.pseudo_columns()).finish()
    }
}

/// A row whose pseudo-columns are computed on read.
pub struct TransformedDataset {
    inner: DatasetRef,
    transformer: ColumnTransformer,
}

impl Dataset for TransformedDataset {
    fn get(&self, column: &str) -> Lookup {
        self.transformer.get(column, self.inner.as_ref())
    }

    fn key(&self) -> &str {
        self.inner.key()
    }
}

impl fmt::Debug for TransformedDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TransformedDataset").field(&self.inner).finish()
    }
}

/// A source whose rows carry pseudo-columns.
pub struct TransformedDatasource {
    name: String,
    source: DatasourceRef,
    transformer: ColumnTransformer,
    schema: Schema,
    pseudo: HashSet<String>,
}

impl TransformedDatasource {
    /// Renames the datasource.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Datasource for TransformedDatasource {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn find(&self, query: &[QueryPart]) -> QueryResults {
        let (computed, stored): (Vec<QueryPart>, Vec<QueryPart>) = query
            .iter()
            .cloned()
            .partition(|part| self.pseudo.contains(part.column()));
        if computed.is_empty() {
            return self.transformer.transform_results(&self.source.find(&stored));
        }
        let candidates = if stored.is_empty() {
            debug!(datasource = %self.name, "pseudo-column predicates only, scanning contents");
            self.source.contents()
        } else {
            self.source.find(&stored)
        };
        Predicate::new(&computed).filter(&self.transformer.transform_results(&candidates))
    }

    fn datasets_by_key(&self, keys: &[String]) -> QueryResults {
        self.transformer
            .transform_results(&self.source.datasets_by_key(keys))
    }

    fn contents(&self) -> QueryResults {
        self.transformer.transform_results(&self.source.contents())
    }
}

impl fmt::Debug for TransformedDatasource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformedDatasource")
            .field("name", &self.name)
            .field("source", &self.source.name())
            .field("transformer", &self.transformer)
            .finish()
    }
}
