//! Datasets: one row of a datasource.
//!
//! A [`Dataset`] maps column names to nullable string values and carries a
//! key string. Looking up a column outside the owning schema yields
//! [`ColumnNotFound`]; a schema column without a value yields `Ok(None)`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::schema::Schema;

/// A column was requested that is not part of the dataset's schema.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("column \"{column}\" is not defined in schema")]
pub struct ColumnNotFound {
    /// The requested column.
    pub column: String,
}

impl ColumnNotFound {
    /// Creates a new error for `column`.
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

/// Result of a dataset column lookup.
pub type Lookup = std::result::Result<Option<String>, ColumnNotFound>;

/// One read-only row.
pub trait Dataset: fmt::Debug + Send + Sync {
    /// Returns the value of `column`, `Ok(None)` for null.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnNotFound`] iff the column is not in the schema.
    fn get(&self, column: &str) -> Lookup;

    /// Returns the key identifying this row within its datasource.
    fn key(&self) -> &str;

    /// Name of the concrete row type, used to tell rows of different
    /// datasources apart when merging.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the value of `column`, treating unknown columns as null.
    fn value(&self, column: &str) -> Option<String> {
        self.get(column).ok().flatten()
    }
}

/// Shared handle to a dataset.
pub type DatasetRef = Arc<dyn Dataset>;

/// A materialized row backed by a column map.
///
/// Used by static tables and SQL results alike.
#[derive(Clone)]
pub struct Record {
    schema: Arc<Schema>,
    values: HashMap<String, String>,
    key: String,
}

impl Record {
    /// Creates a record. Columns absent from `values` are null.
    #[must_use]
    pub fn new(schema: Arc<Schema>, values: HashMap<String, String>, key: impl Into<String>) -> Self {
        Self {
            schema,
            values,
            key: key.into(),
        }
    }

    /// Returns the schema this record belongs to.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the raw value map.
    #[must_use]
    pub fn values(&self) -> &HashMap<String, String> {
        &self.values
    }

    /// Wraps the record into a shared dataset handle.
    #[must_use]
    pub fn into_ref(self) -> DatasetRef {
        Arc::new(self)
    }
}

impl Dataset for Record {
    fn get(&self, column: &str) -> Lookup {
        if !self.schema.contains(column) {
            return Err(ColumnNotFound::new(column));
        }
        Ok(self.values.get(column).cloned())
    }

    fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        map.entry(&"key", &self.key);
        for column in self.schema.iter() {
            map.entry(&column, &self.values.get(column));
        }
        map.finish()
    }
}
