//! The datasource contract.

use std::sync::Arc;

use joinery_foundation::{QueryPart, QueryResults, Schema};

/// A named, schema-bearing, read-only source of datasets.
///
/// Datasources are built once and never mutated afterwards, so they can be
/// shared freely between threads. None of the query operations fail:
/// backend problems are logged and turn into empty results.
pub trait Datasource: Send + Sync {
    /// Diagnostic name of this datasource.
    fn name(&self) -> &str;

    /// Columns every dataset of this source exposes, in order.
    fn schema(&self) -> &Schema;

    /// Returns every dataset satisfying all parts of `query`.
    ///
    /// An empty query does not mean "everything"; most sources return
    /// nothing for it. Use [`Datasource::contents`] to list all rows.
    fn find(&self, query: &[QueryPart]) -> QueryResults;

    /// Returns the datasets whose key is one of `keys`.
    fn datasets_by_key(&self, keys: &[String]) -> QueryResults;

    /// Returns all rows. Composed sources that only make sense joined with
    /// another source return nothing.
    fn contents(&self) -> QueryResults;
}

/// Shared handle to a datasource.
pub type DatasourceRef = Arc<dyn Datasource>;

/// Checks a key column list against a schema.
///
/// # Errors
///
/// Fails if the list is empty, names a column twice, or names a column the
/// schema lacks.
pub fn validate_key_columns(
    datasource: &str,
    schema: &Schema,
    key_columns: &[String],
) -> joinery_foundation::Result<()> {
    use joinery_foundation::{Error, ErrorKind};

    if key_columns.is_empty() {
        return Err(Error::missing_key(datasource));
    }
    for (i, column) in key_columns.iter().enumerate() {
        if !schema.contains(column) {
            return Err(Error::column_not_in_schema(datasource, column.clone()));
        }
        if key_columns[..i].contains(column) {
            return Err(Error::new(ErrorKind::DuplicateKeyColumn {
                datasource: datasource.to_string(),
                column: column.clone(),
            }));
        }
    }
    Ok(())
}
