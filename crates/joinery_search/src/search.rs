//! Running resolved queries against a registry.

use joinery_foundation::{QueryResults, QueryResultsSet, Result, type_and_key};
use joinery_sources::DatasourceRegistry;
use tracing::debug;

use crate::strategy::{Query, SearchStrategy};

const SEARCH: &str = "search";

/// Resolves `input` with `strategy` and runs the resulting queries.
///
/// # Errors
///
/// Fails if a template names a datasource the registry does not hold.
pub fn search(
    input: &str,
    strategy: &SearchStrategy,
    registry: &DatasourceRegistry,
) -> Result<QueryResults> {
    execute(&strategy.resolve(input), registry)
}

/// Runs each query and merges the results.
///
/// A query without predicates lists the source's contents.
///
/// # Errors
///
/// Fails if a query names a datasource the registry does not hold.
pub fn execute(queries: &[Query], registry: &DatasourceRegistry) -> Result<QueryResults> {
    let mut lists = Vec::with_capacity(queries.len());
    for query in queries {
        let source = registry.require(SEARCH, &query.datasource)?;
        let results = if query.parts.is_empty() {
            source.contents()
        } else {
            source.find(&query.parts)
        };
        debug!(datasource = %query.datasource, rows = results.len(), "query executed");
        lists.push(results);
    }
    Ok(merge(lists))
}

/// Merges result lists, keeping the first of rows that share row type and
/// key. A single list is returned as is.
#[must_use]
pub fn merge(mut lists: Vec<QueryResults>) -> QueryResults {
    if lists.len() == 1 {
        return lists.pop().unwrap_or_default();
    }
    let mut set = QueryResultsSet::new(type_and_key);
    for results in &lists {
        set.insert_all(results);
    }
    set.into_results()
}
