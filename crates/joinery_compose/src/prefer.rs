//! Prefer: rows of the preferred source replace base rows with the same key.

use std::collections::HashSet;
use std::fmt;

use joinery_foundation::{QueryPart, QueryResults, Result, Schema};
use joinery_sources::{Datasource, DatasourceRef, DatasourceRegistry};

use crate::union::require_set_equal;

/// Configuration of a [`PreferDatasource`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct PreferConfig {
    /// Datasource name.
    pub name: String,
    /// Source whose rows are hidden when the preferred source has the key.
    pub base: String,
    /// Source whose rows win.
    pub preferred: String,
}

impl PreferConfig {
    /// Creates a configuration.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        base: impl Into<String>,
        preferred: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base: base.into(),
            preferred: preferred.into(),
        }
    }
}

/// Returns preferred rows first, then the base rows whose key the preferred
/// source does not know.
pub struct PreferDatasource {
    name: String,
    base: DatasourceRef,
    preferred: DatasourceRef,
}

impl PreferDatasource {
    /// Builds the operator.
    ///
    /// # Errors
    ///
    /// Fails if a source is missing or the schemas differ as sets.
    pub fn new(config: &PreferConfig, registry: &DatasourceRegistry) -> Result<Self> {
        let base = registry.require(&config.name, &config.base)?;
        let preferred = registry.require(&config.name, &config.preferred)?;
        require_set_equal(&config.name, preferred.as_ref(), base.as_ref())?;
        Ok(Self {
            name: config.name.clone(),
            base,
            preferred,
        })
    }

    /// Appends to `preferred` every base row the preferred source has no
    /// row for. The preferred source is asked by key as well, since a row
    /// that missed the query there must still hide its base counterpart.
    fn merge(&self, mut preferred: QueryResults, base: &QueryResults) -> QueryResults {
        if base.is_empty() {
            return preferred;
        }
        let mut hidden: HashSet<String> = preferred.keys().into_iter().collect();
        hidden.extend(self.preferred.datasets_by_key(&base.keys()).keys());
        preferred.extend(base.iter().filter(|ds| !hidden.contains(ds.key())).cloned());
        preferred
    }
}

impl Datasource for PreferDatasource {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &Schema {
        self.preferred.schema()
    }

    fn find(&self, query: &[QueryPart]) -> QueryResults {
        self.merge(self.preferred.find(query), &self.base.find(query))
    }

    fn datasets_by_key(&self, keys: &[String]) -> QueryResults {
        self.merge(
            self.preferred.datasets_by_key(keys),
            &self.base.datasets_by_key(keys),
        )
    }

    fn contents(&self) -> QueryResults {
        QueryResults::new()
    }
}

impl fmt::Debug for PreferDatasource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreferDatasource")
            .field("name", &self.name)
            .field("base", &self.base.name())
            .field("preferred", &self.preferred.name())
            .finish()
    }
}
