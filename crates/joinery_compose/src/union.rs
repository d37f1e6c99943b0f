//! Union of two sources with set-equal schemas.

use std::fmt;

use joinery_foundation::{Error, ErrorKind, QueryPart, QueryResults, Result, Schema};
use joinery_sources::{Datasource, DatasourceRef, DatasourceRegistry};

/// Configuration of a [`UnionDatasource`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct UnionConfig {
    /// Datasource name.
    pub name: String,
    /// First source; its column order is kept.
    pub source1: String,
    /// Second source.
    pub source2: String,
}

impl UnionConfig {
    /// Creates a configuration.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        source1: impl Into<String>,
        source2: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source1: source1.into(),
            source2: source2.into(),
        }
    }
}

/// Returns a schema mismatch error unless both schemas hold the same columns.
pub(crate) fn require_set_equal(
    datasource: &str,
    first: &dyn Datasource,
    second: &dyn Datasource,
) -> Result<()> {
    if first.schema().is_set_equal(second.schema()) {
        return Ok(());
    }
    Err(Error::new(ErrorKind::SchemaMismatch {
        datasource: datasource.to_string(),
        first: first.name().to_string(),
        second: second.name().to_string(),
        missing_in_first: second.schema().difference(first.schema()),
        missing_in_second: first.schema().difference(second.schema()),
    }))
}

/// Concatenates the results of two sources.
///
/// Rows present in both sources are returned twice; there is no key based
/// deduplication.
pub struct UnionDatasource {
    name: String,
    source1: DatasourceRef,
    source2: DatasourceRef,
}

impl UnionDatasource {
    /// Builds the union.
    ///
    /// # Errors
    ///
    /// Fails if a source is missing or the schemas differ as sets.
    pub fn new(config: &UnionConfig, registry: &DatasourceRegistry) -> Result<Self> {
        let source1 = registry.require(&config.name, &config.source1)?;
        let source2 = registry.require(&config.name, &config.source2)?;
        require_set_equal(&config.name, source1.as_ref(), source2.as_ref())?;
        Ok(Self {
            name: config.name.clone(),
            source1,
            source2,
        })
    }
}

impl Datasource for UnionDatasource {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &Schema {
        self.source1.schema()
    }

    fn find(&self, query: &[QueryPart]) -> QueryResults {
        self.source1.find(query).concat(&self.source2.find(query))
    }

    fn datasets_by_key(&self, keys: &[String]) -> QueryResults {
        self.source1
            .datasets_by_key(keys)
            .concat(&self.source2.datasets_by_key(keys))
    }

    fn contents(&self) -> QueryResults {
        QueryResults::new()
    }
}

impl fmt::Debug for UnionDatasource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnionDatasource")
            .field("name", &self.name)
            .field("source1", &self.source1.name())
            .field("source2", &self.source2.name())
            .finish()
    }
}
