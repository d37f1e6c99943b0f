//! Attach: extends every primary row with the columns of one matching
//! secondary row.
//!
//! Secondary columns appear in the schema as `<attach>__<column>`. A primary
//! row with no matching secondary row is still returned, with all attached
//! columns null. Keys are always the primary row's key.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use joinery_foundation::{
    ColumnNotFound, Dataset, DatasetRef, Lookup, Predicate, QueryPart, QueryResults, Result,
    Schema,
};
use joinery_sources::{Datasource, DatasourceRef, DatasourceRegistry};
use tracing::debug;

use crate::join::MatchColumns;

/// Separator between the attached source's name and its column names.
pub const ATTACH_SEPARATOR: &str = "__";

/// Configuration of an [`AttachDatasource`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct AttachConfig {
    /// Datasource name.
    pub name: String,
    /// Primary source.
    pub source: String,
    /// Secondary source whose columns are attached.
    pub attach: String,
    /// `(primary column, secondary column)` pairs that must be equal.
    #[cfg_attr(feature = "serde", serde(rename = "match"))]
    pub matches: Vec<(String, String)>,
}

impl AttachConfig {
    /// Creates a configuration without MATCH pairs.
    #[must_use]
    pub fn new(name: impl Into<String>, source: impl Into<String>, attach: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            attach: attach.into(),
            matches: Vec::new(),
        }
    }

    /// Adds a MATCH pair.
    #[must_use]
    pub fn with_match(mut self, primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        self.matches.push((primary.into(), secondary.into()));
        self
    }
}

#[derive(Debug)]
struct Layout {
    schema: Schema,
    /// Prefixed column name to secondary column name.
    attached: HashMap<String, String>,
}

/// A primary row with an optional secondary row attached.
pub struct AttachedDataset {
    primary: DatasetRef,
    secondary: Option<DatasetRef>,
    layout: Arc<Layout>,
}

impl Dataset for AttachedDataset {
    fn get(&self, column: &str) -> Lookup {
        if !self.layout.schema.contains(column) {
            return Err(ColumnNotFound::new(column));
        }
        match self.layout.attached.get(column) {
            Some(secondary_column) => Ok(self
                .secondary
                .as_ref()
                .and_then(|ds| ds.value(secondary_column))),
            None => self.primary.get(column),
        }
    }

    fn key(&self) -> &str {
        self.primary.key()
    }
}

impl fmt::Debug for AttachedDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachedDataset")
            .field("primary", &self.primary)
            .field("secondary", &self.secondary)
            .finish()
    }
}

/// Joins a secondary source onto a primary one without materializing the
/// join.
pub struct AttachDatasource {
    name: String,
    primary: DatasourceRef,
    secondary: DatasourceRef,
    matches: MatchColumns,
    layout: Arc<Layout>,
}

impl AttachDatasource {
    /// Builds the operator.
    ///
    /// # Errors
    ///
    /// Fails if a source is missing, a prefixed column collides with a
    /// primary column, or the MATCH pairs are missing or invalid.
    pub fn new(config: &AttachConfig, registry: &DatasourceRegistry) -> Result<Self> {
        let name = config.name.as_str();
        let primary = registry.require(name, &config.source)?;
        let secondary = registry.require(name, &config.attach)?;

        let mut schema = primary.schema().clone();
        let mut attached = HashMap::new();
        for column in secondary.schema() {
            let prefixed = format!("{}{ATTACH_SEPARATOR}{column}", config.attach);
            schema.push(name, prefixed.clone())?;
            attached.insert(prefixed, column.clone());
        }
        let matches = MatchColumns::new(name, &config.matches, primary.schema(), secondary.schema())?;

        Ok(Self {
            name: name.to_string(),
            primary,
            secondary,
            matches,
            layout: Arc::new(Layout { schema, attached }),
        })
    }

    fn joined(&self, primary: DatasetRef, secondary: Option<DatasetRef>) -> DatasetRef {
        Arc::new(AttachedDataset {
            primary,
            secondary,
            layout: self.layout.clone(),
        })
    }

    /// Attaches the first secondary match passing `filter` to each primary
    /// row.
    fn attach(&self, results: &QueryResults, filter: &Predicate) -> QueryResults {
        let mut out = QueryResults::new();
        for ds in results {
            let appendix = self
                .matches
                .secondary_query(ds.as_ref())
                .map(|query| self.secondary.find(&query))
                .unwrap_or_default();
            if appendix.is_empty() {
                let row = self.joined(ds.clone(), None);
                if filter.matches(row.as_ref()) {
                    out.push(row);
                }
                continue;
            }
            let first = appendix
                .iter()
                .map(|s| self.joined(ds.clone(), Some(s.clone())))
                .find(|row| filter.matches(row.as_ref()));
            out.extend(first);
        }
        out
    }

    /// Looks up the primary rows for each secondary row. A primary row
    /// reached through several secondary rows is kept once.
    fn attach_reversed(&self, results: &QueryResults) -> QueryResults {
        let mut seen = HashSet::new();
        let mut out = QueryResults::new();
        for secondary in results {
            let Some(query) = self.matches.primary_query(secondary.as_ref()) else {
                continue;
            };
            for primary in &self.primary.find(&query) {
                if seen.insert(primary.key().to_string()) {
                    out.push(self.joined(primary.clone(), Some(secondary.clone())));
                }
            }
        }
        out
    }
}

impl Datasource for AttachDatasource {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &Schema {
        &self.layout.schema
    }

    fn find(&self, query: &[QueryPart]) -> QueryResults {
        let mut primary_query = Vec::new();
        let mut attached_query = Vec::new();
        let mut secondary_query = Vec::new();
        for part in query {
            match self.layout.attached.get(part.column()) {
                Some(column) => {
                    secondary_query.push(part.with_column(column.clone()));
                    attached_query.push(part.clone());
                }
                None => primary_query.push(part.clone()),
            }
        }

        if primary_query.is_empty() {
            debug!(datasource = %self.name, "secondary predicates only, querying attached source first");
            self.attach_reversed(&self.secondary.find(&secondary_query))
        } else {
            debug!(datasource = %self.name, "querying primary source first");
            self.attach(&self.primary.find(&primary_query), &Predicate::new(&attached_query))
        }
    }

    fn datasets_by_key(&self, keys: &[String]) -> QueryResults {
        self.attach(&self.primary.datasets_by_key(keys), &Predicate::match_all())
    }

    fn contents(&self) -> QueryResults {
        QueryResults::new()
    }
}

impl fmt::Debug for AttachDatasource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachDatasource")
            .field("name", &self.name)
            .field("primary", &self.primary.name())
            .field("secondary", &self.secondary.name())
            .field("schema", &self.layout.schema)
            .finish()
    }
}
