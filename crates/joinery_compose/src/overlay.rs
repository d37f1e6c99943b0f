//! Overlay: merges a base source and an overlay source column by column.
//!
//! Rows are joined through MATCH pairs. For every column one side has
//! priority; its value wins unless it is null (or, when the mode asks for
//! it, empty), in which case the other side's value is used. Keys are the
//! base row's key.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use joinery_foundation::{
    ColumnNotFound, Dataset, DatasetRef, Error, ErrorKind, Lookup, Predicate, QueryPart,
    QueryResults, Result, Schema, most_restrictive,
};
use joinery_sources::{Datasource, DatasourceRef, DatasourceRegistry};
use tracing::debug;

use crate::join::MatchColumns;

/// Which side wins and whether empty strings count as null.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayMode {
    /// True for `SO` (overlay wins), false for `OS` (base wins).
    pub overlay_wins: bool,
    /// True if an empty value on the priority side falls through.
    pub empty_is_null: bool,
}

impl OverlayMode {
    /// Parses a mode token.
    ///
    /// The token must be `so` or `os` in any letter case. A lower-case
    /// second letter makes empty strings count as null.
    ///
    /// # Errors
    ///
    /// Returns an invalid mode error for any other token.
    pub fn parse(datasource: &str, token: &str) -> Result<Self> {
        let overlay_wins = match token.to_lowercase().as_str() {
            "so" => true,
            "os" => false,
            _ => {
                return Err(Error::new(ErrorKind::InvalidMode {
                    datasource: datasource.to_string(),
                    mode: token.to_string(),
                }));
            }
        };
        let empty_is_null = token.chars().nth(1).is_some_and(char::is_lowercase);
        Ok(Self {
            overlay_wins,
            empty_is_null,
        })
    }
}

/// Configuration of an [`OverlayDatasource`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct OverlayConfig {
    /// Datasource name.
    pub name: String,
    /// Mode token: `SO`, `So`, `sO`, `so`, `OS`, `Os`, `oS` or `os`.
    pub mode: String,
    /// Base source.
    pub source: String,
    /// Overlay source.
    pub overlay: String,
    /// `(base column, overlay column)` pairs that must be equal.
    #[cfg_attr(feature = "serde", serde(rename = "match"))]
    pub matches: Vec<(String, String)>,
}

impl OverlayConfig {
    /// Creates a configuration without MATCH pairs.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        mode: impl Into<String>,
        source: impl Into<String>,
        overlay: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            mode: mode.into(),
            source: source.into(),
            overlay: overlay.into(),
            matches: Vec::new(),
        }
    }

    /// Adds a MATCH pair.
    #[must_use]
    pub fn with_match(mut self, base: impl Into<String>, overlay: impl Into<String>) -> Self {
        self.matches.push((base.into(), overlay.into()));
        self
    }
}

#[derive(Debug)]
struct Layout {
    schema: Schema,
    base_schema: Schema,
    overlay_schema: Schema,
    mode: OverlayMode,
}

/// A base row merged with an optional overlay row.
pub struct OverlaidDataset {
    base: DatasetRef,
    overlay: Option<DatasetRef>,
    layout: Arc<Layout>,
}

impl Dataset for OverlaidDataset {
    fn get(&self, column: &str) -> Lookup {
        let layout = &self.layout;
        if !layout.schema.contains(column) {
            return Err(ColumnNotFound::new(column));
        }
        let (priority, fallback, priority_schema) = if layout.mode.overlay_wins {
            (self.overlay.as_ref(), Some(&self.base), &layout.overlay_schema)
        } else {
            (Some(&self.base), self.overlay.as_ref(), &layout.base_schema)
        };

        if let Some(ds) = priority.filter(|_| priority_schema.contains(column)) {
            let value = ds
                .value(column)
                .filter(|v| !(layout.mode.empty_is_null && v.is_empty()));
            if value.is_some() {
                return Ok(value);
            }
        }
        Ok(fallback.and_then(|ds| ds.value(column)))
    }

    fn key(&self) -> &str {
        self.base.key()
    }
}

impl fmt::Debug for OverlaidDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlaidDataset")
            .field("base", &self.base)
            .field("overlay", &self.overlay)
            .finish()
    }
}

/// Merges overlay rows into base rows.
pub struct OverlayDatasource {
    name: String,
    base: DatasourceRef,
    overlay: DatasourceRef,
    matches: MatchColumns,
    common_match_columns: HashSet<String>,
    layout: Arc<Layout>,
}

impl OverlayDatasource {
    /// Builds the operator.
    ///
    /// # Errors
    ///
    /// Fails on a bad mode token, a missing source, or missing or invalid
    /// MATCH pairs.
    pub fn new(config: &OverlayConfig, registry: &DatasourceRegistry) -> Result<Self> {
        let name = config.name.as_str();
        let mode = OverlayMode::parse(name, &config.mode)?;
        let base = registry.require(name, &config.source)?;
        let overlay = registry.require(name, &config.overlay)?;
        let matches = MatchColumns::new(name, &config.matches, base.schema(), overlay.schema())?;
        let common_match_columns = matches.common_columns().map(String::from).collect();

        let mut schema = base.schema().clone();
        for column in overlay.schema() {
            schema.push_unique(column.clone());
        }

        let layout = Layout {
            schema,
            base_schema: base.schema().clone(),
            overlay_schema: overlay.schema().clone(),
            mode,
        };
        Ok(Self {
            name: name.to_string(),
            base,
            overlay,
            matches,
            common_match_columns,
            layout: Arc::new(layout),
        })
    }

    /// The parsed mode.
    #[must_use]
    pub fn mode(&self) -> OverlayMode {
        self.layout.mode
    }

    fn merged(&self, base: DatasetRef, overlay: Option<DatasetRef>) -> DatasetRef {
        Arc::new(OverlaidDataset {
            base,
            overlay,
            layout: self.layout.clone(),
        })
    }

    /// Merges each base row with its first overlay match passing `filter`.
    fn overlay_columns(&self, results: &QueryResults, filter: &Predicate) -> QueryResults {
        let mut out = QueryResults::new();
        for ds in results {
            let appendix = self
                .matches
                .secondary_query(ds.as_ref())
                .map(|query| self.overlay.find(&query))
                .unwrap_or_default();
            if appendix.is_empty() {
                let row = self.merged(ds.clone(), None);
                if filter.matches(row.as_ref()) {
                    out.push(row);
                }
                continue;
            }
            let first = appendix
                .iter()
                .map(|o| self.merged(ds.clone(), Some(o.clone())))
                .find(|row| filter.matches(row.as_ref()));
            out.extend(first);
        }
        out
    }

    /// Merges each overlay row with every base row it matches.
    fn overlay_columns_reversed(&self, results: &QueryResults, filter: &Predicate) -> QueryResults {
        let mut out = QueryResults::new();
        for ds in results {
            let Some(query) = self.matches.primary_query(ds.as_ref()) else {
                continue;
            };
            for base in &self.base.find(&query) {
                let row = self.merged(base.clone(), Some(ds.clone()));
                if filter.matches(row.as_ref()) {
                    out.push(row);
                }
            }
        }
        out
    }

    /// Probes both sides with the most restrictive predicate and merges the
    /// two partial results. Keys found from both sides are fetched again by
    /// key and checked against the whole query.
    fn find_common(&self, query: &[QueryPart], common: &[QueryPart]) -> QueryResults {
        let Some(probe) = most_restrictive(common) else {
            return QueryResults::new();
        };
        let probe = std::slice::from_ref(probe);
        let predicate = Predicate::new(query);
        let from_base = self.overlay_columns(&self.base.find(probe), &predicate);
        let from_overlay = self.overlay_columns_reversed(&self.overlay.find(probe), &predicate);

        let base_keys: HashSet<&str> = from_base.iter().map(|ds| ds.key()).collect();
        let mut out = QueryResults::new();
        let mut duplicates = Vec::new();
        for ds in &from_overlay {
            if base_keys.contains(ds.key()) {
                duplicates.push(ds.key().to_string());
            } else {
                out.push(ds.clone());
            }
        }
        out.append(predicate.filter(&self.datasets_by_key(&duplicates)));

        let duplicate_keys: HashSet<&str> = duplicates.iter().map(String::as_str).collect();
        out.extend(
            from_base
                .iter()
                .filter(|ds| !duplicate_keys.contains(ds.key()))
                .cloned(),
        );
        out
    }
}

impl Datasource for OverlayDatasource {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &Schema {
        &self.layout.schema
    }

    fn find(&self, query: &[QueryPart]) -> QueryResults {
        if query.is_empty() {
            return QueryResults::new();
        }

        let mut only_base = Vec::new();
        let mut only_overlay = Vec::new();
        let mut both = Vec::new();
        for part in query {
            let column = part.column();
            if !self.layout.base_schema.contains(column) {
                only_overlay.push(part.clone());
            } else if self.layout.overlay_schema.contains(column)
                && !self.common_match_columns.contains(column)
            {
                both.push(part.clone());
            } else {
                only_base.push(part.clone());
            }
        }

        if !only_base.is_empty() {
            debug!(datasource = %self.name, "querying base source first");
            let rest: Vec<QueryPart> = both.into_iter().chain(only_overlay).collect();
            self.overlay_columns(&self.base.find(&only_base), &Predicate::new(&rest))
        } else if !only_overlay.is_empty() {
            debug!(datasource = %self.name, "querying overlay source first");
            self.overlay_columns_reversed(&self.overlay.find(&only_overlay), &Predicate::new(&both))
        } else {
            debug!(datasource = %self.name, "common columns only, probing both sources");
            self.find_common(query, &both)
        }
    }

    fn datasets_by_key(&self, keys: &[String]) -> QueryResults {
        self.overlay_columns(&self.base.datasets_by_key(keys), &Predicate::match_all())
    }

    fn contents(&self) -> QueryResults {
        QueryResults::new()
    }
}

impl fmt::Debug for OverlayDatasource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayDatasource")
            .field("name", &self.name)
            .field("base", &self.base.name())
            .field("overlay", &self.overlay.name())
            .field("mode", &self.layout.mode)
            .finish()
    }
}
