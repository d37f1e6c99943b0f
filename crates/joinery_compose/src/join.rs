//! MATCH column pairs shared by the joining operators.

use joinery_foundation::{Dataset, Error, QueryPart, Result, Schema};
use tracing::warn;

/// Validated `(primary column, secondary column)` pairs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MatchColumns {
    datasource: String,
    pairs: Vec<(String, String)>,
}

impl MatchColumns {
    /// Checks that there is at least one pair and that each side names a
    /// column of its schema.
    pub(crate) fn new(
        datasource: &str,
        pairs: &[(String, String)],
        primary: &Schema,
        secondary: &Schema,
    ) -> Result<Self> {
        if pairs.is_empty() {
            return Err(Error::missing_match(datasource));
        }
        for (first, second) in pairs {
            if !primary.contains(first) {
                return Err(Error::column_not_in_schema(datasource, first.clone()));
            }
            if !secondary.contains(second) {
                return Err(Error::column_not_in_schema(datasource, second.clone()));
            }
        }
        Ok(Self {
            datasource: datasource.to_string(),
            pairs: pairs.to_vec(),
        })
    }

    /// Columns matched by the same name on both sides.
    pub(crate) fn common_columns(&self) -> impl Iterator<Item = &str> {
        self.pairs
            .iter()
            .filter(|(a, b)| a == b)
            .map(|(a, _)| a.as_str())
    }

    /// Query against the secondary source for rows matching `primary`.
    pub(crate) fn secondary_query(&self, primary: &dyn Dataset) -> Option<Vec<QueryPart>> {
        self.probe(primary, false)
    }

    /// Query against the primary source for rows matching `secondary`.
    pub(crate) fn primary_query(&self, secondary: &dyn Dataset) -> Option<Vec<QueryPart>> {
        self.probe(secondary, true)
    }

    /// Reads each matched column of `row` and builds a predicate on the
    /// other side from its value. Null values are left out; `None` if
    /// nothing remains.
    fn probe(&self, row: &dyn Dataset, reverse: bool) -> Option<Vec<QueryPart>> {
        let mut query = Vec::with_capacity(self.pairs.len());
        for (first, second) in &self.pairs {
            let (from, to) = if reverse { (second, first) } else { (first, second) };
            match row.get(from) {
                Ok(Some(value)) => query.push(QueryPart::new(to.clone(), value)),
                Ok(None) => {}
                Err(e) => warn!(datasource = %self.datasource, error = %e, "MATCH column missing from row"),
            }
        }
        if query.is_empty() { None } else { Some(query) }
    }
}
