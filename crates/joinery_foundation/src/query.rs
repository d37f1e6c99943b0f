//! Query predicates and wildcard matching.
//!
//! A query is a conjunction of [`QueryPart`]s. Two matching rules exist:
//!
//! - [`MatchMode::Substring`] lower-cases both sides, strips every `*` from
//!   the pattern and tests for a substring. Composition operators use it to
//!   post-filter rows they have already fetched.
//! - [`MatchMode::Anchored`] lets a leading `*` mean "suffix", a trailing `*`
//!   mean "prefix", both mean "substring" and no star mean case-insensitive
//!   equality. In-memory tables use it.
//!
//! In both modes a column the dataset does not have, or a null value, does
//! not match. An empty predicate matches every dataset.

use std::cmp::Reverse;
use std::fmt;

use crate::dataset::Dataset;
use crate::results::QueryResults;

/// One `(column, pattern)` predicate.
///
/// The pattern may carry one leading and one trailing `*`. Other star
/// placements are not rejected; they simply match some substring.
///
/// Serialized as a `[column, pattern]` pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "(String, String)", into = "(String, String)")
)]
pub struct QueryPart {
    column: String,
    pattern: String,
}

impl QueryPart {
    /// Creates a predicate.
    #[must_use]
    pub fn new(column: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            pattern: pattern.into(),
        }
    }

    /// The column this predicate tests.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// The search pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns a copy of this predicate testing `column` instead.
    #[must_use]
    pub fn with_column(&self, column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            pattern: self.pattern.clone(),
        }
    }

    /// Number of wildcard anchors: one for a leading `*`, one for a trailing
    /// `*` unless the pattern is a lone `*`.
    #[must_use]
    pub fn star_count(&self) -> usize {
        let mut count = 0;
        if self.pattern.starts_with('*') {
            count += 1;
        }
        if self.pattern.len() > 1 && self.pattern.ends_with('*') {
            count += 1;
        }
        count
    }

    /// Number of characters that are not wildcard anchors.
    #[must_use]
    pub fn literal_len(&self) -> usize {
        self.pattern.chars().count().saturating_sub(self.star_count())
    }

    /// Tests a single value using the anchored rule.
    #[must_use]
    pub fn matches_anchored(&self, value: &str) -> bool {
        Condition::anchored(self).test(value)
    }

    /// Tests a single value using the substring rule.
    #[must_use]
    pub fn matches_substring(&self, value: &str) -> bool {
        Condition::substring(self).test(value)
    }
}

impl From<(String, String)> for QueryPart {
    fn from((column, pattern): (String, String)) -> Self {
        Self { column, pattern }
    }
}

impl From<QueryPart> for (String, String) {
    fn from(part: QueryPart) -> Self {
        (part.column, part.pattern)
    }
}

impl fmt::Display for QueryPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.column, self.pattern)
    }
}

/// Picks the predicate that narrows a search the most.
///
/// Fewer stars win, then more literal characters. A star-free predicate
/// always beats one with stars. Ties go to the earliest predicate.
/// Returns `None` for an empty list.
#[must_use]
pub fn most_restrictive(parts: &[QueryPart]) -> Option<&QueryPart> {
    parts
        .iter()
        .min_by_key(|part| (part.star_count(), Reverse(part.literal_len())))
}

/// Which wildcard rule a [`Predicate`] applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Stars are stripped and the rest must occur anywhere in the value.
    #[default]
    Substring,
    /// Leading and trailing stars anchor the comparison.
    Anchored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Anchor {
    Exact,
    Prefix,
    Suffix,
    Contains,
}

#[derive(Clone, Debug)]
struct Condition {
    column: String,
    needle: String,
    anchor: Anchor,
}

impl Condition {
    fn substring(part: &QueryPart) -> Self {
        Self {
            column: part.column.clone(),
            needle: part.pattern.replace('*', "").to_lowercase(),
            anchor: Anchor::Contains,
        }
    }

    fn anchored(part: &QueryPart) -> Self {
        let pattern = part.pattern.as_str();
        let (leading, rest) = match pattern.strip_prefix('*') {
            Some(rest) => (true, rest),
            None => (false, pattern),
        };
        let (trailing, rest) = match rest.strip_suffix('*') {
            Some(rest) => (true, rest),
            None => (false, rest),
        };
        let anchor = match (leading, trailing) {
            (false, false) => Anchor::Exact,
            (false, true) => Anchor::Prefix,
            (true, false) => Anchor::Suffix,
            (true, true) => Anchor::Contains,
        };
        Self {
            column: part.column.clone(),
            needle: rest.to_lowercase(),
            anchor,
        }
    }

    fn test(&self, value: &str) -> bool {
        let value = value.to_lowercase();
        match self.anchor {
            Anchor::Exact => value == self.needle,
            Anchor::Prefix => value.starts_with(&self.needle),
            Anchor::Suffix => value.ends_with(&self.needle),
            Anchor::Contains => value.contains(&self.needle),
        }
    }

    fn matches(&self, dataset: &dyn Dataset) -> bool {
        match dataset.get(&self.column) {
            Ok(Some(value)) => self.test(&value),
            Ok(None) | Err(_) => false,
        }
    }
}

/// A compiled conjunction of query parts.
#[derive(Clone, Debug, Default)]
pub struct Predicate {
    conditions: Vec<Condition>,
}

impl Predicate {
    /// Compiles `parts` with the substring rule.
    #[must_use]
    pub fn new(parts: &[QueryPart]) -> Self {
        Self::with_mode(parts, MatchMode::Substring)
    }

    /// Compiles `parts` with the given rule.
    #[must_use]
    pub fn with_mode(parts: &[QueryPart], mode: MatchMode) -> Self {
        let conditions = parts
            .iter()
            .map(|part| match mode {
                MatchMode::Substring => Condition::substring(part),
                MatchMode::Anchored => Condition::anchored(part),
            })
            .collect();
        Self { conditions }
    }

    /// A predicate matching every dataset.
    #[must_use]
    pub fn match_all() -> Self {
        Self::default()
    }

    /// Returns true if no condition was given.
    #[must_use]
    pub fn is_match_all(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Returns true if the dataset satisfies every condition.
    #[must_use]
    pub fn matches(&self, dataset: &dyn Dataset) -> bool {
        self.conditions.iter().all(|c| c.matches(dataset))
    }

    /// Keeps the datasets that satisfy every condition, in order.
    #[must_use]
    pub fn filter(&self, results: &QueryResults) -> QueryResults {
        if self.is_match_all() {
            return results.clone();
        }
        results
            .iter()
            .filter(|ds| self.matches(ds.as_ref()))
            .cloned()
            .collect()
    }
}
