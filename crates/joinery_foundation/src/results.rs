//! Materialized query results.
//!
//! Results are persistent vectors of shared datasets, so cloning and
//! concatenation share structure instead of copying rows.

use std::fmt;
use std::hash::Hash;
use std::iter::FromIterator;

use crate::dataset::DatasetRef;

/// An ordered, fully materialized list of datasets.
///
/// Every call to [`QueryResults::iter`] yields an independent cursor.
#[derive(Clone, Default)]
pub struct QueryResults(im::Vector<DatasetRef>);

impl QueryResults {
    /// Creates an empty result list.
    #[must_use]
    pub fn new() -> Self {
        Self(im::Vector::new())
    }

    /// Returns the number of datasets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no datasets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gets a dataset by position.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&DatasetRef> {
        self.0.get(index)
    }

    /// Appends a dataset.
    pub fn push(&mut self, dataset: DatasetRef) {
        self.0.push_back(dataset);
    }

    /// Appends every dataset of `other`.
    pub fn append(&mut self, other: QueryResults) {
        self.0.append(other.0);
    }

    /// Returns `self` followed by `other`.
    #[must_use]
    pub fn concat(&self, other: &QueryResults) -> Self {
        let mut out = self.0.clone();
        out.append(other.0.clone());
        Self(out)
    }

    /// Returns an iterator over the datasets.
    pub fn iter(&self) -> impl Iterator<Item = &DatasetRef> {
        self.0.iter()
    }

    /// Returns the keys of all datasets, in order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.0.iter().map(|ds| ds.key().to_string()).collect()
    }
}

impl fmt::Debug for QueryResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl FromIterator<DatasetRef> for QueryResults {
    fn from_iter<I: IntoIterator<Item = DatasetRef>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<DatasetRef> for QueryResults {
    fn extend<I: IntoIterator<Item = DatasetRef>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for QueryResults {
    type Item = DatasetRef;
    type IntoIter = im::vector::ConsumingIter<DatasetRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryResults {
    type Item = &'a DatasetRef;
    type IntoIter = im::vector::Iter<'a, DatasetRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Identity used to deduplicate rows of different datasources: the
/// concrete row type plus its key.
#[must_use]
pub fn type_and_key(dataset: &DatasetRef) -> (&'static str, String) {
    (dataset.type_name(), dataset.key().to_string())
}

/// An insertion-ordered result set that drops datasets whose identity was
/// already seen.
///
/// The identity is computed by a caller-supplied function.
pub struct QueryResultsSet<K, F>
where
    K: Clone + Eq + Hash,
    F: Fn(&DatasetRef) -> K,
{
    identity: F,
    seen: im::HashSet<K>,
    results: QueryResults,
}

impl<K, F> QueryResultsSet<K, F>
where
    K: Clone + Eq + Hash,
    F: Fn(&DatasetRef) -> K,
{
    /// Creates an empty set using `identity` for equality.
    #[must_use]
    pub fn new(identity: F) -> Self {
        Self {
            identity,
            seen: im::HashSet::new(),
            results: QueryResults::new(),
        }
    }

    /// Adds a dataset; returns false if an equal one is already present.
    pub fn insert(&mut self, dataset: DatasetRef) -> bool {
        let id = (self.identity)(&dataset);
        if self.seen.contains(&id) {
            return false;
        }
        self.seen.insert(id);
        self.results.push(dataset);
        true
    }

    /// Adds every dataset of `results`.
    pub fn insert_all(&mut self, results: &QueryResults) {
        for ds in results {
            self.insert(ds.clone());
        }
    }

    /// Returns the number of distinct datasets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true if nothing was inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Finishes the set, keeping first-insertion order.
    #[must_use]
    pub fn into_results(self) -> QueryResults {
        self.results
    }
}
