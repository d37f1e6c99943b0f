//! Name to datasource mapping.

use std::fmt;

use joinery_foundation::{Error, Result};

use crate::datasource::DatasourceRef;

/// Registry of built datasources, keyed by name.
///
/// Backed by a persistent ordered map: cloning is cheap and snapshots stay
/// valid while a loader keeps inserting.
#[derive(Clone, Default)]
pub struct DatasourceRegistry {
    sources: im::OrdMap<String, DatasourceRef>,
}

impl DatasourceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `source` under its own name, replacing any earlier entry.
    pub fn insert(&mut self, source: DatasourceRef) -> Option<DatasourceRef> {
        let name = source.name().to_string();
        self.sources.insert(name, source)
    }

    /// Removes the entry for `name`.
    pub fn remove(&mut self, name: &str) -> Option<DatasourceRef> {
        self.sources.remove(name)
    }

    /// Looks up a datasource.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<DatasourceRef> {
        self.sources.get(name).cloned()
    }

    /// Looks up a datasource referenced by `owner`.
    ///
    /// # Errors
    ///
    /// Returns a missing source error naming `owner` and `name`.
    pub fn require(&self, owner: &str, name: &str) -> Result<DatasourceRef> {
        self.get(name)
            .ok_or_else(|| Error::missing_source(owner, name))
    }

    /// Returns true if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    /// Returns the number of datasources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl fmt::Debug for DatasourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
