//! Session state for the REPL.
//!
//! A session is a built datasource registry plus the search strategy from
//! the same configuration.

use std::path::Path;

use joinery_foundation::{QueryResults, Result};
use joinery_search::SearchStrategy;
use joinery_sources::{DatasourceRef, DatasourceRegistry};

use crate::config::Config;
use crate::loader::{build_registry, build_registry_lenient};

/// Loaded datasources and search templates.
#[derive(Debug, Default)]
pub struct Session {
    /// Datasources by name.
    registry: DatasourceRegistry,

    /// Templates for free-text searches.
    strategy: SearchStrategy,
}

impl Session {
    /// Creates a session without datasources.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session from parts.
    #[must_use]
    pub fn with_parts(registry: DatasourceRegistry, strategy: SearchStrategy) -> Self {
        Self { registry, strategy }
    }

    /// Loads a configuration file; SQLite paths are relative to it.
    ///
    /// With `lenient`, datasources that fail to build are skipped instead
    /// of failing the load.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed, or, unless `lenient`,
    /// if any datasource fails to build.
    pub fn load(path: &Path, lenient: bool) -> Result<Self> {
        let config = Config::load(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let registry = if lenient {
            build_registry_lenient(&config, base_dir)
        } else {
            build_registry(&config, base_dir)
                .map_err(|e| e.with_source(path.display().to_string()))?
        };
        Ok(Self::with_parts(registry, config.search))
    }

    /// Returns the registry.
    #[must_use]
    pub const fn registry(&self) -> &DatasourceRegistry {
        &self.registry
    }

    /// Returns the search strategy.
    #[must_use]
    pub const fn strategy(&self) -> &SearchStrategy {
        &self.strategy
    }

    /// Looks up a datasource.
    ///
    /// # Errors
    ///
    /// Fails if no datasource has that name.
    pub fn datasource(&self, name: &str) -> Result<DatasourceRef> {
        self.registry.require("session", name)
    }

    /// Runs a free-text search.
    ///
    /// # Errors
    ///
    /// Fails if a search template names an unknown datasource.
    pub fn search(&self, input: &str) -> Result<QueryResults> {
        joinery_search::search(input, &self.strategy, &self.registry)
    }
}
