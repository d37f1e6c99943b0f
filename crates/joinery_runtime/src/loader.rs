//! Building a datasource registry from configuration.

use std::path::Path;
use std::sync::Arc;

use joinery_compose::{
    AttachDatasource, OverlayDatasource, PreferDatasource, ReshapeDatasource, UnionDatasource,
};
use joinery_foundation::{ErrorContext, Result};
use joinery_sources::{
    DatasourceRef, DatasourceRegistry, SqlDatasource, SqliteConnector, TableDatasource,
};
use tracing::{error, info};

use crate::config::{Config, SourceConfig};

/// Builds one datasource against the sources registered so far.
///
/// Relative SQLite paths are resolved against `base_dir`.
///
/// # Errors
///
/// Returns the configuration error of the datasource.
pub fn build_source(
    config: &SourceConfig,
    registry: &DatasourceRegistry,
    base_dir: &Path,
) -> Result<DatasourceRef> {
    let source: DatasourceRef = match config {
        SourceConfig::Table(c) => Arc::new(TableDatasource::new(c)?),
        SourceConfig::Sql(c) => {
            let connector = Arc::new(SqliteConnector::new(base_dir.join(&c.database)));
            Arc::new(SqlDatasource::new(&c.sql, connector)?)
        }
        SourceConfig::Union(c) => Arc::new(UnionDatasource::new(c, registry)?),
        SourceConfig::Attach(c) => Arc::new(AttachDatasource::new(c, registry)?),
        SourceConfig::Overlay(c) => Arc::new(OverlayDatasource::new(c, registry)?),
        SourceConfig::Prefer(c) => Arc::new(PreferDatasource::new(c, registry)?),
        SourceConfig::Reshape(c) => Arc::new(ReshapeDatasource::new(c, registry)?),
    };
    Ok(source)
}

/// Builds every datasource in declaration order, stopping at the first
/// failure.
///
/// # Errors
///
/// Returns the first configuration error, with the position of the failing
/// definition as context.
pub fn build_registry(config: &Config, base_dir: &Path) -> Result<DatasourceRegistry> {
    let mut registry = DatasourceRegistry::new();
    for (index, definition) in config.datasources.iter().enumerate() {
        let source = build_source(definition, &registry, base_dir).map_err(|e| {
            e.with_context(ErrorContext::new().with_index(index).with_frame(definition.name()))
        })?;
        info!(datasource = definition.name(), kind = definition.kind(), "datasource built");
        registry.insert(source);
    }
    Ok(registry)
}

/// Builds every datasource it can.
///
/// A failing definition is logged and its name left unregistered, which
/// also removes an earlier definition of the same name. Sources that
/// reference it fail in turn.
#[must_use]
pub fn build_registry_lenient(config: &Config, base_dir: &Path) -> DatasourceRegistry {
    let mut registry = DatasourceRegistry::new();
    for definition in &config.datasources {
        match build_source(definition, &registry, base_dir) {
            Ok(source) => {
                info!(datasource = definition.name(), kind = definition.kind(), "datasource built");
                registry.insert(source);
            }
            Err(e) => {
                error!(datasource = definition.name(), error = %e, "datasource skipped");
                registry.remove(definition.name());
            }
        }
    }
    registry
}
