//! Integration tests for Layer 2: Composition
//!
//! Tests operators stacked on top of each other and the Column Transformer.

mod operators;
mod transformer;

use std::sync::Arc;

use joinery_sources::{DatasourceRegistry, TableConfig, TableDatasource};

/// Two staff tables with permuted columns, corrections, phones and
/// nicknames.
pub fn registry() -> DatasourceRegistry {
    let tables = [
        TableConfig::new("staff_a", ["id", "first", "last"], ["id"])
            .with_row(["1", "Matthias", "Benkmann"])
            .with_row(["2", "Heinz", "Bergmann"]),
        TableConfig::new("staff_b", ["last", "first", "id"], ["id"])
            .with_row(["Mann", "Thomas", "3"]),
        TableConfig::new("fixes", ["id", "first", "last"], ["id"])
            .with_row(["2", "Heinrich", "Bergmann"]),
        TableConfig::new("phones", ["pid", "phone"], ["phone"])
            .with_row(["1", "0815"])
            .with_row(["3", "4711"])
            .with_row(["3", "4712"]),
        TableConfig::new("nicknames", ["id", "nick", "first"], ["id"])
            .with_row(["1", "mb", "Matze"])
            .with_row(["3", "tm", ""]),
    ];
    let mut registry = DatasourceRegistry::new();
    for config in &tables {
        registry.insert(Arc::new(TableDatasource::new(config).unwrap()));
    }
    registry
}
