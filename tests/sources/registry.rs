//! Integration tests for the datasource registry

use std::sync::Arc;

use joinery_foundation::ErrorKind;
use joinery_sources::{DatasourceRef, DatasourceRegistry, TableConfig, TableDatasource};

fn table(name: &str, columns: &[&str]) -> DatasourceRef {
    let config = TableConfig::new(name, columns.iter().copied(), [columns[0]]);
    Arc::new(TableDatasource::new(&config).unwrap())
}

#[test]
fn names_are_sorted_and_unique() {
    let mut registry = DatasourceRegistry::new();
    registry.insert(table("b", &["id"]));
    registry.insert(table("a", &["id"]));
    let replaced = registry.insert(table("b", &["id", "x"]));
    assert!(replaced.is_some());
    assert_eq!(registry.names().collect::<Vec<_>>(), ["a", "b"]);
    assert_eq!(registry.get("b").unwrap().schema().len(), 2);
}

#[test]
fn missing_reference_names_both_sides() {
    let registry = DatasourceRegistry::new();
    let err = registry.require("joined", "people").err().unwrap();
    match err.kind {
        ErrorKind::MissingSource { datasource, referenced } => {
            assert_eq!(datasource, "joined");
            assert_eq!(referenced, "people");
        }
        other => panic!("unexpected error: {other}"),
    }
}
