//! Integration tests for the SQL datasource
//!
//! Tests SQLite-backed tables and views through the generated statements.

use std::sync::Arc;

use joinery_foundation::{QueryPart, decode_key};
use joinery_sources::{Datasource, SqlConfig, SqlConnector, SqlDatasource, SqlDialect, SqliteConnector};
use rusqlite::Connection;
use tempfile::TempDir;

fn database() -> (TempDir, Arc<dyn SqlConnector>) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("office.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        r#"CREATE TABLE rooms (building TEXT, number TEXT, label TEXT, PRIMARY KEY (building, number));
           INSERT INTO rooms VALUES ('A', '101', 'Kitchen');
           INSERT INTO rooms VALUES ('A', '102', 'Meeting 50%');
           INSERT INTO rooms VALUES ('B', '101', 'it''s the lab');
           CREATE VIEW kitchens AS SELECT * FROM rooms WHERE label LIKE 'Kit%';"#,
    )
    .unwrap();
    (dir, Arc::new(SqliteConnector::new(path)))
}

// =============================================================================
// Tables
// =============================================================================

#[test]
fn compound_primary_key_in_declared_order() {
    let (_dir, connector) = database();
    let rooms = SqlDatasource::new(&SqlConfig::new("rooms", "rooms"), connector).unwrap();
    assert_eq!(rooms.key_columns(), &["building", "number"]);

    let found = rooms.find(&[QueryPart::new("label", "kitchen")]);
    assert_eq!(found.keys(), ["building#A#number#101#"]);
    assert_eq!(
        decode_key(found.get(0).unwrap().key()),
        [
            ("building".to_string(), "A".to_string()),
            ("number".to_string(), "101".to_string())
        ]
    );
}

#[test]
fn literals_with_quotes_and_percent_signs() {
    let (_dir, connector) = database();
    let rooms = SqlDatasource::new(&SqlConfig::new("rooms", "rooms"), connector).unwrap();
    assert_eq!(rooms.find(&[QueryPart::new("label", "IT'S*")]).len(), 1);
    assert_eq!(rooms.find(&[QueryPart::new("label", "*50%")]).len(), 1);
    assert_eq!(rooms.find(&[QueryPart::new("label", "*5_%")]).len(), 0);
}

#[test]
fn key_lookup_returns_each_row_once() {
    let (_dir, connector) = database();
    let rooms = SqlDatasource::new(&SqlConfig::new("rooms", "rooms"), connector).unwrap();
    let keys = rooms.contents().keys();
    assert_eq!(keys.len(), 3);
    let again = rooms.datasets_by_key(&[keys[2].clone(), keys[0].clone(), keys[2].clone()]);
    assert_eq!(again.len(), 2);
}

#[test]
fn every_dialect_runs_against_sqlite() {
    let (_dir, connector) = database();
    for dialect in [SqlDialect::Ansi, SqlDialect::Oracle, SqlDialect::PervasiveSql] {
        let config = SqlConfig::new("rooms", "rooms").with_dialect(dialect);
        let rooms = SqlDatasource::new(&config, connector.clone()).unwrap();
        assert_eq!(rooms.find(&[QueryPart::new("label", "MEETING*")]).len(), 1, "{dialect}");
        assert_eq!(rooms.dialect(), dialect);
    }
}

// =============================================================================
// Views
// =============================================================================

#[test]
fn views_need_declared_keys() {
    let (_dir, connector) = database();
    assert!(SqlDatasource::new(&SqlConfig::new("k", "kitchens"), connector.clone()).is_err());

    let config = SqlConfig::new("k", "kitchens").with_key(["building", "number"]);
    let kitchens = SqlDatasource::new(&config, connector).unwrap();
    assert_eq!(kitchens.schema().columns(), &["building", "number", "label"]);
    assert_eq!(kitchens.contents().len(), 1);
}
