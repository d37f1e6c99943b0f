//! Integration tests for background finds
//!
//! Tests several finds running concurrently on the tokio blocking pool,
//! one of them against SQLite.

use std::sync::Arc;

use joinery_foundation::QueryPart;
use joinery_search::{merge, spawn_find};
use joinery_sources::{DatasourceRef, SqlConfig, SqlDatasource, SqliteConnector, TableConfig, TableDatasource};
use rusqlite::Connection;
use tokio::runtime::Handle;

#[tokio::test(flavor = "multi_thread")]
async fn finds_on_different_sources_run_concurrently() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.db");
    Connection::open(&path)
        .unwrap()
        .execute_batch(
            "CREATE TABLE people (id TEXT PRIMARY KEY, last TEXT);
             INSERT INTO people VALUES ('1', 'Benkmann');
             INSERT INTO people VALUES ('4', 'Bauer');",
        )
        .unwrap();
    let sql: DatasourceRef = Arc::new(
        SqlDatasource::new(&SqlConfig::new("db", "people"), Arc::new(SqliteConnector::new(path)))
            .unwrap(),
    );
    let table: DatasourceRef = Arc::new(
        TableDatasource::new(
            &TableConfig::new("static", ["id", "last"], ["id"]).with_row(["1", "Benkmann"]),
        )
        .unwrap(),
    );

    let handle = Handle::current();
    let query = vec![QueryPart::new("last", "B*")];
    let from_sql = spawn_find(&handle, sql, query.clone());
    let from_table = spawn_find(&handle, table, query);

    let lists = vec![from_sql.await.unwrap(), from_table.await.unwrap()];
    // Rows of different sources are kept apart even for the same person.
    let merged = merge(lists);
    assert_eq!(merged.keys(), ["id#1#", "id#4#", "1"]);
}
