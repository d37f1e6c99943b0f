//! SQLite backend via `rusqlite`.

use std::path::{Path, PathBuf};

use joinery_foundation::{Error, Result};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};

use super::connection::{RowSet, SqlConnection, SqlConnector, TableInfo};
use super::dialect::SqlDialect;

/// Opens read-only connections to one SQLite database file.
#[derive(Clone, Debug)]
pub struct SqliteConnector {
    path: PathBuf,
}

impl SqliteConnector {
    /// Creates a connector for the database at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SqlConnector for SqliteConnector {
    fn connect(&self) -> Result<Box<dyn SqlConnection>> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&self.path, flags).map_err(|e| {
            Error::connection(format!("{}: {e}", self.path.display()))
        })?;
        Ok(Box::new(SqliteConnection { conn }))
    }
}

struct SqliteConnection {
    conn: Connection,
}

fn render(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
    }
}

impl SqlConnection for SqliteConnection {
    fn query(&mut self, sql: &str) -> Result<RowSet> {
        let sql = sql.trim_end().trim_end_matches(';');
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| Error::statement(e.to_string()))?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut rows = Vec::new();
        let mut cursor = stmt.query([]).map_err(|e| Error::statement(e.to_string()))?;
        while let Some(row) = cursor.next().map_err(|e| Error::statement(e.to_string()))? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                let value = row.get_ref(i).map_err(|e| Error::statement(e.to_string()))?;
                values.push(render(value));
            }
            rows.push(values);
        }
        Ok(RowSet { columns, rows })
    }

    fn describe(&mut self, table: &str) -> Result<TableInfo> {
        let quoted = SqlDialect::Ansi.quote_identifier(table);
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({quoted})"))
            .map_err(|e| Error::statement(e.to_string()))?;
        let described: Vec<(String, i64)> = stmt
            .query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, i64>(5)?)))
            .map_err(|e| Error::statement(e.to_string()))?
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::statement(e.to_string()))?;

        if described.is_empty() {
            // Not a table: fall back to the labels of a full select.
            let stmt = self
                .conn
                .prepare(&format!("SELECT * FROM {quoted}"))
                .map_err(|e| Error::statement(e.to_string()))?;
            let columns = stmt.column_names().into_iter().map(String::from).collect();
            return Ok(TableInfo {
                columns,
                primary_key: Vec::new(),
            });
        }

        let mut keyed: Vec<(i64, String)> = described
            .iter()
            .filter(|(_, pk)| *pk > 0)
            .map(|(name, pk)| (*pk, name.clone()))
            .collect();
        keyed.sort();
        Ok(TableInfo {
            columns: described.into_iter().map(|(name, _)| name).collect(),
            primary_key: keyed.into_iter().map(|(_, name)| name).collect(),
        })
    }
}
