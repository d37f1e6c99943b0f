//! Cross-layer integration tests for Joinery
//!
//! Loads configuration files that combine SQLite tables, static tables and
//! composition operators, then searches them through a session and the REPL.

mod repl;

use std::fs;
use std::path::PathBuf;

use rusqlite::Connection;
use tempfile::TempDir;

/// Staff in SQLite, rooms and corrections as static tables, and a search
/// strategy over the composed view.
pub const CONFIG: &str = r#"
datasources:
  - type: sql
    name: staff
    database: data/staff.db
    table: staff
  - type: table
    name: corrections
    schema: [id, first, last]
    key: [id]
    rows:
      - ["2", "Heinrich", "Bergmann"]
  - type: table
    name: rooms
    schema: [person, room]
    key: [room]
    rows:
      - ["1", "A101"]
      - { person: "3", room: "C301" }
  - type: overlay
    name: corrected
    mode: so
    source: staff
    overlay: corrections
    match: [[id, id]]
  - type: attach
    name: directory
    source: corrected
    attach: rooms
    match: [[id, person]]
  - type: reshape
    name: phonebook
    source: directory
    drop: [first]
    rename: [[rooms__room, room]]
    add: [phone]
search:
  1:
    - datasource: directory
      query: [[last, "${query1}*"]]
    - datasource: directory
      query: [[rooms__room, "${query1}*"]]
  2:
    - datasource: directory
      query: [[first, "${query1}*"], [last, "${query2}*"]]
"#;

/// Writes `config` and the staff database into a fresh directory and
/// returns the directory and the config path.
pub fn workspace(config: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("data")).unwrap();
    let conn = Connection::open(dir.path().join("data/staff.db")).unwrap();
    conn.execute_batch(
        "CREATE TABLE staff (id TEXT PRIMARY KEY, first TEXT, last TEXT);
         INSERT INTO staff VALUES ('1', 'Matthias', 'Benkmann');
         INSERT INTO staff VALUES ('2', 'Heinz', 'Bergmann');
         INSERT INTO staff VALUES ('3', 'Maria', 'Mann');",
    )
    .unwrap();
    let path = dir.path().join("joinery.yaml");
    fs::write(&path, config).unwrap();
    (dir, path)
}
