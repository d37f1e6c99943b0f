//! Integration tests for the REPL over a loaded configuration

use joinery_foundation::Result;
use joinery_runtime::{LineEditor, ReadResult, Repl, Session};

use crate::{CONFIG, workspace};

/// Replays fixed lines, then reports end of input.
struct Script(std::vec::IntoIter<String>);

impl Script {
    fn new(lines: &[&str]) -> Self {
        Self(lines.iter().map(ToString::to_string).collect::<Vec<_>>().into_iter())
    }
}

impl LineEditor for Script {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadResult> {
        Ok(self.0.next().map_or(ReadResult::Eof, ReadResult::Line))
    }

    fn add_history(&mut self, _line: &str) {}

    fn set_keywords(&mut self, _keywords: Vec<String>) {}
}

fn repl(lines: &[&str]) -> (tempfile::TempDir, Repl<Script>) {
    let (dir, path) = workspace(CONFIG);
    let session = Session::load(&path, false).unwrap();
    (dir, Repl::with_editor(Script::new(lines), session).without_banner())
}

#[test]
fn search_output_is_a_table_over_all_searched_columns() {
    let (_dir, repl) = repl(&[]);
    let out = repl.eval("Mann").unwrap().unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "id | first | last | rooms__person | rooms__room");
    assert_eq!(lines[2], "3  | Maria | Mann | 3             | C301");
    assert_eq!(lines[3], "(1 row)");
}

#[test]
fn commands_reach_every_datasource() {
    let (_dir, repl) = repl(&[]);
    let sources = repl.eval(":sources").unwrap().unwrap();
    assert!(sources.contains("staff (3 columns)"));
    assert!(sources.contains("phonebook (5 columns)"));

    let out = repl.eval(":find staff last=B* first=*ei*").unwrap().unwrap();
    assert!(out.contains("Heinz") && out.ends_with("(1 row)"));

    let out = repl.eval(":key corrected id#2#").unwrap().unwrap();
    assert!(out.contains("Heinrich"));

    assert!(repl.eval(":contents directory").unwrap().unwrap().ends_with("(0 rows)"));
}

#[test]
fn run_stops_at_quit() {
    let (_dir, mut repl) = repl(&["Berg", "  ", ":schema rooms", ":q", ":bogus"]);
    repl.run().unwrap();
    assert_eq!(repl.session().registry().len(), 6);
}
