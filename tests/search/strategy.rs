//! Integration tests for the search strategy
//!
//! Tests free-text input resolved into templates and run against a
//! registry of static tables.

use std::sync::Arc;

use joinery_foundation::{ErrorKind, QueryPart, QueryResults};
use joinery_search::{Query, SearchStrategy, execute, merge, search};
use joinery_sources::{Datasource, DatasourceRegistry, TableConfig, TableDatasource};

fn registry() -> DatasourceRegistry {
    let people = TableConfig::new("people", ["id", "first", "last", "town"], ["id"])
        .with_row(["1", "Matthias", "Benkmann", "Berlin"])
        .with_row(["2", "Heinz", "Bergmann", "Bremen"])
        .with_row(["3", "Maria", "Mann", "Bonn"]);
    let rooms = TableConfig::new("rooms", ["room", "label"], ["room"])
        .with_row(["A101", "Berlin office"])
        .with_row(["B201", "Mann's desk"]);
    let mut reg = DatasourceRegistry::new();
    reg.insert(Arc::new(TableDatasource::new(&people).unwrap()));
    reg.insert(Arc::new(TableDatasource::new(&rooms).unwrap()));
    reg
}

fn template(source: &str, parts: &[(&str, &str)]) -> Query {
    Query::new(source, parts.iter().map(|(c, p)| QueryPart::new(*c, *p)).collect())
}

fn strategy() -> SearchStrategy {
    SearchStrategy::new()
        .with_template(1, template("people", &[("last", "${query1}*")]))
        .with_template(1, template("people", &[("town", "${query1}*")]))
        .with_template(1, template("rooms", &[("label", "${query1}*")]))
        .with_template(2, template("people", &[("first", "${query1}*"), ("last", "${query2}*")]))
}

// =============================================================================
// Resolution
// =============================================================================

#[test]
fn extra_words_are_ignored_when_no_template_fits() {
    let queries = strategy().resolve("Heinz, Berg. whatever else");
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].parts[0].pattern(), "Heinz*");
    assert_eq!(queries[0].parts[1].pattern(), "Berg**");
}

#[test]
fn inputs_without_words_resolve_to_nothing_and_stars_collapse() {
    assert!(strategy().resolve(" , ").is_empty());
    assert!(strategy().resolve("").is_empty());

    let stars = strategy().resolve("***");
    assert_eq!(stars.len(), 3);
    assert_eq!(stars[0].parts[0].pattern(), "**");
}

// =============================================================================
// Execution and Merging
// =============================================================================

#[test]
fn rows_found_by_several_templates_appear_once() {
    // "Be" matches last names and towns of the same people.
    let results = search("Be", &strategy(), &registry()).unwrap();
    assert_eq!(results.keys(), ["1", "2", "A101"]);
}

#[test]
fn single_template_results_are_returned_unchanged() {
    let reg = registry();
    let people = reg.get("people").unwrap();
    let direct = people.find(&[QueryPart::new("first", "Ma*"), QueryPart::new("last", "*")]);
    let searched = search("Ma *", &strategy(), &reg).unwrap();
    assert_eq!(searched.keys(), direct.keys());
    assert_eq!(searched.keys(), ["1", "3"]);
}

#[test]
fn template_without_parts_lists_contents() {
    let strategy = SearchStrategy::new().with_template(0, template("rooms", &[]));
    let results = search("anything at all", &strategy, &registry()).unwrap();
    assert_eq!(results.keys(), ["A101", "B201"]);
}

#[test]
fn unknown_datasource_is_an_error() {
    let err = execute(&[template("nobody", &[("x", "y")])], &registry()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingSource { .. }));
}

#[test]
fn merge_of_nothing_is_empty() {
    assert!(merge(Vec::new()).is_empty());
    assert!(merge(vec![QueryResults::new(), QueryResults::new()]).is_empty());
}
