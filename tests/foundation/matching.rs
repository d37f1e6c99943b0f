//! Integration tests for wildcard predicates
//!
//! Tests both matching rules against records and the choice of the most
//! restrictive predicate.

use std::collections::HashMap;
use std::sync::Arc;

use joinery_foundation::{
    Dataset, MatchMode, Predicate, QueryPart, QueryResults, Record, Schema, most_restrictive,
};

fn record(last: Option<&str>) -> Record {
    let schema = Arc::new(Schema::from_columns("people", ["id", "last"]).unwrap());
    let mut values = HashMap::new();
    values.insert("id".to_string(), "1".to_string());
    if let Some(last) = last {
        values.insert("last".to_string(), last.to_string());
    }
    Record::new(schema, values, "1")
}

// =============================================================================
// Substring Rule
// =============================================================================

#[test]
fn substring_rule_ignores_star_positions() {
    let row = record(Some("Benkmann"));
    for pattern in ["kma", "*KMA*", "benk*", "*mann", "Benkmann"] {
        assert!(Predicate::new(&[QueryPart::new("last", pattern)]).matches(&row), "{pattern}");
    }
    assert!(!Predicate::new(&[QueryPart::new("last", "xyz")]).matches(&row));
}

#[test]
fn null_and_unknown_columns_never_match() {
    let row = record(None);
    assert!(!Predicate::new(&[QueryPart::new("last", "*")]).matches(&row));
    assert!(!Predicate::new(&[QueryPart::new("nope", "*")]).matches(&row));
    assert!(row.get("nope").is_err());
    assert_eq!(row.get("last"), Ok(None));
}

#[test]
fn empty_predicate_matches_everything() {
    let rows: QueryResults = [record(None), record(Some("x"))]
        .into_iter()
        .map(Record::into_ref)
        .collect();
    assert!(Predicate::match_all().is_match_all());
    assert_eq!(Predicate::new(&[]).filter(&rows).len(), 2);
}

// =============================================================================
// Anchored Rule
// =============================================================================

#[test]
fn anchored_rule_respects_star_positions() {
    let row = record(Some("Benkmann"));
    let anchored = |p: &str| Predicate::with_mode(&[QueryPart::new("last", p)], MatchMode::Anchored);
    assert!(anchored("benkmann").matches(&row));
    assert!(anchored("Benk*").matches(&row));
    assert!(anchored("*MANN").matches(&row));
    assert!(anchored("*kma*").matches(&row));
    assert!(!anchored("kma").matches(&row));
    assert!(!anchored("mann*").matches(&row));
}

// =============================================================================
// Most Restrictive
// =============================================================================

#[test]
fn most_restrictive_prefers_fewer_stars_then_longer_literals() {
    let parts = [
        QueryPart::new("a", "*Benkmann*"),
        QueryPart::new("b", "Mann"),
        QueryPart::new("c", "Benk*"),
    ];
    assert_eq!(most_restrictive(&parts).unwrap().column(), "b");
    assert_eq!(most_restrictive(&parts[..1]).unwrap().column(), "a");
    assert!(most_restrictive(&[]).is_none());
}
