//! Integration tests for stacked operators
//!
//! Builds union, prefer, attach, overlay and reshape on top of each other
//! and queries the top of the stack.

use std::sync::Arc;

use joinery_compose::{
    AttachConfig, AttachDatasource, OverlayConfig, OverlayDatasource, PreferConfig,
    PreferDatasource, ReshapeConfig, ReshapeDatasource, UnionConfig, UnionDatasource,
};
use joinery_foundation::{ErrorKind, QueryPart};
use joinery_sources::{Datasource, DatasourceRegistry};

use crate::registry;

/// `staff` = union of both staff tables, `staff_fixed` = staff with
/// corrections preferred, `with_phone` = staff_fixed with one phone
/// attached.
fn stacked() -> DatasourceRegistry {
    let mut reg = registry();
    let staff = UnionDatasource::new(&UnionConfig::new("staff", "staff_a", "staff_b"), &reg).unwrap();
    reg.insert(Arc::new(staff));
    let fixed = PreferDatasource::new(&PreferConfig::new("staff_fixed", "staff", "fixes"), &reg).unwrap();
    reg.insert(Arc::new(fixed));
    let config = AttachConfig::new("with_phone", "staff_fixed", "phones").with_match("id", "pid");
    reg.insert(Arc::new(AttachDatasource::new(&config, &reg).unwrap()));
    reg
}

fn find(reg: &DatasourceRegistry, source: &str, query: &[(&str, &str)]) -> Vec<Option<String>> {
    let parts: Vec<QueryPart> = query.iter().map(|(c, p)| QueryPart::new(*c, *p)).collect();
    let source = reg.get(source).unwrap();
    source.find(&parts).iter().map(|ds| ds.value("first")).collect()
}

// =============================================================================
// Union and Prefer
// =============================================================================

#[test]
fn union_reads_both_sides_in_the_first_schema_order() {
    let reg = stacked();
    let staff = reg.get("staff").unwrap();
    assert_eq!(staff.schema().columns(), &["id", "first", "last"]);
    assert_eq!(staff.find(&[QueryPart::new("last", "*mann")]).keys(), ["1", "2", "3"]);
}

#[test]
fn preferred_rows_hide_base_rows_with_the_same_key() {
    let reg = stacked();
    assert_eq!(find(&reg, "staff_fixed", &[("first", "Hein*")]), [Some("Heinrich".to_string())]);
    // The base row still matches "Heinz", but its key is known to the preferred side.
    assert!(find(&reg, "staff_fixed", &[("first", "Heinz")]).is_empty());
    assert_eq!(find(&reg, "staff_fixed", &[("last", "Mann")]), [Some("Thomas".to_string())]);
}

#[test]
fn union_of_different_schemas_is_rejected() {
    let reg = registry();
    let err = UnionDatasource::new(&UnionConfig::new("bad", "staff_a", "phones"), &reg).unwrap_err();
    match err.kind {
        ErrorKind::SchemaMismatch { missing_in_first, missing_in_second, .. } => {
            assert_eq!(missing_in_first, ["pid", "phone"]);
            assert_eq!(missing_in_second, ["id", "first", "last"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

// =============================================================================
// Attach
// =============================================================================

#[test]
fn attach_over_prefer_takes_the_first_matching_phone() {
    let reg = stacked();
    let with_phone = reg.get("with_phone").unwrap();
    let rows = with_phone.find(&[QueryPart::new("last", "Mann")]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.get(0).unwrap().value("phones__phone").as_deref(), Some("4711"));

    let rows = with_phone.find(&[QueryPart::new("id", "2")]);
    assert_eq!(rows.get(0).unwrap().value("first").as_deref(), Some("Heinrich"));
    assert_eq!(rows.get(0).unwrap().value("phones__phone"), None);
}

#[test]
fn attached_column_predicates_start_at_the_secondary_source() {
    let reg = stacked();
    let with_phone = reg.get("with_phone").unwrap();
    let rows = with_phone.find(&[QueryPart::new("phones__phone", "4712")]);
    assert_eq!(rows.keys(), ["3"]);
    assert_eq!(rows.get(0).unwrap().value("phones__phone").as_deref(), Some("4712"));

    // A predicate on both sides filters the joined row.
    let rows = with_phone.find(&[QueryPart::new("id", "3"), QueryPart::new("phones__phone", "4712")]);
    assert_eq!(rows.get(0).unwrap().value("phones__phone").as_deref(), Some("4712"));
}

#[test]
fn attach_by_key_keeps_primary_keys() {
    let reg = stacked();
    let with_phone = reg.get("with_phone").unwrap();
    let rows = with_phone.datasets_by_key(&["1".to_string(), "2".to_string()]);
    assert_eq!(rows.keys(), ["2", "1"]);
    assert!(with_phone.contents().is_empty());
}

// =============================================================================
// Overlay
// =============================================================================

fn overlay(mode: &str) -> OverlayDatasource {
    let reg = stacked();
    let config = OverlayConfig::new("nicked", mode, "staff", "nicknames").with_match("id", "id");
    OverlayDatasource::new(&config, &reg).unwrap()
}

#[test]
fn overlay_schema_appends_new_columns_once() {
    assert_eq!(overlay("SO").schema().columns(), &["id", "first", "last", "nick"]);
}

#[test]
fn overlay_wins_and_empty_values_fall_through() {
    let nicked = overlay("So");
    let row = nicked.find(&[QueryPart::new("last", "Benk*")]);
    assert_eq!(row.get(0).unwrap().value("first").as_deref(), Some("Matze"));

    let row = nicked.find(&[QueryPart::new("nick", "tm")]);
    assert_eq!(row.keys(), ["3"]);
    assert_eq!(row.get(0).unwrap().value("first").as_deref(), Some("Thomas"));

    let strict = overlay("SO");
    let row = strict.find(&[QueryPart::new("nick", "tm")]);
    assert_eq!(row.get(0).unwrap().value("first").as_deref(), Some(""));
}

#[test]
fn source_wins_keeps_base_values() {
    let nicked = overlay("OS");
    let row = nicked.find(&[QueryPart::new("last", "Benk*")]);
    assert_eq!(row.get(0).unwrap().value("first").as_deref(), Some("Matthias"));
    assert_eq!(row.get(0).unwrap().value("nick").as_deref(), Some("mb"));
}

#[test]
fn common_column_predicates_probe_both_sides() {
    let nicked = overlay("SO");
    assert_eq!(nicked.find(&[QueryPart::new("first", "Matze")]).keys(), ["1"]);
    // The base value is hidden by the overlay.
    assert!(nicked.find(&[QueryPart::new("first", "Matthias")]).is_empty());
}

#[test]
fn invalid_mode_is_rejected() {
    let reg = stacked();
    let config = OverlayConfig::new("x", "SS", "staff", "nicknames").with_match("id", "id");
    assert!(matches!(
        OverlayDatasource::new(&config, &reg).unwrap_err().kind,
        ErrorKind::InvalidMode { .. }
    ));
}

// =============================================================================
// Reshape
// =============================================================================

#[test]
fn reshape_on_top_of_attach() {
    let reg = stacked();
    let config = ReshapeConfig::new("directory", "with_phone")
        .with_drop("first")
        .with_rename("phones__phone", "phone")
        .with_drop("phones__pid")
        .with_add("note");
    let directory = ReshapeDatasource::new(&config, &reg).unwrap();
    assert_eq!(directory.schema().columns(), &["id", "last", "note", "phone"]);

    let rows = directory.find(&[QueryPart::new("phone", "4711")]);
    assert_eq!(rows.keys(), ["3"]);
    let row = rows.get(0).unwrap();
    assert_eq!(row.value("last").as_deref(), Some("Mann"));
    assert_eq!(row.get("note"), Ok(None));
    assert!(row.get("first").is_err());

    assert!(directory.find(&[QueryPart::new("note", "*")]).is_empty());
}
