//! Integration tests for the Column Transformer
//!
//! Tests computed pseudo-columns on wrapped sources and late registration.

use joinery_compose::{ColumnTransformer, Values};
use joinery_foundation::QueryPart;
use joinery_sources::Datasource;

use crate::registry;

fn full_name(values: &dyn Values) -> String {
    format!("{} {}", values.string("first"), values.string("last"))
}

#[test]
fn pseudo_columns_join_the_schema() {
    let reg = registry();
    let transformer = ColumnTransformer::new().with_function("full_name", full_name);
    let staff = transformer.wrap(reg.get("staff_a").unwrap()).named("staff_plus");
    assert_eq!(staff.name(), "staff_plus");
    assert_eq!(staff.schema().columns(), &["id", "first", "last", "full_name"]);

    let rows = staff.find(&[QueryPart::new("last", "Berg*")]);
    assert_eq!(rows.get(0).unwrap().value("full_name").as_deref(), Some("Heinz Bergmann"));
}

#[test]
fn pseudo_column_predicates() {
    let reg = registry();
    let transformer = ColumnTransformer::new().with_function("full_name", full_name);
    let staff = transformer.wrap(reg.get("staff_a").unwrap());

    // Only pseudo-columns: the whole table is scanned.
    assert_eq!(staff.find(&[QueryPart::new("full_name", "*matthias b*")]).keys(), ["1"]);

    // Mixed: stored predicates go to the source first.
    let query = [QueryPart::new("last", "B*"), QueryPart::new("full_name", "heinz")];
    assert_eq!(staff.find(&query).keys(), ["2"]);
}

#[test]
fn functions_registered_later_are_seen_by_earlier_rows() {
    let reg = registry();
    let transformer = ColumnTransformer::new();
    let rows = transformer.transform_results(&reg.get("staff_a").unwrap().contents());
    let row = rows.get(0).unwrap();
    assert_eq!(row.value("initials"), None);

    transformer.add("initials", |v: &dyn Values| {
        let first = v.string("first").chars().next().unwrap_or_default();
        let last = v.string("last").chars().next().unwrap_or_default();
        format!("{first}{last}")
    });
    assert_eq!(row.value("initials").as_deref(), Some("MB"));
    assert!(transformer.has_pseudo_column("initials"));
}

#[test]
fn clones_share_functions_across_threads() {
    let transformer = ColumnTransformer::new();
    let shared = transformer.clone();
    std::thread::spawn(move || shared.add("flag", |v: &dyn Values| v.boolean("active").to_string()))
        .join()
        .unwrap();
    assert_eq!(transformer.pseudo_columns(), ["flag"]);

    let reg = registry();
    let staff = transformer.wrap(reg.get("staff_a").unwrap());
    let row = staff.datasets_by_key(&["1".to_string()]);
    assert_eq!(row.get(0).unwrap().value("flag").as_deref(), Some("false"));
}
