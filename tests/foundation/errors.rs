//! Integration tests for error reporting
//!
//! Tests error kinds, context, and the configuration-error classification.

use joinery_foundation::{Error, ErrorContext, ErrorKind, Schema};

#[test]
fn duplicate_columns_collide() {
    let err = Schema::from_columns("people", ["id", "last", "id"]).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::SchemaCollision { ref datasource, ref column } if datasource == "people" && column == "id"
    ));
}

#[test]
fn messages_name_the_datasource() {
    let err = Error::missing_source("joined", "people");
    assert_eq!(
        err.to_string(),
        "datasource \"joined\": referenced datasource \"people\" is missing or defined incorrectly"
    );
    assert_eq!(Error::empty_schema("t").to_string(), "datasource \"t\": schema is empty");
}

#[test]
fn configuration_errors_are_told_apart() {
    assert!(Error::missing_match("a").is_configuration_error());
    assert!(Error::config("bad yaml").is_configuration_error());
    assert!(!Error::connection("refused").is_configuration_error());
    assert!(!Error::statement("syntax").is_configuration_error());
    let io: Error = std::io::Error::other("disk").into();
    assert!(matches!(io.kind, ErrorKind::Io(_)));
    assert!(!io.is_configuration_error());
}

#[test]
fn context_is_rendered() {
    let context = ErrorContext::new()
        .with_source("sources.yaml")
        .with_index(2)
        .with_frame("joined");
    let err = Error::missing_key("people").with_context(context.clone());
    assert_eq!(err.context.as_ref().and_then(|c| c.index), Some(2));
    assert_eq!(context.to_string(), "in sources.yaml (datasource #2)\n  building joined\n");
}
