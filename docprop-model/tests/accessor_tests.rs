mod common;

use docprop_model::{
    Accessor, ModelError, PropertyOptions, Schema, Value, changed_name, predicate_name, setter_name,
};
use pretty_assertions::assert_eq;

// ── Method names ─────────────────────────────────────────────────

#[test]
fn method_name_forms() {
    assert_eq!(setter_name("title"), "title=");
    assert_eq!(changed_name("title"), "title_changed?");
    assert_eq!(predicate_name("done"), "done?");
}

#[test]
fn article_accessor_table() {
    let schema = common::article_schema();
    let mut names: Vec<&str> = schema.accessor_names().collect();
    names.sort_unstable();

    for expected in [
        "title",
        "title=",
        "title_changed?",
        "headline",
        "headline=",
        "headline_changed?",
        "published?",
        "slug",
    ] {
        assert!(names.contains(&expected), "missing accessor {expected}");
    }
    assert!(!names.contains(&"slug="));
    assert!(!names.contains(&"title?"));
    assert!(names.iter().all(|name| schema.accessor(name).is_some()));
}

#[test]
fn every_accessor_points_at_a_declared_field() {
    let schema = common::article_schema();
    let declared = schema.property_names();
    for name in schema.accessor_names() {
        let accessor: &Accessor = schema.accessor(name).unwrap();
        assert!(declared.contains(&accessor.field()), "{name} -> {}", accessor.field());
    }
}

// ── Getters ──────────────────────────────────────────────────────

#[test]
fn getter_returns_stored_value() {
    let doc = common::article([("title", "Hello")]);
    assert_eq!(doc.get("title").unwrap(), Some(&Value::from("Hello")));
}

#[test]
fn alias_getter_reads_field() {
    let doc = common::article([("title", "Hello")]);
    assert_eq!(doc.get("headline").unwrap(), doc.get("title").unwrap());
}

#[test]
fn getter_of_absent_property_is_none() {
    let doc = common::empty_article();
    assert_eq!(doc.get("title").unwrap(), None);
}

#[test]
fn getter_does_not_coerce() {
    let doc = common::article([("title", Value::Integer(42))]);
    assert_eq!(doc.get("title").unwrap(), Some(&Value::Integer(42)));
}

#[test]
fn undeclared_keys_have_no_accessors() {
    let doc = common::article([("extra", "kept")]);
    assert_eq!(doc.get_key("extra"), Some(&Value::from("kept")));

    let err = doc.get("extra").unwrap_err();
    assert!(matches!(
        err,
        ModelError::UnknownAccessor { model, accessor } if model == "Article" && accessor == "extra"
    ));
}

#[test]
fn unknown_setter_reports_method_name() {
    let mut doc = common::empty_article();
    let err = doc.set("missing", 1).unwrap_err();
    assert_eq!(err.to_string(), "unknown accessor `missing=` on model Article");
}

// ── Predicates ───────────────────────────────────────────────────

#[test]
fn predicate_follows_default() {
    let doc = common::empty_article();
    assert!(!doc.predicate("published").unwrap());
}

#[test]
fn predicate_truthiness() {
    let cases = [
        (Value::Bool(true), true),
        (Value::Bool(false), false),
        (Value::Null, false),
        (Value::from("false"), false),
        (Value::from("FALSE"), false),
        (Value::from("no"), true),
        (Value::from(""), true),
        (Value::Integer(0), true),
    ];
    for (value, expected) in cases {
        let doc = common::article([("published", value.clone())]);
        assert_eq!(doc.predicate("published").unwrap(), expected, "{value:?}");
    }
}

#[test]
fn predicate_of_absent_key_is_false() {
    let mut schema = Schema::new("Task");
    schema.define("done", PropertyOptions::boolean()).unwrap();
    let doc = docprop_model::Document::new(
        std::sync::Arc::new(schema),
        &common::types(),
        Vec::<(String, Value)>::new(),
    )
    .unwrap();

    assert!(!doc.contains("done"));
    assert!(!doc.predicate("done").unwrap());
}

#[test]
fn predicate_only_exists_for_booleans() {
    let doc = common::article([("title", "x")]);
    let err = doc.predicate("title").unwrap_err();
    assert!(matches!(err, ModelError::UnknownAccessor { accessor, .. } if accessor == "title?"));
}

#[test]
fn predicate_sees_setter_writes() {
    let mut doc = common::empty_article();
    doc.set("published", true).unwrap();
    assert!(doc.predicate("published").unwrap());
}

// ── Read-only ────────────────────────────────────────────────────

#[test]
fn read_only_value_can_still_be_loaded_and_inserted() {
    let mut doc = common::article([("slug", "a")]);
    assert_eq!(doc.get("slug").unwrap(), Some(&Value::from("a")));

    doc.insert("slug", "b");
    assert_eq!(doc.get("slug").unwrap(), Some(&Value::from("b")));
}
