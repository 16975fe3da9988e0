mod common;

use docprop_model::{ModelError, Value};
use pretty_assertions::assert_eq;

// ── First write ──────────────────────────────────────────────────

#[test]
fn fresh_document_has_no_changes() {
    let doc = common::article([("title", "Hello")]);
    assert!(doc.changes().is_empty());
    assert!(!doc.is_changed("title").unwrap());
}

#[test]
fn first_write_records_previous_value() {
    let mut doc = common::article([("title", "Old")]);
    doc.set("title", "New").unwrap();

    assert!(doc.is_changed("title").unwrap());
    assert_eq!(doc.changes().previous("title"), Some(Some(&Value::from("Old"))));
    assert_eq!(doc.get("title").unwrap(), Some(&Value::from("New")));
}

#[test]
fn absent_key_is_recorded_as_none() {
    let mut doc = common::empty_article();
    doc.set("title", "First").unwrap();

    assert!(doc.is_changed("title").unwrap());
    assert_eq!(doc.changes().previous("title"), Some(None));
}

#[test]
fn later_writes_keep_first_entry() {
    let mut doc = common::article([("title", "A")]);
    doc.set("title", "B").unwrap();
    doc.set("title", "C").unwrap();

    assert_eq!(doc.changes().previous("title"), Some(Some(&Value::from("A"))));
    assert_eq!(doc.get("title").unwrap(), Some(&Value::from("C")));
}

#[test]
fn reverted_value_still_reports_changed() {
    let mut doc = common::article([("title", "A")]);
    doc.set("title", "B").unwrap();
    doc.set("title", "A").unwrap();

    assert!(doc.is_changed("title").unwrap());
    assert_eq!(doc.changes().previous("title"), Some(Some(&Value::from("A"))));
}

#[test]
fn writing_equal_value_records_nothing() {
    let mut doc = common::article([("title", "Same")]);
    doc.set("title", "Same").unwrap();

    assert!(!doc.is_changed("title").unwrap());
    assert!(doc.changes().is_empty());
}

#[test]
fn writing_null_over_absent_is_a_change() {
    let mut doc = common::empty_article();
    doc.set("title", Value::Null).unwrap();

    assert!(doc.is_changed("title").unwrap());
    assert_eq!(doc.get("title").unwrap(), Some(&Value::Null));
}

#[test]
fn changes_are_per_property() {
    let mut doc = common::article([("title", "T"), ("score", "1")]);
    doc.set("score", 2.0).unwrap();

    assert!(doc.is_changed("score").unwrap());
    assert!(!doc.is_changed("title").unwrap());
    assert_eq!(doc.changes().names().collect::<Vec<_>>(), vec!["score"]);
}

#[test]
fn default_value_is_the_recorded_previous() {
    let mut doc = common::empty_article();
    doc.set("published", true).unwrap();
    assert_eq!(doc.changes().previous("published"), Some(Some(&Value::Bool(false))));
}

// ── Aliases ──────────────────────────────────────────────────────

#[test]
fn alias_write_marks_both_names() {
    let mut doc = common::article([("title", "Old")]);
    doc.set("headline", "New").unwrap();

    assert_eq!(doc.get("title").unwrap(), Some(&Value::from("New")));
    assert!(doc.is_changed("title").unwrap());
    assert!(doc.is_changed("headline").unwrap());
    assert_eq!(doc.changes().previous("headline"), Some(Some(&Value::from("Old"))));
    assert_eq!(doc.changes().len(), 2);
}

#[test]
fn field_write_marks_alias_too() {
    let mut doc = common::empty_article();
    doc.set("title", "x").unwrap();

    assert!(doc.is_changed("headline").unwrap());
    assert_eq!(doc.changes().previous("headline"), Some(None));
}

#[test]
fn alias_entry_mirrors_first_write() {
    let mut doc = common::article([("title", "A")]);
    doc.set("title", "B").unwrap();
    doc.set("headline", "C").unwrap();

    assert_eq!(doc.changes().previous("title"), Some(Some(&Value::from("A"))));
    assert_eq!(doc.changes().previous("headline"), Some(Some(&Value::from("A"))));
}

// ── Untracked paths ──────────────────────────────────────────────

#[test]
fn raw_insert_is_not_tracked() {
    let mut doc = common::article([("title", "A")]);
    doc.insert("title", "B");

    assert!(!doc.is_changed("title").unwrap());
    assert_eq!(doc.get("title").unwrap(), Some(&Value::from("B")));
}

#[test]
fn read_only_property_has_no_setter_or_changed_query() {
    let mut doc = common::article([("slug", "hello-world")]);

    let err = doc.set("slug", "other").unwrap_err();
    assert!(matches!(err, ModelError::UnknownAccessor { accessor, .. } if accessor == "slug="));
    assert!(doc.is_changed("slug").is_err());
    assert_eq!(doc.get("slug").unwrap(), Some(&Value::from("hello-world")));
}

#[test]
fn clones_carry_history_independently() {
    let mut original = common::article([("title", "A")]);
    original.set("title", "B").unwrap();

    let mut copy = original.clone();
    copy.set("score", 1.0).unwrap();

    assert!(copy.is_changed("title").unwrap());
    assert!(copy.is_changed("score").unwrap());
    assert!(!original.is_changed("score").unwrap());
}
