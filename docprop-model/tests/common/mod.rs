//! Shared fixtures for model tests.

#![allow(dead_code)]

use std::sync::Arc;

use docprop_model::{Document, PropertyOptions, PropertyType, Schema, TypeRegistry, Value};

/// `Comment { body, at: Time }`
pub fn comment_schema() -> Arc<Schema> {
    let mut schema = Schema::new("Comment");
    schema.define("body", PropertyOptions::new()).unwrap();
    schema.define("at", PropertyOptions::cast_as("Time")).unwrap();
    Arc::new(schema)
}

/// `Person { name, nickname = "anon" }`
pub fn person_schema() -> Arc<Schema> {
    let mut schema = Schema::new("Person");
    schema.define("name", PropertyOptions::new()).unwrap();
    schema
        .define("nickname", PropertyOptions::new().with_default("anon"))
        .unwrap();
    Arc::new(schema)
}

/// A model exercising every option.
pub fn article_schema() -> Arc<Schema> {
    let mut schema = Schema::new("Article");
    schema
        .define("title", PropertyOptions::new().with_alias("headline"))
        .unwrap();
    schema.define("posted_at", PropertyOptions::cast_as("Time")).unwrap();
    schema.define("score", PropertyOptions::cast_as("Float")).unwrap();
    schema
        .define("published", PropertyOptions::boolean().with_default(false))
        .unwrap();
    schema
        .define("tags", PropertyOptions::new().with_default(vec!["draft"]))
        .unwrap();
    schema
        .define("slug", PropertyOptions::new().read_only())
        .unwrap();
    schema
        .define("comments", PropertyOptions::cast_as(PropertyType::array_of("Comment")))
        .unwrap();
    schema.define("author", PropertyOptions::cast_as("Person")).unwrap();
    Arc::new(schema)
}

/// Built-ins plus the `Comment` and `Person` models.
pub fn types() -> TypeRegistry {
    let mut types = TypeRegistry::with_builtins();
    types
        .register_model(comment_schema())
        .register_model(person_schema());
    types
}

pub fn article<I, K, V>(raw: I) -> Document
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    Document::new(article_schema(), &types(), raw).unwrap()
}

pub fn empty_article() -> Document {
    article(Vec::<(String, Value)>::new())
}
