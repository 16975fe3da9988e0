//! Typed properties over string-keyed documents.
//!
//! A [`Schema`] declares a model's properties: type, default, alias, casting
//! and read-only flags. Building a [`Document`] from raw key/value data runs
//! the schema over it:
//! - defaults are filled in for new documents ([`casting::apply_defaults`])
//! - casted properties are coerced into typed values ([`casting::cast_keys`]),
//!   with nested models pointing back at their parent through `casted_by`
//! - synthesized accessors ([`Getter`], [`Setter`], [`ChangedQuery`],
//!   [`Predicate`]) read and write the data, and setters record the first
//!   pre-change value of every field in a [`ChangeHistory`]
//!
//! Types are resolved by name through a [`TypeRegistry`], so nested models
//! and custom types can be registered after the schemas that mention them.
//!
//! ```
//! use std::sync::Arc;
//! use docprop_model::{Document, PropertyOptions, Schema, TypeRegistry};
//!
//! let mut schema = Schema::new("Article");
//! schema.define("title", PropertyOptions::new().with_alias("headline")).unwrap();
//! schema.define("score", PropertyOptions::cast_as("Float")).unwrap();
//! let schema = Arc::new(schema);
//!
//! let types = TypeRegistry::with_builtins();
//! let mut doc = Document::new(schema, &types, [("title", "Hello"), ("score", "4.5")]).unwrap();
//! assert_eq!(doc.get("score").unwrap().and_then(|v| v.as_f64()), Some(4.5));
//!
//! doc.set("headline", "Hello again").unwrap();
//! assert!(doc.is_changed("title").unwrap());
//! ```

mod accessor;
pub mod casting;
mod changes;
mod container;
mod document;
mod error;
mod property;
mod resolver;
mod schema;
mod value;

pub use accessor::{
    Accessor, ChangedQuery, Getter, Predicate, Setter, changed_name, predicate_name, setter_name,
};
pub use changes::ChangeHistory;
pub use container::PropertyContainer;
pub use document::{Document, Lifecycle};
pub use error::{ModelError, ModelResult};
pub use property::{
    ARRAY, BOOLEAN, DEFAULT_INIT_METHOD, DefaultValue, FLOAT, INTEGER, PropertyDefinition,
    PropertyDescriptor, PropertyOptions, PropertyType, STRING, TIME,
};
pub use resolver::{Constructor, TypeRegistry};
pub use schema::{Registration, Schema, SchemaDefinition};
pub use value::Value;
