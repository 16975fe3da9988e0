//! Name-based type resolution for casting.
//!
//! Properties name their types as strings, so the casting engine looks
//! constructors up by name when a document is built. Types only need to be
//! registered before the first document that uses them is cast.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Local};
use docprop_types::{format_timestamp, parse_timestamp, parse_timestamp_fast};

use crate::casting::coerce_float;
use crate::property::{ARRAY, DEFAULT_INIT_METHOD, FLOAT, INTEGER, STRING, TIME};
use crate::{Document, ModelError, ModelResult, Schema, Value};

/// Builds a typed value from a raw one through a named init method.
pub trait Constructor: Send + Sync {
    fn construct(&self, init_method: &str, raw: Value, types: &TypeRegistry) -> ModelResult<Value>;
}

impl<F> Constructor for F
where
    F: Fn(&str, Value, &TypeRegistry) -> ModelResult<Value> + Send + Sync,
{
    fn construct(&self, init_method: &str, raw: Value, types: &TypeRegistry) -> ModelResult<Value> {
        self(init_method, raw, types)
    }
}

/// Type name → constructor.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    constructors: HashMap<String, Arc<dyn Constructor>>,
}

impl TypeRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with `String`, `Integer`, `Float`, `Time` and `Array`.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut types = Self::new();
        types
            .register(STRING, StringType)
            .register(INTEGER, IntegerType)
            .register(FLOAT, FloatType)
            .register(TIME, TimeType)
            .register(ARRAY, ArrayType);
        types
    }

    /// Registers (or replaces) the constructor for `name`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        constructor: impl Constructor + 'static,
    ) -> &mut Self {
        self.constructors.insert(name.into(), Arc::new(constructor));
        self
    }

    /// Registers a nested casted model under its schema's model name.
    /// Its `new` init method builds a [`Document`] from an object.
    ///
    /// The registry keeps the `Arc` it is given. Changing the schema later
    /// through `Arc::make_mut` produces a new version that nested casting
    /// does not see until it is registered again.
    pub fn register_model(&mut self, schema: Arc<Schema>) -> &mut Self {
        let name = schema.model().to_string();
        self.register(name, ModelType { schema })
    }

    pub fn resolve(&self, name: &str) -> ModelResult<Arc<dyn Constructor>> {
        self.constructors
            .get(name)
            .cloned()
            .ok_or_else(|| ModelError::UnresolvableType(name.to_string()))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("TypeRegistry").field("types", &names).finish()
    }
}

fn unknown_init(type_name: &str, init_method: &str) -> ModelError {
    ModelError::UnknownInitMethod {
        type_name: type_name.to_string(),
        init_method: init_method.to_string(),
    }
}

fn unexpected(type_name: &str, raw: &Value) -> ModelError {
    ModelError::construction(type_name, format!("unexpected {} value", raw.type_name()))
}

struct StringType;

impl Constructor for StringType {
    fn construct(&self, init_method: &str, raw: Value, _: &TypeRegistry) -> ModelResult<Value> {
        if init_method != DEFAULT_INIT_METHOD {
            return Err(unknown_init(STRING, init_method));
        }
        Ok(match raw {
            Value::String(s) => Value::String(s),
            Value::Integer(i) => Value::String(i.to_string()),
            Value::Float(f) => Value::String(f.to_string()),
            Value::Bool(b) => Value::String(b.to_string()),
            Value::Time(t) => Value::String(format_timestamp(&t)),
            other => return Err(unexpected(STRING, &other)),
        })
    }
}

struct IntegerType;

impl Constructor for IntegerType {
    fn construct(&self, init_method: &str, raw: Value, _: &TypeRegistry) -> ModelResult<Value> {
        if !matches!(init_method, DEFAULT_INIT_METHOD | "parse") {
            return Err(unknown_init(INTEGER, init_method));
        }
        match raw {
            Value::Integer(i) => Ok(Value::Integer(i)),
            Value::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Ok(Value::Integer(f as i64)),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|e| ModelError::construction(INTEGER, format!("{s:?}: {e}"))),
            other => Err(unexpected(INTEGER, &other)),
        }
    }
}

/// Strict: unlike the scalar `Float` cast, a miss here is an error.
struct FloatType;

impl Constructor for FloatType {
    fn construct(&self, init_method: &str, raw: Value, _: &TypeRegistry) -> ModelResult<Value> {
        if init_method != DEFAULT_INIT_METHOD {
            return Err(unknown_init(FLOAT, init_method));
        }
        coerce_float(&raw)
            .map(Value::Float)
            .map_err(|e| ModelError::construction(FLOAT, e.to_string()))
    }
}

struct TimeType;

impl Constructor for TimeType {
    fn construct(&self, init_method: &str, raw: Value, _: &TypeRegistry) -> ModelResult<Value> {
        let parse: fn(&str) -> docprop_types::Result<DateTime<Local>> = match init_method {
            DEFAULT_INIT_METHOD | "parse" => parse_timestamp,
            "parse_fast" => parse_timestamp_fast,
            other => return Err(unknown_init(TIME, other)),
        };
        match raw {
            Value::String(s) => Ok(Value::Time(parse(&s)?)),
            Value::Time(t) => Ok(Value::Time(t)),
            other => Err(unexpected(TIME, &other)),
        }
    }
}

struct ArrayType;

impl Constructor for ArrayType {
    fn construct(&self, init_method: &str, raw: Value, _: &TypeRegistry) -> ModelResult<Value> {
        if init_method != DEFAULT_INIT_METHOD {
            return Err(unknown_init(ARRAY, init_method));
        }
        match raw {
            Value::Array(items) => Ok(Value::Array(items)),
            other => Err(unexpected(ARRAY, &other)),
        }
    }
}

struct ModelType {
    schema: Arc<Schema>,
}

impl Constructor for ModelType {
    fn construct(&self, init_method: &str, raw: Value, types: &TypeRegistry) -> ModelResult<Value> {
        let model = self.schema.model();
        if init_method != DEFAULT_INIT_METHOD {
            return Err(unknown_init(model, init_method));
        }
        let document = match raw {
            Value::Object(map) => Document::new(Arc::clone(&self.schema), types, map)?,
            Value::Document(doc) => {
                Document::new(Arc::clone(&self.schema), types, doc.into_data())?
            }
            other => return Err(unexpected(model, &other)),
        };
        Ok(Value::from(document))
    }
}
