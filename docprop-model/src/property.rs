use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{ModelError, ModelResult, Value};

/// Init method used when a property does not name one.
pub const DEFAULT_INIT_METHOD: &str = "new";

/// Built-in type names with special casting rules.
pub const TIME: &str = "Time";
pub const FLOAT: &str = "Float";
pub const BOOLEAN: &str = "boolean";
pub const STRING: &str = "String";
pub const INTEGER: &str = "Integer";
pub const ARRAY: &str = "Array";

/// The declared type of a property.
///
/// In JSON a type is either a name (`"Time"`) or a one-element list naming the
/// element type of an array field (`["Time"]`). An empty list means a plain
/// `"Array"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPropertyType", into = "RawPropertyType")]
pub enum PropertyType {
    Scalar(String),
    ArrayOf(String),
}

impl PropertyType {
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::Scalar(name.into())
    }

    pub fn array_of(element: impl Into<String>) -> Self {
        Self::ArrayOf(element.into())
    }

    /// The scalar type name, or the element type name for arrays.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar(name) | Self::ArrayOf(name) => name,
        }
    }

    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::ArrayOf(_))
    }

    /// True for a scalar type with exactly this name.
    #[must_use]
    pub fn is_scalar(&self, name: &str) -> bool {
        matches!(self, Self::Scalar(n) if n == name)
    }

    fn validate(&self) -> Result<(), String> {
        if self.name().is_empty() {
            return Err("type name must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for PropertyType {
    fn default() -> Self {
        Self::Scalar(STRING.to_string())
    }
}

impl From<&str> for PropertyType {
    fn from(name: &str) -> Self {
        Self::scalar(name)
    }
}

impl From<String> for PropertyType {
    fn from(name: String) -> Self {
        Self::Scalar(name)
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(name) => f.write_str(name),
            Self::ArrayOf(name) => write!(f, "[{name}]"),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawPropertyType {
    Name(String),
    List(Vec<String>),
}

impl TryFrom<RawPropertyType> for PropertyType {
    type Error = String;

    fn try_from(raw: RawPropertyType) -> Result<Self, Self::Error> {
        let parsed = match raw {
            RawPropertyType::Name(name) => Self::Scalar(name),
            RawPropertyType::List(mut items) => match items.len() {
                0 => Self::Scalar(ARRAY.to_string()),
                1 => Self::ArrayOf(items.remove(0)),
                n => return Err(format!("array types name exactly one element type, got {n}")),
            },
        };
        parsed.validate()?;
        Ok(parsed)
    }
}

impl From<PropertyType> for RawPropertyType {
    fn from(ty: PropertyType) -> Self {
        match ty {
            PropertyType::Scalar(name) => Self::Name(name),
            PropertyType::ArrayOf(name) => Self::List(vec![name]),
        }
    }
}

/// Default value of a property.
///
/// Static defaults are cloned into every new document; producers are called
/// once per document.
#[derive(Clone)]
pub enum DefaultValue {
    Static(Value),
    Producer(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl DefaultValue {
    pub fn producer<F>(f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self::Producer(Arc::new(f))
    }

    /// A fresh value for one document, or `None` when the default is null.
    #[must_use]
    pub fn produce(&self) -> Option<Value> {
        match self {
            Self::Static(Value::Null) => None,
            Self::Static(value) => Some(value.clone()),
            Self::Producer(f) => Some(f()),
        }
    }
}

impl PartialEq for DefaultValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Static(a), Self::Static(b)) => a == b,
            (Self::Producer(a), Self::Producer(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

/// Options accepted by [`Schema::define`](crate::Schema::define).
///
/// `cast_as` and `type` name the same thing; `cast_as` wins when both are
/// set and is the only one that turns casting on.
#[derive(Debug, Clone, Default)]
pub struct PropertyOptions {
    property_type: Option<PropertyType>,
    cast_as: Option<PropertyType>,
    default: Option<DefaultValue>,
    alias: Option<String>,
    read_only: bool,
    init_method: Option<String>,
}

impl PropertyOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for an uncasted, typed property.
    pub fn typed(ty: impl Into<PropertyType>) -> Self {
        Self::new().with_type(ty)
    }

    /// Shorthand for a casted property.
    pub fn cast_as(ty: impl Into<PropertyType>) -> Self {
        Self::new().with_cast_as(ty)
    }

    /// Shorthand for a boolean property, which gets a `<name>?` predicate.
    #[must_use]
    pub fn boolean() -> Self {
        Self::typed(BOOLEAN)
    }

    #[must_use]
    pub fn with_type(mut self, ty: impl Into<PropertyType>) -> Self {
        self.property_type = Some(ty.into());
        self
    }

    #[must_use]
    pub fn with_cast_as(mut self, ty: impl Into<PropertyType>) -> Self {
        self.cast_as = Some(ty.into());
        self
    }

    /// A static default, deep-copied into each new document.
    #[must_use]
    pub fn with_default(self, default: impl Into<Value>) -> Self {
        self.with_default_value(DefaultValue::Static(default.into()))
    }

    /// A default computed per document.
    #[must_use]
    pub fn with_default_fn<F>(self, f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.with_default_value(DefaultValue::producer(f))
    }

    #[must_use]
    pub fn with_default_value(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Constructor entry point used when casting, e.g. `"parse"`.
    #[must_use]
    pub fn with_init_method(mut self, init_method: impl Into<String>) -> Self {
        self.init_method = Some(init_method.into());
        self
    }

    pub(crate) const fn default_value(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }
}

/// Immutable description of one schema field.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    name: String,
    property_type: PropertyType,
    default: Option<DefaultValue>,
    alias: Option<String>,
    casted: bool,
    init_method: String,
    read_only: bool,
}

impl PropertyDescriptor {
    pub(crate) fn from_options(name: String, options: PropertyOptions) -> ModelResult<Self> {
        if name.is_empty() {
            return Err(ModelError::InvalidSchema("property name must not be empty".into()));
        }
        if let Some(alias) = &options.alias {
            if alias.is_empty() {
                return Err(ModelError::InvalidSchema(format!("empty alias on property `{name}`")));
            }
            if *alias == name {
                return Err(ModelError::InvalidSchema(format!("property `{name}` aliases itself")));
            }
        }

        let casted = options.cast_as.is_some();
        let property_type = options.cast_as.or(options.property_type).unwrap_or_default();
        property_type
            .validate()
            .map_err(|e| ModelError::InvalidSchema(format!("property `{name}`: {e}")))?;

        let init_method = options.init_method.unwrap_or_else(|| DEFAULT_INIT_METHOD.to_string());
        if init_method.is_empty() {
            return Err(ModelError::InvalidSchema(format!(
                "empty init method on property `{name}`"
            )));
        }

        Ok(Self {
            name,
            property_type,
            default: options.default,
            alias: options.alias,
            casted,
            init_method,
            read_only: options.read_only,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn property_type(&self) -> &PropertyType {
        &self.property_type
    }

    #[must_use]
    pub const fn default_value(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    #[must_use]
    pub const fn is_casted(&self) -> bool {
        self.casted
    }

    #[must_use]
    pub fn init_method(&self) -> &str {
        &self.init_method
    }

    /// True when casting goes through the generic `new` construction path.
    #[must_use]
    pub fn uses_default_init(&self) -> bool {
        self.init_method == DEFAULT_INIT_METHOD
    }

    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Boolean properties get a `<name>?` predicate accessor.
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        self.property_type.is_scalar(BOOLEAN)
    }
}

/// A property as written in a JSON schema file.
///
/// ```json
/// {"name": "posted_at", "cast_as": "Time", "alias": "date", "send": "parse"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cast_as: Option<PropertyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(alias = "send")]
    pub init_method: Option<String>,
}

impl PropertyDefinition {
    /// Splits into the `(name, options)` pair `define` takes.
    #[must_use]
    pub fn into_options(self) -> (String, PropertyOptions) {
        let options = PropertyOptions {
            property_type: self.property_type,
            cast_as: self.cast_as,
            default: self.default.map(|json| DefaultValue::Static(Value::from(json))),
            alias: self.alias,
            read_only: self.read_only,
            init_method: self.init_method,
        };
        (self.name, options)
    }
}
