use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::accessor::{AccessorTable, changed_name, predicate_name, setter_name};
use crate::{
    Accessor, ChangedQuery, Getter, ModelResult, Predicate, PropertyDefinition, PropertyDescriptor,
    PropertyOptions, Setter,
};

/// The ordered property list of one model, plus its accessor table.
///
/// Registration needs `&mut Schema`. Once documents share a schema behind an
/// `Arc`, later changes go through `Arc::make_mut`, which leaves documents
/// already built on the old version untouched.
#[derive(Debug, Clone)]
pub struct Schema {
    model: String,
    properties: Vec<PropertyDescriptor>,
    accessors: AccessorTable,
}

/// Outcome of [`Schema::define`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Added,
    /// An existing property was replaced in place and its accessors rebuilt.
    Replaced,
    /// Same name and same default: nothing happened.
    Unchanged,
}

/// A whole schema as written in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    pub model: String,
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
}

impl Schema {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            properties: Vec::new(),
            accessors: AccessorTable::default(),
        }
    }

    /// Starts a subtype schema from a copy of this one. Changes to either
    /// schema afterwards are not seen by the other.
    #[must_use]
    pub fn inherit(&self, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            properties: self.properties.clone(),
            accessors: self.accessors.clone(),
        }
    }

    pub fn from_definition(definition: SchemaDefinition) -> ModelResult<Self> {
        let mut schema = Self::new(definition.model);
        schema.define_all(definition.properties)?;
        Ok(schema)
    }

    pub fn from_json(json: &str) -> ModelResult<Self> {
        Self::from_definition(serde_json::from_str(json)?)
    }

    pub fn define_all(
        &mut self,
        definitions: impl IntoIterator<Item = PropertyDefinition>,
    ) -> ModelResult<()> {
        for definition in definitions {
            let (name, options) = definition.into_options();
            self.define(name, options)?;
        }
        Ok(())
    }

    /// Registers a property, or replaces one with the same name.
    ///
    /// Redefining with an identical default is a no-op, so loading the same
    /// schema twice has no effect.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        options: PropertyOptions,
    ) -> ModelResult<Registration> {
        let name = name.into();
        let position = self.position(&name);

        if let Some(index) = position {
            if self.properties[index].default_value() == options.default_value() {
                debug!(model = %self.model, property = %name, "property already defined");
                return Ok(Registration::Unchanged);
            }
        }

        let descriptor = PropertyDescriptor::from_options(name, options)?;
        self.accessors.check(&descriptor)?;
        self.accessors.remove_field(descriptor.name());
        self.accessors.install(&descriptor);

        debug!(
            model = %self.model,
            property = %descriptor.name(),
            property_type = %descriptor.property_type(),
            casted = descriptor.is_casted(),
            "property defined"
        );

        Ok(match position {
            Some(index) => {
                self.properties[index] = descriptor;
                Registration::Replaced
            }
            None => {
                self.properties.push(descriptor);
                Registration::Added
            }
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// Declared names in definition order. Aliases are not included.
    #[must_use]
    pub fn property_names(&self) -> Vec<&str> {
        self.properties.iter().map(PropertyDescriptor::name).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Looks up a synthesized accessor by method name (`title`, `title=`,
    /// `title_changed?`, `done?`).
    #[must_use]
    pub fn accessor(&self, method: &str) -> Option<&Accessor> {
        self.accessors.get(method)
    }

    /// All synthesized method names, in no particular order.
    pub fn accessor_names(&self) -> impl Iterator<Item = &str> {
        self.accessors.method_names()
    }

    #[must_use]
    pub fn accessor_count(&self) -> usize {
        self.accessors.len()
    }

    #[must_use]
    pub fn getter(&self, name: &str) -> Option<&Getter> {
        match self.accessor(name)? {
            Accessor::Getter(getter) => Some(getter),
            _ => None,
        }
    }

    #[must_use]
    pub fn setter(&self, name: &str) -> Option<&Setter> {
        match self.accessor(&setter_name(name))? {
            Accessor::Setter(setter) => Some(setter),
            _ => None,
        }
    }

    #[must_use]
    pub fn changed_query(&self, name: &str) -> Option<&ChangedQuery> {
        match self.accessor(&changed_name(name))? {
            Accessor::Changed(query) => Some(query),
            _ => None,
        }
    }

    #[must_use]
    pub fn predicate(&self, name: &str) -> Option<&Predicate> {
        match self.accessor(&predicate_name(name))? {
            Accessor::Predicate(predicate) => Some(predicate),
            _ => None,
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name() == name)
    }
}
