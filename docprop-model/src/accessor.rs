//! Accessor synthesis.
//!
//! Every property gets a set of named accessors when it is defined: a getter
//! under its name, a setter under `name=`, a changed query under
//! `name_changed?`, and for boolean properties a predicate under `name?`.
//! Aliases repeat the getter, setter and changed query under the alias name.
//! The table is built once per schema and shared by every document built
//! from it; lookups return small typed handles instead of closures.

use std::collections::HashMap;

use crate::{ModelError, ModelResult, PropertyContainer, PropertyDescriptor, Value, changes};

#[must_use]
pub fn setter_name(name: &str) -> String {
    format!("{name}=")
}

#[must_use]
pub fn changed_name(name: &str) -> String {
    format!("{name}_changed?")
}

#[must_use]
pub fn predicate_name(name: &str) -> String {
    format!("{name}?")
}

/// Reads the stored value unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Getter {
    field: String,
}

impl Getter {
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn get<'a, C: PropertyContainer + ?Sized>(&self, container: &'a C) -> Option<&'a Value> {
        container.get_raw(&self.field)
    }
}

/// Records history, then writes the value verbatim. Setters never coerce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setter {
    field: String,
    alias: Option<String>,
}

impl Setter {
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn set<C: PropertyContainer + ?Sized>(&self, container: &mut C, value: impl Into<Value>) {
        changes::track_write(container, &self.field, self.alias.as_deref(), value.into());
    }
}

/// Reports whether a history entry exists under its key, not whether the
/// live value differs from the recorded one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedQuery {
    field: String,
    key: String,
}

impl ChangedQuery {
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn is_changed<C: PropertyContainer + ?Sized>(&self, container: &C) -> bool {
        container.changed_properties().contains(&self.key)
    }
}

/// Truthiness of a boolean property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    field: String,
}

impl Predicate {
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// False for absent, `null`, `false` and any-case `"false"`; true otherwise.
    pub fn test<C: PropertyContainer + ?Sized>(&self, container: &C) -> bool {
        match container.get_raw(&self.field) {
            None | Some(Value::Null | Value::Bool(false)) => false,
            Some(Value::String(s)) => !s.eq_ignore_ascii_case("false"),
            Some(_) => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessor {
    Getter(Getter),
    Setter(Setter),
    Changed(ChangedQuery),
    Predicate(Predicate),
}

impl Accessor {
    /// The property this accessor reads or writes.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::Getter(a) => a.field(),
            Self::Setter(a) => a.field(),
            Self::Changed(a) => a.field(),
            Self::Predicate(a) => a.field(),
        }
    }
}

/// Method name → accessor, for one schema.
#[derive(Debug, Clone, Default)]
pub(crate) struct AccessorTable {
    methods: HashMap<String, Accessor>,
}

impl AccessorTable {
    pub(crate) fn get(&self, method: &str) -> Option<&Accessor> {
        self.methods.get(method)
    }

    pub(crate) fn len(&self) -> usize {
        self.methods.len()
    }

    pub(crate) fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// Fails if any accessor of `property` would shadow one of another field.
    pub(crate) fn check(&self, property: &PropertyDescriptor) -> ModelResult<()> {
        for (method, _) in synthesize(property) {
            if let Some(existing) = self.methods.get(&method) {
                if existing.field() != property.name() {
                    return Err(ModelError::InvalidSchema(format!(
                        "accessor `{method}` of property `{}` collides with property `{}`",
                        property.name(),
                        existing.field()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Drops every accessor of `field`, including those under an old alias.
    pub(crate) fn remove_field(&mut self, field: &str) {
        self.methods.retain(|_, accessor| accessor.field() != field);
    }

    pub(crate) fn install(&mut self, property: &PropertyDescriptor) {
        self.methods.extend(synthesize(property));
    }
}

fn synthesize(property: &PropertyDescriptor) -> Vec<(String, Accessor)> {
    let field = property.name().to_string();
    let mut names = vec![field.clone()];
    if let Some(alias) = property.alias() {
        names.push(alias.to_string());
    }

    let mut methods = Vec::with_capacity(names.len() * 3 + 1);
    for name in &names {
        methods.push((name.clone(), Accessor::Getter(Getter { field: field.clone() })));
        if !property.is_read_only() {
            methods.push((
                setter_name(name),
                Accessor::Setter(Setter {
                    field: field.clone(),
                    alias: property.alias().map(str::to_string),
                }),
            ));
            methods.push((
                changed_name(name),
                Accessor::Changed(ChangedQuery {
                    field: field.clone(),
                    key: name.clone(),
                }),
            ));
        }
    }
    if property.is_boolean() {
        methods.push((predicate_name(&field), Accessor::Predicate(Predicate { field })));
    }
    methods
}
