//! Per-document change history ("dirty tracking").
//!
//! The first time a property is written through its setter, the value it
//! held just before (or absence, when the key did not exist) is recorded.
//! Later writes never overwrite that entry and nothing removes it, so a
//! property that was changed and then reverted still reports as changed.

use std::collections::BTreeMap;

use tracing::trace;

use crate::{PropertyContainer, Value};

/// Pre-mutation values keyed by property name (and alias).
///
/// `None` marks a key that did not exist before the first write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeHistory {
    entries: BTreeMap<String, Option<Value>>,
}

impl ChangeHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// The recorded pre-change value: `None` if the property never changed,
    /// `Some(None)` if it was absent before its first write.
    #[must_use]
    pub fn previous(&self, name: &str) -> Option<Option<&Value>> {
        self.entries.get(name).map(Option::as_ref)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First write wins; the alias mirrors whatever the field recorded.
    fn record(&mut self, field: &str, alias: Option<&str>, previous: Option<Value>) {
        if self.entries.contains_key(field) {
            return;
        }
        if let Some(alias) = alias {
            self.entries.insert(alias.to_string(), previous.clone());
        }
        self.entries.insert(field.to_string(), previous);
    }
}

/// The setter write protocol.
pub(crate) fn track_write<C: PropertyContainer + ?Sized>(
    container: &mut C,
    field: &str,
    alias: Option<&str>,
    value: Value,
) {
    let previous = match container.get_raw(field) {
        Some(current) if *current != value => Some(Some(current.clone())),
        Some(_) => None,
        None => Some(None),
    };

    if let Some(previous) = previous {
        trace!(property = %field, "recording change");
        container.changed_properties_mut().record(field, alias, previous);
    }
    container.insert_raw(field.to_string(), value);
}
