use std::sync::Arc;

use docprop_types::DocumentId;

use crate::{ChangeHistory, Schema, Value};

/// What the casting engine and the accessors need from an owning document.
///
/// [`Document`](crate::Document) is the standard implementation. Other
/// document types can implement this to reuse the engine: they must behave
/// as a string-keyed map and keep a change history. The remaining hooks are
/// optional.
pub trait PropertyContainer {
    /// The schema this container was built from.
    fn schema(&self) -> Arc<Schema>;

    /// Reads a key without any coercion.
    fn get_raw(&self, key: &str) -> Option<&Value>;

    /// Writes a key without change tracking. Returns the replaced value.
    fn insert_raw(&mut self, key: String, value: Value) -> Option<Value>;

    fn changed_properties(&self) -> &ChangeHistory;

    fn changed_properties_mut(&mut self) -> &mut ChangeHistory;

    fn contains_key(&self, key: &str) -> bool {
        self.get_raw(key).is_some()
    }

    /// Containers that are already persisted skip default population.
    fn is_new_document(&self) -> bool {
        true
    }

    /// Handle given to nested casted documents as their `casted_by`.
    /// `None` disables back-references.
    fn container_id(&self) -> Option<DocumentId> {
        None
    }

    /// Whether casting already ran. Containers without a cast flag are cast
    /// again on every call.
    fn is_cast(&self) -> bool {
        false
    }

    fn mark_cast(&mut self) {}
}
