use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use docprop_types::DocumentId;
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;
use tracing::trace;

use crate::accessor::{changed_name, predicate_name, setter_name};
use crate::{
    ChangeHistory, ModelError, ModelResult, PropertyContainer, Schema, TypeRegistry, Value, casting,
};

/// Whether a document has been persisted before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Built from fresh input; defaults apply.
    #[default]
    New,
    /// Loaded from storage; stored values are taken as-is.
    Persisted,
}

/// A string-keyed document governed by a [`Schema`].
///
/// All model data flows through this type. Keys not declared in the schema
/// are kept as-is; declared properties get defaults, casting, accessors and
/// change tracking. The change history and the `casted_by` back-reference
/// are instance state and are never serialized.
#[derive(Clone)]
pub struct Document {
    id: DocumentId,
    schema: Arc<Schema>,
    data: BTreeMap<String, Value>,
    changed_properties: ChangeHistory,
    casted_by: Option<DocumentId>,
    lifecycle: Lifecycle,
    cast: bool,
}

impl Document {
    /// Builds a new document: defaults, then `raw`, then casting.
    pub fn new<I, K, V>(schema: Arc<Schema>, types: &TypeRegistry, raw: I) -> ModelResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::build(schema, types, raw, Lifecycle::New)
    }

    /// Builds a document that was already persisted. No defaults are applied.
    pub fn load<I, K, V>(schema: Arc<Schema>, types: &TypeRegistry, raw: I) -> ModelResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::build(schema, types, raw, Lifecycle::Persisted)
    }

    /// [`Document::new`] from a JSON object.
    pub fn from_json(
        schema: Arc<Schema>,
        types: &TypeRegistry,
        json: JsonValue,
    ) -> ModelResult<Self> {
        Self::new(schema, types, json_object(json)?)
    }

    /// [`Document::load`] from a JSON object.
    pub fn load_json(
        schema: Arc<Schema>,
        types: &TypeRegistry,
        json: JsonValue,
    ) -> ModelResult<Self> {
        Self::load(schema, types, json_object(json)?)
    }

    fn build<I, K, V>(
        schema: Arc<Schema>,
        types: &TypeRegistry,
        raw: I,
        lifecycle: Lifecycle,
    ) -> ModelResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut document = Self {
            id: DocumentId::new(),
            schema,
            data: BTreeMap::new(),
            changed_properties: ChangeHistory::new(),
            casted_by: None,
            lifecycle,
            cast: false,
        };
        trace!(model = %document.model(), id = %document.id, ?lifecycle, "building document");

        casting::apply_defaults(&mut document);
        document.data.extend(raw.into_iter().map(|(k, v)| (k.into(), v.into())));
        casting::cast_keys(&mut document, types)?;
        Ok(document)
    }

    /// In-memory handle of this instance.
    #[must_use]
    pub const fn id(&self) -> DocumentId {
        self.id
    }

    #[must_use]
    pub fn model(&self) -> &str {
        self.schema.model()
    }

    #[must_use]
    pub const fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// The enclosing document, when this one was produced by casting.
    #[must_use]
    pub const fn casted_by(&self) -> Option<DocumentId> {
        self.casted_by
    }

    #[must_use]
    pub fn is_casted_by(&self, parent: &Self) -> bool {
        self.casted_by == Some(parent.id)
    }

    pub(crate) fn set_casted_by(&mut self, parent: DocumentId) {
        self.casted_by = Some(parent);
    }

    // ── Synthesized accessors ────────────────────────────────────

    /// Reads a property (or alias) through its getter.
    pub fn get(&self, name: &str) -> ModelResult<Option<&Value>> {
        let getter = self.schema.getter(name).ok_or_else(|| self.unknown(name))?;
        Ok(getter.get(self))
    }

    /// Writes a property (or alias) through its setter, recording history.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> ModelResult<()> {
        let schema = Arc::clone(&self.schema);
        let setter = schema.setter(name).ok_or_else(|| self.unknown(&setter_name(name)))?;
        setter.set(self, value);
        Ok(())
    }

    /// `<name>_changed?`
    pub fn is_changed(&self, name: &str) -> ModelResult<bool> {
        let query = self
            .schema
            .changed_query(name)
            .ok_or_else(|| self.unknown(&changed_name(name)))?;
        Ok(query.is_changed(self))
    }

    /// `<name>?`, only synthesized for boolean properties.
    pub fn predicate(&self, name: &str) -> ModelResult<bool> {
        let predicate = self
            .schema
            .predicate(name)
            .ok_or_else(|| self.unknown(&predicate_name(name)))?;
        Ok(predicate.test(self))
    }

    /// The fields changed so far, with their pre-change values.
    #[must_use]
    pub const fn changes(&self) -> &ChangeHistory {
        &self.changed_properties
    }

    fn unknown(&self, accessor: &str) -> ModelError {
        ModelError::UnknownAccessor {
            model: self.model().to_string(),
            accessor: accessor.to_string(),
        }
    }

    // ── Raw map access (untracked) ───────────────────────────────

    #[must_use]
    pub fn get_key(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Writes a key directly, bypassing setters and change tracking.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.data.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub const fn data(&self) -> &BTreeMap<String, Value> {
        &self.data
    }

    #[must_use]
    pub fn into_data(self) -> BTreeMap<String, Value> {
        self.data
    }

    /// The stored data as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(
            self.data
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

fn json_object(json: JsonValue) -> ModelResult<serde_json::Map<String, JsonValue>> {
    match json {
        JsonValue::Object(map) => Ok(map),
        other => Err(ModelError::ExpectedObject(other.to_string())),
    }
}

impl PropertyContainer for Document {
    fn schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    fn get_raw(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    fn insert_raw(&mut self, key: String, value: Value) -> Option<Value> {
        self.data.insert(key, value)
    }

    fn changed_properties(&self) -> &ChangeHistory {
        &self.changed_properties
    }

    fn changed_properties_mut(&mut self) -> &mut ChangeHistory {
        &mut self.changed_properties
    }

    fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    fn is_new_document(&self) -> bool {
        self.lifecycle == Lifecycle::New
    }

    fn container_id(&self) -> Option<DocumentId> {
        Some(self.id)
    }

    fn is_cast(&self) -> bool {
        self.cast
    }

    fn mark_cast(&mut self) {
        self.cast = true;
    }
}

/// Documents compare by stored data only.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("model", &self.model())
            .field("id", &self.id)
            .field("data", &self.data)
            .field("changed_properties", &self.changed_properties)
            .field("casted_by", &self.casted_by)
            .finish_non_exhaustive()
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(&self.data)
    }
}
