//! Default population and type casting.
//!
//! Both entry points run once while a document is built, after the raw keys
//! are merged in: [`apply_defaults`] first, then [`cast_keys`].

use docprop_types::{DocumentId, parse_timestamp, parse_timestamp_fast};
use tracing::{debug, trace};

use crate::property::{BOOLEAN, FLOAT, TIME};
use crate::{
    ModelError, ModelResult, PropertyContainer, PropertyDescriptor, PropertyType, TypeRegistry,
    Value,
};

/// Fills in defaults for every property that has one.
///
/// Skipped for containers that are not new documents. Producers run once
/// per call; static defaults are deep-copied so documents never share them.
pub fn apply_defaults<C: PropertyContainer + ?Sized>(container: &mut C) {
    if !container.is_new_document() {
        trace!("persisted document, defaults skipped");
        return;
    }
    let schema = container.schema();
    for property in schema.properties() {
        if let Some(value) = property.default_value().and_then(|d| d.produce()) {
            container.insert_raw(property.name().to_string(), value);
        }
    }
}

/// Coerces every casted property that holds a value (anything but absent,
/// `null` or `false`) into its declared type.
///
/// Runs at most once per container that keeps a cast flag. A failed numeric
/// cast keeps the raw value; any other failure aborts and is returned, which
/// may leave the container partially cast.
pub fn cast_keys<C: PropertyContainer + ?Sized>(
    container: &mut C,
    types: &TypeRegistry,
) -> ModelResult<()> {
    if container.is_cast() {
        return Ok(());
    }
    let schema = container.schema();
    let parent = container.container_id();

    for property in schema.properties().iter().filter(|p| p.is_casted()) {
        let Some(raw) = container.get_raw(property.name()).filter(|v| v.is_truthy()).cloned() else {
            continue;
        };
        let cast = match property.property_type() {
            PropertyType::ArrayOf(element) => cast_array(property, element, raw, types, parent)?,
            PropertyType::Scalar(type_name) => {
                adopt(cast_scalar(property, type_name, raw, types)?, parent)
            }
        };
        container.insert_raw(property.name().to_string(), cast);
    }

    container.mark_cast();
    debug!(model = %schema.model(), "document cast");
    Ok(())
}

fn cast_array(
    property: &PropertyDescriptor,
    element: &str,
    raw: Value,
    types: &TypeRegistry,
    parent: Option<DocumentId>,
) -> ModelResult<Value> {
    let Value::Array(items) = raw else {
        return Err(ModelError::ExpectedArray(property.name().to_string()));
    };
    let constructor = types.resolve(element)?;
    let generic_time = element == TIME && property.uses_default_init();

    items
        .into_iter()
        .map(|item| -> ModelResult<Value> {
            let value = if generic_time {
                match item {
                    Value::String(s) => Value::Time(parse_timestamp(&s)?),
                    other => constructor.construct(property.init_method(), other, types)?,
                }
            } else {
                constructor.construct(property.init_method(), item, types)?
            };
            Ok(adopt(value, parent))
        })
        .collect::<ModelResult<Vec<_>>>()
        .map(Value::Array)
}

fn cast_scalar(
    property: &PropertyDescriptor,
    type_name: &str,
    raw: Value,
    types: &TypeRegistry,
) -> ModelResult<Value> {
    if property.uses_default_init() {
        match type_name {
            TIME => {
                return Ok(match raw {
                    Value::String(s) => Value::Time(parse_timestamp_fast(&s)?),
                    other => other,
                });
            }
            FLOAT => {
                return match coerce_float(&raw) {
                    Ok(f) => Ok(Value::Float(f)),
                    Err(e) if e.is_recoverable() => {
                        debug!(property = %property.name(), error = %e, "float cast skipped");
                        Ok(raw)
                    }
                    Err(e) => Err(e),
                };
            }
            BOOLEAN => return Ok(raw),
            _ => {}
        }
    }
    types.resolve(type_name)?.construct(property.init_method(), raw, types)
}

/// Points a nested casted document back at its container.
fn adopt(mut value: Value, parent: Option<DocumentId>) -> Value {
    if let (Some(parent), Some(doc)) = (parent, value.as_document_mut()) {
        doc.set_casted_by(parent);
    }
    value
}

/// Lenient numeric read: integers widen, strings are trimmed and parsed.
///
/// Single underscores between digits are digit separators (`"1_000"`).
/// Leading, trailing or doubled underscores, names like `inf` or `NaN`, and
/// overflowing literals are misses. Anything else follows `f64::from_str`,
/// so a bare trailing point (`"5."`) is accepted.
pub(crate) fn coerce_float(value: &Value) -> ModelResult<f64> {
    let parsed = match value {
        Value::Float(f) => Some(*f),
        Value::Integer(i) => Some(*i as f64),
        Value::String(s) => strip_digit_separators(s.trim()).and_then(|s| s.parse::<f64>().ok()),
        _ => None,
    };
    parsed
        .filter(|f| f.is_finite())
        .ok_or_else(|| ModelError::NumericCoercion(format!("{value:?}")))
}

/// Drops `_` separators; `None` when one is not between two digits.
fn strip_digit_separators(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.char_indices() {
        if c != '_' {
            out.push(c);
            continue;
        }
        let before = i.checked_sub(1).and_then(|j| bytes.get(j));
        let after = bytes.get(i + 1);
        let between_digits = matches!(
            (before, after),
            (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit()
        );
        if !between_digits {
            return None;
        }
    }
    Some(out)
}
