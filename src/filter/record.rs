use serde_json::{Map, Number, Value};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Read access to the named fields of a record being filtered.
///
/// `None` means the field is absent; absent fields never match.
pub trait Record {
    fn field_text(&self, field: &str) -> Option<Cow<'_, str>>;
}

impl<R: Record + ?Sized> Record for &R {
    fn field_text(&self, field: &str) -> Option<Cow<'_, str>> {
        (**self).field_text(field)
    }
}

impl Record for Map<String, Value> {
    fn field_text(&self, field: &str) -> Option<Cow<'_, str>> {
        self.get(field).and_then(value_text)
    }
}

impl Record for Value {
    fn field_text(&self, field: &str) -> Option<Cow<'_, str>> {
        self.as_object().and_then(|object| object.field_text(field))
    }
}

impl<V: AsRef<str>, S: BuildHasher> Record for HashMap<String, V, S> {
    fn field_text(&self, field: &str) -> Option<Cow<'_, str>> {
        self.get(field).map(|v| Cow::Borrowed(v.as_ref()))
    }
}

impl<V: AsRef<str>> Record for BTreeMap<String, V> {
    fn field_text(&self, field: &str) -> Option<Cow<'_, str>> {
        self.get(field).map(|v| Cow::Borrowed(v.as_ref()))
    }
}

/// Text used when matching a JSON value; `null` counts as absent
pub fn value_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Number(n) => Some(Cow::Owned(number_text(n))),
        Value::Array(items) => Some(Cow::Owned(
            items
                .iter()
                .map(|item| value_text(item).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
        )),
        Value::Object(_) => Some(Cow::Owned(value.to_string())),
    }
}

/// Integral floats print without a fractional part, so `1.0` reads as `1`
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => {
            if f == 0.0 {
                "0".to_string()
            } else {
                format!("{f:.0}")
            }
        }
        _ => n.to_string(),
    }
}
