//! Structured attribute type for the tracing backend.
//!
//! `tracing` only knows field names at compile time, so the attributes of a
//! [`LogValues`](tracelog_core::LogValues) are carried as [`Field`]s and
//! rendered into a single JSON object when the event is emitted.

use std::borrow::Cow;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracelog_core::TraceValues;
use tracelog_core::context::attributes;

/// Value of a [`Field`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
    /// Nested fields, rendered as a JSON object
    Group(Vec<Field>),
}

/// A named attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    key: Cow<'static, str>,
    value: FieldValue,
}

impl Field {
    pub fn new(key: impl Into<Cow<'static, str>>, value: FieldValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn string(key: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        Self::new(key, FieldValue::Str(value.into()))
    }

    pub fn i64(key: impl Into<Cow<'static, str>>, value: i64) -> Self {
        Self::new(key, FieldValue::I64(value))
    }

    pub fn u64(key: impl Into<Cow<'static, str>>, value: u64) -> Self {
        Self::new(key, FieldValue::U64(value))
    }

    pub fn f64(key: impl Into<Cow<'static, str>>, value: f64) -> Self {
        Self::new(key, FieldValue::F64(value))
    }

    pub fn bool(key: impl Into<Cow<'static, str>>, value: bool) -> Self {
        Self::new(key, FieldValue::Bool(value))
    }

    pub fn group(
        key: impl Into<Cow<'static, str>>,
        fields: impl IntoIterator<Item = Field>,
    ) -> Self {
        Self::new(key, FieldValue::Group(fields.into_iter().collect()))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Str(v) => serializer.serialize_str(v),
            FieldValue::I64(v) => serializer.serialize_i64(*v),
            FieldValue::U64(v) => serializer.serialize_u64(*v),
            FieldValue::F64(v) => serializer.serialize_f64(*v),
            FieldValue::Bool(v) => serializer.serialize_bool(*v),
            FieldValue::Group(fields) => Fields(fields).serialize(serializer),
        }
    }
}

/// A slice of fields serialised as one object, keyed by field name.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a>(pub &'a [Field]);

impl Serialize for Fields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for field in self.0 {
            map.serialize_entry(field.key(), field.value())?;
        }
        map.end()
    }
}

/// Render `fields` as a compact JSON object.
pub fn render_fields(fields: &[Field]) -> String {
    serde_json::to_string(&Fields(fields)).unwrap_or_else(|_| String::from("{}"))
}

/// Group field holding the trace and span ids.
///
/// Matches the signature expected by
/// [`set_tracing_format`](tracelog_core::ObservabilityHandler::set_tracing_format).
pub fn trace_group(name: &str, values: &TraceValues) -> Field {
    Field::group(
        name.to_owned(),
        [
            Field::string(attributes::TRACE_ID, values.trace_id.clone()),
            Field::string(attributes::SPAN_ID, values.span_id.clone()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fields_render_as_object() {
        let fields = [
            Field::string("foo", "bar"),
            Field::i64("retries", -1),
            Field::u64("bytes", 512),
            Field::bool("cached", true),
        ];

        let rendered: serde_json::Value = serde_json::from_str(&render_fields(&fields)).unwrap();
        assert_eq!(
            rendered,
            json!({"foo": "bar", "retries": -1, "bytes": 512, "cached": true})
        );
    }

    #[test]
    fn empty_fields_render_as_empty_object() {
        assert_eq!(render_fields(&[]), "{}");
    }

    #[test]
    fn trace_group_nests_ids() {
        let values = TraceValues {
            trace_id: "0af7651916cd43dd8448eb211c80319c".to_string(),
            span_id: "b7ad6b7169203331".to_string(),
        };
        let field = trace_group("tracing", &values);
        assert_eq!(field.key(), "tracing");

        let rendered: serde_json::Value =
            serde_json::from_str(&render_fields(std::slice::from_ref(&field))).unwrap();
        assert_eq!(
            rendered,
            json!({"tracing": {
                "traceId": "0af7651916cd43dd8448eb211c80319c",
                "spanId": "b7ad6b7169203331",
            }})
        );
    }

    #[test]
    fn float_field_renders_number() {
        let rendered = render_fields(&[Field::f64("ratio", 0.5)]);
        assert_eq!(rendered, r#"{"ratio":0.5}"#);
    }
}
