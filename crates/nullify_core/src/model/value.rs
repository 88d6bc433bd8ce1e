//! Dynamic attribute value representation.
//!
//! # Responsibility
//! - Represent every value shape a record attribute can hold.
//! - Round-trip attribute maps to natural JSON for document storage.
//!
//! # Invariants
//! - `Null` is the explicit absence marker written by save-time
//!   normalization; it serializes as JSON `null`.
//! - `Json` holds already-decoded structured data, never encoded text.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Dynamically typed value stored in a record's attribute map.
///
/// Variant order matters for untagged deserialization: `Json` is the
/// catch-all and must stay last so arrays land in `List` and scalars in
/// their native variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Explicit absence of a value.
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    /// Native collection attribute.
    List(Vec<FieldValue>),
    /// Decoded structured value produced by a JSON-encoded field.
    Json(JsonValue),
}

impl FieldValue {
    /// Stable lowercase label used in diagnostics and error messages.
    pub fn type_label(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Json(_) => "json",
        }
    }

    /// Returns whether this value is the absence marker.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the text content for `Text` values.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(value: Vec<FieldValue>) -> Self {
        Self::List(value)
    }
}

impl From<JsonValue> for FieldValue {
    fn from(value: JsonValue) -> Self {
        Self::Json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::FieldValue;
    use std::collections::BTreeMap;

    #[test]
    fn serializes_to_natural_json() {
        let mut attrs = BTreeMap::new();
        attrs.insert("name".to_string(), FieldValue::from("Ada"));
        attrs.insert("age".to_string(), FieldValue::from(36_i64));
        attrs.insert("middle_name".to_string(), FieldValue::Null);

        let doc = serde_json::to_string(&attrs).expect("attrs should encode");
        assert_eq!(doc, r#"{"age":36,"middle_name":null,"name":"Ada"}"#);
    }

    #[test]
    fn null_round_trips_through_json_document() {
        let doc = r#"{"middle_name":null,"tags":["a"],"active":true}"#;
        let attrs: BTreeMap<String, FieldValue> =
            serde_json::from_str(doc).expect("doc should decode");

        assert_eq!(attrs["middle_name"], FieldValue::Null);
        assert_eq!(
            attrs["tags"],
            FieldValue::List(vec![FieldValue::from("a")])
        );
        assert_eq!(attrs["active"], FieldValue::Boolean(true));
    }

    #[test]
    fn arrays_decode_as_list_and_objects_as_json() {
        let attrs: BTreeMap<String, FieldValue> =
            serde_json::from_str(r#"{"a":[1,2],"b":{"k":"v"}}"#).expect("doc should decode");

        assert!(matches!(attrs["a"], FieldValue::List(_)));
        assert!(matches!(attrs["b"], FieldValue::Json(_)));
    }

    #[test]
    fn type_labels_are_stable() {
        assert_eq!(FieldValue::Null.type_label(), "null");
        assert_eq!(FieldValue::from(0_i64).type_label(), "integer");
        assert_eq!(FieldValue::from(false).type_label(), "boolean");
        assert_eq!(FieldValue::from("").type_label(), "text");
    }
}
