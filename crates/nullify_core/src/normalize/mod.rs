//! Save-time empty-to-null normalization for nullable fields.
//!
//! # Responsibility
//! - Rewrite semantically empty values of declared-nullable fields to
//!   `FieldValue::Null` immediately before a save.
//! - Classify emptiness per declared field kind, with a value-driven
//!   fallback for undeclared fields and mismatched value shapes.
//!
//! # Invariants
//! - Only fields named in the descriptor's nullable list are touched;
//!   every other attribute passes through byte-for-byte.
//! - Classification never fails: malformed structured text decodes to the
//!   empty verdict, unrecognized scalar shapes stay non-empty.
//! - Verdict writes bypass custom setters (`Record::write_raw`).
//! - The pass holds no state; applying it twice equals applying it once.

use crate::model::record::Record;
use crate::model::value::FieldValue;
use crate::schema::descriptor::{FieldKind, TypeDescriptor};
use serde_json::Value as JsonValue;

/// Rewrites every empty declared-nullable attribute to `Null`.
///
/// Pre-save hook entry point: filters the record's attribute map down to
/// the nullable set, classifies each value, and writes the verdict back
/// directly. Attributes absent from the record are skipped, not created.
pub fn set_nullable_fields(descriptor: &TypeDescriptor, record: &mut Record) {
    for field in descriptor.nullable_fields() {
        let Some(current) = record.attr(field).cloned() else {
            continue;
        };
        let verdict = null_if_empty(descriptor, field, current);
        record.write_raw(field.as_str(), verdict);
    }
}

/// Classifies one value and returns `Null` when empty, else the kept value.
///
/// Precedence:
/// 1. Field declared `StructuredJson`: decoded-value emptiness test, or
///    raw-value test when a custom setter owns the field.
/// 2. Field declared `Collection`: empty iff zero elements.
/// 3. Text/scalar path: text is empty iff blank after trimming; non-text
///    scalars are never empty.
///
/// Undeclared field names classify by value shape alone.
pub fn null_if_empty(descriptor: &TypeDescriptor, field: &str, value: FieldValue) -> FieldValue {
    match descriptor.field_kind(field) {
        Some(FieldKind::StructuredJson) => structured_verdict(descriptor, field, value),
        Some(FieldKind::Collection) => collection_verdict(value),
        Some(FieldKind::Scalar) => scalar_verdict(value),
        Some(FieldKind::Text) => text_verdict(value),
        None => untyped_verdict(value),
    }
}

/// Structured field: decode first, unless a custom setter owns the field.
///
/// With a setter registered the raw value is trusted as final and only
/// blank-tested. Without one, encoded text decodes through the type's
/// collaborator (generic fallback otherwise) and a non-empty verdict keeps
/// the decoded structure, not the encoded text.
fn structured_verdict(descriptor: &TypeDescriptor, field: &str, value: FieldValue) -> FieldValue {
    if descriptor.has_custom_setter(field) {
        return untyped_verdict(value);
    }

    let decoded = match value {
        FieldValue::Text(raw) => descriptor
            .decode_json_text(&raw)
            .unwrap_or(JsonValue::Null),
        FieldValue::Json(decoded) => decoded,
        // Already-decoded native collections count as the in-memory form.
        FieldValue::List(items) => serde_json::to_value(items).unwrap_or(JsonValue::Null),
        other => return untyped_verdict(other),
    };

    if json_blank(&decoded) {
        FieldValue::Null
    } else {
        FieldValue::Json(decoded)
    }
}

/// Declared text field: blank after trimming means empty.
fn text_verdict(value: FieldValue) -> FieldValue {
    match value {
        FieldValue::Text(text) => {
            if text.trim().is_empty() {
                FieldValue::Null
            } else {
                FieldValue::Text(text)
            }
        }
        other => untyped_verdict(other),
    }
}

/// Declared collection field: zero elements means empty.
fn collection_verdict(value: FieldValue) -> FieldValue {
    match value {
        FieldValue::List(items) => {
            if items.is_empty() {
                FieldValue::Null
            } else {
                FieldValue::List(items)
            }
        }
        FieldValue::Json(json) if json.is_array() || json.is_object() => {
            if json_blank(&json) {
                FieldValue::Null
            } else {
                FieldValue::Json(json)
            }
        }
        other => untyped_verdict(other),
    }
}

/// Declared scalar field: numbers and booleans are never empty.
fn scalar_verdict(value: FieldValue) -> FieldValue {
    match value {
        kept @ (FieldValue::Boolean(_) | FieldValue::Integer(_) | FieldValue::Float(_)) => kept,
        other => untyped_verdict(other),
    }
}

/// Value-shape classification for undeclared fields and kind mismatches.
///
/// Trimming only applies to text; numeric zero and boolean false are
/// non-empty on purpose. `Null` stays `Null`, which makes the whole pass
/// idempotent.
fn untyped_verdict(value: FieldValue) -> FieldValue {
    match value {
        FieldValue::Null => FieldValue::Null,
        FieldValue::Text(text) => {
            if text.trim().is_empty() {
                FieldValue::Null
            } else {
                FieldValue::Text(text)
            }
        }
        FieldValue::List(items) => {
            if items.is_empty() {
                FieldValue::Null
            } else {
                FieldValue::List(items)
            }
        }
        FieldValue::Json(json) => {
            if json_blank(&json) {
                FieldValue::Null
            } else {
                FieldValue::Json(json)
            }
        }
        scalar => scalar,
    }
}

/// Emptiness of a decoded JSON value.
///
/// JSON null counts as empty so a failed decode is indistinguishable from
/// a genuinely empty value.
fn json_blank(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::String(text) => text.trim().is_empty(),
        JsonValue::Array(items) => items.is_empty(),
        JsonValue::Object(entries) => entries.is_empty(),
        JsonValue::Bool(_) | JsonValue::Number(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{null_if_empty, set_nullable_fields};
    use crate::model::record::Record;
    use crate::model::value::FieldValue;
    use crate::schema::descriptor::{FieldKind, TypeDescriptor};
    use serde_json::json;

    fn contact_descriptor() -> TypeDescriptor {
        let mut descriptor = TypeDescriptor::new("contact");
        descriptor.add_field("middle_name", FieldKind::Text);
        descriptor.add_field("age", FieldKind::Scalar);
        descriptor.add_field("verified", FieldKind::Scalar);
        descriptor.add_field("tags", FieldKind::Collection);
        descriptor.add_field("profile", FieldKind::StructuredJson);
        descriptor.declare_nullable("middle_name");
        descriptor.declare_nullable("age");
        descriptor.declare_nullable("verified");
        descriptor.declare_nullable("tags");
        descriptor.declare_nullable("profile");
        descriptor
    }

    #[test]
    fn blank_text_becomes_null() {
        let descriptor = contact_descriptor();
        assert_eq!(
            null_if_empty(&descriptor, "middle_name", FieldValue::from("")),
            FieldValue::Null
        );
        assert_eq!(
            null_if_empty(&descriptor, "middle_name", FieldValue::from("   ")),
            FieldValue::Null
        );
        assert_eq!(
            null_if_empty(&descriptor, "middle_name", FieldValue::from("\t\n")),
            FieldValue::Null
        );
    }

    #[test]
    fn non_empty_text_is_kept_untrimmed() {
        let descriptor = contact_descriptor();
        assert_eq!(
            null_if_empty(&descriptor, "middle_name", FieldValue::from("  Ada  ")),
            FieldValue::from("  Ada  ")
        );
    }

    #[test]
    fn zero_and_false_are_not_empty() {
        let descriptor = contact_descriptor();
        assert_eq!(
            null_if_empty(&descriptor, "age", FieldValue::from(0_i64)),
            FieldValue::from(0_i64)
        );
        assert_eq!(
            null_if_empty(&descriptor, "age", FieldValue::from(0.0_f64)),
            FieldValue::from(0.0_f64)
        );
        assert_eq!(
            null_if_empty(&descriptor, "verified", FieldValue::from(false)),
            FieldValue::from(false)
        );
    }

    #[test]
    fn empty_collection_becomes_null_non_empty_is_kept() {
        let descriptor = contact_descriptor();
        assert_eq!(
            null_if_empty(&descriptor, "tags", FieldValue::List(vec![])),
            FieldValue::Null
        );

        let tags = FieldValue::List(vec![FieldValue::from("work")]);
        assert_eq!(
            null_if_empty(&descriptor, "tags", tags.clone()),
            tags
        );
    }

    #[test]
    fn structured_without_setter_uses_decoded_value() {
        let descriptor = contact_descriptor();

        assert_eq!(
            null_if_empty(&descriptor, "profile", FieldValue::from("{}")),
            FieldValue::Null
        );
        assert_eq!(
            null_if_empty(&descriptor, "profile", FieldValue::from("[]")),
            FieldValue::Null
        );
        assert_eq!(
            null_if_empty(&descriptor, "profile", FieldValue::from("null")),
            FieldValue::Null
        );

        // Non-empty decode keeps the decoded structure, not the raw text.
        assert_eq!(
            null_if_empty(
                &descriptor,
                "profile",
                FieldValue::from(r#"{"city":"Berlin"}"#)
            ),
            FieldValue::Json(json!({"city": "Berlin"}))
        );
    }

    #[test]
    fn structured_malformed_text_counts_as_empty() {
        let descriptor = contact_descriptor();
        assert_eq!(
            null_if_empty(&descriptor, "profile", FieldValue::from("{not json")),
            FieldValue::Null
        );
    }

    #[test]
    fn structured_with_setter_tests_raw_value() {
        let mut descriptor = contact_descriptor();
        descriptor.set_custom_setter("profile", |value| value);

        // Raw non-empty text survives untouched: no decode happens.
        assert_eq!(
            null_if_empty(
                &descriptor,
                "profile",
                FieldValue::from(r#"{"city":"Berlin"}"#)
            ),
            FieldValue::from(r#"{"city":"Berlin"}"#)
        );
        assert_eq!(
            null_if_empty(&descriptor, "profile", FieldValue::from("   ")),
            FieldValue::Null
        );
    }

    #[test]
    fn structured_decoder_collaborator_is_honored() {
        let mut descriptor = contact_descriptor();
        descriptor.set_json_decoder(|raw| {
            if raw == "empty-sentinel" {
                Some(serde_json::Value::Null)
            } else {
                Some(json!({"raw": raw}))
            }
        });

        assert_eq!(
            null_if_empty(&descriptor, "profile", FieldValue::from("empty-sentinel")),
            FieldValue::Null
        );
        assert_eq!(
            null_if_empty(&descriptor, "profile", FieldValue::from("payload")),
            FieldValue::Json(json!({"raw": "payload"}))
        );
    }

    #[test]
    fn undeclared_field_classifies_by_value_shape() {
        let descriptor = contact_descriptor();
        assert_eq!(
            null_if_empty(&descriptor, "legacy_field", FieldValue::from("  ")),
            FieldValue::Null
        );
        assert_eq!(
            null_if_empty(&descriptor, "legacy_field", FieldValue::List(vec![])),
            FieldValue::Null
        );
        assert_eq!(
            null_if_empty(&descriptor, "legacy_field", FieldValue::from(7_i64)),
            FieldValue::from(7_i64)
        );
    }

    #[test]
    fn kind_mismatch_falls_back_instead_of_failing() {
        let descriptor = contact_descriptor();
        // A collection value showed up in a declared-text field.
        assert_eq!(
            null_if_empty(&descriptor, "middle_name", FieldValue::List(vec![])),
            FieldValue::Null
        );
        // A number showed up in a declared-collection field.
        assert_eq!(
            null_if_empty(&descriptor, "tags", FieldValue::from(3_i64)),
            FieldValue::from(3_i64)
        );
    }

    #[test]
    fn pass_skips_fields_not_in_nullable_set() {
        let descriptor = contact_descriptor();
        let mut record = Record::new("contact");
        record.write_raw("title", FieldValue::from(""));
        record.write_raw("middle_name", FieldValue::from("   "));

        set_nullable_fields(&descriptor, &mut record);

        assert_eq!(record.attr("title"), Some(&FieldValue::from("")));
        assert_eq!(record.attr("middle_name"), Some(&FieldValue::Null));
    }

    #[test]
    fn pass_skips_attributes_absent_from_record() {
        let descriptor = contact_descriptor();
        let mut record = Record::new("contact");

        set_nullable_fields(&descriptor, &mut record);

        assert!(record.attrs().is_empty());
    }

    #[test]
    fn empty_nullable_declaration_is_a_no_op() {
        let mut descriptor = TypeDescriptor::new("contact");
        descriptor.add_field("middle_name", FieldKind::Text);

        let mut record = Record::new("contact");
        record.write_raw("middle_name", FieldValue::from("   "));

        set_nullable_fields(&descriptor, &mut record);

        assert_eq!(record.attr("middle_name"), Some(&FieldValue::from("   ")));
    }

    #[test]
    fn normalization_is_idempotent() {
        let descriptor = contact_descriptor();
        let mut record = Record::new("contact");
        record.write_raw("middle_name", FieldValue::from("   "));
        record.write_raw("tags", FieldValue::List(vec![]));
        record.write_raw("age", FieldValue::from(0_i64));
        record.write_raw("profile", FieldValue::from(r#"{"city":"Berlin"}"#));

        set_nullable_fields(&descriptor, &mut record);
        let after_first = record.clone();
        set_nullable_fields(&descriptor, &mut record);

        assert_eq!(record, after_first);
        assert_eq!(record.attr("middle_name"), Some(&FieldValue::Null));
        assert_eq!(record.attr("tags"), Some(&FieldValue::Null));
        assert_eq!(record.attr("age"), Some(&FieldValue::from(0_i64)));
        assert_eq!(
            record.attr("profile"),
            Some(&FieldValue::Json(json!({"city": "Berlin"})))
        );
    }
}
