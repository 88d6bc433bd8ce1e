//! Canonical record shape for all registered types.
//!
//! # Responsibility
//! - Own the field-name → value attribute map mutated by save pipelines.
//! - Provide lifecycle helpers for soft-delete semantics.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another record.
//! - `write_raw` is the only attribute write that bypasses custom
//!   setters; ordinary assignment goes through `TypeDescriptor::assign`.
//! - `is_deleted` is the source of truth for tombstone state.

use crate::model::value::FieldValue;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Stable identifier for every persisted record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type RecordId = Uuid;

/// In-memory record instance: identity, type link, and attribute map.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Stable global ID used for linking and auditing.
    pub uuid: RecordId,
    /// Name of the registered type descriptor this record belongs to.
    pub type_name: String,
    /// Soft delete tombstone to preserve history.
    pub is_deleted: bool,
    attrs: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Creates a new record with a generated stable ID and empty attributes.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), type_name)
    }

    /// Creates a new record with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(uuid: RecordId, type_name: impl Into<String>) -> Self {
        Self {
            uuid,
            type_name: type_name.into(),
            is_deleted: false,
            attrs: BTreeMap::new(),
        }
    }

    /// Rebuilds a record from storage parts.
    ///
    /// Storage adapters use this after decoding a persisted attribute
    /// document; it performs no normalization of its own.
    pub fn from_parts(
        uuid: RecordId,
        type_name: impl Into<String>,
        attrs: BTreeMap<String, FieldValue>,
        is_deleted: bool,
    ) -> Self {
        Self {
            uuid,
            type_name: type_name.into(),
            is_deleted,
            attrs,
        }
    }

    /// Reads one attribute's current value.
    pub fn attr(&self, field: &str) -> Option<&FieldValue> {
        self.attrs.get(field)
    }

    /// Read access to the full current attribute map.
    pub fn attrs(&self) -> &BTreeMap<String, FieldValue> {
        &self.attrs
    }

    /// Overwrites one attribute's stored value directly.
    ///
    /// This bypasses any custom setter registered for the field. Save-time
    /// normalization writes through this path so its verdict is a final
    /// override, not a value managed by field-specific logic.
    pub fn write_raw(&mut self, field: impl Into<String>, value: FieldValue) {
        self.attrs.insert(field.into(), value);
    }

    /// Marks this record as softly deleted (tombstoned).
    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
    }

    /// Clears the soft delete flag.
    pub fn restore(&mut self) {
        self.is_deleted = false;
    }

    /// Returns whether this record should be considered visible/active.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

#[cfg(test)]
mod tests {
    use super::Record;
    use crate::model::value::FieldValue;

    #[test]
    fn new_record_starts_active_with_empty_attrs() {
        let record = Record::new("contact");
        assert_eq!(record.type_name, "contact");
        assert!(record.is_active());
        assert!(record.attrs().is_empty());
    }

    #[test]
    fn write_raw_overwrites_existing_value() {
        let mut record = Record::new("contact");
        record.write_raw("nickname", FieldValue::from("ada"));
        record.write_raw("nickname", FieldValue::Null);
        assert_eq!(record.attr("nickname"), Some(&FieldValue::Null));
    }

    #[test]
    fn soft_delete_and_restore_toggle_visibility() {
        let mut record = Record::new("contact");
        record.soft_delete();
        assert!(!record.is_active());
        record.restore();
        assert!(record.is_active());
    }
}
