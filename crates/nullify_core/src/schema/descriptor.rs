//! Record type declaration: fields, nullable set, setters, hooks.
//!
//! # Responsibility
//! - Hold one record type's static configuration.
//! - Route ordinary attribute assignment through custom setters.
//! - Run pre-save hooks in registration order.
//!
//! # Invariants
//! - `validate()` must pass before a descriptor is registered.
//! - The nullable-field list keeps declaration order and is read-only to
//!   save-time normalization.
//! - Hooks run synchronously; none of them may fail.

use crate::model::record::Record;
use crate::model::value::FieldValue;
use crate::schema::SchemaError;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Declared value shape for one field, decided once at declaration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain text; blank after trimming counts as empty.
    Text,
    /// Non-text scalar (number/boolean); never empty.
    Scalar,
    /// Native collection; zero elements counts as empty.
    Collection,
    /// Persisted as encoded JSON text, logically structured.
    StructuredJson,
}

impl FieldKind {
    /// Stable string id used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Scalar => "scalar",
            Self::Collection => "collection",
            Self::StructuredJson => "structured_json",
        }
    }
}

/// One declared field: name plus its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

type SetterFn = Arc<dyn Fn(FieldValue) -> FieldValue + Send + Sync>;
type JsonDecodeFn = Arc<dyn Fn(&str) -> Option<JsonValue> + Send + Sync>;
type PreSaveHook = Arc<dyn Fn(&TypeDescriptor, &mut Record) + Send + Sync>;

/// Static configuration for one record type.
pub struct TypeDescriptor {
    name: String,
    fields: Vec<FieldSpec>,
    nullable: Vec<String>,
    setters: BTreeMap<String, SetterFn>,
    json_decoder: Option<JsonDecodeFn>,
    pre_save: Vec<PreSaveHook>,
}

impl TypeDescriptor {
    /// Creates an empty declaration for the given type name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            nullable: Vec::new(),
            setters: BTreeMap::new(),
            json_decoder: None,
            pre_save: Vec::new(),
        }
    }

    /// Declares one field with its kind.
    pub fn add_field(&mut self, name: impl Into<String>, kind: FieldKind) {
        self.fields.push(FieldSpec {
            name: name.into(),
            kind,
        });
    }

    /// Marks one field name as eligible for empty-to-null normalization.
    ///
    /// Declaration order is preserved. Names do not have to appear in the
    /// field declarations; undeclared names classify by value shape.
    pub fn declare_nullable(&mut self, name: impl Into<String>) {
        self.nullable.push(name.into());
    }

    /// Registers a custom setter for one field.
    ///
    /// `assign` routes through the setter; normalization's verdict write
    /// does not.
    pub fn set_custom_setter(
        &mut self,
        name: impl Into<String>,
        setter: impl Fn(FieldValue) -> FieldValue + Send + Sync + 'static,
    ) {
        self.setters.insert(name.into(), Arc::new(setter));
    }

    /// Installs the type's JSON decode collaborator.
    ///
    /// Absent a registered decoder, `decode_json_text` falls back to a
    /// generic `serde_json` decode.
    pub fn set_json_decoder(
        &mut self,
        decoder: impl Fn(&str) -> Option<JsonValue> + Send + Sync + 'static,
    ) {
        self.json_decoder = Some(Arc::new(decoder));
    }

    /// Appends one pre-save hook.
    ///
    /// Hooks fire synchronously, in registration order, immediately before
    /// each save attempt on any record of this type.
    pub fn register_pre_save(
        &mut self,
        hook: impl Fn(&TypeDescriptor, &mut Record) + Send + Sync + 'static,
    ) {
        self.pre_save.push(Arc::new(hook));
    }

    /// Record type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Declared kind for one field name, when the field is known.
    pub fn field_kind(&self, name: &str) -> Option<FieldKind> {
        self.fields
            .iter()
            .find(|spec| spec.name == name)
            .map(|spec| spec.kind)
    }

    /// Nullable-field names in declaration order.
    pub fn nullable_fields(&self) -> &[String] {
        &self.nullable
    }

    /// Returns whether a custom setter is registered for the field.
    pub fn has_custom_setter(&self, name: &str) -> bool {
        self.setters.contains_key(name)
    }

    /// Number of registered pre-save hooks.
    pub fn pre_save_hook_count(&self) -> usize {
        self.pre_save.len()
    }

    /// Decodes encoded structured text to its in-memory JSON value.
    ///
    /// Uses the registered decode collaborator when present, else a
    /// generic `serde_json` decode. Returns `None` on malformed input;
    /// callers treat that the same as a genuinely empty value.
    pub fn decode_json_text(&self, raw: &str) -> Option<JsonValue> {
        match &self.json_decoder {
            Some(decoder) => decoder(raw),
            None => serde_json::from_str(raw).ok(),
        }
    }

    /// Ordinary attribute assignment.
    ///
    /// Routes through the field's custom setter when one is registered,
    /// otherwise stores the value as given.
    pub fn assign(&self, record: &mut Record, field: &str, value: FieldValue) {
        let stored = match self.setters.get(field) {
            Some(setter) => setter(value),
            None => value,
        };
        record.write_raw(field, stored);
    }

    /// Fires all pre-save hooks for one record instance.
    pub fn run_pre_save(&self, record: &mut Record) {
        for hook in &self.pre_save {
            hook(self, record);
        }
    }

    /// Validates declaration-level invariants.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::EmptyTypeName);
        }

        let mut seen_fields = std::collections::BTreeSet::new();
        for spec in &self.fields {
            if spec.name.trim().is_empty() {
                return Err(SchemaError::EmptyFieldName {
                    type_name: self.name.clone(),
                });
            }
            if !seen_fields.insert(spec.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    type_name: self.name.clone(),
                    field: spec.name.clone(),
                });
            }
        }

        let mut seen_nullable = std::collections::BTreeSet::new();
        for name in &self.nullable {
            if name.trim().is_empty() {
                return Err(SchemaError::EmptyNullableEntry {
                    type_name: self.name.clone(),
                });
            }
            if !seen_nullable.insert(name.as_str()) {
                return Err(SchemaError::DuplicateNullableEntry {
                    type_name: self.name.clone(),
                    field: name.clone(),
                });
            }
        }

        Ok(())
    }
}

impl Debug for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("nullable", &self.nullable)
            .field("setters", &self.setters.keys().collect::<Vec<_>>())
            .field("has_json_decoder", &self.json_decoder.is_some())
            .field("pre_save_hooks", &self.pre_save.len())
            .finish()
    }
}
