//! In-process registry of record type declarations.
//!
//! # Responsibility
//! - Register each record type exactly once, after validation.
//! - Wire empty-to-null normalization onto every registered type's
//!   pre-save hook list.
//!
//! # Invariants
//! - Registration wires `set_nullable_fields` once per type, never per
//!   record instance.
//! - The normalization hook is appended last, so it runs as a final
//!   override after any host-registered hooks.

use crate::normalize::set_nullable_fields;
use crate::schema::descriptor::TypeDescriptor;
use crate::schema::SchemaError;
use log::debug;
use std::collections::BTreeMap;

/// Registry of validated record type descriptors, keyed by type name.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    entries: BTreeMap<String, TypeDescriptor>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one record type after declaration validation.
    ///
    /// Appends the empty-to-null normalization pre-save hook exactly once,
    /// then stores the descriptor. Duplicate type names are rejected.
    pub fn register(&mut self, mut descriptor: TypeDescriptor) -> Result<(), SchemaError> {
        descriptor.validate()?;
        if self.entries.contains_key(descriptor.name()) {
            return Err(SchemaError::DuplicateType(descriptor.name().to_string()));
        }

        descriptor.register_pre_save(set_nullable_fields);
        debug!(
            "event=type_registered module=schema status=ok type={} nullable_fields={}",
            descriptor.name(),
            descriptor.nullable_fields().len()
        );

        self.entries
            .insert(descriptor.name().to_string(), descriptor);
        Ok(())
    }

    /// Looks up one registered type by name.
    pub fn get(&self, type_name: &str) -> Option<&TypeDescriptor> {
        self.entries.get(type_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
