//! Record type declarations and the in-process type registry.
//!
//! # Responsibility
//! - Define per-type static configuration: field kinds, the nullable-field
//!   set, custom setters, the JSON decode collaborator, pre-save hooks.
//! - Validate declarations before a type becomes registrable.
//!
//! # Invariants
//! - Field kinds are decided once per field at declaration time, never
//!   inferred at runtime for declared fields.
//! - A type name registers exactly once per registry.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod descriptor;
pub mod registry;

/// Declaration and registration errors for record types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    EmptyTypeName,
    EmptyFieldName { type_name: String },
    DuplicateField { type_name: String, field: String },
    EmptyNullableEntry { type_name: String },
    DuplicateNullableEntry { type_name: String, field: String },
    DuplicateType(String),
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTypeName => write!(f, "record type name must not be empty"),
            Self::EmptyFieldName { type_name } => {
                write!(f, "type `{type_name}` declares a field with an empty name")
            }
            Self::DuplicateField { type_name, field } => {
                write!(f, "type `{type_name}` declares field `{field}` more than once")
            }
            Self::EmptyNullableEntry { type_name } => {
                write!(f, "type `{type_name}` declares an empty nullable field name")
            }
            Self::DuplicateNullableEntry { type_name, field } => write!(
                f,
                "type `{type_name}` declares nullable field `{field}` more than once"
            ),
            Self::DuplicateType(type_name) => {
                write!(f, "record type already registered: {type_name}")
            }
        }
    }
}

impl Error for SchemaError {}
