//! Domain model for field-mapped persisted records.
//!
//! # Responsibility
//! - Define the dynamic attribute value representation (`FieldValue`).
//! - Define the canonical record shape shared by all registered types.
//!
//! # Invariants
//! - `FieldValue::Null` is the only absence marker; empty strings and
//!   empty collections are ordinary values until save-time normalization
//!   rewrites them.
//! - Every record is identified by a stable `RecordId`.
//! - Deletion is represented by soft-delete tombstones, not hard delete.

pub mod record;
pub mod value;
