//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define record data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Save paths must run the type's pre-save hooks before SQL mutations,
//!   so empty-to-null normalization is a visible pipeline step.
//! - Repository APIs return semantic errors (`NotFound`) in addition to
//!   DB transport errors.

pub mod record_repo;
