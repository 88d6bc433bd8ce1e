//! Empty-to-null normalization for field-mapped persisted records.
//!
//! Record types declare a set of nullable fields; immediately before each
//! save, attributes in that set whose values are semantically empty
//! (blank text, empty collections, empty decoded JSON) are rewritten to
//! the explicit `FieldValue::Null` absence marker instead of being
//! persisted as empty strings or empty structures. Everything else passes
//! through untouched.

pub mod db;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod repo;
pub mod schema;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{Record, RecordId};
pub use model::value::FieldValue;
pub use normalize::{null_if_empty, set_nullable_fields};
pub use repo::record_repo::{
    RecordListQuery, RecordRepository, RepoError, RepoResult, SqliteRecordRepository,
};
pub use schema::descriptor::{FieldKind, FieldSpec, TypeDescriptor};
pub use schema::registry::SchemaRegistry;
pub use schema::SchemaError;
pub use service::record_service::{RecordService, ServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
