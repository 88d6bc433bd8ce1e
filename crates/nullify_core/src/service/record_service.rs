//! Record use-case service.
//!
//! # Responsibility
//! - Provide stable create/update/get/list entry points for callers.
//! - Resolve type descriptors from the registry and delegate persistence
//!   to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass the repository save pipeline, so every
//!   save runs the type's pre-save hooks.
//! - Service layer remains storage-agnostic.

use crate::model::record::{Record, RecordId};
use crate::model::value::FieldValue;
use crate::repo::record_repo::{RecordListQuery, RecordRepository, RepoError};
use crate::schema::registry::SchemaRegistry;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for record use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// No descriptor registered under the requested type name.
    UnknownType(String),
    /// Target record does not exist.
    RecordNotFound(RecordId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownType(type_name) => write!(f, "unknown record type: `{type_name}`"),
            Self::RecordNotFound(id) => write!(f, "record not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent record state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::RecordNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Use-case service facade over record repositories.
pub struct RecordService<'reg, R: RecordRepository> {
    registry: &'reg SchemaRegistry,
    repo: R,
}

impl<'reg, R: RecordRepository> RecordService<'reg, R> {
    /// Creates a service bound to a type registry and a repository.
    pub fn new(registry: &'reg SchemaRegistry, repo: R) -> Self {
        Self { registry, repo }
    }

    /// Creates one record of a registered type from attribute assignments.
    ///
    /// # Contract
    /// - Assignments route through custom setters where registered.
    /// - The save pipeline runs pre-save hooks before persistence.
    /// - Returns the persisted record read back from storage.
    pub fn create(
        &self,
        type_name: &str,
        attrs: impl IntoIterator<Item = (String, FieldValue)>,
    ) -> Result<Record, ServiceError> {
        let descriptor = self
            .registry
            .get(type_name)
            .ok_or_else(|| ServiceError::UnknownType(type_name.to_string()))?;

        let mut record = Record::new(type_name);
        for (field, value) in attrs {
            descriptor.assign(&mut record, &field, value);
        }

        let id = self.repo.create_record(descriptor, &mut record)?;
        self.repo
            .get_record(id, false)?
            .ok_or(ServiceError::InconsistentState(
                "created record missing in read-back",
            ))
    }

    /// Saves changes to an existing record.
    ///
    /// The record is mutated in place by the save pipeline; the returned
    /// value is the persisted state read back from storage.
    pub fn update(&self, record: &mut Record) -> Result<Record, ServiceError> {
        let descriptor = self
            .registry
            .get(&record.type_name)
            .ok_or_else(|| ServiceError::UnknownType(record.type_name.clone()))?;

        self.repo.update_record(descriptor, record)?;
        self.repo
            .get_record(record.uuid, true)?
            .ok_or(ServiceError::InconsistentState(
                "updated record missing in read-back",
            ))
    }

    /// Gets one record by ID with optional deleted-row visibility.
    pub fn get(
        &self,
        id: RecordId,
        include_deleted: bool,
    ) -> Result<Option<Record>, ServiceError> {
        Ok(self.repo.get_record(id, include_deleted)?)
    }

    /// Lists records using filter and pagination options.
    pub fn list(&self, query: &RecordListQuery) -> Result<Vec<Record>, ServiceError> {
        Ok(self.repo.list_records(query)?)
    }

    /// Soft-deletes a record by ID.
    pub fn soft_delete(&self, id: RecordId) -> Result<(), ServiceError> {
        Ok(self.repo.soft_delete_record(id)?)
    }
}
