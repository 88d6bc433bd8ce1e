//! Record repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over canonical `records` storage.
//! - Keep SQL and attribute-document encoding inside the persistence
//!   boundary.
//!
//! # Invariants
//! - Write paths run `TypeDescriptor::run_pre_save` before SQL mutations;
//!   the caller observes the normalized attribute map afterwards.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::record::{Record, RecordId};
use crate::model::value::FieldValue;
use crate::schema::descriptor::TypeDescriptor;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const RECORD_SELECT_SQL: &str = "SELECT
    uuid,
    type,
    attrs,
    is_deleted
FROM records";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(RecordId),
    TypeMismatch {
        descriptor: String,
        record: String,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::TypeMismatch { descriptor, record } => write!(
                f,
                "descriptor `{descriptor}` cannot save record of type `{record}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing records.
#[derive(Debug, Clone, Default)]
pub struct RecordListQuery {
    pub type_name: Option<String>,
    pub include_deleted: bool,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for record CRUD operations.
///
/// Save paths take the record mutably: pre-save hooks rewrite empty
/// nullable attributes in place before persistence, and the caller keeps
/// the mutated instance.
pub trait RecordRepository {
    fn create_record(
        &self,
        descriptor: &TypeDescriptor,
        record: &mut Record,
    ) -> RepoResult<RecordId>;
    fn update_record(&self, descriptor: &TypeDescriptor, record: &mut Record) -> RepoResult<()>;
    fn get_record(&self, id: RecordId, include_deleted: bool) -> RepoResult<Option<Record>>;
    fn list_records(&self, query: &RecordListQuery) -> RepoResult<Vec<Record>>;
    fn soft_delete_record(&self, id: RecordId) -> RepoResult<()>;
}

/// SQLite-backed record repository.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn create_record(
        &self,
        descriptor: &TypeDescriptor,
        record: &mut Record,
    ) -> RepoResult<RecordId> {
        ensure_descriptor_matches(descriptor, record)?;
        descriptor.run_pre_save(record);

        self.conn.execute(
            "INSERT INTO records (uuid, type, attrs, is_deleted)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                record.uuid.to_string(),
                record.type_name.as_str(),
                encode_attrs(record)?,
                bool_to_int(record.is_deleted),
            ],
        )?;

        Ok(record.uuid)
    }

    fn update_record(&self, descriptor: &TypeDescriptor, record: &mut Record) -> RepoResult<()> {
        ensure_descriptor_matches(descriptor, record)?;
        descriptor.run_pre_save(record);

        let changed = self.conn.execute(
            "UPDATE records
             SET
                attrs = ?1,
                is_deleted = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?3;",
            params![
                encode_attrs(record)?,
                bool_to_int(record.is_deleted),
                record.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(record.uuid));
        }

        Ok(())
    }

    fn get_record(&self, id: RecordId, include_deleted: bool) -> RepoResult<Option<Record>> {
        let mut stmt = self.conn.prepare(&format!(
            "{RECORD_SELECT_SQL}
             WHERE uuid = ?1
               AND (?2 = 1 OR is_deleted = 0);"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), bool_to_int(include_deleted)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_record_row(row)?));
        }

        Ok(None)
    }

    fn list_records(&self, query: &RecordListQuery) -> RepoResult<Vec<Record>> {
        let mut sql = format!("{RECORD_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if !query.include_deleted {
            sql.push_str(" AND is_deleted = 0");
        }

        if let Some(type_name) = &query.type_name {
            sql.push_str(" AND type = ?");
            bind_values.push(Value::Text(type_name.clone()));
        }

        sql.push_str(" ORDER BY updated_at DESC, uuid ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }

        Ok(records)
    }

    fn soft_delete_record(&self, id: RecordId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE records
             SET
                is_deleted = 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn ensure_descriptor_matches(descriptor: &TypeDescriptor, record: &Record) -> RepoResult<()> {
    if descriptor.name() != record.type_name {
        return Err(RepoError::TypeMismatch {
            descriptor: descriptor.name().to_string(),
            record: record.type_name.clone(),
        });
    }
    Ok(())
}

fn encode_attrs(record: &Record) -> RepoResult<String> {
    serde_json::to_string(record.attrs()).map_err(|err| {
        RepoError::InvalidData(format!(
            "cannot encode attrs document for record {}: {err}",
            record.uuid
        ))
    })
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<Record> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in records.uuid"))
    })?;

    let attrs_doc: String = row.get("attrs")?;
    let attrs: BTreeMap<String, FieldValue> = serde_json::from_str(&attrs_doc).map_err(|err| {
        RepoError::InvalidData(format!("invalid attrs document for record {uuid}: {err}"))
    })?;

    let is_deleted = match row.get::<_, i64>("is_deleted")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_deleted value `{other}` in records.is_deleted"
            )));
        }
    };

    let type_name: String = row.get("type")?;
    Ok(Record::from_parts(uuid, type_name, attrs, is_deleted))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
