//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for words, links and graphs.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes must validate caller fields before persistence.
//! - Multi-step writes run inside one `BEGIN IMMEDIATE` transaction.
//! - Repository APIs return semantic errors (`*NotFound`, `SelfLoop`) in
//!   addition to DB transport errors.

use crate::db::migrations::latest_version;
use crate::db::{schema_version, DbError};
use crate::model::graph::GraphId;
use crate::model::link::LinkId;
use crate::model::validation::ValidationError;
use crate::model::word::WordId;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod graph_repo;
pub mod link_repo;
pub mod word_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error shared by word, link and graph repositories.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    WordNotFound(WordId),
    /// Graph is absent or soft-deleted.
    GraphNotFound(GraphId),
    LinkNotFound(LinkId),
    /// Both endpoints of an edge or link are the same word.
    SelfLoop(WordId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    /// Persisted data cannot be converted to a valid domain record.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::WordNotFound(id) => write!(f, "word not found: {id}"),
            Self::GraphNotFound(id) => write!(f, "graph not found: {id}"),
            Self::LinkNotFound(id) => write!(f, "link not found: {id}"),
            Self::SelfLoop(id) => write!(f, "word cannot be related to itself: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "word graph repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "word graph repository requires table `{table}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted graph data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::WordNotFound(_)
            | Self::GraphNotFound(_)
            | Self::LinkNotFound(_)
            | Self::SelfLoop(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
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

/// Checks schema version and required tables before a repository is handed out.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    tables: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in tables {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn parse_optional_uuid(value: Option<String>, column: &str) -> RepoResult<Option<Uuid>> {
    value.map(|text| parse_uuid(&text, column)).transpose()
}

/// Encodes `refs` as a JSON array; `None` stays SQL NULL.
pub(crate) fn refs_to_db(refs: Option<&[String]>) -> RepoResult<Option<String>> {
    refs.map(|values| {
        serde_json::to_string(values)
            .map_err(|err| RepoError::InvalidData(format!("cannot encode refs: {err}")))
    })
    .transpose()
}

pub(crate) fn refs_from_db(value: Option<String>, column: &str) -> RepoResult<Option<Vec<String>>> {
    value
        .map(|text| {
            serde_json::from_str::<Vec<String>>(&text).map_err(|err| {
                RepoError::InvalidData(format!("invalid refs json in {column}: {err}"))
            })
        })
        .transpose()
}

/// Returns whether a word row with `id` exists. Usable on a transaction via deref.
pub(crate) fn word_exists(conn: &Connection, id: WordId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM words WHERE uuid = ?1);",
        [id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn count_rows(conn: &Connection, table: &'static str) -> RepoResult<u64> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })?;
    u64::try_from(count)
        .map_err(|_| RepoError::InvalidData(format!("negative row count in {table}")))
}
