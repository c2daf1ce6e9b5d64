//! Engine facade owning one store connection.
//!
//! # Responsibility
//! - Open the store with an explicit, validated configuration.
//! - Hand out services borrowing the connection for one unit of work.
//!
//! # Invariants
//! - One `Engine` per thread; the connection is `Send` but not `Sync`.
//! - No global state: two engines never share configuration or connection.

use crate::config::{ConfigError, EngineConfig};
use crate::db::{open_db, open_db_in_memory, schema_version, DbError};
use crate::query::SqliteGraphQuery;
use crate::repo::graph_repo::SqliteGraphRepository;
use crate::repo::link_repo::{LinkRepository, SqliteLinkRepository};
use crate::repo::word_repo::{SqliteWordRepository, WordRepository};
use crate::repo::RepoError;
use crate::search::fts::SqliteTextIndex;
use crate::service::explore_service::ExploreService;
use crate::service::graph_service::GraphService;
use crate::service::link_service::LinkService;
use crate::service::word_service::WordService;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type SqliteWordService<'conn> =
    WordService<SqliteWordRepository<'conn>, SqliteGraphRepository<'conn>>;
pub type SqliteLinkService<'conn> =
    LinkService<SqliteLinkRepository<'conn>, SqliteWordRepository<'conn>>;
pub type SqliteGraphService<'conn> = GraphService<SqliteGraphRepository<'conn>>;
pub type SqliteExploreService<'conn> =
    ExploreService<SqliteGraphQuery<'conn>, SqliteTextIndex<'conn>>;

/// Engine construction or wiring failure.
#[derive(Debug)]
pub enum EngineError {
    Config(ConfigError),
    Db(DbError),
    Repo(RepoError),
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid engine config: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for EngineError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for EngineError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Row counts and schema version of an open store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub schema_version: u32,
    pub words: u64,
    pub links: u64,
}

/// Word graph engine bound to one SQLite connection.
pub struct Engine {
    conn: Connection,
    config: EngineConfig,
}

impl Engine {
    /// Opens (or creates) a file-backed store.
    pub fn open(path: impl AsRef<Path>, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let conn = open_db(path)?;
        Ok(Self { conn, config })
    }

    /// Opens an independent, empty in-memory store.
    pub fn open_in_memory(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let conn = open_db_in_memory()?;
        Ok(Self { conn, config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn graphs(&self) -> Result<SqliteGraphService<'_>, EngineError> {
        Ok(GraphService::new(
            SqliteGraphRepository::try_new(&self.conn)?,
            self.config.default_graph_type.clone(),
        ))
    }

    pub fn words(&self) -> Result<SqliteWordService<'_>, EngineError> {
        Ok(WordService::new(
            SqliteWordRepository::try_new(&self.conn)?,
            SqliteGraphRepository::try_new(&self.conn)?,
        ))
    }

    pub fn links(&self) -> Result<SqliteLinkService<'_>, EngineError> {
        Ok(LinkService::new(
            SqliteLinkRepository::try_new(&self.conn)?,
            SqliteWordRepository::try_new(&self.conn)?,
        ))
    }

    pub fn explore(&self) -> SqliteExploreService<'_> {
        ExploreService::new(
            SqliteGraphQuery::new(&self.conn),
            SqliteTextIndex::new(&self.conn),
            self.config.clone(),
        )
    }

    pub fn stats(&self) -> Result<StoreStats, EngineError> {
        Ok(StoreStats {
            schema_version: schema_version(&self.conn)?,
            words: SqliteWordRepository::try_new(&self.conn)?.count_words()?,
            links: SqliteLinkRepository::try_new(&self.conn)?.count_links()?,
        })
    }
}
