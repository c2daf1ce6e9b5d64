//! Read-only structural queries over words and adjacency edges.
//!
//! # Responsibility
//! - Answer shortest path, bounded neighbor expansion and graph assembly.
//!
//! # Invariants
//! - Every query runs inside one deferred read transaction (a snapshot);
//!   aborting drops the transaction without touching writers.
//! - Unknown ids produce empty results, never errors.

use crate::context::{CallContext, Interrupt};
use crate::db::DbError;
use crate::model::edge::{AdjacencyEdge, Subgraph};
use crate::model::graph::GraphId;
use crate::model::word::WordId;
use crate::repo::word_repo::{
    load_word, parse_edge_row, parse_word_row, EDGE_SELECT_SQL, WORD_SELECT_SQL,
};
use crate::repo::{word_exists, RepoError};
use log::debug;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod traversal;

use traversal::{AdjacencySource, PathIds};

pub type QueryResult<T> = Result<T, QueryError>;

/// Query-layer error.
#[derive(Debug)]
pub enum QueryError {
    Db(DbError),
    /// Persisted rows could not be decoded.
    InvalidData(String),
    /// Caller cancelled or the deadline passed mid-query.
    Interrupted(Interrupt),
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid graph data: {message}"),
            Self::Interrupted(reason) => write!(f, "{reason}"),
        }
    }
}

impl Error for QueryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
            Self::Interrupted(reason) => Some(reason),
        }
    }
}

impl From<rusqlite::Error> for QueryError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<RepoError> for QueryError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Db(err) => Self::Db(err),
            other => Self::InvalidData(other.to_string()),
        }
    }
}

/// Structural read queries.
pub trait GraphQuery {
    /// Words along one shortest path (endpoints included) plus its edges.
    fn shortest_path(&self, from: WordId, to: WordId, ctx: &CallContext)
        -> QueryResult<Subgraph>;
    /// Edges reachable within `depth` hops of `start`.
    fn neighbors_within_depth(
        &self,
        start: WordId,
        depth: u32,
        ctx: &CallContext,
    ) -> QueryResult<Vec<AdjacencyEdge>>;
    /// All words of a graph plus every edge touching at least one of them.
    fn graph_assembly(&self, graph_id: GraphId, ctx: &CallContext) -> QueryResult<Subgraph>;
}

/// Query engine reading straight from the SQLite store.
pub struct SqliteGraphQuery<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGraphQuery<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn snapshot(&self) -> QueryResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Deferred,
        )?)
    }
}

struct SqliteAdjacency<'a> {
    conn: &'a Connection,
}

impl AdjacencySource for SqliteAdjacency<'_> {
    fn incident_edges(&self, word: WordId) -> QueryResult<Vec<AdjacencyEdge>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "{EDGE_SELECT_SQL}
             WHERE e.source_uuid = ?1
                OR e.target_uuid = ?1
             ORDER BY e.seq ASC;"
        ))?;
        let mut rows = stmt.query([word.to_string()])?;
        let mut edges = Vec::new();
        while let Some(row) = rows.next()? {
            edges.push(parse_edge_row(row)?);
        }
        Ok(edges)
    }
}

impl GraphQuery for SqliteGraphQuery<'_> {
    fn shortest_path(
        &self,
        from: WordId,
        to: WordId,
        ctx: &CallContext,
    ) -> QueryResult<Subgraph> {
        ctx.checkpoint().map_err(QueryError::Interrupted)?;
        let tx = self.snapshot()?;
        if !word_exists(&tx, from)? || !word_exists(&tx, to)? {
            return Ok(Subgraph::empty());
        }

        let adjacency = SqliteAdjacency { conn: &tx };
        let found = traversal::shortest_path(&adjacency, from, to, &|| ctx.checkpoint())?;
        let Some(PathIds { words: ids, edges }) = found else {
            debug!("event=find_path module=query status=unreachable");
            return Ok(Subgraph::empty());
        };

        let mut words = Vec::with_capacity(ids.len());
        for id in ids {
            let word = load_word(&tx, id)?.ok_or_else(|| {
                QueryError::InvalidData(format!("path word `{id}` vanished inside snapshot"))
            })?;
            words.push(word);
        }
        tx.commit()?;
        debug!(
            "event=find_path module=query status=ok hops={}",
            edges.len()
        );
        Ok(Subgraph { words, edges })
    }

    fn neighbors_within_depth(
        &self,
        start: WordId,
        depth: u32,
        ctx: &CallContext,
    ) -> QueryResult<Vec<AdjacencyEdge>> {
        ctx.checkpoint().map_err(QueryError::Interrupted)?;
        if depth == 0 {
            return Ok(Vec::new());
        }
        let tx = self.snapshot()?;
        let adjacency = SqliteAdjacency { conn: &tx };
        let edges = traversal::neighbors_within_depth(&adjacency, start, depth, &|| {
            ctx.checkpoint()
        })?;
        tx.commit()?;
        Ok(edges)
    }

    fn graph_assembly(&self, graph_id: GraphId, ctx: &CallContext) -> QueryResult<Subgraph> {
        ctx.checkpoint().map_err(QueryError::Interrupted)?;
        let graph_uuid = graph_id.to_string();
        let tx = self.snapshot()?;

        let words = {
            let mut stmt = tx.prepare(&format!(
                "{WORD_SELECT_SQL} WHERE graph_uuid = ?1 ORDER BY seq ASC;"
            ))?;
            let mut rows = stmt.query([graph_uuid.as_str()])?;
            let mut words = Vec::new();
            while let Some(row) = rows.next()? {
                words.push(parse_word_row(row)?);
            }
            words
        };

        ctx.checkpoint().map_err(QueryError::Interrupted)?;
        let edges = {
            let mut stmt = tx.prepare(&format!(
                "{EDGE_SELECT_SQL}
                 WHERE e.source_uuid IN (SELECT uuid FROM words WHERE graph_uuid = ?1)
                    OR e.target_uuid IN (SELECT uuid FROM words WHERE graph_uuid = ?1)
                 ORDER BY e.seq ASC;"
            ))?;
            let mut rows = stmt.query([graph_uuid.as_str()])?;
            let mut edges = Vec::new();
            while let Some(row) = rows.next()? {
                edges.push(parse_edge_row(row)?);
            }
            edges
        };

        tx.commit()?;
        Ok(Subgraph { words, edges })
    }
}
