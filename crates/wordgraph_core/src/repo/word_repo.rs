//! Word repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist Word nodes, their graph containment and bare adjacency edges.
//! - Keep cascade semantics of word deletion inside one transaction.
//!
//! # Invariants
//! - Words are only created inside an active (not soft-deleted) graph.
//! - Deleting a Word removes every Link and adjacency edge touching it.
//! - Adjacency edges never dangle: both endpoints must exist at insert time.

use crate::model::edge::{AdjacencyEdge, Subgraph};
use crate::model::graph::GraphId;
use crate::model::word::{Word, WordFields, WordId};
use crate::repo::{
    count_rows, ensure_connection_ready, parse_optional_uuid, parse_uuid, refs_from_db,
    refs_to_db, word_exists, RepoError, RepoResult,
};
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, Transaction, TransactionBehavior,
};
use uuid::Uuid;

pub(crate) const WORD_SELECT_SQL: &str = "SELECT
    uuid,
    graph_uuid,
    owner_id,
    content,
    description,
    refs,
    created_at,
    updated_at
FROM words";

pub(crate) const EDGE_SELECT_SQL: &str = "SELECT
    e.uuid AS uuid,
    e.source_uuid AS source_uuid,
    e.target_uuid AS target_uuid,
    e.link_uuid AS link_uuid
FROM word_edges e";

/// Repository interface for Word nodes and bare adjacency edges.
pub trait WordRepository {
    /// Creates a Word in `graph_id`, optionally with one edge `word -> anchor`.
    fn create_word(
        &self,
        graph_id: GraphId,
        owner_id: &str,
        fields: &WordFields,
        anchor: Option<WordId>,
    ) -> RepoResult<Word>;
    /// Replaces editable fields and stamps `updated_at`.
    fn update_word(&self, id: WordId, fields: &WordFields) -> RepoResult<Word>;
    /// Hard-deletes one Word with its Links and adjacency edges.
    fn delete_word(&self, id: WordId) -> RepoResult<()>;
    fn find_by_id(&self, id: WordId) -> RepoResult<Option<Word>>;
    /// Bulk lookup; unknown ids are skipped, result order is insertion order.
    fn find_by_ids(&self, ids: &[WordId]) -> RepoResult<Vec<Word>>;
    /// Uniform sample over all Words; `None` when the store is empty.
    fn random_word(&self) -> RepoResult<Option<Word>>;
    /// Words of one graph plus edges with both endpoints inside it.
    fn find_by_graph_id(&self, graph_id: GraphId) -> RepoResult<Subgraph>;
    /// Inserts one unbound edge `source -> target` without deduplication.
    fn create_adjacency_edge(&self, source: WordId, target: WordId) -> RepoResult<AdjacencyEdge>;
    fn count_words(&self) -> RepoResult<u64>;
}

/// SQLite-backed word repository.
pub struct SqliteWordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWordRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["graphs", "words", "word_edges"])?;
        Ok(Self { conn })
    }
}

impl WordRepository for SqliteWordRepository<'_> {
    fn create_word(
        &self,
        graph_id: GraphId,
        owner_id: &str,
        fields: &WordFields,
        anchor: Option<WordId>,
    ) -> RepoResult<Word> {
        fields.validate()?;
        let refs = refs_to_db(fields.refs.as_deref())?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !graph_is_active(&tx, graph_id)? {
            return Err(RepoError::GraphNotFound(graph_id));
        }
        if let Some(anchor) = anchor {
            if !word_exists(&tx, anchor)? {
                return Err(RepoError::WordNotFound(anchor));
            }
        }

        let word_id = Uuid::new_v4();
        tx.execute(
            "INSERT INTO words (
                uuid,
                graph_uuid,
                owner_id,
                content,
                description,
                refs
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                word_id.to_string(),
                graph_id.to_string(),
                owner_id,
                fields.content,
                fields.description,
                refs,
            ],
        )?;
        if let Some(anchor) = anchor {
            insert_edge(&tx, word_id, anchor, None)?;
        }

        let word = load_required_word(&tx, word_id)?;
        tx.commit()?;
        Ok(word)
    }

    fn update_word(&self, id: WordId, fields: &WordFields) -> RepoResult<Word> {
        fields.validate()?;
        let refs = refs_to_db(fields.refs.as_deref())?;

        let changed = self.conn.execute(
            "UPDATE words
             SET
                content = ?2,
                description = ?3,
                refs = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![id.to_string(), fields.content, fields.description, refs],
        )?;
        if changed == 0 {
            return Err(RepoError::WordNotFound(id));
        }

        load_required_word(self.conn, id)
    }

    fn delete_word(&self, id: WordId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let word_uuid = id.to_string();
        // Explicit cleanup keeps the cascade independent of FK enforcement.
        tx.execute(
            "DELETE FROM word_edges WHERE source_uuid = ?1 OR target_uuid = ?1;",
            [word_uuid.as_str()],
        )?;
        tx.execute(
            "DELETE FROM links WHERE word1_uuid = ?1 OR word2_uuid = ?1;",
            [word_uuid.as_str()],
        )?;
        let changed = tx.execute("DELETE FROM words WHERE uuid = ?1;", [word_uuid.as_str()])?;
        if changed == 0 {
            return Err(RepoError::WordNotFound(id));
        }
        tx.commit()?;
        Ok(())
    }

    fn find_by_id(&self, id: WordId) -> RepoResult<Option<Word>> {
        load_word(self.conn, id)
    }

    fn find_by_ids(&self, ids: &[WordId]) -> RepoResult<Vec<Word>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("{WORD_SELECT_SQL} WHERE uuid IN ({placeholders}) ORDER BY seq ASC;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(ids.iter().map(Uuid::to_string)))?;
        let mut words = Vec::new();
        while let Some(row) = rows.next()? {
            words.push(parse_word_row(row)?);
        }
        Ok(words)
    }

    fn random_word(&self) -> RepoResult<Option<Word>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{WORD_SELECT_SQL} ORDER BY random() LIMIT 1;"))?;
        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_word_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_by_graph_id(&self, graph_id: GraphId) -> RepoResult<Subgraph> {
        let graph_uuid = graph_id.to_string();
        // Words and edges come from one read snapshot.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
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

        let edges = {
            let mut stmt = tx.prepare(&format!(
                "{EDGE_SELECT_SQL}
                 INNER JOIN words s ON s.uuid = e.source_uuid
                 INNER JOIN words t ON t.uuid = e.target_uuid
                 WHERE s.graph_uuid = ?1
                   AND t.graph_uuid = ?1
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

    fn create_adjacency_edge(&self, source: WordId, target: WordId) -> RepoResult<AdjacencyEdge> {
        if source == target {
            return Err(RepoError::SelfLoop(source));
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for endpoint in [source, target] {
            if !word_exists(&tx, endpoint)? {
                return Err(RepoError::WordNotFound(endpoint));
            }
        }
        let edge = insert_edge(&tx, source, target, None)?;
        tx.commit()?;
        Ok(edge)
    }

    fn count_words(&self) -> RepoResult<u64> {
        count_rows(self.conn, "words")
    }
}

/// Inserts one edge; callers guarantee both endpoints exist.
pub(crate) fn insert_edge(
    conn: &Connection,
    source: WordId,
    target: WordId,
    link_id: Option<Uuid>,
) -> RepoResult<AdjacencyEdge> {
    let edge = AdjacencyEdge {
        id: Uuid::new_v4(),
        source_id: source,
        target_id: target,
        link_id,
    };
    conn.execute(
        "INSERT INTO word_edges (uuid, source_uuid, target_uuid, link_uuid)
         VALUES (?1, ?2, ?3, ?4);",
        params![
            edge.id.to_string(),
            source.to_string(),
            target.to_string(),
            link_id.map(|value| value.to_string()),
        ],
    )?;
    Ok(edge)
}

pub(crate) fn load_word(conn: &Connection, id: WordId) -> RepoResult<Option<Word>> {
    let mut stmt = conn.prepare(&format!("{WORD_SELECT_SQL} WHERE uuid = ?1;"))?;
    let row = stmt
        .query_row([id.to_string()], |row| Ok(parse_word_row(row)))
        .optional()?;
    row.transpose()
}

fn load_required_word(conn: &Connection, id: WordId) -> RepoResult<Word> {
    load_word(conn, id)?.ok_or_else(|| {
        RepoError::InvalidData(format!("word `{id}` missing right after write"))
    })
}

fn graph_is_active(conn: &Connection, graph_id: GraphId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM graphs
            WHERE uuid = ?1
              AND is_deleted = 0
        );",
        [graph_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn parse_word_row(row: &Row<'_>) -> RepoResult<Word> {
    let uuid_text: String = row.get("uuid")?;
    let graph_text: String = row.get("graph_uuid")?;
    Ok(Word {
        id: parse_uuid(&uuid_text, "words.uuid")?,
        graph_id: parse_uuid(&graph_text, "words.graph_uuid")?,
        owner_id: row.get("owner_id")?,
        content: row.get("content")?,
        description: row.get("description")?,
        refs: refs_from_db(row.get("refs")?, "words.refs")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub(crate) fn parse_edge_row(row: &Row<'_>) -> RepoResult<AdjacencyEdge> {
    let uuid_text: String = row.get("uuid")?;
    let source_text: String = row.get("source_uuid")?;
    let target_text: String = row.get("target_uuid")?;
    Ok(AdjacencyEdge {
        id: parse_uuid(&uuid_text, "word_edges.uuid")?,
        source_id: parse_uuid(&source_text, "word_edges.source_uuid")?,
        target_id: parse_uuid(&target_text, "word_edges.target_uuid")?,
        link_id: parse_optional_uuid(row.get("link_uuid")?, "word_edges.link_uuid")?,
    })
}
