//! Graph catalog repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist Graph containers independently of word content.
//!
//! # Invariants
//! - Soft-deleted graphs are invisible to `get_graph` and `list_graphs`.
//! - Deletion only flips `is_deleted`; word rows stay in place.

use crate::model::graph::{Graph, GraphId, GraphPatch, NewGraph};
use crate::model::profile::UserId;
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const GRAPH_SELECT_SQL: &str = "SELECT
    uuid,
    owner_id,
    name,
    type,
    is_deleted,
    created_at,
    updated_at
FROM graphs";

/// Repository interface for the graph catalog.
pub trait GraphRepository {
    /// Active graphs of one owner, oldest first.
    fn list_graphs(&self, owner_id: &str) -> RepoResult<Vec<Graph>>;
    /// Loads one active graph.
    fn get_graph(&self, id: GraphId) -> RepoResult<Option<Graph>>;
    /// Creates a graph; `default_kind` applies when the input omits a type.
    fn create_graph(&self, owner_id: &str, input: &NewGraph, default_kind: &str)
        -> RepoResult<Graph>;
    /// Applies non-empty patch fields and stamps `updated_at`.
    fn update_graph(&self, id: GraphId, patch: &GraphPatch) -> RepoResult<Graph>;
    /// Sets the delete flag on an active graph.
    fn soft_delete_graph(&self, id: GraphId) -> RepoResult<()>;
}

/// SQLite-backed graph catalog.
pub struct SqliteGraphRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGraphRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["graphs"])?;
        Ok(Self { conn })
    }
}

impl GraphRepository for SqliteGraphRepository<'_> {
    fn list_graphs(&self, owner_id: &str) -> RepoResult<Vec<Graph>> {
        let mut stmt = self.conn.prepare(&format!(
            "{GRAPH_SELECT_SQL}
             WHERE owner_id = ?1
               AND is_deleted = 0
             ORDER BY created_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([owner_id])?;
        let mut graphs = Vec::new();
        while let Some(row) = rows.next()? {
            graphs.push(parse_graph_row(row)?);
        }
        Ok(graphs)
    }

    fn get_graph(&self, id: GraphId) -> RepoResult<Option<Graph>> {
        let mut stmt = self.conn.prepare(&format!(
            "{GRAPH_SELECT_SQL} WHERE uuid = ?1 AND is_deleted = 0;"
        ))?;
        let row = stmt
            .query_row([id.to_string()], |row| Ok(parse_graph_row(row)))
            .optional()?;
        row.transpose()
    }

    fn create_graph(
        &self,
        owner_id: &str,
        input: &NewGraph,
        default_kind: &str,
    ) -> RepoResult<Graph> {
        input.validate()?;
        let id = Uuid::new_v4();
        let kind = input
            .kind
            .as_deref()
            .map(str::trim)
            .unwrap_or(default_kind);
        self.conn.execute(
            "INSERT INTO graphs (uuid, owner_id, name, type) VALUES (?1, ?2, ?3, ?4);",
            params![id.to_string(), owner_id, input.name.trim(), kind],
        )?;
        self.get_graph(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("graph `{id}` missing right after write"))
        })
    }

    fn update_graph(&self, id: GraphId, patch: &GraphPatch) -> RepoResult<Graph> {
        let patch = patch.normalized();
        patch.validate()?;
        let changed = self.conn.execute(
            "UPDATE graphs
             SET
                name = COALESCE(?2, name),
                type = COALESCE(?3, type),
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND is_deleted = 0;",
            params![id.to_string(), patch.name, patch.kind],
        )?;
        if changed == 0 {
            return Err(RepoError::GraphNotFound(id));
        }
        self.get_graph(id)?.ok_or(RepoError::GraphNotFound(id))
    }

    fn soft_delete_graph(&self, id: GraphId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE graphs
             SET
                is_deleted = 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND is_deleted = 0;",
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::GraphNotFound(id));
        }
        Ok(())
    }
}

fn parse_graph_row(row: &Row<'_>) -> RepoResult<Graph> {
    let uuid_text: String = row.get("uuid")?;
    let owner_id: UserId = row.get("owner_id")?;
    let is_deleted = match row.get::<_, i64>("is_deleted")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_deleted value `{other}` in graphs.is_deleted"
            )));
        }
    };

    Ok(Graph {
        id: parse_uuid(&uuid_text, "graphs.uuid")?,
        owner_id,
        name: row.get("name")?,
        kind: row.get("type")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        is_deleted,
    })
}
