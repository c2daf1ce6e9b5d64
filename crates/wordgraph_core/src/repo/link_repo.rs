//! Link repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist labeled Links between two Words.
//! - Keep every Link bound to exactly one adjacency edge.
//!
//! # Invariants
//! - Pair lookups are symmetric: `(a, b)` and `(b, a)` address the same Link.
//! - `upsert_link` checks endpoints, finds the pair and writes in one
//!   `BEGIN IMMEDIATE` transaction; the unordered-pair UNIQUE index backs it.
//! - Removing a pair removes the Link and every edge between the two Words.

use crate::model::link::{Link, LinkFields, LinkId};
use crate::model::word::WordId;
use crate::repo::word_repo::insert_edge;
use crate::repo::{
    count_rows, ensure_connection_ready, parse_uuid, refs_from_db, refs_to_db, word_exists,
    RepoError, RepoResult,
};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const LINK_SELECT_SQL: &str = "SELECT
    uuid,
    word1_uuid,
    word2_uuid,
    owner_id,
    content,
    description,
    refs,
    created_at,
    updated_at
FROM links";

/// Outcome of [`LinkRepository::upsert_link`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkUpsert {
    pub link: Link,
    /// `false` when an existing Link for the pair was updated in place.
    pub created: bool,
}

/// Rows removed by [`LinkRepository::delete_link_by_pair`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairRemoval {
    pub link_removed: bool,
    pub edges_removed: usize,
}

/// Repository interface for Link records.
pub trait LinkRepository {
    /// Creates the Link for `{word1, word2}` or updates the existing one.
    fn upsert_link(
        &self,
        word1: WordId,
        word2: WordId,
        owner_id: &str,
        fields: &LinkFields,
    ) -> RepoResult<LinkUpsert>;
    /// Replaces editable fields and stamps `updated_at`.
    fn update_link(&self, id: LinkId, fields: &LinkFields) -> RepoResult<Link>;
    /// Removes the Link and all adjacency edges between `a` and `b`.
    fn delete_link_by_pair(&self, a: WordId, b: WordId) -> RepoResult<PairRemoval>;
    fn find_link_by_id(&self, id: LinkId) -> RepoResult<Option<Link>>;
    fn find_link_by_pair(&self, a: WordId, b: WordId) -> RepoResult<Option<Link>>;
    fn count_links(&self) -> RepoResult<u64>;
}

/// SQLite-backed link repository.
pub struct SqliteLinkRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLinkRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["words", "links", "word_edges"])?;
        Ok(Self { conn })
    }
}

impl LinkRepository for SqliteLinkRepository<'_> {
    fn upsert_link(
        &self,
        word1: WordId,
        word2: WordId,
        owner_id: &str,
        fields: &LinkFields,
    ) -> RepoResult<LinkUpsert> {
        if word1 == word2 {
            return Err(RepoError::SelfLoop(word1));
        }
        fields.validate()?;
        let refs = refs_to_db(fields.refs.as_deref())?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for endpoint in [word1, word2] {
            if !word_exists(&tx, endpoint)? {
                return Err(RepoError::WordNotFound(endpoint));
            }
        }

        let (link_id, created) = match load_link_by_pair(&tx, word1, word2)? {
            Some(existing) => {
                tx.execute(
                    "UPDATE links
                     SET
                        content = ?2,
                        description = ?3,
                        refs = ?4,
                        updated_at = (strftime('%s', 'now') * 1000)
                     WHERE uuid = ?1;",
                    params![
                        existing.id.to_string(),
                        fields.content,
                        fields.description,
                        refs,
                    ],
                )?;
                (existing.id, false)
            }
            None => {
                let link_id = Uuid::new_v4();
                tx.execute(
                    "INSERT INTO links (
                        uuid,
                        word1_uuid,
                        word2_uuid,
                        owner_id,
                        content,
                        description,
                        refs
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                    params![
                        link_id.to_string(),
                        word1.to_string(),
                        word2.to_string(),
                        owner_id,
                        fields.content,
                        fields.description,
                        refs,
                    ],
                )?;
                (link_id, true)
            }
        };

        bind_edge(&tx, link_id, word1, word2)?;
        let link = load_link(&tx, link_id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("link `{link_id}` missing right after write"))
        })?;
        tx.commit()?;
        Ok(LinkUpsert { link, created })
    }

    fn update_link(&self, id: LinkId, fields: &LinkFields) -> RepoResult<Link> {
        fields.validate()?;
        let refs = refs_to_db(fields.refs.as_deref())?;

        let changed = self.conn.execute(
            "UPDATE links
             SET
                content = ?2,
                description = ?3,
                refs = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![id.to_string(), fields.content, fields.description, refs],
        )?;
        if changed == 0 {
            return Err(RepoError::LinkNotFound(id));
        }

        load_link(self.conn, id)?.ok_or(RepoError::LinkNotFound(id))
    }

    fn delete_link_by_pair(&self, a: WordId, b: WordId) -> RepoResult<PairRemoval> {
        let (a_text, b_text) = (a.to_string(), b.to_string());
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let edges_removed = tx.execute(
            "DELETE FROM word_edges
             WHERE (source_uuid = ?1 AND target_uuid = ?2)
                OR (source_uuid = ?2 AND target_uuid = ?1);",
            params![a_text, b_text],
        )?;
        let links_removed = tx.execute(
            "DELETE FROM links
             WHERE (word1_uuid = ?1 AND word2_uuid = ?2)
                OR (word1_uuid = ?2 AND word2_uuid = ?1);",
            params![a_text, b_text],
        )?;
        tx.commit()?;

        Ok(PairRemoval {
            link_removed: links_removed > 0,
            edges_removed,
        })
    }

    fn find_link_by_id(&self, id: LinkId) -> RepoResult<Option<Link>> {
        load_link(self.conn, id)
    }

    fn find_link_by_pair(&self, a: WordId, b: WordId) -> RepoResult<Option<Link>> {
        load_link_by_pair(self.conn, a, b)
    }

    fn count_links(&self) -> RepoResult<u64> {
        count_rows(self.conn, "links")
    }
}

/// Makes sure exactly one edge between the pair carries `link_id`.
///
/// Adopts the oldest unbound edge of the pair when present, otherwise
/// inserts a new bound edge `word1 -> word2`.
fn bind_edge(conn: &Connection, link_id: LinkId, word1: WordId, word2: WordId) -> RepoResult<()> {
    let link_uuid = link_id.to_string();
    let bound: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM word_edges WHERE link_uuid = ?1);",
        [link_uuid.as_str()],
        |row| row.get(0),
    )?;
    if bound == 1 {
        return Ok(());
    }

    let adopted = conn.execute(
        "UPDATE word_edges
         SET link_uuid = ?1
         WHERE seq = (
            SELECT seq
            FROM word_edges
            WHERE link_uuid IS NULL
              AND (
                (source_uuid = ?2 AND target_uuid = ?3)
                OR (source_uuid = ?3 AND target_uuid = ?2)
              )
            ORDER BY seq ASC
            LIMIT 1
         );",
        params![link_uuid, word1.to_string(), word2.to_string()],
    )?;
    if adopted == 0 {
        insert_edge(conn, word1, word2, Some(link_id))?;
    }
    Ok(())
}

fn load_link(conn: &Connection, id: LinkId) -> RepoResult<Option<Link>> {
    let mut stmt = conn.prepare(&format!("{LINK_SELECT_SQL} WHERE uuid = ?1;"))?;
    let row = stmt
        .query_row([id.to_string()], |row| Ok(parse_link_row(row)))
        .optional()?;
    row.transpose()
}

fn load_link_by_pair(conn: &Connection, a: WordId, b: WordId) -> RepoResult<Option<Link>> {
    let mut stmt = conn.prepare(&format!(
        "{LINK_SELECT_SQL}
         WHERE (word1_uuid = ?1 AND word2_uuid = ?2)
            OR (word1_uuid = ?2 AND word2_uuid = ?1)
         LIMIT 1;"
    ))?;
    let row = stmt
        .query_row(params![a.to_string(), b.to_string()], |row| {
            Ok(parse_link_row(row))
        })
        .optional()?;
    row.transpose()
}

fn parse_link_row(row: &Row<'_>) -> RepoResult<Link> {
    let uuid_text: String = row.get("uuid")?;
    let word1_text: String = row.get("word1_uuid")?;
    let word2_text: String = row.get("word2_uuid")?;
    Ok(Link {
        id: parse_uuid(&uuid_text, "links.uuid")?,
        word1_id: parse_uuid(&word1_text, "links.word1_uuid")?,
        word2_id: parse_uuid(&word2_text, "links.word2_uuid")?,
        owner_id: row.get("owner_id")?,
        content: row.get("content")?,
        description: row.get("description")?,
        refs: refs_from_db(row.get("refs")?, "links.refs")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
