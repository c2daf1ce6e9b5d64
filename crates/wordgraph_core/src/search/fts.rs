//! SQLite FTS5-based word search.
//!
//! # Responsibility
//! - Rank Words by text relevance over `content` and `description`.
//! - Return full Word records with their relevance score.
//!
//! # Invariants
//! - Index rows are written by triggers inside the same transaction as the
//!   word row, so the index never lags committed data.
//! - Ordering is `score DESC`, then insertion order for equal scores.
//! - A non-positive limit yields no hits.

use crate::db::DbError;
use crate::model::graph::GraphId;
use crate::model::word::Word;
use crate::repo::word_repo::parse_word_row;
use crate::repo::RepoError;
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::error::Error;
use std::fmt::{Display, Formatter};

static TERM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{L}\p{N}_]+").expect("valid search term regex"));

/// Result type for search APIs.
pub type SearchResult<T> = Result<T, SearchError>;

/// Search-layer error for query parsing, DB interaction and result decoding.
#[derive(Debug)]
pub enum SearchError {
    /// Raw query cannot be parsed by FTS5 syntax.
    InvalidQuery {
        query: String,
        message: String,
    },
    Db(DbError),
    InvalidData(String),
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidQuery { query, message } => {
                write!(f, "invalid full-text query `{query}`: {message}")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid search row: {message}"),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidQuery { .. } => None,
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for SearchError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SearchError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<RepoError> for SearchError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Db(err) => Self::Db(err),
            other => Self::InvalidData(other.to_string()),
        }
    }
}

/// Search options for full-text query behavior.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// User query text.
    pub text: String,
    /// Restricts hits to one graph.
    pub graph_id: Option<GraphId>,
    /// Maximum number of hits; `<= 0` returns nothing.
    pub limit: i64,
    /// Whether to pass text directly as raw FTS5 expression.
    ///
    /// Default is `false` so free text never fails with syntax errors.
    pub raw_fts_syntax: bool,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, limit: i64) -> Self {
        Self {
            text: text.into(),
            graph_id: None,
            limit,
            raw_fts_syntax: false,
        }
    }

    pub fn in_graph(mut self, graph_id: GraphId) -> Self {
        self.graph_id = Some(graph_id);
        self
    }

    pub fn raw(mut self) -> Self {
        self.raw_fts_syntax = true;
        self
    }
}

/// Single ranked word hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub word: Word,
    /// Relevance; larger is better.
    pub score: f64,
}

/// Ranked text lookup over Words.
pub trait TextIndex {
    fn search(&self, query: &SearchQuery) -> SearchResult<Vec<SearchHit>>;
    /// Rebuilds the index from the `words` table.
    fn rebuild(&self) -> SearchResult<()>;
}

/// FTS5 index stored next to the `words` table.
pub struct SqliteTextIndex<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTextIndex<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TextIndex for SqliteTextIndex<'_> {
    fn search(&self, query: &SearchQuery) -> SearchResult<Vec<SearchHit>> {
        search_words(self.conn, query)
    }

    fn rebuild(&self) -> SearchResult<()> {
        self.conn
            .execute("INSERT INTO words_fts (words_fts) VALUES ('rebuild');", [])?;
        Ok(())
    }
}

/// Searches words via FTS5 and returns ranked hits.
///
/// Returns an empty list for blank queries.
pub fn search_words(conn: &Connection, query: &SearchQuery) -> SearchResult<Vec<SearchHit>> {
    if query.limit <= 0 {
        return Ok(Vec::new());
    }
    let Some(match_expr) = build_match_expression(query) else {
        return Ok(Vec::new());
    };

    let mut sql = String::from(
        "SELECT
            w.uuid AS uuid,
            w.graph_uuid AS graph_uuid,
            w.owner_id AS owner_id,
            w.content AS content,
            w.description AS description,
            w.refs AS refs,
            w.created_at AS created_at,
            w.updated_at AS updated_at,
            -bm25(words_fts) AS score
         FROM words_fts
         INNER JOIN words w ON w.seq = words_fts.rowid
         WHERE words_fts MATCH ?",
    );
    let mut bind_values: Vec<Value> = vec![Value::Text(match_expr.clone())];

    if let Some(graph_id) = query.graph_id {
        sql.push_str(" AND w.graph_uuid = ?");
        bind_values.push(Value::Text(graph_id.to_string()));
    }

    sql.push_str(" ORDER BY score DESC, w.seq ASC LIMIT ?");
    bind_values.push(Value::Integer(query.limit));

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt
        .query(params_from_iter(bind_values))
        .map_err(|err| map_query_error(err, &match_expr))?;
    let mut hits = Vec::new();

    while let Some(row) = rows
        .next()
        .map_err(|err| map_query_error(err, &match_expr))?
    {
        hits.push(SearchHit {
            word: parse_word_row(row)?,
            score: row.get("score")?,
        });
    }

    Ok(hits)
}

fn build_match_expression(query: &SearchQuery) -> Option<String> {
    let text = query.text.trim();
    if text.is_empty() {
        return None;
    }

    if query.raw_fts_syntax {
        return Some(text.to_string());
    }

    let terms = TERM_RE
        .find_iter(text)
        .map(|term| format!("\"{}\"", term.as_str()))
        .collect::<Vec<_>>();

    if terms.is_empty() {
        return None;
    }

    // OR lets a word matching more terms outrank one matching fewer.
    Some(terms.join(" OR "))
}

fn map_query_error(err: rusqlite::Error, query: &str) -> SearchError {
    if is_match_syntax_error(&err) {
        return SearchError::InvalidQuery {
            query: query.to_string(),
            message: err.to_string(),
        };
    }

    SearchError::Db(DbError::Sqlite(err))
}

fn is_match_syntax_error(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(_, Some(message)) => {
            let msg = message.to_lowercase();
            (msg.contains("fts5") && msg.contains("syntax"))
                || msg.contains("malformed match expression")
                || msg.contains("unterminated")
                || msg.contains("no such column")
        }
        _ => false,
    }
}
