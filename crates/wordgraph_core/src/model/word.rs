//! Word (concept node) domain model.
//!
//! # Responsibility
//! - Define the stored Word record and the caller-editable field set.
//!
//! # Invariants
//! - `id` is engine-generated and never reused.
//! - A Word belongs to exactly one Graph and one owner for its lifetime.
//! - Words are hard-deleted; there is no tombstone flag.

use crate::model::graph::GraphId;
use crate::model::profile::UserId;
use crate::model::validation::{
    check_refs, limit_text, require_text, ValidationError, CONTENT_MAX_CHARS,
    DESCRIPTION_MAX_CHARS,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a Word node.
pub type WordId = Uuid;

/// Stored Word node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: WordId,
    /// Containing graph (containment edge).
    pub graph_id: GraphId,
    /// Creator; immutable after creation.
    pub owner_id: UserId,
    pub content: String,
    pub description: Option<String>,
    /// Ordered external references.
    pub refs: Option<Vec<String>>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds of the last field update.
    pub updated_at: Option<i64>,
}

/// Caller-editable Word fields, used for both create and full-replace update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordFields {
    pub content: String,
    pub description: Option<String>,
    pub refs: Option<Vec<String>>,
}

impl WordFields {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            description: None,
            refs: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_refs<I, S>(mut self, refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.refs = Some(refs.into_iter().map(Into::into).collect());
        self
    }

    /// Validates input limits.
    ///
    /// # Errors
    /// - `content` blank or longer than 50 chars.
    /// - `description` longer than 512 chars.
    /// - Any blank entry in `refs`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("content", &self.content, CONTENT_MAX_CHARS)?;
        if let Some(description) = self.description.as_deref() {
            limit_text("description", description, DESCRIPTION_MAX_CHARS)?;
        }
        check_refs(self.refs.as_deref())
    }
}
