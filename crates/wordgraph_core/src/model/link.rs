//! Link (labeled relation) domain model.
//!
//! # Invariants
//! - `word1_id != word2_id`.
//! - At most one Link exists per unordered pair `{word1_id, word2_id}`.
//! - Every stored Link is bound to exactly one adjacency edge.

use crate::model::profile::UserId;
use crate::model::validation::{
    check_refs, limit_text, require_text, ValidationError, CONTENT_MAX_CHARS,
    DESCRIPTION_MAX_CHARS,
};
use crate::model::word::WordId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a Link.
pub type LinkId = Uuid;

/// Stored labeled relation between two Words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: LinkId,
    pub word1_id: WordId,
    pub word2_id: WordId,
    pub owner_id: UserId,
    pub content: String,
    pub description: Option<String>,
    pub refs: Option<Vec<String>>,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

impl Link {
    /// Returns whether this Link joins `a` and `b` in either order.
    pub fn joins(&self, a: WordId, b: WordId) -> bool {
        (self.word1_id == a && self.word2_id == b) || (self.word1_id == b && self.word2_id == a)
    }
}

/// Caller-editable Link payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkFields {
    pub content: String,
    pub description: Option<String>,
    pub refs: Option<Vec<String>>,
}

impl LinkFields {
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

    /// Same limits as Word input.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("content", &self.content, CONTENT_MAX_CHARS)?;
        if let Some(description) = self.description.as_deref() {
            limit_text("description", description, DESCRIPTION_MAX_CHARS)?;
        }
        check_refs(self.refs.as_deref())
    }
}
