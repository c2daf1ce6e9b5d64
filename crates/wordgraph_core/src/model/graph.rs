//! Graph container domain model.
//!
//! # Responsibility
//! - Define the Graph record and its create/update inputs.
//! - Provide soft-delete lifecycle helpers.
//!
//! # Invariants
//! - Graph deletion is logical (`is_deleted`), never physical.
//! - Words of a deleted Graph stay addressable by id.

use crate::model::profile::UserId;
use crate::model::validation::{
    limit_text, require_text, ValidationError, GRAPH_NAME_MAX_CHARS, GRAPH_TYPE_MAX_CHARS,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a Graph container.
pub type GraphId = Uuid;

/// Named, owned container of Words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Graph {
    pub id: GraphId,
    pub owner_id: UserId,
    pub name: String,
    /// Free-form rendering tag, serialized as `type`.
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: i64,
    pub updated_at: Option<i64>,
    /// Soft delete flag; deleted graphs are hidden from listing.
    pub is_deleted: bool,
}

impl Graph {
    /// Returns whether this Graph should be listed.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

/// Input for creating a Graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGraph {
    pub name: String,
    /// Falls back to the configured default type when `None`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl NewGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name, GRAPH_NAME_MAX_CHARS)?;
        if let Some(kind) = self.kind.as_deref() {
            require_text("type", kind, GRAPH_TYPE_MAX_CHARS)?;
        }
        Ok(())
    }
}

/// Partial Graph update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphPatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl GraphPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            kind: None,
        }
    }

    pub fn retype(kind: impl Into<String>) -> Self {
        Self {
            name: None,
            kind: Some(kind.into()),
        }
    }

    /// Blank values count as "unchanged", matching partial-update semantics.
    pub fn normalized(&self) -> Self {
        let keep = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        Self {
            name: keep(&self.name),
            kind: keep(&self.kind),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = self.name.as_deref() {
            limit_text("name", name, GRAPH_NAME_MAX_CHARS)?;
        }
        if let Some(kind) = self.kind.as_deref() {
            limit_text("type", kind, GRAPH_TYPE_MAX_CHARS)?;
        }
        Ok(())
    }
}
