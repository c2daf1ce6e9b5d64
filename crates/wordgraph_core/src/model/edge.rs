//! Adjacency edges and traversal result shapes.
//!
//! # Invariants
//! - An edge never connects a Word to itself.
//! - Edges are stored directed (`source -> target`) but traversed undirected.
//! - `link_id` is set only for the single edge bound to a Link.

use crate::model::link::LinkId;
use crate::model::word::{Word, WordId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of an adjacency edge.
pub type EdgeId = Uuid;

/// Unlabeled engine-level connection between two Words.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjacencyEdge {
    pub id: EdgeId,
    pub source_id: WordId,
    pub target_id: WordId,
    /// Link bound to this edge, if any.
    pub link_id: Option<LinkId>,
}

impl AdjacencyEdge {
    /// Returns whether `word` is one of the endpoints.
    pub fn touches(&self, word: WordId) -> bool {
        self.source_id == word || self.target_id == word
    }

    /// Returns the endpoint opposite to `word`, or `None` if `word` is not an endpoint.
    pub fn opposite(&self, word: WordId) -> Option<WordId> {
        if self.source_id == word {
            Some(self.target_id)
        } else if self.target_id == word {
            Some(self.source_id)
        } else {
            None
        }
    }
}

/// Words plus the adjacency edges between them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subgraph {
    pub words: Vec<Word>,
    pub edges: Vec<AdjacencyEdge>,
}

impl Subgraph {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.edges.is_empty()
    }

    /// Word ids in stored order.
    pub fn word_ids(&self) -> Vec<WordId> {
        self.words.iter().map(|word| word.id).collect()
    }
}
