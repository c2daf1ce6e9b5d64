//! Word use-case service.
//!
//! # Responsibility
//! - Create, read, update and delete Word nodes.
//! - Create bare adjacency edges (`link_words`, anchored creation).
//!
//! # Invariants
//! - Creating into a graph the caller may not modify reports `NotFound`.
//! - Update and delete report `Unauthorized` for a foreign, existing word.
//! - Bare edges never get a Link record attached here.

use crate::auth::{authorize, is_allowed};
use crate::context::CallContext;
use crate::model::edge::AdjacencyEdge;
use crate::model::graph::GraphId;
use crate::model::word::{Word, WordFields, WordId};
use crate::repo::graph_repo::GraphRepository;
use crate::repo::word_repo::WordRepository;
use crate::service::{observe, ServiceError, ServiceResult};
use log::Level;

/// Word service facade over repository implementations.
pub struct WordService<W: WordRepository, G: GraphRepository> {
    words: W,
    graphs: G,
}

impl<W: WordRepository, G: GraphRepository> WordService<W, G> {
    pub fn new(words: W, graphs: G) -> Self {
        Self { words, graphs }
    }

    /// Creates a word inside `graph_id`, owned by the caller.
    pub fn create_word(
        &self,
        ctx: &CallContext,
        graph_id: GraphId,
        fields: &WordFields,
    ) -> ServiceResult<Word> {
        observe("word_create", Level::Info, || {
            ctx.checkpoint()?;
            fields.validate()?;
            self.ensure_graph_writable(ctx, graph_id)?;
            Ok(self
                .words
                .create_word(graph_id, &ctx.profile().id, fields, None)?)
        })
    }

    /// Creates a word with one adjacency edge to an existing `anchor` word.
    pub fn create_word_with_link(
        &self,
        ctx: &CallContext,
        graph_id: GraphId,
        anchor: WordId,
        fields: &WordFields,
    ) -> ServiceResult<Word> {
        observe("word_create_anchored", Level::Info, || {
            ctx.checkpoint()?;
            fields.validate()?;
            self.ensure_graph_writable(ctx, graph_id)?;
            if self.words.find_by_id(anchor)?.is_none() {
                return Err(ServiceError::not_found(format!("anchor word {anchor}")));
            }
            Ok(self
                .words
                .create_word(graph_id, &ctx.profile().id, fields, Some(anchor))?)
        })
    }

    /// Replaces the editable fields of a word.
    pub fn update_word(
        &self,
        ctx: &CallContext,
        id: WordId,
        fields: &WordFields,
    ) -> ServiceResult<Word> {
        observe("word_update", Level::Info, || {
            ctx.checkpoint()?;
            fields.validate()?;
            let word = self.require_word(id)?;
            authorize(ctx.profile(), &word.owner_id)?;
            Ok(self.words.update_word(id, fields)?)
        })
    }

    /// Deletes a word together with its links and adjacency edges.
    pub fn delete_word(&self, ctx: &CallContext, id: WordId) -> ServiceResult<()> {
        observe("word_delete", Level::Info, || {
            ctx.checkpoint()?;
            let word = self.require_word(id)?;
            authorize(ctx.profile(), &word.owner_id)?;
            Ok(self.words.delete_word(id)?)
        })
    }

    pub fn get_word(&self, ctx: &CallContext, id: WordId) -> ServiceResult<Word> {
        ctx.checkpoint()?;
        self.require_word(id)
    }

    /// Bulk lookup; unknown ids are skipped.
    pub fn get_words(&self, ctx: &CallContext, ids: &[WordId]) -> ServiceResult<Vec<Word>> {
        ctx.checkpoint()?;
        Ok(self.words.find_by_ids(ids)?)
    }

    /// One word sampled uniformly; `NotFound` on an empty store.
    pub fn get_random_word(&self, ctx: &CallContext) -> ServiceResult<Word> {
        ctx.checkpoint()?;
        self.words
            .random_word()?
            .ok_or_else(|| ServiceError::not_found("any word"))
    }

    /// Relates two words with a bare adjacency edge.
    ///
    /// Does not deduplicate; a missing endpoint surfaces as `NotFound` from
    /// the store.
    pub fn link_words(
        &self,
        ctx: &CallContext,
        source: WordId,
        target: WordId,
    ) -> ServiceResult<AdjacencyEdge> {
        observe("word_relate", Level::Info, || {
            ctx.checkpoint()?;
            if source == target {
                return Err(ServiceError::bad_input("a word cannot be related to itself"));
            }
            Ok(self.words.create_adjacency_edge(source, target)?)
        })
    }

    fn require_word(&self, id: WordId) -> ServiceResult<Word> {
        self.words
            .find_by_id(id)?
            .ok_or_else(|| ServiceError::not_found(format!("word {id}")))
    }

    fn ensure_graph_writable(&self, ctx: &CallContext, graph_id: GraphId) -> ServiceResult<()> {
        match self.graphs.get_graph(graph_id)? {
            Some(graph) if is_allowed(ctx.profile(), &graph.owner_id) => Ok(()),
            _ => Err(ServiceError::not_found(format!("graph {graph_id}"))),
        }
    }
}
