//! Read-only exploration service: paths, neighborhoods, graph data, search.
//!
//! # Invariants
//! - Neighbor depth is clamped to the configured maximum.
//! - Search limits are capped by `search_max_limit`; non-positive limits
//!   return nothing.

use crate::config::EngineConfig;
use crate::context::CallContext;
use crate::model::edge::{AdjacencyEdge, Subgraph};
use crate::model::graph::GraphId;
use crate::model::word::{Word, WordId};
use crate::query::GraphQuery;
use crate::search::fts::{SearchHit, SearchQuery, TextIndex};
use crate::service::{observe, ServiceResult};
use log::Level;

/// Facade over the query engine and text index.
pub struct ExploreService<Q: GraphQuery, T: TextIndex> {
    query: Q,
    index: T,
    config: EngineConfig,
}

impl<Q: GraphQuery, T: TextIndex> ExploreService<Q, T> {
    pub fn new(query: Q, index: T, config: EngineConfig) -> Self {
        Self {
            query,
            index,
            config,
        }
    }

    /// One shortest path between two words; empty when unreachable or unknown.
    pub fn find_path(&self, ctx: &CallContext, from: WordId, to: WordId) -> ServiceResult<Subgraph> {
        observe("find_path", Level::Debug, || {
            ctx.checkpoint()?;
            Ok(self.query.shortest_path(from, to, ctx)?)
        })
    }

    /// Edges within `depth` hops of `id`.
    pub fn find_neighbors(
        &self,
        ctx: &CallContext,
        id: WordId,
        depth: u32,
    ) -> ServiceResult<Vec<AdjacencyEdge>> {
        observe("find_neighbors", Level::Debug, || {
            ctx.checkpoint()?;
            let depth = depth.min(self.config.max_neighbor_depth);
            Ok(self.query.neighbors_within_depth(id, depth, ctx)?)
        })
    }

    /// Words of a graph plus every adjacency edge touching them.
    pub fn graph_data(&self, ctx: &CallContext, graph_id: GraphId) -> ServiceResult<Subgraph> {
        observe("graph_data", Level::Debug, || {
            ctx.checkpoint()?;
            Ok(self.query.graph_assembly(graph_id, ctx)?)
        })
    }

    /// Free-text word search with the configured default limit.
    pub fn search_words(&self, ctx: &CallContext, text: &str) -> ServiceResult<Vec<Word>> {
        let query = SearchQuery::new(text, self.config.effective_search_limit(None));
        let hits = self.search(ctx, &query)?;
        Ok(hits.into_iter().map(|hit| hit.word).collect())
    }

    /// Ranked search with full query options.
    pub fn search(&self, ctx: &CallContext, query: &SearchQuery) -> ServiceResult<Vec<SearchHit>> {
        observe("word_search", Level::Debug, || {
            ctx.checkpoint()?;
            let mut query = query.clone();
            query.limit = self.config.effective_search_limit(Some(query.limit));
            Ok(self.index.search(&query)?)
        })
    }
}
