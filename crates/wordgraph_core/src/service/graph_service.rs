//! Graph catalog use-case service.
//!
//! # Responsibility
//! - List, read, create, update and soft-delete Graph containers.
//!
//! # Invariants
//! - Update and delete require ownership approval; a denial is reported as
//!   `NotFound` so foreign graphs are indistinguishable from absent ones.
//! - Listing only returns the caller's own, non-deleted graphs.

use crate::auth::is_allowed;
use crate::context::CallContext;
use crate::model::graph::{Graph, GraphId, GraphPatch, NewGraph};
use crate::repo::graph_repo::GraphRepository;
use crate::service::{observe, ServiceError, ServiceResult};
use log::Level;

/// Graph catalog service facade over repository implementations.
pub struct GraphService<G: GraphRepository> {
    repo: G,
    default_kind: String,
}

impl<G: GraphRepository> GraphService<G> {
    /// Creates a service; `default_kind` tags graphs created without a type.
    pub fn new(repo: G, default_kind: impl Into<String>) -> Self {
        Self {
            repo,
            default_kind: default_kind.into(),
        }
    }

    /// Active graphs owned by the caller.
    pub fn list_graphs(&self, ctx: &CallContext) -> ServiceResult<Vec<Graph>> {
        ctx.checkpoint()?;
        Ok(self.repo.list_graphs(&ctx.profile().id)?)
    }

    /// Loads one active graph.
    pub fn get_graph(&self, ctx: &CallContext, id: GraphId) -> ServiceResult<Graph> {
        ctx.checkpoint()?;
        self.repo
            .get_graph(id)?
            .ok_or_else(|| ServiceError::not_found(format!("graph {id}")))
    }

    /// Creates a graph owned by the caller.
    pub fn create_graph(&self, ctx: &CallContext, input: &NewGraph) -> ServiceResult<Graph> {
        observe("graph_create", Level::Info, || {
            ctx.checkpoint()?;
            input.validate()?;
            Ok(self
                .repo
                .create_graph(&ctx.profile().id, input, &self.default_kind)?)
        })
    }

    /// Applies non-blank patch fields.
    pub fn update_graph(
        &self,
        ctx: &CallContext,
        id: GraphId,
        patch: &GraphPatch,
    ) -> ServiceResult<Graph> {
        observe("graph_update", Level::Info, || {
            ctx.checkpoint()?;
            let patch = patch.normalized();
            patch.validate()?;
            self.load_owned(ctx, id)?;
            Ok(self.repo.update_graph(id, &patch)?)
        })
    }

    /// Soft-deletes a graph; its words stay addressable by id.
    pub fn delete_graph(&self, ctx: &CallContext, id: GraphId) -> ServiceResult<()> {
        observe("graph_delete", Level::Info, || {
            ctx.checkpoint()?;
            self.load_owned(ctx, id)?;
            Ok(self.repo.soft_delete_graph(id)?)
        })
    }

    fn load_owned(&self, ctx: &CallContext, id: GraphId) -> ServiceResult<Graph> {
        match self.repo.get_graph(id)? {
            Some(graph) if is_allowed(ctx.profile(), &graph.owner_id) => Ok(graph),
            _ => Err(ServiceError::not_found(format!("graph {id}"))),
        }
    }
}
